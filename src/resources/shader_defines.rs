//! Shader Macro Definitions
//!
//! [`ShaderDefines`] is an ordered set of `NAME -> value` pairs that ends up
//! as `#define NAME value` lines at the top of every shader stage.
//!
//! Keys are kept sorted, so two sets built in a different order compare and
//! hash equal. This is what lets a shader variant be keyed by the defines it
//! was compiled with.
//!
//! # Usage
//!
//! ```rust,ignore
//! use prism::resources::ShaderDefines;
//!
//! let mut defines = ShaderDefines::new();
//! defines.set("USE_MAP", "1");
//! defines.set("MAX_BONES", "32");
//!
//! let hash = defines.compute_hash();
//! ```

use std::hash::{Hash, Hasher};

/// A collection of shader macro definitions, sorted by name.
#[derive(Debug, Clone, Default)]
pub struct ShaderDefines {
    defines: Vec<(String, String)>,
}

impl ShaderDefines {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            defines: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            defines: Vec::with_capacity(capacity),
        }
    }

    fn position(&self, key: &str) -> Result<usize, usize> {
        self.defines.binary_search_by(|(k, _)| k.as_str().cmp(key))
    }

    /// Set shader define (maintains sorted order)
    ///
    /// If key exists, updates its value; otherwise inserts new entry.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.position(key) {
            Ok(idx) => {
                if self.defines[idx].1 != value {
                    value.clone_into(&mut self.defines[idx].1);
                }
            }
            Err(idx) => {
                self.defines.insert(idx, (key.to_owned(), value.to_owned()));
            }
        }
    }

    /// Remove shader define
    pub fn remove(&mut self, key: &str) -> bool {
        if let Ok(idx) = self.position(key) {
            self.defines.remove(idx);
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_ok()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.position(key)
            .ok()
            .map(|idx| self.defines[idx].1.as_str())
    }

    /// Clear all shader defines, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.defines.clear();
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.defines.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Iterate all shader defines in name order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.defines.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge shader defines from another `ShaderDefines`
    ///
    /// If there are conflicts, values from other will override values in self.
    /// Keys are never removed.
    pub fn merge(&mut self, other: &ShaderDefines) {
        for (key, value) in &other.defines {
            self.set(key, value);
        }
    }

    /// Compute content hash (for caching)
    #[must_use]
    pub fn compute_hash(&self) -> u64 {
        use std::hash::BuildHasher;

        rustc_hash::FxBuildHasher.hash_one(self)
    }
}

impl Hash for ShaderDefines {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.defines.hash(state);
    }
}

impl PartialEq for ShaderDefines {
    fn eq(&self, other: &Self) -> bool {
        self.defines == other.defines
    }
}

impl Eq for ShaderDefines {}

impl From<&[(&str, &str)]> for ShaderDefines {
    fn from(defines: &[(&str, &str)]) -> Self {
        let mut result = Self::with_capacity(defines.len());
        for (k, v) in defines {
            result.set(k, v);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut defines = ShaderDefines::new();
        defines.set("USE_MAP", "1");
        defines.set("USE_NORMAL_MAP", "1");

        assert!(defines.contains("USE_MAP"));
        assert!(defines.contains("USE_NORMAL_MAP"));
        assert!(!defines.contains("USE_AO_MAP"));

        assert_eq!(defines.get("USE_MAP"), Some("1"));
    }

    #[test]
    fn test_ordering() {
        let mut defines = ShaderDefines::new();
        defines.set("B", "1");
        defines.set("A", "1");
        defines.set("C", "1");

        let keys: Vec<_> = defines.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["A", "B", "C"]);
    }

    #[test]
    fn test_merge() {
        let mut d1 = ShaderDefines::new();
        d1.set("A", "1");
        d1.set("B", "2");

        let mut d2 = ShaderDefines::new();
        d2.set("B", "3");
        d2.set("C", "4");

        d1.merge(&d2);

        assert_eq!(d1.get("A"), Some("1"));
        assert_eq!(d1.get("B"), Some("3")); // Overwritten
        assert_eq!(d1.get("C"), Some("4"));
    }

    #[test]
    fn test_merge_never_removes() {
        let mut acc = ShaderDefines::from(&[("FOG", "1")][..]);
        acc.merge(&ShaderDefines::new());
        assert!(acc.contains("FOG"));
    }

    #[test]
    fn test_remove() {
        let mut defines = ShaderDefines::from(&[("A", "1"), ("B", "2")][..]);
        assert!(defines.remove("A"));
        assert!(!defines.remove("A"));
        assert_eq!(defines.len(), 1);
    }

    #[test]
    fn test_hash_consistency() {
        let mut d1 = ShaderDefines::new();
        d1.set("A", "1");
        d1.set("B", "2");

        let mut d2 = ShaderDefines::new();
        d2.set("B", "2");
        d2.set("A", "1");

        assert_eq!(d1, d2);
        assert_eq!(d1.compute_hash(), d2.compute_hash());
    }
}
