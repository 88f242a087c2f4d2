use std::collections::BTreeMap;

use minijinja::Value;

use crate::resources::{ShaderDefines, UseLights};

/// Variant key of a shader program.
///
/// Two specs that compare equal select the same compiled program. Light
/// maxima are shared by every draw of a frame; the rest comes from the
/// material, geometry and graphic being drawn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShaderSpecs {
    /// Program name registered with the shader manager
    pub name: String,
    /// One variant per name, whatever the other fields say
    pub unique: bool,
    pub use_lights: UseLights,
    pub ambient_lights_max: usize,
    pub dir_lights_max: usize,
    pub point_lights_max: usize,
    pub spot_lights_max: usize,
    pub mat_textures_max: usize,
    pub defines: ShaderDefines,
}

impl Default for ShaderSpecs {
    fn default() -> Self {
        Self {
            name: String::new(),
            unique: false,
            use_lights: UseLights::all(),
            ambient_lights_max: 0,
            dir_lights_max: 0,
            point_lights_max: 0,
            spot_lights_max: 0,
            mat_textures_max: 0,
            defines: ShaderDefines::new(),
        }
    }
}

impl ShaderSpecs {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Copy with the maxima of light kinds outside `use_lights` forced to
    /// zero, so materials that ignore a kind share one variant regardless of
    /// how many lights of that kind the scene holds.
    #[must_use]
    pub fn effective(&self) -> Self {
        let mut specs = self.clone();
        let mask = |flag: UseLights, n: usize| if self.use_lights.contains(flag) { n } else { 0 };
        specs.ambient_lights_max = mask(UseLights::AMBIENT, self.ambient_lights_max);
        specs.dir_lights_max = mask(UseLights::DIRECTIONAL, self.dir_lights_max);
        specs.point_lights_max = mask(UseLights::POINT, self.point_lights_max);
        specs.spot_lights_max = mask(UseLights::SPOT, self.spot_lights_max);
        specs
    }

    /// Whether a program built for `self` serves `other`.
    ///
    /// Two unique specs match on name alone.
    #[must_use]
    pub fn matches(&self, other: &ShaderSpecs) -> bool {
        if self.name != other.name || self.unique != other.unique {
            return false;
        }
        self.unique || self == other
    }

    /// Values every stage sees, as `#define`s and as template variables.
    ///
    /// Light and texture maxima come first; merged defines follow and may
    /// not shadow them.
    #[must_use]
    pub fn template_values(&self) -> BTreeMap<String, Value> {
        let mut values = BTreeMap::new();
        for (key, value) in self.defines.iter() {
            values.insert(key.to_owned(), Value::from(value));
        }
        values.insert("AMB_LIGHTS".to_owned(), Value::from(self.ambient_lights_max));
        values.insert("DIR_LIGHTS".to_owned(), Value::from(self.dir_lights_max));
        values.insert("POINT_LIGHTS".to_owned(), Value::from(self.point_lights_max));
        values.insert("SPOT_LIGHTS".to_owned(), Value::from(self.spot_lights_max));
        values.insert("MAT_TEXTURES".to_owned(), Value::from(self.mat_textures_max));
        values
    }

    /// `#version` line plus one `#define` per template value.
    #[must_use]
    pub fn header(&self) -> String {
        use std::fmt::Write;

        let mut header = String::from("#version 330 core\n");
        for (key, value) in self.template_values() {
            let _ = writeln!(header, "#define {key} {value}");
        }
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_masks_unused_lights() {
        let mut specs = ShaderSpecs::new("basic");
        specs.use_lights = UseLights::AMBIENT;
        specs.ambient_lights_max = 1;
        specs.point_lights_max = 3;

        let eff = specs.effective();
        assert_eq!(eff.ambient_lights_max, 1);
        assert_eq!(eff.point_lights_max, 0);
    }

    #[test]
    fn test_unique_matches_on_name() {
        let mut a = ShaderSpecs::new("sprite");
        a.unique = true;
        a.defines.set("A", "1");
        let mut b = ShaderSpecs::new("sprite");
        b.unique = true;
        assert!(a.matches(&b));

        b.unique = false;
        assert!(!a.matches(&b));
        a.unique = false;
        assert!(!a.matches(&b));
        assert!(!a.matches(&ShaderSpecs::new("other")));
    }

    #[test]
    fn test_header_lists_maxima_and_defines() {
        let mut specs = ShaderSpecs::new("basic");
        specs.dir_lights_max = 2;
        specs.defines.set("USE_FOG", "1");
        let header = specs.header();
        assert!(header.starts_with("#version 330 core\n"));
        assert!(header.contains("#define DIR_LIGHTS 2\n"));
        assert!(header.contains("#define USE_FOG 1\n"));
    }
}
