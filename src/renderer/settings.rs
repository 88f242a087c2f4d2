//! Renderer Settings
//!
//! ```rust,ignore
//! use prism::renderer::RendererSettings;
//!
//! let settings = RendererSettings {
//!     sort_objects: false,
//!     ..Default::default()
//! };
//! ```

use crate::gls::ClearFlags;

/// Per-renderer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererSettings {
    /// Depth-sort buckets before drawing. When off, buckets keep traversal
    /// order.
    pub sort_objects: bool,
    /// Buffers cleared at the start of a frame that draws.
    pub clear_mask: ClearFlags,
    /// Initial capacity of the per-frame scratch lists.
    pub initial_capacity: usize,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            sort_objects: true,
            clear_mask: ClearFlags::all(),
            initial_capacity: 64,
        }
    }
}
