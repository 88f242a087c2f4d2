//! Last-set driver state.
//!
//! Every slot starts out undefined (`None`), so the first call for each
//! piece of state always reaches the driver, even when it asks for what
//! would be the driver's own default.

use rustc_hash::FxHashMap;

/// Enabled/disabled flag of one capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapState {
    Disabled,
    Enabled,
}

/// Viewport rectangle in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Snapshot of the last value passed to each stateful driver entry point.
///
/// Float slots hold `f32::to_bits` so that comparison is exact and
/// deterministic (`-0.0` and `0.0` differ, `NaN` equals itself).
#[derive(Debug, Clone, Default)]
pub struct CachedState {
    pub(crate) capabilities: FxHashMap<u32, CapState>,
    pub(crate) blend_equation: Option<u32>,
    pub(crate) blend_equation_separate: Option<(u32, u32)>,
    pub(crate) blend_func: Option<(u32, u32)>,
    pub(crate) blend_func_separate: Option<[u32; 4]>,
    pub(crate) depth_func: Option<u32>,
    pub(crate) depth_mask: Option<bool>,
    pub(crate) front_face: Option<u32>,
    pub(crate) cull_face: Option<u32>,
    pub(crate) active_texture: Option<u32>,
    pub(crate) line_width: Option<u32>,
    pub(crate) polygon_mode: Option<(u32, u32)>,
    pub(crate) polygon_offset: Option<(u32, u32)>,
    pub(crate) viewport: Option<Viewport>,
    pub(crate) program: Option<u32>,
}

impl CachedState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything. The next call for every slot reaches the driver.
    pub fn reset(&mut self) {
        self.capabilities.clear();
        self.blend_equation = None;
        self.blend_equation_separate = None;
        self.blend_func = None;
        self.blend_func_separate = None;
        self.depth_func = None;
        self.depth_mask = None;
        self.front_face = None;
        self.cull_face = None;
        self.active_texture = None;
        self.line_width = None;
        self.polygon_mode = None;
        self.polygon_offset = None;
        self.viewport = None;
        self.program = None;
    }

    /// `None` when the capability was never toggled through the cache.
    #[inline]
    #[must_use]
    pub fn capability(&self, cap: u32) -> Option<CapState> {
        self.capabilities.get(&cap).copied()
    }

    #[inline]
    #[must_use]
    pub fn depth_func(&self) -> Option<u32> {
        self.depth_func
    }

    #[inline]
    #[must_use]
    pub fn depth_mask(&self) -> Option<bool> {
        self.depth_mask
    }

    #[inline]
    #[must_use]
    pub fn front_face(&self) -> Option<u32> {
        self.front_face
    }

    #[inline]
    #[must_use]
    pub fn cull_face(&self) -> Option<u32> {
        self.cull_face
    }

    #[inline]
    #[must_use]
    pub fn active_texture(&self) -> Option<u32> {
        self.active_texture
    }

    #[inline]
    #[must_use]
    pub fn line_width(&self) -> Option<f32> {
        self.line_width.map(f32::from_bits)
    }

    #[inline]
    #[must_use]
    pub fn polygon_mode(&self) -> Option<(u32, u32)> {
        self.polygon_mode
    }

    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    #[inline]
    #[must_use]
    pub fn program(&self) -> Option<u32> {
        self.program
    }
}
