/// Counters of live driver objects and cumulative call statistics.
///
/// Live counts go up on creation and down on deletion. Cumulative counters
/// only grow for the lifetime of the [`Gls`](super::Gls) that owns them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlsStats {
    /// Live shader objects
    pub shaders: usize,
    /// Programs registered as bound at least once and not yet deleted
    pub programs: usize,
    /// Live vertex array objects
    pub vaos: usize,
    /// Live buffer objects
    pub buffers: usize,
    /// Live textures
    pub textures: usize,
    /// Elided `enable` / `disable` calls
    pub cap_hits: u64,
    /// Uniform locations answered from the cache
    pub uniloc_hits: u64,
    /// Uniform locations queried from the driver
    pub uniloc_misses: u64,
    /// Uniform set calls
    pub unisets: u64,
    /// Draw calls
    pub draw_calls: u64,
}
