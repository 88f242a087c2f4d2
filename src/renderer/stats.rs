use crate::gls::GlsStats;

/// What one frame rendered. Reset at the start of every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Bucket entries drawn
    pub graphics: usize,
    /// Light setups performed (lights × entries)
    pub lights: usize,
    /// GUI panels; there is no GUI pass, so always zero
    pub panels: usize,
    /// Visible non-graphic, non-light nodes visited
    pub others: usize,
}

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub render: RenderStats,
    pub gls: GlsStats,
}
