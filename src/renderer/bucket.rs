use crate::scene::NodeKey;

/// One (graphic, material) pair queued for drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialEntry {
    pub node: NodeKey,
    /// Index into the graphic's material list
    pub material: usize,
    pub render_order: i32,
    /// View-space Z of the graphic's origin; the camera looks down -Z
    pub view_z: f32,
}

/// Render order ascending, then nearest first.
///
/// Unstable: materials of one graphic may interleave with another's.
pub fn sort_opaque(entries: &mut [MaterialEntry]) {
    entries.sort_unstable_by(|a, b| {
        a.render_order
            .cmp(&b.render_order)
            .then_with(|| b.view_z.total_cmp(&a.view_z))
    });
}

/// Render order ascending, then farthest first.
pub fn sort_transparent(entries: &mut [MaterialEntry]) {
    entries.sort_unstable_by(|a, b| {
        a.render_order
            .cmp(&b.render_order)
            .then_with(|| a.view_z.total_cmp(&b.view_z))
    });
}
