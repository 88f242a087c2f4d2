use glam::Mat4;

/// Camera matrices of the frame being rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderInfo {
    pub view_matrix: Mat4,
    pub projection_matrix: Mat4,
}

impl Default for RenderInfo {
    fn default() -> Self {
        Self {
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        }
    }
}

impl RenderInfo {
    #[inline]
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }
}
