//! Vertex data living on the GPU.

use glam::Vec3;

use crate::errors::Result;
use crate::gls::Gls;
use crate::gls::consts::{
    ARRAY_BUFFER, ELEMENT_ARRAY_BUFFER, FLOAT, STATIC_DRAW, TRIANGLES, UNSIGNED_INT,
};
use crate::resources::bounding::BoundingBox;
use crate::resources::shader_defines::ShaderDefines;

/// Attribute location of vertex positions.
pub const POSITION_LOCATION: u32 = 0;

/// A vertex array plus the buffers it reads from.
///
/// CPU-side data is not retained after [`Geometry::upload`]; only the
/// bounding box and element counts survive.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub mode: u32,
    pub bounding_box: BoundingBox,
    pub defines: ShaderDefines,
    vao: u32,
    buffers: Vec<u32>,
    vertex_count: u32,
    index_count: Option<u32>,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(TRIANGLES)
    }
}

impl Geometry {
    /// Empty geometry drawn with primitive `mode`.
    #[must_use]
    pub fn new(mode: u32) -> Self {
        Self {
            mode,
            bounding_box: BoundingBox::EMPTY,
            defines: ShaderDefines::new(),
            vao: 0,
            buffers: Vec::new(),
            vertex_count: 0,
            index_count: None,
        }
    }

    /// Uploads positions (and optional indices) and records the bounds.
    ///
    /// Replaces any earlier upload; the old objects are deleted first.
    pub fn upload(&mut self, gls: &mut Gls, positions: &[Vec3], indices: Option<&[u32]>) -> Result<()> {
        self.dispose(gls);

        let vao = gls.gen_vertex_array()?;
        gls.bind_vertex_array(vao);
        self.vao = vao;

        let vbo = gls.gen_buffer()?;
        self.buffers.push(vbo);
        gls.bind_buffer(ARRAY_BUFFER, vbo);
        gls.buffer_data(ARRAY_BUFFER, bytemuck::cast_slice(positions), STATIC_DRAW);
        gls.enable_vertex_attrib_array(POSITION_LOCATION);
        gls.vertex_attrib_pointer(POSITION_LOCATION, 3, FLOAT, false, 12, 0);

        if let Some(indices) = indices {
            let ibo = gls.gen_buffer()?;
            self.buffers.push(ibo);
            gls.bind_buffer(ELEMENT_ARRAY_BUFFER, ibo);
            gls.buffer_data(ELEMENT_ARRAY_BUFFER, bytemuck::cast_slice(indices), STATIC_DRAW);
            self.index_count = Some(indices.len() as u32);
        } else {
            self.index_count = None;
        }
        gls.bind_vertex_array(0);

        self.vertex_count = positions.len() as u32;
        self.bounding_box = BoundingBox::from_points(positions);
        Ok(())
    }

    /// Deletes the GPU objects. The bounds are kept.
    pub fn dispose(&mut self, gls: &mut Gls) {
        if self.vao != 0 {
            gls.delete_vertex_arrays(&[self.vao]);
            self.vao = 0;
        }
        if !self.buffers.is_empty() {
            gls.delete_buffers(&self.buffers);
            self.buffers.clear();
        }
    }

    #[inline]
    #[must_use]
    pub fn vao(&self) -> u32 {
        self.vao
    }

    #[inline]
    #[must_use]
    pub fn is_indexed(&self) -> bool {
        self.index_count.is_some()
    }

    /// Number of elements a full draw covers (indices when indexed).
    #[inline]
    #[must_use]
    pub fn element_count(&self) -> u32 {
        self.index_count.unwrap_or(self.vertex_count)
    }

    #[must_use]
    pub fn with_bounding_box(mut self, bounding_box: BoundingBox) -> Self {
        self.bounding_box = bounding_box;
        self
    }

    /// Draws `count` elements starting at `start`; `count == 0` means to the end.
    pub fn draw(&self, gls: &mut Gls, start: u32, count: u32) {
        let total = self.element_count();
        let start = start.min(total);
        let count = if count == 0 { total - start } else { count.min(total - start) };
        if count == 0 {
            return;
        }

        gls.bind_vertex_array(self.vao);
        if self.is_indexed() {
            gls.draw_elements(self.mode, count as i32, UNSIGNED_INT, start * 4);
        } else {
            gls.draw_arrays(self.mode, start as i32, count as i32);
        }
    }
}
