//! Graphics driver surface.
//!
//! [`GlDriver`] is the raw, uncached call surface of one graphics context.
//! A binding to a real API implements it by forwarding each method to the
//! matching driver entry point; [`HeadlessDriver`](super::HeadlessDriver)
//! implements it by recording the calls.
//!
//! Nothing outside [`Gls`](super::Gls) may call the stateful methods of a
//! driver that a `Gls` wraps. The cache assumes it is the single writer of
//! driver state and never re-reads it.

/// Primitive driver operations keyed by small integer enumerations
/// (see [`consts`](super::consts)).
///
/// Handles are plain `u32` names; `0` is the null handle.
pub trait GlDriver {
    // ========================================================================
    // Fixed-function state
    // ========================================================================
    fn enable(&mut self, cap: u32);
    fn disable(&mut self, cap: u32);
    fn blend_equation(&mut self, mode: u32);
    fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32);
    fn blend_func(&mut self, src: u32, dst: u32);
    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32);
    fn depth_func(&mut self, func: u32);
    fn depth_mask(&mut self, flag: bool);
    fn front_face(&mut self, mode: u32);
    fn cull_face(&mut self, mode: u32);
    fn active_texture(&mut self, unit: u32);
    fn line_width(&mut self, width: f32);
    fn polygon_mode(&mut self, face: u32, mode: u32);
    fn polygon_offset(&mut self, factor: f32, units: f32);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&mut self, mask: u32);

    // ========================================================================
    // Buffers and vertex arrays
    // ========================================================================
    fn create_buffer(&mut self) -> u32;
    fn delete_buffer(&mut self, buffer: u32);
    fn bind_buffer(&mut self, target: u32, buffer: u32);
    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32);
    fn create_vertex_array(&mut self) -> u32;
    fn delete_vertex_array(&mut self, vao: u32);
    fn bind_vertex_array(&mut self, vao: u32);
    fn enable_vertex_attrib_array(&mut self, index: u32);
    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: u32,
    );

    // ========================================================================
    // Textures
    // ========================================================================
    fn create_texture(&mut self) -> u32;
    fn delete_texture(&mut self, texture: u32);
    fn bind_texture(&mut self, target: u32, texture: u32);
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    );
    fn tex_parameteri(&mut self, target: u32, pname: u32, param: i32);
    fn generate_mipmap(&mut self, target: u32);

    // ========================================================================
    // Shaders and programs
    // ========================================================================
    fn create_shader(&mut self, kind: u32) -> u32;
    fn shader_source(&mut self, shader: u32, source: &str);
    fn compile_shader(&mut self, shader: u32);
    fn shader_compile_status(&mut self, shader: u32) -> bool;
    fn shader_info_log(&mut self, shader: u32) -> String;
    fn delete_shader(&mut self, shader: u32);
    fn create_program(&mut self) -> u32;
    fn attach_shader(&mut self, program: u32, shader: u32);
    fn link_program(&mut self, program: u32);
    fn program_link_status(&mut self, program: u32) -> bool;
    fn program_info_log(&mut self, program: u32) -> String;
    fn delete_program(&mut self, program: u32);
    fn use_program(&mut self, program: u32);
    /// Returns `-1` when the program has no active uniform with this name.
    fn uniform_location(&mut self, program: u32, name: &str) -> i32;

    // ========================================================================
    // Uniforms (apply to the bound program)
    // ========================================================================
    fn uniform1i(&mut self, location: i32, v: i32);
    fn uniform1f(&mut self, location: i32, v: f32);
    fn uniform3f(&mut self, location: i32, x: f32, y: f32, z: f32);
    fn uniform4f(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32);
    fn uniform3fv(&mut self, location: i32, values: &[f32]);
    fn uniform4fv(&mut self, location: i32, values: &[f32]);
    fn uniform_matrix3fv(&mut self, location: i32, transpose: bool, values: &[f32]);
    fn uniform_matrix4fv(&mut self, location: i32, transpose: bool, values: &[f32]);

    // ========================================================================
    // Draws and queries
    // ========================================================================
    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32);
    fn draw_elements(&mut self, mode: u32, count: i32, index_type: u32, offset: u32);
    fn get_error(&mut self) -> u32;
    fn get_string(&mut self, name: u32) -> String;
}
