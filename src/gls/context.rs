//! The GPU state cache.
//!
//! [`Gls`] presents the driver call surface with every stateful setter made
//! idempotent: when the requested value equals the cached one the call is
//! dropped, otherwise it is forwarded and the cache updated. Resource
//! creation and deletion pass straight through while live counts are kept in
//! [`GlsStats`].

use log::{debug, error};
use rustc_hash::FxHashMap;

use super::consts::{
    BACK, BLEND, CCW, ClearFlags, CULL_FACE, DEPTH_TEST, FUNC_ADD, LEQUAL, MULTISAMPLE, NO_ERROR,
    ONE_MINUS_SRC_ALPHA, POLYGON_OFFSET_FILL, POLYGON_OFFSET_LINE, POLYGON_OFFSET_POINT,
    PROGRAM_POINT_SIZE, SRC_ALPHA,
};
use super::driver::GlDriver;
use super::state::{CachedState, CapState, Viewport};
use super::stats::GlsStats;
use crate::errors::{PrismError, Result};

/// Driver name of a linked program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

impl ProgramId {
    #[inline]
    #[must_use]
    pub fn handle(self) -> u32 {
        self.0
    }
}

/// Per-context cache configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlsSettings {
    /// Query the driver error flag after every forwarded call and log
    /// anything other than `NO_ERROR`.
    pub check_errors: bool,
}

impl Default for GlsSettings {
    fn default() -> Self {
        Self { check_errors: true }
    }
}

/// A program the cache has bound at least once.
#[derive(Debug, Default)]
struct KnownProgram {
    locations: FxHashMap<String, i32>,
}

/// State cache for one graphics context.
///
/// Construct it once, before any other call on the context, and route every
/// stateful call through it for the lifetime of the context.
pub struct Gls {
    driver: Box<dyn GlDriver>,
    state: CachedState,
    stats: GlsStats,
    programs: FxHashMap<ProgramId, KnownProgram>,
    current: Option<ProgramId>,
    check_errors: bool,
}

impl Gls {
    /// Wraps `driver`, resets the cache and applies the default state.
    #[must_use]
    pub fn new(driver: Box<dyn GlDriver>) -> Self {
        Self::with_settings(driver, GlsSettings::default())
    }

    #[must_use]
    pub fn with_settings(driver: Box<dyn GlDriver>, settings: GlsSettings) -> Self {
        let mut gls = Self {
            driver,
            state: CachedState::new(),
            stats: GlsStats::default(),
            programs: FxHashMap::default(),
            current: None,
            check_errors: settings.check_errors,
        };
        gls.reset();
        gls.set_default_state();
        debug!("state cache initialized");
        gls
    }

    /// Marks every cached slot undefined and forgets the current program.
    ///
    /// Use after foreign code touched the context, so the next call of each
    /// setter reaches the driver again.
    pub fn reset(&mut self) {
        self.state.reset();
        self.programs.clear();
        self.current = None;
    }

    fn set_default_state(&mut self) {
        self.enable(DEPTH_TEST);
        self.depth_func(LEQUAL);
        self.front_face(CCW);
        self.cull_face(BACK);
        self.enable(CULL_FACE);
        self.enable(BLEND);
        self.blend_equation(FUNC_ADD);
        self.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);
        self.enable(PROGRAM_POINT_SIZE);
        self.enable(MULTISAMPLE);
        self.enable(POLYGON_OFFSET_FILL);
        self.enable(POLYGON_OFFSET_LINE);
        self.enable(POLYGON_OFFSET_POINT);
    }

    pub fn set_check_errors(&mut self, enable: bool) {
        self.check_errors = enable;
    }

    #[must_use]
    pub fn check_errors(&self) -> bool {
        self.check_errors
    }

    /// Returns a copy of the current statistics.
    #[must_use]
    pub fn stats(&self) -> GlsStats {
        let mut stats = self.stats;
        stats.programs = self.programs.len();
        stats
    }

    #[must_use]
    pub fn state(&self) -> &CachedState {
        &self.state
    }

    #[must_use]
    pub fn current_program(&self) -> Option<ProgramId> {
        self.current
    }

    #[must_use]
    pub fn is_known_program(&self, program: ProgramId) -> bool {
        self.programs.contains_key(&program)
    }

    fn check(&mut self, call: &'static str) {
        if !self.check_errors {
            return;
        }
        let code = self.driver.get_error();
        if code != NO_ERROR {
            error!("driver error 0x{code:04X} after {call}");
        }
    }

    // ========================================================================
    // Cached state setters
    // ========================================================================

    pub fn enable(&mut self, cap: u32) {
        if self.state.capabilities.get(&cap) == Some(&CapState::Enabled) {
            self.stats.cap_hits += 1;
            return;
        }
        self.driver.enable(cap);
        self.check("enable");
        self.state.capabilities.insert(cap, CapState::Enabled);
    }

    pub fn disable(&mut self, cap: u32) {
        if self.state.capabilities.get(&cap) == Some(&CapState::Disabled) {
            self.stats.cap_hits += 1;
            return;
        }
        self.driver.disable(cap);
        self.check("disable");
        self.state.capabilities.insert(cap, CapState::Disabled);
    }

    /// Sets the same blend equation for colour and alpha.
    pub fn blend_equation(&mut self, mode: u32) {
        if self.state.blend_equation == Some(mode) {
            return;
        }
        self.driver.blend_equation(mode);
        self.check("blend_equation");
        self.state.blend_equation = Some(mode);
        self.state.blend_equation_separate = Some((mode, mode));
    }

    pub fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32) {
        if self.state.blend_equation_separate == Some((mode_rgb, mode_alpha)) {
            return;
        }
        self.driver.blend_equation_separate(mode_rgb, mode_alpha);
        self.check("blend_equation_separate");
        self.state.blend_equation_separate = Some((mode_rgb, mode_alpha));
        self.state.blend_equation = (mode_rgb == mode_alpha).then_some(mode_rgb);
    }

    pub fn blend_func(&mut self, src: u32, dst: u32) {
        if self.state.blend_func == Some((src, dst)) {
            return;
        }
        self.driver.blend_func(src, dst);
        self.check("blend_func");
        self.state.blend_func = Some((src, dst));
        self.state.blend_func_separate = Some([src, dst, src, dst]);
    }

    pub fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        let value = [src_rgb, dst_rgb, src_alpha, dst_alpha];
        if self.state.blend_func_separate == Some(value) {
            return;
        }
        self.driver.blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha);
        self.check("blend_func_separate");
        self.state.blend_func_separate = Some(value);
        self.state.blend_func =
            (src_rgb == src_alpha && dst_rgb == dst_alpha).then_some((src_rgb, dst_rgb));
    }

    pub fn depth_func(&mut self, func: u32) {
        if self.state.depth_func == Some(func) {
            return;
        }
        self.driver.depth_func(func);
        self.check("depth_func");
        self.state.depth_func = Some(func);
    }

    pub fn depth_mask(&mut self, flag: bool) {
        if self.state.depth_mask == Some(flag) {
            return;
        }
        self.driver.depth_mask(flag);
        self.check("depth_mask");
        self.state.depth_mask = Some(flag);
    }

    pub fn front_face(&mut self, mode: u32) {
        if self.state.front_face == Some(mode) {
            return;
        }
        self.driver.front_face(mode);
        self.check("front_face");
        self.state.front_face = Some(mode);
    }

    pub fn cull_face(&mut self, mode: u32) {
        if self.state.cull_face == Some(mode) {
            return;
        }
        self.driver.cull_face(mode);
        self.check("cull_face");
        self.state.cull_face = Some(mode);
    }

    /// Selects the texture unit (`TEXTURE0 + n`) later texture calls affect.
    pub fn active_texture(&mut self, unit: u32) {
        if self.state.active_texture == Some(unit) {
            return;
        }
        self.driver.active_texture(unit);
        self.check("active_texture");
        self.state.active_texture = Some(unit);
    }

    pub fn line_width(&mut self, width: f32) {
        let bits = width.to_bits();
        if self.state.line_width == Some(bits) {
            return;
        }
        self.driver.line_width(width);
        self.check("line_width");
        self.state.line_width = Some(bits);
    }

    pub fn polygon_mode(&mut self, face: u32, mode: u32) {
        if self.state.polygon_mode == Some((face, mode)) {
            return;
        }
        self.driver.polygon_mode(face, mode);
        self.check("polygon_mode");
        self.state.polygon_mode = Some((face, mode));
    }

    pub fn polygon_offset(&mut self, factor: f32, units: f32) {
        let bits = (factor.to_bits(), units.to_bits());
        if self.state.polygon_offset == Some(bits) {
            return;
        }
        self.driver.polygon_offset(factor, units);
        self.check("polygon_offset");
        self.state.polygon_offset = Some(bits);
    }

    pub fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        let rect = Viewport { x, y, width, height };
        if self.state.viewport == Some(rect) {
            return;
        }
        self.driver.viewport(x, y, width, height);
        self.check("viewport");
        self.state.viewport = Some(rect);
    }

    /// The last viewport set through the cache.
    #[must_use]
    pub fn get_viewport(&self) -> Option<Viewport> {
        self.state.viewport
    }

    // ========================================================================
    // Program binding
    // ========================================================================

    /// Binds `program` and records it as current.
    ///
    /// # Panics
    ///
    /// Panics on the null handle: a program that failed to link must never
    /// reach this point.
    pub fn use_program(&mut self, program: ProgramId) {
        assert!(program.0 != 0, "invalid program handle 0");
        if self.state.program != Some(program.0) {
            self.driver.use_program(program.0);
            self.check("use_program");
            self.state.program = Some(program.0);
        }
        self.current = Some(program);
        self.programs.entry(program).or_default();
    }

    /// Location of a uniform of the current program, cached per program.
    ///
    /// Returns `None` when no program is bound or the program has no such
    /// active uniform.
    pub fn uniform_location(&mut self, name: &str) -> Option<i32> {
        let program = self.current?;
        let known = self.programs.entry(program).or_default();
        let location = if let Some(&loc) = known.locations.get(name) {
            self.stats.uniloc_hits += 1;
            loc
        } else {
            let loc = self.driver.uniform_location(program.0, name);
            known.locations.insert(name.to_owned(), loc);
            self.stats.uniloc_misses += 1;
            loc
        };
        (location >= 0).then_some(location)
    }

    // ========================================================================
    // Pass-through state
    // ========================================================================

    pub fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.driver.scissor(x, y, width, height);
        self.check("scissor");
    }

    pub fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.driver.clear_color(r, g, b, a);
        self.check("clear_color");
    }

    pub fn clear(&mut self, mask: ClearFlags) {
        self.driver.clear(mask.bits());
        self.check("clear");
    }

    pub fn bind_buffer(&mut self, target: u32, buffer: u32) {
        self.driver.bind_buffer(target, buffer);
        self.check("bind_buffer");
    }

    pub fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        self.driver.buffer_data(target, data, usage);
        self.check("buffer_data");
    }

    pub fn bind_vertex_array(&mut self, vao: u32) {
        self.driver.bind_vertex_array(vao);
        self.check("bind_vertex_array");
    }

    pub fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.driver.enable_vertex_attrib_array(index);
        self.check("enable_vertex_attrib_array");
    }

    pub fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        normalized: bool,
        stride: i32,
        offset: u32,
    ) {
        self.driver
            .vertex_attrib_pointer(index, size, ty, normalized, stride, offset);
        self.check("vertex_attrib_pointer");
    }

    pub fn bind_texture(&mut self, target: u32, texture: u32) {
        self.driver.bind_texture(target, texture);
        self.check("bind_texture");
    }

    /// Uploads level `level` of the texture bound to `target`.
    #[allow(clippy::too_many_arguments)]
    pub fn tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        internal_format: i32,
        width: i32,
        height: i32,
        format: u32,
        ty: u32,
        pixels: Option<&[u8]>,
    ) {
        self.driver
            .tex_image_2d(target, level, internal_format, width, height, format, ty, pixels);
        self.check("tex_image_2d");
    }

    pub fn tex_parameteri(&mut self, target: u32, pname: u32, param: i32) {
        self.driver.tex_parameteri(target, pname, param);
        self.check("tex_parameteri");
    }

    pub fn generate_mipmap(&mut self, target: u32) {
        self.driver.generate_mipmap(target);
        self.check("generate_mipmap");
    }

    #[must_use]
    pub fn get_string(&mut self, name: u32) -> String {
        self.driver.get_string(name)
    }

    // ========================================================================
    // Resource lifecycle
    // ========================================================================

    pub fn gen_buffer(&mut self) -> Result<u32> {
        let buffer = created(self.driver.create_buffer(), "buffer")?;
        self.stats.buffers += 1;
        Ok(buffer)
    }

    pub fn delete_buffers(&mut self, buffers: &[u32]) {
        for &buffer in buffers {
            self.driver.delete_buffer(buffer);
            release(&mut self.stats.buffers, "buffer");
        }
    }

    pub fn gen_texture(&mut self) -> Result<u32> {
        let texture = created(self.driver.create_texture(), "texture")?;
        self.stats.textures += 1;
        Ok(texture)
    }

    pub fn delete_textures(&mut self, textures: &[u32]) {
        for &texture in textures {
            self.driver.delete_texture(texture);
            release(&mut self.stats.textures, "texture");
        }
    }

    pub fn gen_vertex_array(&mut self) -> Result<u32> {
        let vao = created(self.driver.create_vertex_array(), "vertex array")?;
        self.stats.vaos += 1;
        Ok(vao)
    }

    pub fn delete_vertex_arrays(&mut self, vaos: &[u32]) {
        for &vao in vaos {
            self.driver.delete_vertex_array(vao);
            release(&mut self.stats.vaos, "vertex array");
        }
    }

    pub fn create_shader(&mut self, kind: u32) -> Result<u32> {
        let shader = created(self.driver.create_shader(kind), "shader")?;
        self.stats.shaders += 1;
        Ok(shader)
    }

    pub fn delete_shader(&mut self, shader: u32) {
        self.driver.delete_shader(shader);
        release(&mut self.stats.shaders, "shader");
    }

    pub fn create_program(&mut self) -> Result<ProgramId> {
        created(self.driver.create_program(), "program").map(ProgramId)
    }

    /// Deletes the program and forgets its cached locations.
    pub fn delete_program(&mut self, program: ProgramId) {
        self.driver.delete_program(program.0);
        self.programs.remove(&program);
        if self.current == Some(program) {
            self.current = None;
            self.state.program = None;
        }
    }

    // ========================================================================
    // Shader compilation (pass-through)
    // ========================================================================

    pub fn shader_source(&mut self, shader: u32, source: &str) {
        self.driver.shader_source(shader, source);
    }

    pub fn compile_shader(&mut self, shader: u32) {
        self.driver.compile_shader(shader);
    }

    #[must_use]
    pub fn shader_compile_status(&mut self, shader: u32) -> bool {
        self.driver.shader_compile_status(shader)
    }

    #[must_use]
    pub fn shader_info_log(&mut self, shader: u32) -> String {
        self.driver.shader_info_log(shader)
    }

    pub fn attach_shader(&mut self, program: ProgramId, shader: u32) {
        self.driver.attach_shader(program.0, shader);
    }

    pub fn link_program(&mut self, program: ProgramId) {
        self.driver.link_program(program.0);
    }

    #[must_use]
    pub fn program_link_status(&mut self, program: ProgramId) -> bool {
        self.driver.program_link_status(program.0)
    }

    #[must_use]
    pub fn program_info_log(&mut self, program: ProgramId) -> String {
        self.driver.program_info_log(program.0)
    }

    // ========================================================================
    // Uniforms (never elided, always counted)
    // ========================================================================

    pub fn uniform1i(&mut self, location: i32, v: i32) {
        self.driver.uniform1i(location, v);
        self.stats.unisets += 1;
    }

    pub fn uniform1f(&mut self, location: i32, v: f32) {
        self.driver.uniform1f(location, v);
        self.stats.unisets += 1;
    }

    pub fn uniform3f(&mut self, location: i32, x: f32, y: f32, z: f32) {
        self.driver.uniform3f(location, x, y, z);
        self.stats.unisets += 1;
    }

    pub fn uniform4f(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        self.driver.uniform4f(location, x, y, z, w);
        self.stats.unisets += 1;
    }

    pub fn uniform3fv(&mut self, location: i32, values: &[f32]) {
        self.driver.uniform3fv(location, values);
        self.stats.unisets += 1;
    }

    pub fn uniform4fv(&mut self, location: i32, values: &[f32]) {
        self.driver.uniform4fv(location, values);
        self.stats.unisets += 1;
    }

    pub fn uniform_matrix3fv(&mut self, location: i32, transpose: bool, values: &[f32]) {
        self.driver.uniform_matrix3fv(location, transpose, values);
        self.stats.unisets += 1;
    }

    pub fn uniform_matrix4fv(&mut self, location: i32, transpose: bool, values: &[f32]) {
        self.driver.uniform_matrix4fv(location, transpose, values);
        self.stats.unisets += 1;
    }

    // ========================================================================
    // Draws
    // ========================================================================

    pub fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        self.driver.draw_arrays(mode, first, count);
        self.check("draw_arrays");
        self.stats.draw_calls += 1;
    }

    pub fn draw_elements(&mut self, mode: u32, count: i32, index_type: u32, offset: u32) {
        self.driver.draw_elements(mode, count, index_type, offset);
        self.check("draw_elements");
        self.stats.draw_calls += 1;
    }
}

fn created(handle: u32, kind: &'static str) -> Result<u32> {
    if handle == 0 {
        Err(PrismError::ResourceCreation { kind })
    } else {
        Ok(handle)
    }
}

fn release(count: &mut usize, kind: &'static str) {
    debug_assert!(*count > 0, "deleting untracked {kind}");
    *count = count.saturating_sub(1);
}
