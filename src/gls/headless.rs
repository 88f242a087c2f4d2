//! GPU-less driver.
//!
//! [`HeadlessDriver`] hands out fresh handles, answers queries with
//! plausible values and records every call that changes driver state into a
//! [`CallLog`]. It backs the test suite and lets the CPU side of the
//! pipeline run without a graphics context (benchmarks, servers).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

use super::consts::NO_ERROR;
use super::driver::GlDriver;

/// One recorded driver call.
///
/// Queries (`*_status`, `*_info_log`, `get_error`, `get_string`) are not
/// recorded; they do not change driver state.
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Enable(u32),
    Disable(u32),
    BlendEquation(u32),
    BlendEquationSeparate(u32, u32),
    BlendFunc(u32, u32),
    BlendFuncSeparate(u32, u32, u32, u32),
    DepthFunc(u32),
    DepthMask(bool),
    FrontFace(u32),
    CullFace(u32),
    ActiveTexture(u32),
    LineWidth(f32),
    PolygonMode(u32, u32),
    PolygonOffset(f32, f32),
    Viewport(i32, i32, i32, i32),
    Scissor(i32, i32, i32, i32),
    ClearColor(f32, f32, f32, f32),
    Clear(u32),

    CreateBuffer(u32),
    DeleteBuffer(u32),
    BindBuffer(u32, u32),
    BufferData { target: u32, len: usize, usage: u32 },
    CreateVertexArray(u32),
    DeleteVertexArray(u32),
    BindVertexArray(u32),
    EnableVertexAttribArray(u32),
    VertexAttribPointer { index: u32, size: i32, ty: u32, stride: i32, offset: u32 },

    CreateTexture(u32),
    DeleteTexture(u32),
    BindTexture(u32, u32),
    TexImage2D { target: u32, level: i32, width: i32, height: i32 },
    TexParameter(u32, u32, i32),
    GenerateMipmap(u32),

    CreateShader { kind: u32, shader: u32 },
    ShaderSource(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    LinkProgram(u32),
    DeleteProgram(u32),
    UseProgram(u32),
    UniformLocation { program: u32, name: String },

    UniformInt { location: i32, value: i32 },
    Uniform { location: i32, values: Vec<f32> },
    UniformMatrix { location: i32, values: Vec<f32> },

    DrawArrays { mode: u32, first: i32, count: i32 },
    DrawElements { mode: u32, count: i32, index_type: u32, offset: u32 },
}

impl DriverCall {
    #[must_use]
    pub fn is_draw(&self) -> bool {
        matches!(self, Self::DrawArrays { .. } | Self::DrawElements { .. })
    }
}

/// Shared view of the calls a [`HeadlessDriver`] has received.
///
/// Cloning is cheap; every clone observes the same log.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<DriverCall>>>);

impl CallLog {
    fn push(&self, call: DriverCall) {
        self.0.borrow_mut().push(call);
    }

    /// Copy of every call recorded so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<DriverCall> {
        self.0.borrow().clone()
    }

    /// Removes and returns every call recorded so far.
    pub fn take(&self) -> Vec<DriverCall> {
        std::mem::take(&mut *self.0.borrow_mut())
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Number of recorded calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&DriverCall) -> bool) -> usize {
        self.0.borrow().iter().filter(|&c| pred(c)).count()
    }

    /// Number of recorded calls equal to `call`.
    #[must_use]
    pub fn count_of(&self, call: &DriverCall) -> usize {
        self.count(|c| c == call)
    }
}

/// Shared view of the error codes a [`HeadlessDriver`] will report.
///
/// Codes are handed out oldest first, one per `get_error` query. Every
/// query is counted, including those that answer `NO_ERROR`.
#[derive(Debug, Clone, Default)]
pub struct ErrorQueue(Rc<RefCell<ErrorQueueInner>>);

#[derive(Debug, Default)]
struct ErrorQueueInner {
    pending: VecDeque<u32>,
    queries: usize,
}

impl ErrorQueue {
    /// Queues `code` for the next `get_error` query.
    pub fn push(&self, code: u32) {
        self.0.borrow_mut().pending.push_back(code);
    }

    /// Codes not yet reported.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.0.borrow().pending.len()
    }

    /// Number of `get_error` queries received so far.
    #[must_use]
    pub fn queries(&self) -> usize {
        self.0.borrow().queries
    }

    fn pop(&self) -> u32 {
        let mut inner = self.0.borrow_mut();
        inner.queries += 1;
        inner.pending.pop_front().unwrap_or(NO_ERROR)
    }
}

/// Recording driver with no GPU behind it.
#[derive(Debug)]
pub struct HeadlessDriver {
    log: CallLog,
    next_handle: u32,
    next_location: i32,
    sources: FxHashMap<u32, String>,
    locations: FxHashMap<(u32, String), i32>,
    compile_failure_marker: Option<String>,
    fail_link: bool,
    fail_create: bool,
    missing_uniforms: FxHashSet<String>,
    errors: ErrorQueue,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDriver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            next_handle: 1,
            next_location: 0,
            sources: FxHashMap::default(),
            locations: FxHashMap::default(),
            compile_failure_marker: None,
            fail_link: false,
            fail_create: false,
            missing_uniforms: FxHashSet::default(),
            errors: ErrorQueue::default(),
        }
    }

    /// Handle to the call log, valid after the driver is boxed away.
    #[must_use]
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Shaders whose source contains `marker` fail to compile.
    #[must_use]
    pub fn with_compile_failure(mut self, marker: impl Into<String>) -> Self {
        self.compile_failure_marker = Some(marker.into());
        self
    }

    /// Every program fails to link.
    #[must_use]
    pub fn with_link_failure(mut self) -> Self {
        self.fail_link = true;
        self
    }

    /// Every object creation returns the null handle.
    #[must_use]
    pub fn with_creation_failure(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// `uniform_location(_, name)` answers `-1` for this name.
    #[must_use]
    pub fn with_missing_uniform(mut self, name: impl Into<String>) -> Self {
        self.missing_uniforms.insert(name.into());
        self
    }

    /// Handle to the error queue, valid after the driver is boxed away.
    #[must_use]
    pub fn errors(&self) -> ErrorQueue {
        self.errors.clone()
    }

    /// Queues an error code for the next `get_error` query.
    pub fn push_error(&mut self, code: u32) {
        self.errors.push(code);
    }

    fn handle(&mut self) -> u32 {
        if self.fail_create {
            return 0;
        }
        let h = self.next_handle;
        self.next_handle += 1;
        h
    }
}

impl GlDriver for HeadlessDriver {
    fn enable(&mut self, cap: u32) {
        self.log.push(DriverCall::Enable(cap));
    }

    fn disable(&mut self, cap: u32) {
        self.log.push(DriverCall::Disable(cap));
    }

    fn blend_equation(&mut self, mode: u32) {
        self.log.push(DriverCall::BlendEquation(mode));
    }

    fn blend_equation_separate(&mut self, mode_rgb: u32, mode_alpha: u32) {
        self.log
            .push(DriverCall::BlendEquationSeparate(mode_rgb, mode_alpha));
    }

    fn blend_func(&mut self, src: u32, dst: u32) {
        self.log.push(DriverCall::BlendFunc(src, dst));
    }

    fn blend_func_separate(&mut self, src_rgb: u32, dst_rgb: u32, src_alpha: u32, dst_alpha: u32) {
        self.log.push(DriverCall::BlendFuncSeparate(
            src_rgb, dst_rgb, src_alpha, dst_alpha,
        ));
    }

    fn depth_func(&mut self, func: u32) {
        self.log.push(DriverCall::DepthFunc(func));
    }

    fn depth_mask(&mut self, flag: bool) {
        self.log.push(DriverCall::DepthMask(flag));
    }

    fn front_face(&mut self, mode: u32) {
        self.log.push(DriverCall::FrontFace(mode));
    }

    fn cull_face(&mut self, mode: u32) {
        self.log.push(DriverCall::CullFace(mode));
    }

    fn active_texture(&mut self, unit: u32) {
        self.log.push(DriverCall::ActiveTexture(unit));
    }

    fn line_width(&mut self, width: f32) {
        self.log.push(DriverCall::LineWidth(width));
    }

    fn polygon_mode(&mut self, face: u32, mode: u32) {
        self.log.push(DriverCall::PolygonMode(face, mode));
    }

    fn polygon_offset(&mut self, factor: f32, units: f32) {
        self.log.push(DriverCall::PolygonOffset(factor, units));
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.log.push(DriverCall::Viewport(x, y, width, height));
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.log.push(DriverCall::Scissor(x, y, width, height));
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.log.push(DriverCall::ClearColor(r, g, b, a));
    }

    fn clear(&mut self, mask: u32) {
        self.log.push(DriverCall::Clear(mask));
    }

    fn create_buffer(&mut self) -> u32 {
        let h = self.handle();
        self.log.push(DriverCall::CreateBuffer(h));
        h
    }

    fn delete_buffer(&mut self, buffer: u32) {
        self.log.push(DriverCall::DeleteBuffer(buffer));
    }

    fn bind_buffer(&mut self, target: u32, buffer: u32) {
        self.log.push(DriverCall::BindBuffer(target, buffer));
    }

    fn buffer_data(&mut self, target: u32, data: &[u8], usage: u32) {
        self.log.push(DriverCall::BufferData {
            target,
            len: data.len(),
            usage,
        });
    }

    fn create_vertex_array(&mut self) -> u32 {
        let h = self.handle();
        self.log.push(DriverCall::CreateVertexArray(h));
        h
    }

    fn delete_vertex_array(&mut self, vao: u32) {
        self.log.push(DriverCall::DeleteVertexArray(vao));
    }

    fn bind_vertex_array(&mut self, vao: u32) {
        self.log.push(DriverCall::BindVertexArray(vao));
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.log.push(DriverCall::EnableVertexAttribArray(index));
    }

    fn vertex_attrib_pointer(
        &mut self,
        index: u32,
        size: i32,
        ty: u32,
        _normalized: bool,
        stride: i32,
        offset: u32,
    ) {
        self.log.push(DriverCall::VertexAttribPointer {
            index,
            size,
            ty,
            stride,
            offset,
        });
    }

    fn create_texture(&mut self) -> u32 {
        let h = self.handle();
        self.log.push(DriverCall::CreateTexture(h));
        h
    }

    fn delete_texture(&mut self, texture: u32) {
        self.log.push(DriverCall::DeleteTexture(texture));
    }

    fn bind_texture(&mut self, target: u32, texture: u32) {
        self.log.push(DriverCall::BindTexture(target, texture));
    }

    fn tex_image_2d(
        &mut self,
        target: u32,
        level: i32,
        _internal_format: i32,
        width: i32,
        height: i32,
        _format: u32,
        _ty: u32,
        _pixels: Option<&[u8]>,
    ) {
        self.log.push(DriverCall::TexImage2D {
            target,
            level,
            width,
            height,
        });
    }

    fn tex_parameteri(&mut self, target: u32, pname: u32, param: i32) {
        self.log.push(DriverCall::TexParameter(target, pname, param));
    }

    fn generate_mipmap(&mut self, target: u32) {
        self.log.push(DriverCall::GenerateMipmap(target));
    }

    fn create_shader(&mut self, kind: u32) -> u32 {
        let shader = self.handle();
        self.log.push(DriverCall::CreateShader { kind, shader });
        shader
    }

    fn shader_source(&mut self, shader: u32, source: &str) {
        self.sources.insert(shader, source.to_owned());
        self.log.push(DriverCall::ShaderSource(shader));
    }

    fn compile_shader(&mut self, shader: u32) {
        self.log.push(DriverCall::CompileShader(shader));
    }

    fn shader_compile_status(&mut self, shader: u32) -> bool {
        match (&self.compile_failure_marker, self.sources.get(&shader)) {
            (Some(marker), Some(source)) => !source.contains(marker.as_str()),
            _ => true,
        }
    }

    fn shader_info_log(&mut self, shader: u32) -> String {
        if self.shader_compile_status(shader) {
            String::new()
        } else {
            format!("0:1(1): error: shader {shader} rejected by headless driver")
        }
    }

    fn delete_shader(&mut self, shader: u32) {
        self.sources.remove(&shader);
        self.log.push(DriverCall::DeleteShader(shader));
    }

    fn create_program(&mut self) -> u32 {
        let h = self.handle();
        self.log.push(DriverCall::CreateProgram(h));
        h
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        self.log.push(DriverCall::AttachShader(program, shader));
    }

    fn link_program(&mut self, program: u32) {
        self.log.push(DriverCall::LinkProgram(program));
    }

    fn program_link_status(&mut self, _program: u32) -> bool {
        !self.fail_link
    }

    fn program_info_log(&mut self, program: u32) -> String {
        if self.fail_link {
            format!("error: program {program} rejected by headless driver")
        } else {
            String::new()
        }
    }

    fn delete_program(&mut self, program: u32) {
        self.locations.retain(|(p, _), _| *p != program);
        self.log.push(DriverCall::DeleteProgram(program));
    }

    fn use_program(&mut self, program: u32) {
        self.log.push(DriverCall::UseProgram(program));
    }

    fn uniform_location(&mut self, program: u32, name: &str) -> i32 {
        self.log.push(DriverCall::UniformLocation {
            program,
            name: name.to_owned(),
        });
        if self.missing_uniforms.contains(name) {
            return -1;
        }
        let next = &mut self.next_location;
        *self
            .locations
            .entry((program, name.to_owned()))
            .or_insert_with(|| {
                let loc = *next;
                *next += 1;
                loc
            })
    }

    fn uniform1i(&mut self, location: i32, value: i32) {
        self.log.push(DriverCall::UniformInt { location, value });
    }

    fn uniform1f(&mut self, location: i32, v: f32) {
        self.log.push(DriverCall::Uniform {
            location,
            values: vec![v],
        });
    }

    fn uniform3f(&mut self, location: i32, x: f32, y: f32, z: f32) {
        self.log.push(DriverCall::Uniform {
            location,
            values: vec![x, y, z],
        });
    }

    fn uniform4f(&mut self, location: i32, x: f32, y: f32, z: f32, w: f32) {
        self.log.push(DriverCall::Uniform {
            location,
            values: vec![x, y, z, w],
        });
    }

    fn uniform3fv(&mut self, location: i32, values: &[f32]) {
        self.log.push(DriverCall::Uniform {
            location,
            values: values.to_vec(),
        });
    }

    fn uniform4fv(&mut self, location: i32, values: &[f32]) {
        self.log.push(DriverCall::Uniform {
            location,
            values: values.to_vec(),
        });
    }

    fn uniform_matrix3fv(&mut self, location: i32, _transpose: bool, values: &[f32]) {
        self.log.push(DriverCall::UniformMatrix {
            location,
            values: values.to_vec(),
        });
    }

    fn uniform_matrix4fv(&mut self, location: i32, _transpose: bool, values: &[f32]) {
        self.log.push(DriverCall::UniformMatrix {
            location,
            values: values.to_vec(),
        });
    }

    fn draw_arrays(&mut self, mode: u32, first: i32, count: i32) {
        self.log.push(DriverCall::DrawArrays { mode, first, count });
    }

    fn draw_elements(&mut self, mode: u32, count: i32, index_type: u32, offset: u32) {
        self.log.push(DriverCall::DrawElements {
            mode,
            count,
            index_type,
            offset,
        });
    }

    fn get_error(&mut self) -> u32 {
        self.errors.pop()
    }

    fn get_string(&mut self, name: u32) -> String {
        match name {
            super::consts::VENDOR => "prism".to_owned(),
            super::consts::RENDERER => "headless".to_owned(),
            super::consts::VERSION => "3.3 headless".to_owned(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_fresh_and_non_zero() {
        let mut driver = HeadlessDriver::new();
        let a = driver.create_buffer();
        let b = driver.create_texture();
        assert_ne!(a, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_creation_failure_returns_null_handle() {
        let mut driver = HeadlessDriver::new().with_creation_failure();
        assert_eq!(driver.create_vertex_array(), 0);
    }

    #[test]
    fn test_uniform_locations_are_stable_per_program() {
        let mut driver = HeadlessDriver::new().with_missing_uniform("Unused");
        let first = driver.uniform_location(1, "MVP");
        let again = driver.uniform_location(1, "MVP");
        let other = driver.uniform_location(2, "MVP");
        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(driver.uniform_location(1, "Unused"), -1);
    }

    #[test]
    fn test_compile_failure_marker() {
        let mut driver = HeadlessDriver::new().with_compile_failure("#error");
        let good = driver.create_shader(super::super::consts::VERTEX_SHADER);
        let bad = driver.create_shader(super::super::consts::VERTEX_SHADER);
        driver.shader_source(good, "void main() {}");
        driver.shader_source(bad, "#error broken\nvoid main() {}");
        assert!(driver.shader_compile_status(good));
        assert!(!driver.shader_compile_status(bad));
        assert!(driver.shader_info_log(bad).contains("error"));
    }

    #[test]
    fn test_log_is_shared_between_clones() {
        let mut driver = HeadlessDriver::new();
        let log = driver.log();
        driver.enable(0x0B71);
        driver.push_error(0x0500);
        assert_eq!(log.calls(), vec![DriverCall::Enable(0x0B71)]);
        assert_eq!(driver.get_error(), 0x0500);
        assert_eq!(driver.get_error(), NO_ERROR);
        assert_eq!(driver.errors().queries(), 2);
        assert_eq!(driver.errors().pending(), 0);
        assert_eq!(log.take().len(), 1);
        assert!(log.is_empty());
    }
}
