//! State Cache Tests
//!
//! Tests for:
//! - Idempotent setters and cold-start behaviour
//! - Blend equation / function slot coherence
//! - Program binding and uniform location caching
//! - Resource lifecycle counters
//! - Driver error checking

use prism::errors::PrismError;
use prism::gls::consts::{
    ARRAY_BUFFER, BLEND, CULL_FACE, DEPTH_TEST, FRONT_AND_BACK, FUNC_ADD, FUNC_SUBTRACT, LEQUAL,
    LESS, LINE, ONE, ONE_MINUS_SRC_ALPHA, SRC_ALPHA, STENCIL_TEST, TEXTURE0, TRIANGLES, ZERO,
};
use prism::gls::{CallLog, CapState, ClearFlags, DriverCall, Gls, GlsSettings, HeadlessDriver, ProgramId};

fn gls() -> (Gls, CallLog) {
    let driver = HeadlessDriver::new();
    let log = driver.log();
    let gls = Gls::new(Box::new(driver));
    log.clear();
    (gls, log)
}

fn program(gls: &mut Gls) -> ProgramId {
    let program = gls.create_program().unwrap();
    gls.link_program(program);
    program
}

// ============================================================================
// Default State
// ============================================================================

#[test]
fn construction_applies_default_state() {
    let driver = HeadlessDriver::new();
    let log = driver.log();
    let gls = Gls::new(Box::new(driver));

    assert_eq!(log.count_of(&DriverCall::Enable(DEPTH_TEST)), 1);
    assert_eq!(log.count_of(&DriverCall::Enable(CULL_FACE)), 1);
    assert_eq!(log.count_of(&DriverCall::DepthFunc(LEQUAL)), 1);
    assert_eq!(
        log.count_of(&DriverCall::BlendFunc(SRC_ALPHA, ONE_MINUS_SRC_ALPHA)),
        1
    );
    assert_eq!(gls.state().capability(BLEND), Some(CapState::Enabled));
    assert!(gls.current_program().is_none());
}

#[test]
fn default_state_setters_are_elided() {
    let (mut gls, log) = gls();

    gls.enable(DEPTH_TEST);
    gls.depth_func(LEQUAL);
    gls.blend_equation(FUNC_ADD);

    assert!(log.is_empty());
    assert_eq!(gls.stats().cap_hits, 1);
}

// ============================================================================
// Idempotence
// ============================================================================

#[test]
fn repeated_setters_reach_driver_once() {
    let (mut gls, log) = gls();

    for _ in 0..2 {
        gls.enable(STENCIL_TEST);
        gls.depth_mask(false);
        gls.depth_func(LESS);
        gls.active_texture(TEXTURE0 + 1);
        gls.line_width(2.5);
        gls.polygon_mode(FRONT_AND_BACK, LINE);
        gls.polygon_offset(1.0, 2.0);
        gls.viewport(0, 0, 640, 480);
    }

    assert_eq!(log.len(), 8);
    assert_eq!(gls.stats().cap_hits, 1);
}

#[test]
fn disable_after_enable_is_forwarded() {
    let (mut gls, log) = gls();

    gls.disable(BLEND);
    gls.disable(BLEND);
    gls.enable(BLEND);

    assert_eq!(
        log.calls(),
        [DriverCall::Disable(BLEND), DriverCall::Enable(BLEND)]
    );
    assert_eq!(gls.stats().cap_hits, 1);
}

#[test]
fn cold_start_forwards_zero_like_values() {
    let driver = HeadlessDriver::new();
    let log = driver.log();
    let mut gls = Gls::new(Box::new(driver));
    gls.reset();
    log.clear();

    gls.depth_mask(false);
    gls.line_width(0.0);
    gls.viewport(0, 0, 0, 0);
    gls.active_texture(TEXTURE0);
    gls.disable(STENCIL_TEST);

    assert_eq!(log.len(), 5);
    assert_eq!(gls.get_viewport().map(|v| v.width), Some(0));
}

// ============================================================================
// Blend Coherence
// ============================================================================

#[test]
fn separate_blend_func_invalidates_combined_slot() {
    let (mut gls, log) = gls();

    gls.blend_func_separate(SRC_ALPHA, ONE_MINUS_SRC_ALPHA, ONE, ZERO);
    gls.blend_func(SRC_ALPHA, ONE_MINUS_SRC_ALPHA);

    assert_eq!(
        log.calls(),
        [
            DriverCall::BlendFuncSeparate(SRC_ALPHA, ONE_MINUS_SRC_ALPHA, ONE, ZERO),
            DriverCall::BlendFunc(SRC_ALPHA, ONE_MINUS_SRC_ALPHA),
        ]
    );
}

#[test]
fn combined_blend_func_fills_separate_slot() {
    let (mut gls, log) = gls();

    gls.blend_func(ONE, ONE);
    gls.blend_func_separate(ONE, ONE, ONE, ONE);

    assert_eq!(log.calls(), [DriverCall::BlendFunc(ONE, ONE)]);
}

#[test]
fn blend_equation_slots_stay_coherent() {
    let (mut gls, log) = gls();

    gls.blend_equation_separate(FUNC_SUBTRACT, FUNC_ADD);
    gls.blend_equation(FUNC_ADD);
    gls.blend_equation_separate(FUNC_ADD, FUNC_ADD);

    assert_eq!(
        log.calls(),
        [
            DriverCall::BlendEquationSeparate(FUNC_SUBTRACT, FUNC_ADD),
            DriverCall::BlendEquation(FUNC_ADD),
        ]
    );
}

// ============================================================================
// Programs & Uniforms
// ============================================================================

#[test]
fn use_program_is_elided_when_current() {
    let (mut gls, log) = gls();
    let program = program(&mut gls);
    log.clear();

    gls.use_program(program);
    gls.use_program(program);

    assert_eq!(log.count_of(&DriverCall::UseProgram(program.handle())), 1);
    assert_eq!(gls.current_program(), Some(program));
    assert!(gls.is_known_program(program));
    assert_eq!(gls.stats().programs, 1);
}

#[test]
#[should_panic(expected = "invalid program handle 0")]
fn use_program_zero_panics() {
    let (mut gls, _log) = gls();
    gls.use_program(ProgramId(0));
}

#[test]
fn uniform_locations_cached_per_program() {
    let driver = HeadlessDriver::new().with_missing_uniform("Unused");
    let log = driver.log();
    let mut gls = Gls::new(Box::new(driver));
    let a = program(&mut gls);
    let b = program(&mut gls);

    gls.use_program(a);
    let first = gls.uniform_location("MVP");
    assert!(first.is_some());
    assert_eq!(gls.uniform_location("MVP"), first);
    assert_eq!(gls.uniform_location("Unused"), None);
    assert_eq!(gls.uniform_location("Unused"), None);

    gls.use_program(b);
    let _ = gls.uniform_location("MVP");

    let stats = gls.stats();
    assert_eq!(stats.uniloc_misses, 3);
    assert_eq!(stats.uniloc_hits, 2);
    assert_eq!(
        log.count(|c| matches!(c, DriverCall::UniformLocation { .. })),
        3
    );
}

#[test]
fn uniform_location_without_program() {
    let (mut gls, log) = gls();
    assert_eq!(gls.uniform_location("MVP"), None);
    assert!(log.is_empty());
}

#[test]
fn delete_program_forgets_binding() {
    let (mut gls, log) = gls();
    let program = program(&mut gls);
    gls.use_program(program);

    gls.delete_program(program);
    assert!(gls.current_program().is_none());
    assert!(!gls.is_known_program(program));

    log.clear();
    let other = gls.create_program().unwrap();
    gls.use_program(other);
    assert_eq!(log.count_of(&DriverCall::UseProgram(other.handle())), 1);
}

#[test]
fn uniform_and_draw_counters() {
    let (mut gls, _log) = gls();
    let program = program(&mut gls);
    gls.use_program(program);

    let loc = gls.uniform_location("MatColor").unwrap();
    gls.uniform4f(loc, 1.0, 0.0, 0.0, 1.0);
    gls.uniform1i(loc, 0);
    gls.draw_arrays(TRIANGLES, 0, 3);

    let stats = gls.stats();
    assert_eq!(stats.unisets, 2);
    assert_eq!(stats.draw_calls, 1);
}

// ============================================================================
// Resources
// ============================================================================

#[test]
fn resource_counts_track_lifecycle() {
    let (mut gls, _log) = gls();

    let buffers = [gls.gen_buffer().unwrap(), gls.gen_buffer().unwrap()];
    let texture = gls.gen_texture().unwrap();
    let vao = gls.gen_vertex_array().unwrap();

    let stats = gls.stats();
    assert_eq!((stats.buffers, stats.textures, stats.vaos), (2, 1, 1));

    gls.delete_buffers(&buffers);
    gls.delete_textures(&[texture]);
    gls.delete_vertex_arrays(&[vao]);

    let stats = gls.stats();
    assert_eq!((stats.buffers, stats.textures, stats.vaos), (0, 0, 0));
}

#[test]
fn null_handle_is_an_error() {
    let driver = HeadlessDriver::new().with_creation_failure();
    let mut gls = Gls::new(Box::new(driver));

    let err = gls.gen_buffer().unwrap_err();
    assert!(matches!(err, PrismError::ResourceCreation { kind: "buffer" }));
    assert!(gls.create_program().is_err());
    assert_eq!(gls.stats().buffers, 0);
}

#[test]
fn pass_through_calls_are_never_elided() {
    let (mut gls, log) = gls();

    gls.bind_buffer(ARRAY_BUFFER, 1);
    gls.bind_buffer(ARRAY_BUFFER, 1);
    gls.clear(ClearFlags::COLOR);
    gls.clear(ClearFlags::COLOR);

    assert_eq!(log.len(), 4);
}

// ============================================================================
// Error Checking
// ============================================================================

#[test]
fn driver_errors_are_drained_when_checking() {
    let _ = env_logger::builder().is_test(true).try_init();
    let driver = HeadlessDriver::new();
    let errors = driver.errors();
    let mut gls = Gls::new(Box::new(driver));
    assert!(gls.check_errors());
    let queries = errors.queries();
    assert!(queries > 0);

    errors.push(0x0500);
    gls.enable(STENCIL_TEST);
    assert_eq!(errors.pending(), 0);
    assert_eq!(errors.queries(), queries + 1);

    // Elided calls never reach the driver, so nothing is checked.
    gls.enable(STENCIL_TEST);
    assert_eq!(errors.queries(), queries + 1);

    gls.set_check_errors(false);
    errors.push(0x0502);
    gls.disable(STENCIL_TEST);
    assert_eq!(errors.pending(), 1);
    assert_eq!(errors.queries(), queries + 1);
}

#[test]
fn checking_can_be_disabled_up_front() {
    let driver = HeadlessDriver::new();
    let errors = driver.errors();
    let log = driver.log();
    let mut gls = Gls::with_settings(Box::new(driver), GlsSettings { check_errors: false });
    assert!(!gls.check_errors());

    gls.enable(STENCIL_TEST);
    gls.clear(ClearFlags::COLOR);

    assert!(!log.is_empty());
    assert_eq!(errors.queries(), 0);
}
