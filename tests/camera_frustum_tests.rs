//! Camera and Frustum Tests
//!
//! Tests for:
//! - Perspective/Orthographic projection matrix generation
//! - View matrix placement (look_at, world matrix)
//! - Frustum plane extraction (Gribb-Hartmann)
//! - Frustum-AABB intersection after world transforms

use glam::{Affine3A, Quat, Vec3, Vec4};

use prism::resources::BoundingBox;
use prism::scene::{Camera, Frustum, ProjectionType};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn ndc_z(camera: &Camera, view_z: f32) -> f32 {
    let clip = camera.projection_matrix() * Vec4::new(0.0, 0.0, view_z, 1.0);
    clip.z / clip.w
}

fn unit_box() -> BoundingBox {
    BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5))
}

// ============================================================================
// Projection Matrix Tests
// ============================================================================

#[test]
fn perspective_maps_near_and_far_to_gl_depth() {
    let cam = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);

    assert!(approx(ndc_z(&cam, -0.1), -1.0));
    assert!(approx(ndc_z(&cam, -100.0), 1.0));
}

#[test]
fn perspective_fov_stored_in_radians() {
    let cam = Camera::new_perspective(90.0, 1.5, 0.1, 10.0);
    assert_eq!(cam.projection_type, ProjectionType::Perspective);
    assert!(approx(cam.fov, std::f32::consts::FRAC_PI_2));
}

#[test]
fn orthographic_keeps_size_at_any_depth() {
    let cam = Camera::new_orthographic(2.0, 1.0, 0.1, 50.0);
    let near = cam.projection_matrix() * Vec4::new(2.0, 0.0, -1.0, 1.0);
    let far = cam.projection_matrix() * Vec4::new(2.0, 0.0, -40.0, 1.0);

    assert!(approx(near.x / near.w, 1.0));
    assert!(approx(far.x / far.w, 1.0));
}

#[test]
fn set_aspect_rebuilds_projection() {
    let mut cam = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    let before = cam.projection_matrix();
    cam.set_aspect(2.0);
    assert_ne!(before, cam.projection_matrix());
    assert!(approx(
        before.x_axis.x / cam.projection_matrix().x_axis.x,
        2.0
    ));
}

// ============================================================================
// View Matrix Tests
// ============================================================================

#[test]
fn look_at_moves_target_onto_negative_z() {
    let mut cam = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    cam.look_at(Vec3::new(3.0, 0.0, 0.0), Vec3::ZERO, Vec3::Y);

    let target = cam.view_matrix().transform_point3(Vec3::ZERO);
    assert!(approx(target.x, 0.0));
    assert!(approx(target.z, -3.0));
    assert!(approx(cam.world_matrix().translation.x, 3.0));
}

#[test]
fn update_view_projection_inverts_world() {
    let mut cam = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    let world = Affine3A::from_rotation_translation(Quat::from_rotation_y(0.3), Vec3::new(1.0, 2.0, 3.0));
    cam.update_view_projection(&world);

    let p = cam.view_matrix().transform_point3(Vec3::new(1.0, 2.0, 3.0));
    assert!(p.length() < EPSILON);
    assert_eq!(
        cam.view_projection_matrix(),
        cam.projection_matrix() * cam.view_matrix()
    );
}

// ============================================================================
// Frustum Tests
// ============================================================================

#[test]
fn frustum_planes_are_normalized() {
    let cam = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    for plane in cam.frustum().planes() {
        assert!(approx(plane.truncate().length(), 1.0));
    }
}

#[test]
fn frustum_contains_points_between_planes() {
    let cam = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    let frustum = cam.frustum();

    assert!(frustum.contains_point(Vec3::new(0.0, 0.0, -10.0)));
    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, 10.0)));
    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -0.05)));
    assert!(!frustum.contains_point(Vec3::new(0.0, 0.0, -150.0)));
}

#[test]
fn frustum_box_test_after_world_transform() {
    let mut cam = Camera::new_perspective(60.0, 1.0, 0.1, 100.0);
    cam.look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
    let frustum = cam.frustum();

    let inside = unit_box().transform(&Affine3A::from_translation(Vec3::new(0.0, 0.0, -2.0)));
    let beside = unit_box().transform(&Affine3A::from_translation(Vec3::new(50.0, 0.0, 0.0)));
    let behind = unit_box().transform(&Affine3A::from_translation(Vec3::new(0.0, 0.0, 10.0)));

    assert!(frustum.intersects_box(&inside));
    assert!(!frustum.intersects_box(&beside));
    assert!(!frustum.intersects_box(&behind));
}

#[test]
fn frustum_box_straddling_plane_intersects() {
    let frustum = Camera::new_perspective(60.0, 1.0, 0.1, 100.0).frustum();
    let straddling = BoundingBox::new(Vec3::new(-1.0, -1.0, -110.0), Vec3::new(1.0, 1.0, -90.0));
    assert!(frustum.intersects_box(&straddling));
}

#[test]
fn empty_box_never_intersects() {
    let frustum = Frustum::from_matrix(Camera::new_perspective(60.0, 1.0, 0.1, 100.0).view_projection_matrix());
    assert!(!frustum.intersects_box(&BoundingBox::EMPTY));
}
