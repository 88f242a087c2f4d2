//! Scene Integration Tests
//!
//! Tests for:
//! - Scene: add/remove nodes, attach hierarchy
//! - World matrix propagation
//! - Node roles and lookups

use std::rc::Rc;

use glam::{Quat, Vec3};
use prism::resources::{Geometry, Material};
use prism::scene::{Graphic, Light, LightKind, Node, NodeRole, Scene, Transform};

const EPSILON: f32 = 1e-5;

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

fn translation(scene: &Scene, key: prism::scene::NodeKey) -> Vec3 {
    Vec3::from(scene.node(key).unwrap().world_matrix().translation)
}

// ============================================================================
// Node Creation & Removal
// ============================================================================

#[test]
fn new_scene_has_only_root() {
    let scene = Scene::new();
    assert_eq!(scene.len(), 1);
    assert!(scene.is_empty());
    assert_eq!(scene.node(scene.root()).unwrap().name, "Scene");
}

#[test]
fn add_places_node_under_root() {
    let mut scene = Scene::new();
    let key = scene.add(Node::new("child"));

    assert_eq!(scene.node(key).unwrap().parent(), Some(scene.root()));
    assert_eq!(scene.node(scene.root()).unwrap().children(), [key]);
    assert!(!scene.is_empty());
}

#[test]
fn add_child_to_missing_parent_falls_back_to_root() {
    let mut scene = Scene::new();
    let gone = scene.add(Node::new("gone"));
    scene.remove(gone);

    let key = scene.add_child(gone, Node::new("orphan"));
    assert_eq!(scene.node(key).unwrap().parent(), Some(scene.root()));
}

#[test]
fn remove_drops_whole_subtree() {
    let mut scene = Scene::new();
    let parent = scene.add(Node::new("parent"));
    let child = scene.add_child(parent, Node::new("child"));
    let grandchild = scene.add_child(child, Node::new("grandchild"));
    let sibling = scene.add(Node::new("sibling"));

    assert!(scene.remove(parent));

    assert!(scene.node(parent).is_none());
    assert!(scene.node(child).is_none());
    assert!(scene.node(grandchild).is_none());
    assert!(scene.node(sibling).is_some());
    assert_eq!(scene.node(scene.root()).unwrap().children(), [sibling]);
    assert_eq!(scene.len(), 2);
}

#[test]
fn root_cannot_be_removed() {
    let mut scene = Scene::new();
    assert!(!scene.remove(scene.root()));
    assert_eq!(scene.len(), 1);
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn attach_moves_subtree() {
    let mut scene = Scene::new();
    let a = scene.add(Node::new("a"));
    let b = scene.add(Node::new("b"));
    let child = scene.add_child(a, Node::new("child"));

    scene.attach(child, b);

    assert!(scene.node(a).unwrap().children().is_empty());
    assert_eq!(scene.node(b).unwrap().children(), [child]);
    assert_eq!(scene.node(child).unwrap().parent(), Some(b));
}

#[test]
fn attach_refuses_cycles() {
    let mut scene = Scene::new();
    let a = scene.add(Node::new("a"));
    let b = scene.add_child(a, Node::new("b"));

    scene.attach(a, b);
    scene.attach(a, a);
    scene.attach(scene.root(), a);

    assert_eq!(scene.node(a).unwrap().parent(), Some(scene.root()));
    assert_eq!(scene.node(b).unwrap().parent(), Some(a));
    assert_eq!(scene.node(scene.root()).unwrap().parent(), None);
}

#[test]
fn find_by_name() {
    let mut scene = Scene::new();
    let key = scene.add(Node::new("needle"));
    assert_eq!(scene.find_by_name("needle"), Some(key));
    assert_eq!(scene.find_by_name("hay"), None);
}

// ============================================================================
// World Matrices
// ============================================================================

#[test]
fn world_matrix_follows_parent_changes() {
    let mut scene = Scene::new();
    let parent = scene.add(
        Node::new("parent").with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0))),
    );
    let child = scene.add_child(
        parent,
        Node::new("child").with_transform(Transform::from_position(Vec3::new(0.0, 0.0, -2.0))),
    );

    scene.update_matrix_world();
    assert!(approx_vec(translation(&scene, child), Vec3::new(1.0, 0.0, -2.0)));

    scene.node_mut(parent).unwrap().transform.position = Vec3::new(0.0, 5.0, 0.0);
    scene.update_matrix_world();
    assert!(approx_vec(translation(&scene, child), Vec3::new(0.0, 5.0, -2.0)));
}

#[test]
fn world_matrix_applies_parent_rotation() {
    let mut scene = Scene::new();
    let mut parent = Node::new("parent");
    parent.transform.rotation = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    let parent = scene.add(parent);
    let child = scene.add_child(
        parent,
        Node::new("child").with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0))),
    );

    scene.update_matrix_world();
    assert!(approx_vec(translation(&scene, child), Vec3::new(0.0, 0.0, -1.0)));
}

#[test]
fn attach_recomputes_world_matrix() {
    let mut scene = Scene::new();
    let a = scene.add(Node::new("a").with_transform(Transform::from_position(Vec3::X)));
    let b = scene.add(Node::new("b").with_transform(Transform::from_position(Vec3::Y)));
    let child = scene.add_child(a, Node::new("child"));
    scene.update_matrix_world();
    assert!(approx_vec(translation(&scene, child), Vec3::X));

    scene.attach(child, b);
    scene.update_matrix_world();
    assert!(approx_vec(translation(&scene, child), Vec3::Y));
}

// ============================================================================
// Roles
// ============================================================================

#[test]
fn role_accessors() {
    let mut scene = Scene::new();
    let graphic = scene.add(Node::graphic(
        "mesh",
        Graphic::new(Rc::new(Geometry::default()), Rc::new(Material::new("basic"))),
    ));
    let light = scene.add(Node::light("lamp", Light::new_point(Vec3::ONE, 2.0)));
    let group = scene.add(Node::new("group"));

    assert!(scene.node(graphic).unwrap().as_graphic().is_some());
    assert!(scene.node(graphic).unwrap().as_light().is_none());
    assert!(matches!(
        scene.node(light).unwrap().as_light().map(|l| l.kind),
        Some(LightKind::Point { .. })
    ));
    assert!(matches!(scene.node(group).unwrap().role, NodeRole::Group));
}
