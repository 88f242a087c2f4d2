use std::hint::black_box;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Vec3, Vec4};

use prism::gls::consts::TRIANGLES;
use prism::gls::{Gls, HeadlessDriver};
use prism::renderer::bucket::{MaterialEntry, sort_opaque, sort_transparent};
use prism::renderer::{FrameClassification, Renderer};
use prism::resources::{Geometry, Material};
use prism::scene::{Camera, Graphic, Light, Node, NodeKey, Scene, Transform};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn camera() -> Camera {
    let mut camera = Camera::new_perspective(60.0, 16.0 / 9.0, 0.1, 200.0);
    camera.look_at(Vec3::new(0.0, 10.0, 40.0), Vec3::ZERO, Vec3::Y);
    camera
}

/// A grid of `side * side` cubes under groups of 16, half of them
/// transparent, plus a handful of lights.
fn grid_scene(renderer: &mut Renderer, side: usize) -> Scene {
    let mut cube = Geometry::new(TRIANGLES);
    let corners: Vec<Vec3> = (0..8)
        .map(|i| Vec3::new((i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32) - 0.5)
        .collect();
    cube.upload(renderer.gls_mut(), &corners, None)
        .expect("headless upload");
    let cube = Rc::new(cube);

    let opaque = Rc::new(Material::new("basic").with_color(Vec4::new(0.8, 0.2, 0.2, 1.0)));
    let glass = Rc::new(
        Material::new("basic")
            .with_color(Vec4::new(0.2, 0.2, 0.8, 0.4))
            .with_transparent(true),
    );

    let mut scene = Scene::new();
    scene.add(Node::light("ambient", Light::new_ambient(Vec3::splat(0.1), 1.0)));
    scene.add(Node::light("sun", Light::new_directional(Vec3::ONE, 0.8)));
    for i in 0..4 {
        let light = Node::light("bulb", Light::new_point(Vec3::ONE, 1.0))
            .with_transform(Transform::from_position(Vec3::new(i as f32 * 10.0 - 15.0, 5.0, 0.0)));
        scene.add(light);
    }

    let half = side as f32 / 2.0;
    let mut group = scene.root();
    for i in 0..side * side {
        if i % 16 == 0 {
            group = scene.add(Node::new("group"));
        }
        let x = (i % side) as f32 - half;
        let z = (i / side) as f32 - half;
        let material = if i % 2 == 0 { opaque.clone() } else { glass.clone() };
        let node = Node::graphic("cube", Graphic::new(cube.clone(), material))
            .with_transform(Transform::from_position(Vec3::new(x * 2.0, 0.0, z * 2.0)));
        scene.add_child(group, node);
    }
    scene
}

fn renderer() -> Renderer {
    let mut renderer = Renderer::new(Gls::new(Box::new(HeadlessDriver::new())));
    renderer.add_default_shaders().expect("default shaders");
    renderer
}

// ---------------------------------------------------------------------------
// Classification & sorting
// ---------------------------------------------------------------------------

fn bench_classify(c: &mut Criterion) {
    let mut renderer = renderer();
    let mut scene = grid_scene(&mut renderer, 32);
    scene.update_matrix_world();
    let frustum = camera().frustum();
    let mut classes = FrameClassification::with_capacity(1024);

    c.bench_function("classify_1024_graphics", |b| {
        b.iter(|| {
            classes.classify(black_box(&scene), &frustum);
            black_box(classes.len());
        });
    });
}

fn bench_sort(c: &mut Criterion) {
    let entries: Vec<MaterialEntry> = (0..1024)
        .map(|i| MaterialEntry {
            node: NodeKey::default(),
            material: 0,
            render_order: (i % 3) as i32,
            view_z: -(((i * 7919) % 1000) as f32) * 0.1,
        })
        .collect();

    c.bench_function("sort_opaque_1024", |b| {
        b.iter(|| {
            let mut list = entries.clone();
            sort_opaque(black_box(&mut list));
            black_box(list);
        });
    });

    c.bench_function("sort_transparent_1024", |b| {
        b.iter(|| {
            let mut list = entries.clone();
            sort_transparent(black_box(&mut list));
            black_box(list);
        });
    });
}

// ---------------------------------------------------------------------------
// Full frame
// ---------------------------------------------------------------------------

fn bench_frame(c: &mut Criterion) {
    let driver = HeadlessDriver::new();
    let log = driver.log();
    let mut renderer = Renderer::new(Gls::new(Box::new(driver)));
    renderer.add_default_shaders().expect("default shaders");
    let mut scene = grid_scene(&mut renderer, 16);
    let camera = camera();
    renderer.render(&mut scene, &camera).expect("warm-up frame");

    c.bench_function("render_frame_256_graphics", |b| {
        b.iter(|| {
            let did_render = renderer.render(&mut scene, &camera).expect("frame");
            log.clear();
            black_box(did_render);
        });
    });
}

criterion_group!(benches, bench_classify, bench_sort, bench_frame);
criterion_main!(benches);
