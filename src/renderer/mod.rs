//! Rendering Pipeline
//!
//! Once per frame the [`Renderer`]:
//!
//! 1. updates world matrices and snapshots the camera into [`RenderInfo`]
//! 2. classifies every reachable node (graphics, lights, others) and culls
//!    graphics against the view frustum
//! 3. buckets (graphic, material) pairs into opaque and transparent lists
//!    and sorts them
//! 4. runs frame hooks of "other" nodes
//! 5. clears when something is or was on screen, then draws the opaque
//!    bucket followed by the transparent one
//!
//! All GPU traffic goes through the [`Gls`] state cache.

pub mod bucket;
pub mod classify;
pub mod render_info;
pub mod settings;
pub mod shader_manager;
pub mod specs;
pub mod stats;

pub use bucket::MaterialEntry;
pub use classify::{FrameClassification, LightSlot};
pub use render_info::RenderInfo;
pub use settings::RendererSettings;
pub use shader_manager::{ShaderManager, ShaderResolver};
pub use specs::ShaderSpecs;
pub use stats::{RenderStats, StatsSnapshot};

use std::mem;

use log::{trace, warn};

use crate::errors::{PrismError, Result};
use crate::gls::Gls;
use crate::scene::{Camera, FrameContext, Frustum, NodeRole, Scene};

/// Scene renderer over a GPU state cache.
///
/// Scratch lists are reused across frames; anything read through
/// [`Renderer::classification`] or the entry accessors describes the last
/// frame only.
pub struct Renderer<S: ShaderResolver = ShaderManager> {
    gls: Gls,
    shaders: S,
    settings: RendererSettings,

    classification: FrameClassification,
    opaque: Vec<MaterialEntry>,
    transparent: Vec<MaterialEntry>,

    rinfo: RenderInfo,
    specs: ShaderSpecs,
    stats: RenderStats,
    prev_stats: RenderStats,
}

impl Renderer<ShaderManager> {
    /// Renderer with default settings and an empty [`ShaderManager`].
    #[must_use]
    pub fn new(gls: Gls) -> Self {
        Self::with_settings(gls, RendererSettings::default())
    }

    #[must_use]
    pub fn with_settings(gls: Gls, settings: RendererSettings) -> Self {
        Self::with_resolver(gls, ShaderManager::new(), settings)
    }

    pub fn add_chunk(&mut self, name: &str, source: &str) -> Result<()> {
        self.shaders.add_chunk(name, source)
    }

    pub fn add_shader(&mut self, name: &str, source: &str) -> Result<()> {
        self.shaders.add_shader(name, source)
    }

    pub fn add_program(&mut self, name: &str, vertex: &str, fragment: &str, others: &[&str]) {
        self.shaders.add_program(name, vertex, fragment, others);
    }

    pub fn add_default_shaders(&mut self) -> Result<()> {
        self.shaders.add_default_shaders()
    }
}

impl<S: ShaderResolver> Renderer<S> {
    pub fn with_resolver(gls: Gls, shaders: S, settings: RendererSettings) -> Self {
        let capacity = settings.initial_capacity;
        Self {
            gls,
            shaders,
            classification: FrameClassification::with_capacity(capacity),
            opaque: Vec::with_capacity(capacity),
            transparent: Vec::with_capacity(capacity),
            rinfo: RenderInfo::default(),
            specs: ShaderSpecs::default(),
            stats: RenderStats::default(),
            prev_stats: RenderStats::default(),
            settings,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn gls(&self) -> &Gls {
        &self.gls
    }

    #[inline]
    pub fn gls_mut(&mut self) -> &mut Gls {
        &mut self.gls
    }

    #[inline]
    #[must_use]
    pub fn shaders(&self) -> &S {
        &self.shaders
    }

    #[inline]
    pub fn shaders_mut(&mut self) -> &mut S {
        &mut self.shaders
    }

    #[must_use]
    pub fn settings(&self) -> &RendererSettings {
        &self.settings
    }

    /// Statistics of the last rendered frame.
    #[must_use]
    pub fn stats(&self) -> RenderStats {
        self.prev_stats
    }

    /// Copy of the frame and state-cache counters.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            render: self.prev_stats,
            gls: self.gls.stats(),
        }
    }

    pub fn set_object_sorting(&mut self, enable: bool) {
        self.settings.sort_objects = enable;
    }

    #[must_use]
    pub fn object_sorting(&self) -> bool {
        self.settings.sort_objects
    }

    #[must_use]
    pub fn classification(&self) -> &FrameClassification {
        &self.classification
    }

    #[must_use]
    pub fn opaque_entries(&self) -> &[MaterialEntry] {
        &self.opaque
    }

    #[must_use]
    pub fn transparent_entries(&self) -> &[MaterialEntry] {
        &self.transparent
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Renders one frame of `scene` as seen by `camera`.
    ///
    /// Returns `Ok(true)` when the frame buffer was cleared, which happens
    /// whenever this frame or the previous one had something to draw.
    ///
    /// # Errors
    ///
    /// Returns [`PrismError::RenderPhase`] when a shader program cannot be
    /// resolved. Draws submitted before the failure stay submitted and the
    /// rest of that bucket is skipped; the error's `did_render` tells whether
    /// the frame buffer was cleared.
    pub fn render(&mut self, scene: &mut Scene, camera: &Camera) -> Result<bool> {
        self.stats = RenderStats::default();
        let result = self.render_scene(scene, camera);
        self.prev_stats = self.stats;
        result
    }

    fn render_scene(&mut self, scene: &mut Scene, camera: &Camera) -> Result<bool> {
        scene.update_matrix_world();

        self.rinfo = RenderInfo {
            view_matrix: camera.view_matrix(),
            projection_matrix: camera.projection_matrix(),
        };

        self.opaque.clear();
        self.transparent.clear();

        let frustum = Frustum::from_matrix(self.rinfo.view_projection());
        self.classification.classify(scene, &frustum);

        self.specs.ambient_lights_max = self.classification.ambient.len();
        self.specs.dir_lights_max = self.classification.directional.len();
        self.specs.point_lights_max = self.classification.point.len();
        self.specs.spot_lights_max = self.classification.spot.len();

        self.fill_buckets(scene);

        if self.settings.sort_objects {
            bucket::sort_opaque(&mut self.opaque);
            bucket::sort_transparent(&mut self.transparent);
        }

        trace!(
            "frame: {} visible, {} culled, {} lights, {} others, {} opaque, {} transparent",
            self.classification.visible.len(),
            self.classification.culled.len(),
            self.classification.light_count(),
            self.classification.others.len(),
            self.opaque.len(),
            self.transparent.len(),
        );

        self.run_hooks(scene);

        let mut did_render = false;
        if !self.opaque.is_empty() || !self.transparent.is_empty() || self.prev_stats.graphics > 0 {
            self.gls.clear(self.settings.clear_mask);
            did_render = true;
        }

        let mut pass = DrawPass {
            gls: &mut self.gls,
            shaders: &mut self.shaders,
            specs: &mut self.specs,
            stats: &mut self.stats,
            scene,
            rinfo: &self.rinfo,
            lights: &self.classification,
        };
        pass.draw_bucket(&self.opaque)
            .map_err(|e| phase_error("opaque", did_render, e))?;
        pass.draw_bucket(&self.transparent)
            .map_err(|e| phase_error("transparent", did_render, e))?;

        Ok(did_render)
    }

    fn fill_buckets(&mut self, scene: &mut Scene) {
        for &key in &self.classification.visible {
            let Some(node) = scene.node_mut(key) else {
                continue;
            };
            let world = node.transform.world_matrix;
            let Some(graphic) = node.as_graphic_mut() else {
                continue;
            };

            graphic.calculate_matrices(&world, &self.rinfo);
            let view_z = graphic.view_z();
            let render_order = graphic.render_order;

            for (material, grmat) in graphic.materials.iter().enumerate() {
                let entry = MaterialEntry {
                    node: key,
                    material,
                    render_order,
                    view_z,
                };
                if grmat.material.transparent {
                    self.transparent.push(entry);
                } else {
                    self.opaque.push(entry);
                }
            }
        }
    }

    /// Runs the frame hook of every "other" node still visible at its turn.
    fn run_hooks(&mut self, scene: &mut Scene) {
        for &key in &self.classification.others {
            let Some(node) = scene.node_mut(key) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            self.stats.others += 1;

            if !matches!(node.role, NodeRole::Hook(_)) {
                continue;
            }
            let NodeRole::Hook(mut hook) = mem::replace(&mut node.role, NodeRole::Group) else {
                continue;
            };

            let mut ctx = FrameContext {
                gls: &mut self.gls,
                scene,
                node: key,
            };
            hook.on_frame(&mut ctx);

            // The hook may have removed its node or given it a new role.
            if let Some(node) = scene.node_mut(key)
                && matches!(node.role, NodeRole::Group)
            {
                node.role = NodeRole::Hook(hook);
            }
        }
    }
}

fn phase_error(phase: &'static str, did_render: bool, source: PrismError) -> PrismError {
    warn!("aborting {phase} pass: {source}");
    PrismError::RenderPhase {
        phase,
        did_render,
        source: Box::new(source),
    }
}

/// Borrows needed while drawing a bucket.
struct DrawPass<'a, S: ShaderResolver> {
    gls: &'a mut Gls,
    shaders: &'a mut S,
    specs: &'a mut ShaderSpecs,
    stats: &'a mut RenderStats,
    scene: &'a Scene,
    rinfo: &'a RenderInfo,
    lights: &'a FrameClassification,
}

impl<S: ShaderResolver> DrawPass<'_, S> {
    fn draw_bucket(&mut self, entries: &[MaterialEntry]) -> Result<()> {
        for entry in entries {
            self.draw_entry(entry)?;
        }
        Ok(())
    }

    fn draw_entry(&mut self, entry: &MaterialEntry) -> Result<()> {
        let scene = self.scene;
        let Some(graphic) = scene.node(entry.node).and_then(|n| n.as_graphic()) else {
            warn!("graphic {:?} left the scene before drawing", entry.node);
            return Ok(());
        };
        let Some(grmat) = graphic.materials.get(entry.material) else {
            return Ok(());
        };
        let material = &grmat.material;

        self.specs.defines.clear();
        self.specs.defines.merge(&material.defines);
        self.specs.defines.merge(&graphic.geometry.defines);
        self.specs.defines.merge(&graphic.defines);
        self.specs.name.clear();
        self.specs.name.push_str(&material.shader);
        self.specs.unique = material.shader_unique;
        self.specs.use_lights = material.use_lights;
        self.specs.mat_textures_max = material.texture_count();

        self.shaders.set_program(self.gls, self.specs)?;

        let lights = self.lights;
        for list in lights.light_lists() {
            for (index, slot) in list.iter().enumerate() {
                slot.light.render_setup(self.gls, self.rinfo, &slot.world, index);
                self.stats.lights += 1;
            }
        }

        graphic.render(self.gls, entry.material);
        self.stats.graphics += 1;
        Ok(())
    }
}
