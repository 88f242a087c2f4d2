//! Classification pass.
//!
//! Walks the scene depth-first from the root and sorts every reachable node
//! into exactly one list. A node whose `visible` flag is off is skipped
//! together with its whole subtree.

use glam::Affine3A;

use crate::scene::{Frustum, Light, LightKind, NodeKey, NodeRole, Scene};

/// A light as it was when the frame was classified.
///
/// Uploads read this copy, so a slot reserved for the frame is always
/// written even if a hook moves or removes the light node afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSlot {
    pub node: NodeKey,
    pub light: Light,
    pub world: Affine3A,
}

/// Scratch lists of one frame, in traversal order.
///
/// Cleared, not reallocated, at the start of every frame; keys read from it
/// are only meaningful until the next frame starts.
#[derive(Debug, Default)]
pub struct FrameClassification {
    pub ambient: Vec<LightSlot>,
    pub directional: Vec<LightSlot>,
    pub point: Vec<LightSlot>,
    pub spot: Vec<LightSlot>,
    /// Renderable graphics inside the frustum (or not cullable)
    pub visible: Vec<NodeKey>,
    /// Renderable graphics outside the frustum
    pub culled: Vec<NodeKey>,
    /// Everything else: groups and hook nodes
    pub others: Vec<NodeKey>,
    stack: Vec<NodeKey>,
}

impl FrameClassification {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ambient: Vec::new(),
            directional: Vec::new(),
            point: Vec::new(),
            spot: Vec::new(),
            visible: Vec::with_capacity(capacity),
            culled: Vec::with_capacity(capacity),
            others: Vec::with_capacity(capacity),
            stack: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.ambient.clear();
        self.directional.clear();
        self.point.clear();
        self.spot.clear();
        self.visible.clear();
        self.culled.clear();
        self.others.clear();
        self.stack.clear();
    }

    /// The four light lists in upload order: ambient, directional, point, spot.
    #[must_use]
    pub fn light_lists(&self) -> [&[LightSlot]; 4] {
        [&self.ambient, &self.directional, &self.point, &self.spot]
    }

    #[must_use]
    pub fn light_count(&self) -> usize {
        self.ambient.len() + self.directional.len() + self.point.len() + self.spot.len()
    }

    /// Total number of classified nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.light_count() + self.visible.len() + self.culled.len() + self.others.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Rebuilds the lists for `scene` as seen through `frustum`.
    ///
    /// World matrices must be current. Graphics that are not renderable land
    /// in no list.
    pub fn classify(&mut self, scene: &Scene, frustum: &Frustum) {
        self.clear();
        self.stack.push(scene.root());

        while let Some(key) = self.stack.pop() {
            let Some(node) = scene.node(key) else {
                continue;
            };
            if !node.visible {
                continue;
            }

            match &node.role {
                NodeRole::Graphic(graphic) => {
                    if graphic.renderable {
                        if graphic.cullable {
                            let bounds = graphic.geometry.bounding_box.transform(node.world_matrix());
                            if frustum.intersects_box(&bounds) {
                                self.visible.push(key);
                            } else {
                                self.culled.push(key);
                            }
                        } else {
                            self.visible.push(key);
                        }
                    }
                }
                NodeRole::Light(light) => {
                    let slot = LightSlot {
                        node: key,
                        light: *light,
                        world: *node.world_matrix(),
                    };
                    match light.kind {
                        LightKind::Ambient => self.ambient.push(slot),
                        LightKind::Directional => self.directional.push(slot),
                        LightKind::Point { .. } => self.point.push(slot),
                        LightKind::Spot { .. } => self.spot.push(slot),
                    }
                }
                NodeRole::Group | NodeRole::Hook(_) => self.others.push(key),
            }

            self.stack.extend(node.children().iter().rev());
        }
    }
}
