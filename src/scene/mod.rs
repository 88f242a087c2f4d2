//! Scene graph:
//! - Node: hierarchy, transform, visibility and role
//! - Scene: node arena with a root
//! - Camera / Frustum: view, projection and culling volume
//! - Graphic, Light, FrameHook: the roles a node can play

pub mod camera;
pub mod graphic;
pub mod hook;
pub mod light;
pub mod node;
pub mod scene;
pub mod transform;

pub use camera::{Camera, Frustum, ProjectionType};
pub use graphic::{Graphic, GraphicMaterial};
pub use hook::{FrameContext, FrameHook};
pub use light::{Light, LightKind};
pub use node::{Node, NodeRole};
pub use scene::Scene;
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeKey;
}
