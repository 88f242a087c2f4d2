#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! Prism: a scene renderer over an OpenGL-style state cache.
//!
//! - [`gls`]: driver abstraction and the redundant-call eliding state cache
//! - [`scene`]: node hierarchy, camera, lights and graphics
//! - [`resources`]: geometry, materials, textures and shader defines
//! - [`renderer`]: per-frame classification, bucketing, sorting and drawing

pub mod errors;
pub mod gls;
pub mod renderer;
pub mod resources;
pub mod scene;

pub use errors::{PrismError, Result};
pub use gls::{ClearFlags, Gls, GlsSettings, HeadlessDriver, ProgramId};
pub use renderer::{Renderer, RendererSettings, ShaderManager, ShaderResolver, ShaderSpecs, StatsSnapshot};
pub use resources::{BoundingBox, Geometry, Material, ShaderDefines, Texture, UseLights};
pub use scene::{Camera, Graphic, Light, LightKind, Node, NodeKey, NodeRole, Scene};
