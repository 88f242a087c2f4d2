//! Data containers consumed by the renderer:
//! - Geometry: vertex arrays and draw ranges
//! - Material: shader family and fixed-function state
//! - Texture: 2D images on the GPU
//! - ShaderDefines: preprocessor defines that select a shader variant

pub mod bounding;
pub mod geometry;
pub mod material;
pub mod shader_defines;
pub mod texture;

pub use bounding::BoundingBox;
pub use geometry::Geometry;
pub use material::{Blending, Material, Side, UseLights};
pub use shader_defines::ShaderDefines;
pub use texture::Texture;
