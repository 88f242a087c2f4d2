//! Light sources.
//!
//! Each kind uploads into its own uniform array, one slot per light, where a
//! slot is a fixed run of `vec3`s:
//!
//! | kind        | uniform             | vec3s per slot                                   |
//! |-------------|---------------------|--------------------------------------------------|
//! | ambient     | `AmbientLightColor` | color                                            |
//! | directional | `DirLight`          | color, direction                                 |
//! | point       | `PointLight`        | color, position, (linear, quadratic, 0)          |
//! | spot        | `SpotLight`         | color, position, direction, (cutoff, angular, 0), (linear, quadratic, 0) |
//!
//! Positions and directions are in view space.

use glam::{Affine3A, Vec3};

use crate::gls::Gls;
use crate::renderer::RenderInfo;

/// Closed set of light kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Ambient,
    /// Shines along the direction from the light's world position to the
    /// origin.
    Directional,
    Point {
        linear_decay: f32,
        quadratic_decay: f32,
    },
    /// Shines along the node's local -Z.
    Spot {
        /// Half angle of the cone, degrees
        cutoff_angle: f32,
        angular_decay: f32,
        linear_decay: f32,
        quadratic_decay: f32,
    },
}

impl LightKind {
    /// Uniform array this kind writes into and its slot width in `vec3`s.
    #[must_use]
    pub fn uniform(&self) -> (&'static str, usize) {
        match self {
            Self::Ambient => ("AmbientLightColor", 1),
            Self::Directional => ("DirLight", 2),
            Self::Point { .. } => ("PointLight", 3),
            Self::Spot { .. } => ("SpotLight", 5),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Vec3,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    #[must_use]
    pub fn new_ambient(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Ambient,
        }
    }

    #[must_use]
    pub fn new_directional(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional,
        }
    }

    #[must_use]
    pub fn new_point(color: Vec3, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Point {
                linear_decay: 1.0,
                quadratic_decay: 1.0,
            },
        }
    }

    #[must_use]
    pub fn new_spot(color: Vec3, intensity: f32, cutoff_angle: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Spot {
                cutoff_angle,
                angular_decay: 15.0,
                linear_decay: 1.0,
                quadratic_decay: 1.0,
            },
        }
    }

    /// Writes this light into slot `index` of its kind's uniform array of the
    /// bound program. Programs without the array are left untouched.
    pub fn render_setup(&self, gls: &mut Gls, rinfo: &RenderInfo, world: &Affine3A, index: usize) {
        let (name, stride) = self.kind.uniform();
        let Some(location) = gls.uniform_location(&format!("{name}[{}]", index * stride)) else {
            return;
        };

        let color = self.color * self.intensity;
        let view = &rinfo.view_matrix;
        let position = Vec3::from(world.translation);

        match self.kind {
            LightKind::Ambient => {
                gls.uniform3fv(location, &color.to_array());
            }
            LightKind::Directional => {
                let direction = view.transform_vector3(position).normalize_or_zero();
                let mut data = [0.0; 6];
                data[..3].copy_from_slice(&color.to_array());
                data[3..].copy_from_slice(&direction.to_array());
                gls.uniform3fv(location, &data);
            }
            LightKind::Point {
                linear_decay,
                quadratic_decay,
            } => {
                let view_pos = view.transform_point3(position);
                let mut data = [0.0; 9];
                data[..3].copy_from_slice(&color.to_array());
                data[3..6].copy_from_slice(&view_pos.to_array());
                data[6] = linear_decay;
                data[7] = quadratic_decay;
                gls.uniform3fv(location, &data);
            }
            LightKind::Spot {
                cutoff_angle,
                angular_decay,
                linear_decay,
                quadratic_decay,
            } => {
                let view_pos = view.transform_point3(position);
                let axis = world.transform_vector3(Vec3::NEG_Z);
                let direction = view.transform_vector3(axis).normalize_or_zero();
                let mut data = [0.0; 15];
                data[..3].copy_from_slice(&color.to_array());
                data[3..6].copy_from_slice(&view_pos.to_array());
                data[6..9].copy_from_slice(&direction.to_array());
                data[9] = cutoff_angle;
                data[10] = angular_decay;
                data[12] = linear_decay;
                data[13] = quadratic_decay;
                gls.uniform3fv(location, &data);
            }
        }
    }
}
