//! Surface description for one draw.
//!
//! A [`Material`] names the shader family it needs and carries the fixed
//! function state (faces, depth, blending, rasterization) applied through the
//! state cache right before its geometry is drawn.

use std::borrow::Cow;

use bitflags::bitflags;
use glam::Vec4;

use crate::gls::Gls;
use crate::gls::consts::{
    BACK, BLEND, CCW, CULL_FACE, DEPTH_TEST, FILL, FRONT, FRONT_AND_BACK, FUNC_ADD, LEQUAL, LINE,
    ONE, ONE_MINUS_SRC_ALPHA, ONE_MINUS_SRC_COLOR, SRC_ALPHA, SRC_COLOR, TEXTURE_2D, TEXTURE0, ZERO,
};
use crate::resources::shader_defines::ShaderDefines;
use crate::resources::texture::Texture;

bitflags! {
    /// Light kinds a shader family consumes. Kinds left out are compiled with
    /// a zero maximum whatever the scene holds.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct UseLights: u32 {
        const AMBIENT     = 1 << 0;
        const DIRECTIONAL = 1 << 1;
        const POINT       = 1 << 2;
        const SPOT        = 1 << 3;
    }
}

impl Default for UseLights {
    fn default() -> Self {
        Self::all()
    }
}

/// Faces that are rasterized.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Colour blending against the framebuffer.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default)]
pub enum Blending {
    None,
    /// Premultiplied-free alpha blending
    #[default]
    Normal,
    Additive,
    Subtractive,
    Multiply,
    Custom {
        equation_rgb: u32,
        equation_alpha: u32,
        src_rgb: u32,
        dst_rgb: u32,
        src_alpha: u32,
        dst_alpha: u32,
    },
}

/// Shader family plus render state of one surface.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: Cow<'static, str>,
    /// Program name registered with the shader manager
    pub shader: Cow<'static, str>,
    /// Compile one variant of `shader` and share it, whatever the defines
    pub shader_unique: bool,
    pub use_lights: UseLights,
    pub transparent: bool,
    pub side: Side,
    pub depth_test: bool,
    pub depth_write: bool,
    pub depth_func: u32,
    pub blending: Blending,
    pub wireframe: bool,
    pub line_width: f32,
    /// `(factor, units)`; `None` keeps offset at zero
    pub polygon_offset: Option<(f32, f32)>,
    pub color: Vec4,
    /// Texture handles bound to units `0..n` in order
    pub textures: Vec<u32>,
    pub defines: ShaderDefines,
}

impl Default for Material {
    fn default() -> Self {
        Self::new("basic")
    }
}

impl Material {
    #[must_use]
    pub fn new(shader: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: Cow::Borrowed("Material"),
            shader: shader.into(),
            shader_unique: false,
            use_lights: UseLights::all(),
            transparent: false,
            side: Side::Front,
            depth_test: true,
            depth_write: true,
            depth_func: LEQUAL,
            blending: Blending::Normal,
            wireframe: false,
            line_width: 1.0,
            polygon_offset: None,
            color: Vec4::ONE,
            textures: Vec::new(),
            defines: ShaderDefines::new(),
        }
    }

    #[must_use]
    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    #[must_use]
    pub fn with_blending(mut self, blending: Blending) -> Self {
        self.blending = blending;
        self
    }

    #[must_use]
    pub fn with_define(mut self, key: &str, value: &str) -> Self {
        self.defines.set(key, value);
        self
    }

    /// Appends `texture` on the next free unit.
    #[must_use]
    pub fn with_texture(mut self, texture: &Texture) -> Self {
        self.textures.push(texture.handle());
        self
    }

    #[inline]
    #[must_use]
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Applies this material's state through the cache and uploads its
    /// uniforms to the bound program.
    pub fn render_setup(&self, gls: &mut Gls) {
        match self.side {
            Side::Front => {
                gls.enable(CULL_FACE);
                gls.front_face(CCW);
                gls.cull_face(BACK);
            }
            Side::Back => {
                gls.enable(CULL_FACE);
                gls.front_face(CCW);
                gls.cull_face(FRONT);
            }
            Side::Double => gls.disable(CULL_FACE),
        }

        if self.depth_test {
            gls.enable(DEPTH_TEST);
        } else {
            gls.disable(DEPTH_TEST);
        }
        gls.depth_mask(self.depth_write);
        gls.depth_func(self.depth_func);

        self.apply_blending(gls);

        if self.wireframe {
            gls.polygon_mode(FRONT_AND_BACK, LINE);
        } else {
            gls.polygon_mode(FRONT_AND_BACK, FILL);
        }
        gls.line_width(self.line_width);

        let (factor, units) = self.polygon_offset.unwrap_or((0.0, 0.0));
        gls.polygon_offset(factor, units);

        for (unit, &texture) in self.textures.iter().enumerate() {
            gls.active_texture(TEXTURE0 + unit as u32);
            gls.bind_texture(TEXTURE_2D, texture);
            if let Some(loc) = gls.uniform_location(&format!("MatTexture[{unit}]")) {
                gls.uniform1i(loc, unit as i32);
            }
        }

        if let Some(loc) = gls.uniform_location("MatColor") {
            let c = self.color;
            gls.uniform4f(loc, c.x, c.y, c.z, c.w);
        }
    }

    fn apply_blending(&self, gls: &mut Gls) {
        match self.blending {
            Blending::None => gls.disable(BLEND),
            Blending::Normal => {
                gls.enable(BLEND);
                gls.blend_equation_separate(FUNC_ADD, FUNC_ADD);
                gls.blend_func_separate(SRC_ALPHA, ONE_MINUS_SRC_ALPHA, ONE, ONE_MINUS_SRC_ALPHA);
            }
            Blending::Additive => {
                gls.enable(BLEND);
                gls.blend_equation(FUNC_ADD);
                gls.blend_func(SRC_ALPHA, ONE);
            }
            Blending::Subtractive => {
                gls.enable(BLEND);
                gls.blend_equation(FUNC_ADD);
                gls.blend_func(ZERO, ONE_MINUS_SRC_COLOR);
            }
            Blending::Multiply => {
                gls.enable(BLEND);
                gls.blend_equation(FUNC_ADD);
                gls.blend_func(ZERO, SRC_COLOR);
            }
            Blending::Custom {
                equation_rgb,
                equation_alpha,
                src_rgb,
                dst_rgb,
                src_alpha,
                dst_alpha,
            } => {
                gls.enable(BLEND);
                gls.blend_equation_separate(equation_rgb, equation_alpha);
                gls.blend_func_separate(src_rgb, dst_rgb, src_alpha, dst_alpha);
            }
        }
    }
}
