use crate::errors::Result;
use crate::gls::Gls;
use crate::gls::consts::{
    LINEAR, LINEAR_MIPMAP_LINEAR, REPEAT, RGBA, TEXTURE_2D, TEXTURE_MAG_FILTER,
    TEXTURE_MIN_FILTER, TEXTURE_WRAP_S, TEXTURE_WRAP_T, UNSIGNED_BYTE,
};

/// A 2D RGBA8 texture owned by whoever created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    handle: u32,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Creates the texture, uploads `pixels` (tightly packed RGBA8) and
    /// builds mipmaps.
    pub fn from_rgba8(gls: &mut Gls, width: u32, height: u32, pixels: &[u8]) -> Result<Self> {
        debug_assert_eq!(pixels.len(), (width * height * 4) as usize);

        let handle = gls.gen_texture()?;
        gls.bind_texture(TEXTURE_2D, handle);
        gls.tex_image_2d(
            TEXTURE_2D,
            0,
            RGBA as i32,
            width as i32,
            height as i32,
            RGBA,
            UNSIGNED_BYTE,
            Some(pixels),
        );
        gls.tex_parameteri(TEXTURE_2D, TEXTURE_MIN_FILTER, LINEAR_MIPMAP_LINEAR as i32);
        gls.tex_parameteri(TEXTURE_2D, TEXTURE_MAG_FILTER, LINEAR as i32);
        gls.tex_parameteri(TEXTURE_2D, TEXTURE_WRAP_S, REPEAT as i32);
        gls.tex_parameteri(TEXTURE_2D, TEXTURE_WRAP_T, REPEAT as i32);
        gls.generate_mipmap(TEXTURE_2D);

        Ok(Self {
            handle,
            width,
            height,
        })
    }

    #[inline]
    #[must_use]
    pub fn handle(&self) -> u32 {
        self.handle
    }

    pub fn dispose(self, gls: &mut Gls) {
        gls.delete_textures(&[self.handle]);
    }
}
