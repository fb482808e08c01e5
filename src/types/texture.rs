use serde::Serialize;

/// `GL_RGB8` sized internal format.
pub const GL_RGB8: u32 = 0x8051;
/// `GL_SRGB8` sized internal format.
pub const GL_SRGB8: u32 = 0x8C41;

/// How the sampler should interpret stored texel values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// Texels are sampled as stored.
    #[default]
    Linear,
    /// Texels are sRGB-encoded and decoded to linear when sampled.
    Srgb,
}

impl ColorSpace {
    pub fn gl_internal_format(self) -> u32 {
        match self {
            ColorSpace::Linear => GL_RGB8,
            ColorSpace::Srgb => GL_SRGB8,
        }
    }
}

/// Decoded 24-bit texture ready for a `GL_RGB` upload.
///
/// Pixels are tightly packed RGB8. Rows run bottom-to-top so the first row
/// lands at texture coordinate `v = 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub color_space: ColorSpace,
}

impl Texture {
    pub const BYTES_PER_PIXEL: usize = 3;

    /// Bytes per row, without padding.
    pub fn row_stride(&self) -> usize {
        self.width as usize * Self::BYTES_PER_PIXEL
    }

    /// RGB triple at `(x, y)` with `y = 0` being the bottom row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.row_stride() + x as usize * Self::BYTES_PER_PIXEL;
        let px = self.pixels.get(offset..offset + Self::BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2]])
    }
}

/// One image prepared for both sampler modes.
///
/// Both hold the same pixels and differ only in upload format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureVariants {
    pub linear: Texture,
    pub srgb: Texture,
}

impl TextureVariants {
    pub fn new(decoded: Texture) -> Self {
        let srgb = Texture {
            color_space: ColorSpace::Srgb,
            ..decoded.clone()
        };
        let linear = Texture {
            color_space: ColorSpace::Linear,
            ..decoded
        };
        Self { linear, srgb }
    }

    pub fn get(&self, space: ColorSpace) -> &Texture {
        match space {
            ColorSpace::Linear => &self.linear,
            ColorSpace::Srgb => &self.srgb,
        }
    }

    pub fn width(&self) -> u32 {
        self.linear.width
    }

    pub fn height(&self) -> u32 {
        self.linear.height
    }
}
