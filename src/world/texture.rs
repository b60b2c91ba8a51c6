// Decoded images and their mipmap chains.
// Textures are built once at load time and are read-only while rendering,
// so they can be shared freely across raster workers.

use glam::Vec4;

/// Number of levels in every mipmap chain (0 = full resolution).
pub const MIP_LEVELS: usize = 4;

/// CPU-side image: `width × height` RGBA texels in 0‥1, row-major,
/// origin top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Vec4>,
}

impl Image {
    /// Black, fully transparent image.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Vec4::ZERO)
    }

    pub fn filled(width: usize, height: usize, color: Vec4) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> Vec4 {
        self.pixels[y * self.width + x]
    }

    #[inline(always)]
    pub fn set_texel(&mut self, x: usize, y: usize, color: Vec4) {
        self.pixels[y * self.width + x] = color;
    }

    /// Half-resolution copy; every output texel is the mean of a 2×2 block.
    pub fn minify(&self) -> Image {
        let mut out = Image::new(self.width / 2, self.height / 2);
        for y in 0..out.height {
            for x in 0..out.width {
                let (sx, sy) = (2 * x, 2 * y);
                let sum = self.texel(sx, sy)
                    + self.texel(sx + 1, sy)
                    + self.texel(sx, sy + 1)
                    + self.texel(sx + 1, sy + 1);
                out.set_texel(x, y, sum / 4.0);
            }
        }
        out
    }
}

/// An image plus its precomputed box-filtered mipmaps.
///
/// Each level halves the linear resolution of the previous one, so the
/// source dimensions must be divisible by 8.
#[derive(Clone, Debug)]
pub struct Texture {
    mipmaps: Vec<Image>,
    pub width: usize,
    pub height: usize,
}

impl Texture {
    pub fn new(image: Image) -> Self {
        debug_assert!(
            image.width % 8 == 0 && image.height % 8 == 0,
            "texture size {}x{} is not divisible by 8",
            image.width,
            image.height
        );

        let (width, height) = (image.width, image.height);
        let mut mipmaps = Vec::with_capacity(MIP_LEVELS);
        mipmaps.push(image);
        for level in 1..MIP_LEVELS {
            let next = mipmaps[level - 1].minify();
            mipmaps.push(next);
        }

        Self {
            mipmaps,
            width,
            height,
        }
    }

    /// Borrow mipmap `level`; out-of-range levels clamp to the smallest one.
    #[inline]
    pub fn mipmap(&self, level: usize) -> &Image {
        &self.mipmaps[level.min(MIP_LEVELS - 1)]
    }

    #[inline]
    pub fn levels(&self) -> &[Image] {
        &self.mipmaps
    }
}

/// Distance staircase that picks a mipmap level.
///
/// `level(d)` is the index of the first threshold with `d < threshold`;
/// beyond the last threshold the full-resolution level 0 is used again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MipmapThresholds(pub [f32; MIP_LEVELS]);

impl MipmapThresholds {
    /// World-scale table.
    pub const WORLD: Self = Self([25.0, 50.0, 100.0, 200.0]);
    /// Tighter table for small rooms.
    pub const COMPACT: Self = Self([10.0, 20.0, 40.0, 80.0]);

    pub fn level(&self, distance: f32) -> usize {
        self.0
            .iter()
            .position(|&threshold| distance < threshold)
            .unwrap_or(0)
    }
}

impl Default for MipmapThresholds {
    fn default() -> Self {
        Self::WORLD
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
