//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! It hands a [`Scene`] and a [`Camera`] to a type that implements
//! [`Renderer`] and receives the finished frame through a submit closure.
//!
//! * Toggles and tuning live in an explicit [`RenderConfig`] passed to the
//!   backend; there is no process-wide rendering state.
//! * Pixels are packed into `u32` words with explicit shifts, see
//!   [`PixelFormat::pack`].

use bitflags::bitflags;
use log::debug;
use thiserror::Error;

use crate::world::{
    camera::Camera,
    level::Level,
    texture::{MipmapThresholds, Texture},
};

pub mod overview;
pub mod software;

pub use software::Software;

/// One packed frame-buffer pixel, layout given by [`PixelFormat`].
pub type Rgba = u32;

/// 8-bit RGBA colour as produced by the texture sampler.
pub type Color = [u8; 4];

/// Reserved sprite colour key (pure cyan): texels of this colour are skipped.
pub const TRANSPARENT_KEY: Color = [0, 255, 255, 255];

/// Byte order of a packed screen pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PixelFormat {
    /// `0xAARRGGBB` – what `minifb` and most window surfaces expect.
    #[default]
    Argb8888,
    /// `0xRRGGBBAA`
    Rgba8888,
}

impl PixelFormat {
    #[inline(always)]
    pub fn pack(self, [r, g, b, a]: Color) -> Rgba {
        let (r, g, b, a) = (r as u32, g as u32, b as u32, a as u32);
        match self {
            PixelFormat::Argb8888 => (a << 24) | (r << 16) | (g << 8) | b,
            PixelFormat::Rgba8888 => (r << 24) | (g << 16) | (b << 8) | a,
        }
    }

    #[inline(always)]
    pub fn unpack(self, px: Rgba) -> Color {
        let byte = |shift: u32| ((px >> shift) & 0xFF) as u8;
        match self {
            PixelFormat::Argb8888 => [byte(16), byte(8), byte(0), byte(24)],
            PixelFormat::Rgba8888 => [byte(24), byte(16), byte(8), byte(0)],
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RenderFlags: u8 {
        /// Pick a mipmap level by distance (otherwise always level 0).
        const MIPMAP    = 0x01;
        /// Bilinear texture filtering (otherwise nearest texel).
        const FILTERING = 0x02;
    }
}

impl Default for RenderFlags {
    fn default() -> Self {
        RenderFlags::MIPMAP | RenderFlags::FILTERING
    }
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub flags: RenderFlags,
    /// Size of the raster worker pool.
    pub workers: usize,
    pub mipmap: MipmapThresholds,
    pub pixel_format: PixelFormat,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            flags: RenderFlags::default(),
            workers: match std::thread::available_parallelism() {
                Ok(n) => n.get(),
                Err(e) => {
                    debug!("core count unavailable ({e}), using 4 workers");
                    4
                }
            },
            mipmap: MipmapThresholds::default(),
            pixel_format: PixelFormat::default(),
        }
    }
}

impl RenderConfig {
    #[inline]
    pub fn use_mipmap(&self) -> bool {
        self.flags.contains(RenderFlags::MIPMAP)
    }

    #[inline]
    pub fn use_filtering(&self) -> bool {
        self.flags.contains(RenderFlags::FILTERING)
    }

    /// Mipmap level for `distance`; the level is multiplied by zero when
    /// mipmapping is switched off.
    #[inline]
    pub fn mip_level(&self, distance: f32) -> usize {
        self.mipmap.level(distance) * self.use_mipmap() as usize
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to start raster worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Textures used by the fixed passes.
#[derive(Clone, Debug)]
pub struct TextureSet {
    pub wall: Texture,
    pub floor: Texture,
    /// `None` leaves the upper half to the sky.
    pub ceiling: Option<Texture>,
    pub sky: Texture,
}

/// Everything a frame reads; immutable for the duration of the frame.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub level: &'a Level,
    pub textures: &'a TextureSet,
}

/// A renderer that owns its frame buffers.
///
/// `end_frame` hands the finished screen to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate buffers for the requested resolution and clear them.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Rasterise the scene as seen from `camera` into the internal buffers.
    fn draw_scene(&mut self, scene: Scene<'_>, camera: &Camera);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);

    fn config(&self) -> &RenderConfig;

    fn config_mut(&mut self) -> &mut RenderConfig;
}
