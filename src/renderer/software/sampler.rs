//! Texture lookups with wrap-around addressing.
//!
//! Bilinear filtering blends in 8-bit fixed point: weights are integers in
//! 0‥255 and the result is truncated after dividing by 255².

use glam::{Vec2, Vec4};

use crate::renderer::Color;
use crate::world::texture::Image;

/// Fractional part that is always in `0‥1`, also for negative input.
#[inline(always)]
pub fn wrap(v: f32) -> f32 {
    v - v.floor()
}

/// Texel channels quantised to 0‥255 (alpha dropped).
#[inline(always)]
fn texel8(image: &Image, x: usize, y: usize) -> [i32; 3] {
    let c: Vec4 = image.texel(x % image.width, y % image.height);
    let q = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as i32;
    [q(c.x), q(c.y), q(c.z)]
}

/// Sample `image` at `uv` (repeating in both axes).
pub fn sample(image: &Image, uv: Vec2, filtering: bool) -> Color {
    let tx = image.width as f32 * wrap(uv.x);
    let ty = image.height as f32 * wrap(uv.y);
    let txi = tx as usize;
    let tyi = ty as usize;

    if !filtering {
        let [r, g, b] = texel8(image, txi, tyi);
        return [r as u8, g as u8, b as u8, 255];
    }

    let pa = texel8(image, txi, tyi);
    let pb = texel8(image, txi + 1, tyi);
    let pc = texel8(image, txi, tyi + 1);
    let pd = texel8(image, txi + 1, tyi + 1);

    let w1 = (255.0 * (tx - txi as f32)) as i32;
    let w2 = 255 - w1;
    let w3 = (255.0 * (ty - tyi as f32)) as i32;
    let w4 = 255 - w3;

    let mut out = [0u8, 0, 0, 255];
    for ch in 0..3 {
        let ab = pb[ch] * w1 + pa[ch] * w2;
        let cd = pd[ch] * w1 + pc[ch] * w2;
        out[ch] = ((cd * w3 + ab * w4) / (255 * 255)) as u8;
    }
    out
}
