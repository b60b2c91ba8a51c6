//! Background pass: an equirectangular panorama behind everything else.
//!
//! Only pixels that still hold [`FAR_DEPTH`] after the geometry passes are
//! painted; depth is left as is.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, vec2};

use crate::renderer::{
    Scene,
    software::{Software, buffers::FAR_DEPTH, projection::View, sampler},
};

/// Panorama coordinate seen through screen pixel `(x, y)`.
pub fn sky_uv(view: &View, x: usize, y: usize) -> Vec2 {
    let px = (x as f32 - view.half_w) / view.half_w * view.tan_half_fov * view.aspect;
    let py = (view.half_h - y as f32) / view.half_h * view.tan_half_fov;

    let flat = view.front + view.right * px;
    let dir = flat.extend(py).normalize();

    // u grows to the right of the viewer, like v grows downwards
    vec2(0.5 - dir.y.atan2(dir.x) / TAU, 0.5 - dir.z.asin() / PI)
}

impl Software {
    pub(super) fn draw_sky(&mut self, view: &View, scene: Scene<'_>) {
        // level 0, always filtered
        let image = scene.textures.sky.mipmap(0);
        let format = self.config.pixel_format;

        let ranges = self.pool.chunks(view.height);
        self.pool.for_each_band(self.buffers.bands(&ranges), |mut band| {
            for y in band.rows.clone() {
                for x in 0..view.width {
                    let idx = band.index(x, y);
                    if band.depth[idx] < FAR_DEPTH {
                        continue;
                    }
                    band.screen[idx] = format.pack(sampler::sample(image, sky_uv(view, x, y), true));
                }
            }
        });
    }
}
