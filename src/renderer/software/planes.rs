use glam::Vec2;

use crate::renderer::{
    Scene,
    software::{Software, buffers::STENCIL_WALL, projection::View, sampler},
};
use crate::world::{geometry::WALL_TOP, texture::Texture};

/// Which horizontal plane a screen row looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Plane {
    Floor,
    Ceiling,
}

/// Classify screen row `y`: the plane it shows and its ray-row index `i`
/// (0 at the horizon, growing away from it).
#[inline]
fn plane_row(y: usize, height: usize) -> (Plane, usize) {
    let half = height / 2;
    if y >= half {
        (Plane::Floor, y - half)
    } else {
        (Plane::Ceiling, half - 1 - y)
    }
}

/// Forward distance at which ray row `i` meets a plane `gap` units above or
/// below the eye.  Row 0 is the horizon and never meets it, and neither
/// does any row when the eye is on or past the plane (`gap <= 0`).
#[inline]
pub fn plane_distance(view: &View, i: usize, gap: f32) -> Option<f32> {
    if i == 0 || gap <= 0.0 {
        return None;
    }
    let tan_down = i as f32 * view.row_step;
    Some(gap / tan_down)
}

/// World position seen at screen column `x` on a plane `distance` ahead.
#[inline(always)]
fn plane_point(view: &View, x: usize, distance: f32) -> Vec2 {
    let lateral = (x as i32 - (view.width / 2) as i32) as f32 * view.ray_step * distance;
    view.position + view.front * distance + view.right * lateral
}

impl Software {
    /// Floor (and optional ceiling) pass.
    ///
    /// Pixels already owned by a wall or lying beyond the far plane are
    /// left untouched.
    pub(super) fn draw_planes(&mut self, view: &View, scene: Scene<'_>) {
        let floor = &scene.textures.floor;
        let ceiling = scene.textures.ceiling.as_ref();
        let config = &self.config;
        let filtering = config.use_filtering();
        let format = config.pixel_format;

        let ranges = self.pool.chunks(view.height);
        self.pool.for_each_band(self.buffers.bands(&ranges), |mut band| {
            for y in band.rows.clone() {
                let (plane, i) = plane_row(y, view.height);
                let (texture, gap): (&Texture, f32) = match plane {
                    Plane::Floor => (floor, view.eye),
                    Plane::Ceiling => match ceiling {
                        Some(tex) => (tex, WALL_TOP - view.eye),
                        None => continue,
                    },
                };
                let Some(distance) = plane_distance(view, i, gap) else {
                    continue;
                };
                if distance > view.far {
                    continue;
                }

                let image = texture.mipmap(config.mip_level(distance));
                let depth = view.depth(distance);
                for x in 0..view.width {
                    let idx = band.index(x, y);
                    if band.stencil[idx] == STENCIL_WALL {
                        continue;
                    }
                    let uv = plane_point(view, x, distance);
                    band.screen[idx] = format.pack(sampler::sample(image, uv, filtering));
                    band.depth[idx] = depth;
                }
            }
        });
    }
}
