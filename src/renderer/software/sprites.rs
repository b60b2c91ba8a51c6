use glam::Vec2;

use crate::renderer::{
    Scene, TRANSPARENT_KEY,
    software::{Software, projection::View, sampler},
};
use crate::world::sprite::Sprite;

/// A sprite projected to screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteRect {
    /// top-left corner, may lie off screen
    pub x0: f32,
    pub y0: f32,
    /// edge length in pixels (sprites are square)
    pub size: f32,
    /// forward distance
    pub z: f32,
}

impl SpriteRect {
    /// Texture coordinate of screen pixel `(x, y)`, origin top-left.
    #[inline(always)]
    fn uv(&self, x: usize, y: usize) -> Vec2 {
        Vec2::new(
            (x as f32 + 0.5 - self.x0) / self.size,
            (y as f32 + 0.5 - self.y0) / self.size,
        )
    }

    /// Pixels whose centre lies inside `start..start + size` on one axis,
    /// clipped to `0..limit`.
    #[inline]
    fn span(start: f32, size: f32, limit: usize) -> std::ops::Range<usize> {
        let lo = (start - 0.5).ceil().max(0.0) as usize;
        let hi = (start + size - 0.5).ceil().clamp(0.0, limit as f32) as usize;
        lo.min(hi)..hi
    }
}

/// Project `sprite` through `view`; `None` if it is behind the camera or
/// past the far plane.
pub fn project_sprite(view: &View, sprite: &Sprite) -> Option<SpriteRect> {
    let rel = sprite.position - view.position;
    let z = rel.dot(view.front);
    if z <= 0.0 || z >= view.far {
        return None;
    }
    let lateral = rel.dot(view.right);
    let scale = view.px_per_unit(z);

    let centre_x = view.half_w + lateral * scale;
    let centre_height = sprite.height + sprite.size * 0.5;
    let centre_y = view.half_h - (centre_height - view.eye) * scale;
    let size = sprite.size * scale;

    Some(SpriteRect {
        x0: centre_x - size * 0.5,
        y0: centre_y - size * 0.5,
        size,
        z,
    })
}

impl Software {
    /// Billboards in level order, depth-tested against walls and planes.
    /// Texels equal to [`TRANSPARENT_KEY`] are skipped.
    pub(super) fn draw_sprites(&mut self, view: &View, scene: Scene<'_>) {
        let format = self.config.pixel_format;
        let fb = &mut self.buffers;

        for sprite in &scene.level.sprites {
            let Some(rect) = project_sprite(view, sprite) else {
                continue;
            };
            let depth = view.depth(rect.z);
            let image = sprite.texture.mipmap(0);

            for y in SpriteRect::span(rect.y0, rect.size, view.height) {
                for x in SpriteRect::span(rect.x0, rect.size, view.width) {
                    let idx = fb.index(x, y);
                    if fb.depth[idx] <= depth {
                        continue;
                    }
                    let color = sampler::sample(image, rect.uv(x, y), false);
                    if color == TRANSPARENT_KEY {
                        continue;
                    }
                    fb.screen[idx] = format.pack(color);
                    fb.depth[idx] = depth;
                }
            }
        }
    }
}
