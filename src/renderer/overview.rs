//! Top-down debug view of the map.
//!
//! Walls are drawn as lines in their own colour, the camera as a red line
//! from its position to the far plane.

use glam::{IVec2, Vec2, Vec3};

use crate::{
    renderer::{PixelFormat, Rgba},
    world::{Camera, Level, view_to_screen},
};

/// World units → pixels.
pub const OVERVIEW_SCALE: f32 = 50.0;

const CAMERA_COLOR: [u8; 4] = [255, 0, 0, 255];

/// Borrowed pixel surface for line drawing.
pub struct Canvas<'a> {
    pub pixels: &'a mut [Rgba],
    pub width: usize,
    pub height: usize,
}

impl Canvas<'_> {
    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    /// Bresenham line; pixels off the canvas are clipped.
    pub fn draw_line(&mut self, from: IVec2, to: IVec2, col: Rgba) {
        let (mut x0, mut y0) = (from.x, from.y);
        let (x1, y1) = (to.x, to.y);
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if (0..self.width as i32).contains(&x0) && (0..self.height as i32).contains(&y0) {
                self.pixels[y0 as usize * self.width + x0 as usize] = col;
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

fn rgb8(c: Vec3) -> [u8; 4] {
    let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [q(c.x), q(c.y), q(c.z), 255]
}

/// Clear `canvas` to black and draw the level and camera from above.
pub fn draw_overview(canvas: &mut Canvas<'_>, format: PixelFormat, camera: &Camera, level: &Level) {
    let m = view_to_screen(canvas.width, canvas.height, OVERVIEW_SCALE);
    let project = |p: Vec2| m.transform_point2(p).round().as_ivec2();

    canvas.clear(format.pack([0, 0, 0, 255]));

    for wall in &level.walls {
        let col = format.pack(rgb8(wall.color));
        canvas.draw_line(project(wall.line.start), project(wall.line.end), col);
    }

    let tip = camera.position + camera.front() * camera.far_plane;
    canvas.draw_line(project(camera.position), project(tip), format.pack(CAMERA_COLOR));
}
