use glam::Vec2;

use crate::world::camera::Camera;

/// Per-frame projection constants shared by every raster pass.
///
/// The projection plane sits one unit in front of the eye; its height is
/// `2·tan(fov/2)` and its width follows the screen aspect, so pixels are
/// square.
#[derive(Clone, Copy, Debug)]
pub struct View {
    pub width: usize,
    pub height: usize,
    pub half_w: f32,
    pub half_h: f32,
    pub aspect: f32,

    pub tan_half_fov: f32,
    pub plane_height: f32,
    pub plane_width: f32,
    /// plane units per screen column
    pub ray_step: f32,
    /// plane units per screen row
    pub row_step: f32,

    pub position: Vec2,
    pub front: Vec2,
    pub right: Vec2,
    pub eye: f32,
    pub far: f32,
}

impl View {
    pub fn new(camera: &Camera, width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        let aspect = w / h;
        let tan_half_fov = (camera.fov * 0.5).tan();
        let plane_height = tan_half_fov * 2.0;
        let plane_width = plane_height * aspect;

        Self {
            width,
            height,
            half_w: w * 0.5,
            half_h: h * 0.5,
            aspect,
            tan_half_fov,
            plane_height,
            plane_width,
            ray_step: plane_width / w,
            row_step: plane_height / h,
            position: camera.position,
            front: camera.front(),
            right: camera.right(),
            eye: camera.height,
            far: camera.far_plane,
        }
    }

    /// Unit direction of the ray cast for `column`.
    ///
    /// Cast columns run right-to-left on screen: column `c` lands on screen
    /// column `width - c - 1`.
    #[inline]
    pub fn column_ray(&self, column: usize) -> Vec2 {
        let offset = self.ray_step * (column as i32 - (self.width / 2) as i32) as f32;
        (self.front - self.right * offset).normalize()
    }

    /// Screen pixels per world unit at forward distance `z`.
    #[inline(always)]
    pub fn px_per_unit(&self, z: f32) -> f32 {
        self.height as f32 / (self.plane_height * z)
    }

    /// Normalised depth-buffer value for a forward distance.
    #[inline(always)]
    pub fn depth(&self, distance: f32) -> f32 {
        distance / self.far
    }
}
