use glam::{Mat3, Vec2, vec2};

/// Amplitude of the walking head-bob, in world units.
pub const BOB_AMPLITUDE: f32 = 0.15;
/// Radians of bob phase per world unit of distance from the origin.
pub const BOB_FREQUENCY: f32 = 2.0;

/// First-person view-point on the 2-D map.
///
/// * `front` is kept normalised; every mutation goes through [`Camera::set_front`]
///   or [`Camera::update`].
/// * `height` is the eye height above the floor plane and is recomputed from
///   `base_height` plus the head-bob on every update.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub position: Vec2,
    pub velocity: Vec2,
    front: Vec2,
    pub fov: f32,       // vertical FoV (radians)
    pub far_plane: f32, // world units; depth 1.0
    pub height: f32,
    pub base_height: f32,
    pub angular_velocity: f32, // radians per update, CCW positive
    /// Velocity below this magnitude snaps to rest.
    pub friction_snap: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            front: Vec2::Y,
            fov: 90_f32.to_radians(),
            far_plane: 100.0,
            height: 1.0,
            base_height: 1.0,
            angular_velocity: 0.0,
            friction_snap: 0.01,
        }
    }
}

impl Camera {
    pub fn new(position: Vec2, front: Vec2, fov: f32) -> Self {
        let mut cam = Self {
            position,
            fov,
            ..Self::default()
        };
        cam.set_front(front);
        cam
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn front(&self) -> Vec2 {
        self.front
    }

    /// Unit vector pointing to the camera's right: `(front.y, -front.x)`.
    #[inline(always)]
    pub fn right(&self) -> Vec2 {
        vec2(self.front.y, -self.front.x)
    }

    pub fn set_front(&mut self, front: Vec2) {
        self.front = front.try_normalize().unwrap_or(Vec2::Y);
    }

    /// Rotate the facing direction by `angle` radians (positive = turn left).
    pub fn rotate(&mut self, angle: f32) {
        self.set_front(Vec2::from_angle(angle).rotate(self.front));
    }

    /*──────────────────────── integration ───────────────────────────*/

    /// Advance one frame: move, turn, bob, then apply friction.
    ///
    /// Friction halves the velocity every update and snaps it to exactly
    /// zero once its magnitude falls below `friction_snap`.
    pub fn update(&mut self) {
        self.position += self.velocity;

        if self.angular_velocity != 0.0 {
            self.rotate(self.angular_velocity);
        }

        self.height = self.base_height + (self.position.length() * BOB_FREQUENCY).sin() * BOB_AMPLITUDE;

        self.velocity *= 0.5;
        if self.velocity.length() < self.friction_snap {
            self.velocity = Vec2::ZERO;
        }
    }

    /*───────────────── viewport transforms ──────────────────────────*/

    /// Camera-local → world affine transform.
    ///
    /// Column 0 is the lateral axis `(front.y, -front.x)`, column 1 is
    /// `front`, column 2 is the translation.
    pub fn transform(&self) -> Mat3 {
        Mat3::from_cols(
            self.right().extend(0.0),
            self.front.extend(0.0),
            self.position.extend(1.0),
        )
    }

    /// World → camera-local transform (inverse of [`Camera::transform`]).
    pub fn view_matrix(&self) -> Mat3 {
        self.transform().inverse()
    }
}

/// Scale, Y-flip and centre-offset used by the top-down debug viewport.
pub fn view_to_screen(width: usize, height: usize, scale: f32) -> Mat3 {
    let mut m = Mat3::from_diagonal(glam::vec3(scale, -scale, 1.0));
    m.z_axis.x = (width / 2) as f32;
    m.z_axis.y = (height / 2) as f32;
    m
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn front_and_right_are_orthonormal() {
        let cam = Camera::new(Vec2::ZERO, vec2(3.0, 4.0), FRAC_PI_2);
        let f = cam.front();
        let r = cam.right();
        assert!((f.length() - 1.0).abs() < 1e-5);
        assert!((r.length() - 1.0).abs() < 1e-5);
        assert!(f.dot(r).abs() < 1e-5);
    }

    #[test]
    fn default_looks_north_with_east_on_the_right() {
        let cam = Camera::default();
        assert_eq!(cam.front(), Vec2::Y);
        assert_eq!(cam.right(), Vec2::X);
    }

    #[test]
    fn friction_halves_then_snaps_to_rest() {
        let mut cam = Camera {
            velocity: vec2(1.0, 0.0),
            ..Camera::default()
        };

        let mut expected = 1.0_f32;
        let mut steps = 0;
        while cam.velocity != Vec2::ZERO {
            assert_eq!(cam.velocity.length(), expected);
            cam.update();
            expected *= 0.5;
            steps += 1;
            assert!(steps < 16, "velocity never came to rest");
        }
        // 1/2^7 is the first value below 0.01
        assert_eq!(steps, 7);
        assert_eq!(cam.velocity, Vec2::ZERO);
    }

    #[test]
    fn position_integrates_before_friction() {
        let mut cam = Camera {
            velocity: vec2(0.0, 1.0),
            ..Camera::default()
        };
        cam.update();
        assert_eq!(cam.position, vec2(0.0, 1.0));
        cam.update();
        assert_eq!(cam.position, vec2(0.0, 1.5));
    }

    #[test]
    fn head_bob_follows_distance_from_origin() {
        let mut cam = Camera {
            position: vec2(0.3, 0.4),
            ..Camera::default()
        };
        cam.update();
        let expected = 1.0 + (0.5_f32 * 2.0).sin() * 0.15;
        assert!((cam.height - expected).abs() < 1e-6);
    }

    #[test]
    fn angular_velocity_turns_front() {
        let mut cam = Camera {
            angular_velocity: FRAC_PI_2,
            ..Camera::default()
        };
        cam.update();
        assert!((cam.front() - vec2(-1.0, 0.0)).length() < 1e-5);
        assert!((cam.front().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn transform_round_trips_through_view_matrix() {
        let cam = Camera::new(vec2(2.0, -1.0), vec2(1.0, 1.0), FRAC_PI_2);
        let world = vec2(5.0, 3.0);
        let local = cam.view_matrix().transform_point2(world);
        let back = cam.transform().transform_point2(local);
        assert!((back - world).length() < 1e-4);
        // straight ahead lands on the local +Y axis
        let ahead = cam.view_matrix().transform_point2(cam.position + cam.front() * 4.0);
        assert!((ahead - vec2(0.0, 4.0)).length() < 1e-4);
    }

    #[test]
    fn view_to_screen_flips_and_centres() {
        let m = view_to_screen(800, 600, 50.0);
        assert_eq!(m.transform_point2(Vec2::ZERO), vec2(400.0, 300.0));
        assert_eq!(m.transform_point2(vec2(1.0, 1.0)), vec2(450.0, 250.0));
    }
}
