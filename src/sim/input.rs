use std::f32::consts::PI;

use crate::{
    renderer::{RenderConfig, RenderFlags},
    world::{
        camera::{BOB_AMPLITUDE, Camera},
        geometry::WALL_TOP,
    },
};

/// Field of view is kept strictly inside `(0, π)` so `tan(fov/2)` stays finite.
const FOV_LIMIT: f32 = 0.01;

/// Clearance kept between the bobbing eye and the floor or the wall tops.
const EYE_MARGIN: f32 = 0.05;
const EYE_MIN: f32 = BOB_AMPLITUDE + EYE_MARGIN;
const EYE_MAX: f32 = WALL_TOP - BOB_AMPLITUDE - EYE_MARGIN;

/// One frame of player intent, already decoded from raw key state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1  (back / forward)
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (right / left)
    pub fov: f32,     // –1 … +1  (narrow / widen)
    pub lift: f32,    // –1 … +1  (lower / raise the eye)
    /// `Some` switches mipmapping on or off this frame.
    pub mipmap: Option<bool>,
    pub filtering: Option<bool>,
}

/// Per-second sensitivities, scaled by the frame delta.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Controls {
    pub move_speed: f32,
    pub turn_speed: f32, // rad/s
    pub fov_speed: f32,  // rad/s
    pub lift_speed: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            move_speed: 7.0,
            turn_speed: 2.0,
            fov_speed: 0.5,
            lift_speed: 0.5,
        }
    }
}

/// Map `cmd` onto the camera and the render toggles.
///
/// Movement accumulates into `camera.velocity`; the turn for this frame
/// replaces `camera.angular_velocity`.  Nothing is integrated here, that
/// happens in [`Camera::update`].
pub fn apply_input(cmd: &InputCmd, camera: &mut Camera, config: &mut RenderConfig, controls: &Controls, dt: f32) {
    let direction = camera.front() * cmd.forward + camera.right() * cmd.strafe;
    if direction.length() > 0.1 {
        camera.velocity += direction.normalize() * controls.move_speed * dt;
    }

    camera.angular_velocity = cmd.turn * controls.turn_speed * dt;

    camera.fov = (camera.fov + cmd.fov * controls.fov_speed * dt).clamp(FOV_LIMIT, PI - FOV_LIMIT);
    camera.base_height = (camera.base_height + cmd.lift * controls.lift_speed * dt).clamp(EYE_MIN, EYE_MAX);

    if let Some(on) = cmd.mipmap {
        config.flags.set(RenderFlags::MIPMAP, on);
    }
    if let Some(on) = cmd.filtering {
        config.flags.set(RenderFlags::FILTERING, on);
    }
}

/// Signed axis value from a pair of held keys.
#[inline]
pub fn axis(positive: bool, negative: bool) -> f32 {
    positive as i32 as f32 - negative as i32 as f32
}
