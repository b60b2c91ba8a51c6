//! Per-frame player input: decoded commands and their effect on the camera
//! and render toggles.

mod input;

pub use input::{Controls, InputCmd, apply_input, axis};
