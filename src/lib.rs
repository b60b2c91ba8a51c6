//! Line-segment ray caster: a 2-D wall map rendered as a first-person view
//! with textured walls, floor/ceiling, billboard sprites and a sky panorama.

pub mod engine;
pub mod media;
pub mod renderer;
pub mod sim;
pub mod world;
