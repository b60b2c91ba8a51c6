pub mod camera;
pub mod geometry;
pub mod level;
pub mod sprite;
pub mod texture;

pub use camera::{Camera, view_to_screen};

pub use geometry::{
    Line, Orientation, PARALLEL_EPSILON, WALL_TOP, Wall, has_intersection, intersection_point,
    intersection_point_eps, orientation,
};

pub use level::Level;
pub use sprite::Sprite;
pub use texture::{Image, MIP_LEVELS, MipmapThresholds, Texture};
