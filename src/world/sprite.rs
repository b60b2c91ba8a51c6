use glam::Vec2;

use crate::world::texture::Texture;

/// Camera-facing billboard placed in the level.
///
/// * The sprite owns a private copy of its texture.
/// * `height` is the world height of the sprite's bottom edge; its vertical
///   centre sits at `height + size / 2`.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub texture: Texture,
    pub position: Vec2,
    pub size: f32,
    pub height: f32,
}

impl Sprite {
    /// Unit-sized sprite at the origin, resting on the floor.
    pub fn from_texture(texture: &Texture) -> Self {
        Self {
            texture: texture.clone(),
            position: Vec2::ZERO,
            size: 1.0,
            height: 0.0,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }
}
