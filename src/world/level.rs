use glam::{Vec2, vec2, vec3};
use log::info;

use crate::world::{
    geometry::Wall,
    sprite::Sprite,
    texture::Texture,
};

/// Static level data: walls never change after load, sprites may be
/// replaced wholesale between frames.
#[derive(Clone, Debug, Default)]
pub struct Level {
    pub name: String,
    pub walls: Vec<Wall>,
    pub sprites: Vec<Sprite>,
}

/// Outline of the built-in test room, as (start, end, RGB) triples.
const DEMO_WALLS: &[([f32; 2], [f32; 2], [f32; 3])] = &[
    ([4.0, 1.0], [2.0, 1.0], [0.8, 0.1, 0.0]),
    ([2.0, 1.0], [2.0, 3.0], [0.1, 0.8, 0.0]),
    ([2.0, 3.0], [-3.0, 3.0], [0.1, 0.0, 0.8]),
    ([-3.0, 3.0], [-3.0, -1.0], [0.8, 0.0, 0.1]),
    ([-3.0, -1.0], [0.0, -1.0], [0.8, 0.1, 0.0]),
    ([0.0, -1.0], [0.0, -2.0], [0.8, 0.1, 0.0]),
    ([0.0, -2.0], [-3.0, -2.0], [0.8, 0.1, 0.0]),
    ([-3.0, -2.0], [-3.0, -4.0], [0.8, 0.1, 0.0]),
    ([-3.0, -4.0], [1.0, -4.0], [0.8, 0.1, 0.0]),
    ([2.0, -4.0], [3.0, -4.0], [0.8, 0.1, 0.0]),
    ([3.0, -4.0], [3.0, -2.0], [0.8, 0.1, 0.0]),
    ([3.0, -2.0], [2.0, -2.0], [0.8, 0.1, 0.0]),
    ([2.0, -2.0], [2.0, 0.0], [0.8, 0.1, 0.0]),
    ([2.0, 0.0], [4.0, 0.0], [0.8, 0.1, 0.0]),
];

/// Where the demo drops its billboards when a sprite texture is available.
const DEMO_SPRITES: &[[f32; 2]] = &[[-1.5, 1.5], [1.0, -3.0]];

impl Level {
    /// The built-in test room.  `sprite` populates a few billboards.
    pub fn demo(sprite: Option<&Texture>) -> Self {
        let walls = DEMO_WALLS
            .iter()
            .map(|&(a, b, c)| Wall::new(Vec2::from(a), Vec2::from(b), 1.0, vec3(c[0], c[1], c[2])))
            .collect();

        let sprites = sprite
            .map(|tex| {
                DEMO_SPRITES
                    .iter()
                    .map(|&[x, y]| Sprite::from_texture(tex).at(vec2(x, y)))
                    .collect()
            })
            .unwrap_or_default();

        let level = Self {
            name: "demo".into(),
            walls,
            sprites,
        };
        info!(
            "level `{}`: {} walls, {} sprites",
            level.name,
            level.walls.len(),
            level.sprites.len()
        );
        level
    }
}
