//! ---------------------------------------------------------------------------
//! Multi-threaded software ray caster
//!
//! * Fills screen, stencil and depth planes on the CPU; the screen holds
//!   packed pixels in the configured [`PixelFormat`](super::PixelFormat).
//! * Passes run in a fixed order, each one fully finished before the next:
//!   walls → floor/ceiling → sprites → sky.
//! * Every parallel pass writes disjoint columns or row bands, so the pool
//!   join is the only synchronisation.
//! ---------------------------------------------------------------------------

pub mod buffers;
pub mod parallel;
pub mod planes;
pub mod projection;
pub mod sampler;
pub mod sky;
pub mod sprites;
pub mod walls;

use std::time::Instant;

use log::{debug, info};

use crate::{
    renderer::{RenderConfig, RenderError, Renderer, Rgba, Scene},
    world::camera::Camera,
};

use buffers::FrameBuffers;
use parallel::WorkerPool;
use projection::View;
use walls::ColumnHit;

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

pub struct Software {
    config: RenderConfig,
    pool: WorkerPool,
    buffers: FrameBuffers,
    /* per cast column, refreshed by the wall pass */
    hits: Vec<Option<ColumnHit>>,
}

impl Software {
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let pool = WorkerPool::new(config.workers)?;
        info!(
            "software renderer: {:?}, mipmap={} filtering={}",
            config.pixel_format,
            config.use_mipmap(),
            config.use_filtering()
        );
        Ok(Self {
            config,
            pool,
            buffers: FrameBuffers::default(),
            hits: Vec::new(),
        })
    }

    #[inline]
    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    #[inline]
    pub fn buffers_mut(&mut self) -> &mut FrameBuffers {
        &mut self.buffers
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, width: usize, height: usize) {
        if width != self.buffers.width || height != self.buffers.height {
            debug!("frame buffers resized to {width}x{height}");
        }
        self.buffers.resize(width, height);
        self.buffers.clear();
    }

    fn draw_scene(&mut self, scene: Scene<'_>, camera: &Camera) {
        let (w, h) = (self.buffers.width, self.buffers.height);
        if w == 0 || h == 0 {
            return;
        }
        let view = View::new(camera, w, h);

        let t = Instant::now();
        self.draw_walls(&view, scene);
        let walls = t.elapsed();

        let t = Instant::now();
        self.draw_planes(&view, scene);
        let planes = t.elapsed();

        let t = Instant::now();
        self.draw_sprites(&view, scene);
        let sprites = t.elapsed();

        let t = Instant::now();
        self.draw_sky(&view, scene);
        let sky = t.elapsed();

        debug!("passes: walls {walls:?} planes {planes:?} sprites {sprites:?} sky {sky:?}");
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.buffers.screen, self.buffers.width, self.buffers.height);
    }

    fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }
}

/*──────────────────────────── Test scenes ─────────────────────────────*/

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::{buffers::FAR_DEPTH, *};
    use crate::renderer::RenderFlags;
    use crate::world::sprite::Sprite;
    use glam::vec2;

    fn render(sw: &mut Software, scene: Scene<'_>, camera: &Camera, w: usize, h: usize) -> Vec<Rgba> {
        sw.begin_frame(w, h);
        sw.draw_scene(scene, camera);
        let mut out = Vec::new();
        sw.end_frame(|px, fw, fh| {
            assert_eq!((fw, fh), (w, h));
            out.extend_from_slice(px);
        });
        out
    }

    #[test]
    fn depth_stays_normalised_after_all_passes() {
        let mut sw = fixtures::software(48, 32);
        let textures = fixtures::textures();
        let mut level = crate::world::level::Level::demo(Some(&textures.wall));
        level.sprites.push(Sprite::from_texture(&textures.wall).at(vec2(0.5, 0.5)));
        let cam = Camera::default();

        render(&mut sw, Scene { level: &level, textures: &textures }, &cam, 48, 32);
        assert!(sw.buffers().depth.iter().all(|&d| (0.0..=1.0).contains(&d)));
    }

    #[test]
    fn eye_outside_the_room_keeps_depth_normalised() {
        let mut textures = fixtures::textures();
        textures.ceiling = Some(textures.floor.clone());
        let level = fixtures::corridor();

        for eye in [-0.5, 0.0, 2.0, 2.5] {
            let mut sw = fixtures::software(32, 24);
            let mut cam = Camera::default();
            cam.base_height = eye;
            cam.height = eye;
            render(&mut sw, Scene { level: &level, textures: &textures }, &cam, 32, 24);
            let depth = &sw.buffers().depth;
            assert!(depth.iter().all(|&d| (0.0..=1.0).contains(&d)), "eye at {eye}");
        }
    }

    #[test]
    fn open_sky_keeps_far_depth_and_is_fully_painted() {
        let mut sw = fixtures::software(32, 24);
        let textures = fixtures::textures();
        let level = fixtures::empty();
        let cam = Camera::default();

        let frame = render(&mut sw, Scene { level: &level, textures: &textures }, &cam, 32, 24);
        let sky = sw.config().pixel_format.pack(fixtures::SKY_RGB);
        let floor = sw.config().pixel_format.pack(fixtures::FLOOR_RGB);

        let fb = sw.buffers();
        // upper half: nothing but sky at far depth
        for i in 0..fb.index(0, 12) {
            assert_eq!(frame[i], sky);
            assert_eq!(fb.depth[i], FAR_DEPTH);
        }
        assert_eq!(frame[fb.index(10, 23)], floor);
    }

    #[test]
    fn buffers_follow_resolution_changes() {
        let mut sw = fixtures::software(16, 8);
        let textures = fixtures::textures();
        let level = fixtures::corridor();
        let cam = Camera::default();

        let a = render(&mut sw, Scene { level: &level, textures: &textures }, &cam, 16, 8);
        let b = render(&mut sw, Scene { level: &level, textures: &textures }, &cam, 40, 24);
        assert_eq!(a.len(), 16 * 8);
        assert_eq!(b.len(), 40 * 24);
        assert_eq!(sw.column_hits().len(), 40);
    }

    #[test]
    fn toggles_do_not_change_flat_textures() {
        let textures = fixtures::textures();
        let level = fixtures::corridor();
        let cam = Camera::default();

        let mut sw = fixtures::software(32, 24);
        let filtered = render(&mut sw, Scene { level: &level, textures: &textures }, &cam, 32, 24);
        sw.config_mut().flags = RenderFlags::empty();
        let nearest = render(&mut sw, Scene { level: &level, textures: &textures }, &cam, 32, 24);
        assert_eq!(filtered, nearest);
    }

    #[test]
    fn rendering_is_deterministic_across_pool_sizes() {
        let textures = fixtures::textures();
        let level = crate::world::level::Level::demo(None);
        let cam = Camera::new(vec2(0.5, 0.5), vec2(1.0, 0.3), 75_f32.to_radians());

        let mut frames = Vec::new();
        for workers in [1, 2, 5] {
            let config = RenderConfig {
                workers,
                ..RenderConfig::default()
            };
            let mut sw = Software::new(config).unwrap();
            frames.push(render(&mut sw, Scene { level: &level, textures: &textures }, &cam, 40, 30));
        }
        assert_eq!(frames[0], frames[1]);
        assert_eq!(frames[1], frames[2]);
    }

    #[test]
    fn zero_sized_frame_is_a_no_op() {
        let mut sw = fixtures::software(0, 0);
        let textures = fixtures::textures();
        let level = fixtures::corridor();
        let frame = render(&mut sw, Scene { level: &level, textures: &textures }, &Camera::default(), 0, 0);
        assert!(frame.is_empty());
    }
}
