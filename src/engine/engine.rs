use crate::{
    renderer::{Renderer, Rgba, Scene, TextureSet},
    sim::{Controls, InputCmd, apply_input},
    world::{camera::Camera, level::Level},
};

/// Frame orchestrator: owns the scene state and drives a [`Renderer`].
pub struct Engine<R: Renderer> {
    pub renderer: R,
    pub level: Level,
    pub camera: Camera,
    pub textures: TextureSet,
    pub controls: Controls,
    pub width: usize,
    pub height: usize,
}

impl<R: Renderer> Engine<R> {
    pub fn new(renderer: R, level: Level, textures: TextureSet, width: usize, height: usize) -> Self {
        Self {
            renderer,
            level,
            camera: Camera::default(),
            textures,
            controls: Controls::default(),
            width,
            height,
        }
    }

    /// Apply `cmd`, advance the camera by one frame and render.
    ///
    /// The finished screen is loaned to `submit`.
    pub fn frame<F>(&mut self, cmd: &InputCmd, dt: f32, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        apply_input(cmd, &mut self.camera, self.renderer.config_mut(), &self.controls, dt);
        self.camera.update();
        self.render(submit);
    }

    /// Render the current state without advancing it.
    pub fn render<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.renderer.begin_frame(self.width, self.height);
        let scene = Scene {
            level: &self.level,
            textures: &self.textures,
        };
        self.renderer.draw_scene(scene, &self.camera);
        self.renderer.end_frame(submit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{
        RenderConfig, RenderFlags, Software,
        software::fixtures,
    };

    /// Records the call sequence instead of drawing.
    #[derive(Default)]
    struct Recorder {
        config: RenderConfig,
        calls: Vec<String>,
        screen: Vec<Rgba>,
    }

    impl Renderer for Recorder {
        fn begin_frame(&mut self, width: usize, height: usize) {
            self.calls.push(format!("begin {width}x{height}"));
            self.screen = vec![0; width * height];
        }

        fn draw_scene(&mut self, scene: Scene<'_>, camera: &Camera) {
            self.calls.push(format!("draw {} at {}", scene.level.walls.len(), camera.position));
        }

        fn end_frame<F>(&mut self, submit: F)
        where
            F: FnOnce(&[Rgba], usize, usize),
        {
            self.calls.push("end".into());
            submit(&self.screen, 4, 2);
        }

        fn config(&self) -> &RenderConfig {
            &self.config
        }

        fn config_mut(&mut self) -> &mut RenderConfig {
            &mut self.config
        }
    }

    #[test]
    fn frame_applies_input_before_drawing() {
        let mut engine = Engine::new(Recorder::default(), Level::demo(None), fixtures::textures(), 4, 2);
        let cmd = InputCmd {
            forward: 1.0,
            mipmap: Some(false),
            ..InputCmd::default()
        };

        let mut submitted = None;
        engine.frame(&cmd, 0.5, |px, w, h| submitted = Some((px.len(), w, h)));

        assert_eq!(submitted, Some((8, 4, 2)));
        // velocity 3.5 integrated once, then halved by friction
        assert_eq!(engine.camera.position, glam::vec2(0.0, 3.5));
        assert_eq!(engine.camera.velocity, glam::vec2(0.0, 1.75));
        assert!(!engine.renderer.config.flags.contains(RenderFlags::MIPMAP));
        assert_eq!(
            engine.renderer.calls,
            vec!["begin 4x2".to_string(), "draw 14 at [0, 3.5]".into(), "end".into()]
        );
    }

    #[test]
    fn idle_frames_bring_the_camera_to_rest() {
        let mut engine = Engine::new(Recorder::default(), Level::default(), fixtures::textures(), 4, 2);
        engine.camera.velocity = glam::vec2(1.0, 0.0);
        for _ in 0..10 {
            engine.frame(&InputCmd::default(), 0.016, |_, _, _| {});
        }
        assert_eq!(engine.camera.velocity, glam::Vec2::ZERO);
    }

    #[test]
    fn software_frame_end_to_end() {
        let sw = Software::new(RenderConfig {
            workers: 2,
            ..RenderConfig::default()
        })
        .unwrap();
        let mut engine = Engine::new(sw, fixtures::corridor(), fixtures::textures(), 32, 24);

        let mut frame = Vec::new();
        engine.frame(&InputCmd::default(), 0.016, |px, w, h| {
            assert_eq!((w, h), (32, 24));
            frame.extend_from_slice(px);
        });

        let fmt = engine.renderer.config().pixel_format;
        assert_eq!(frame[12 * 32 + 16], fmt.pack(fixtures::WALL_RGB));
        assert_eq!(frame[0], fmt.pack(fixtures::SKY_RGB));
        assert_eq!(frame[23 * 32 + 5], fmt.pack(fixtures::FLOOR_RGB));
    }
}
