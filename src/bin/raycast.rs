//! Windowed ray-caster viewer.
//!
//! Controls  W/S forward · A/D strafe · ←/→ turn · keypad +/- FoV
//!           Q/E eye height · M/N mipmaps on/off · B/P filtering on/off
//!           Esc quit
//!
//! Build:  cargo run --release -- --sprite assets/textures/barrel.bmp --overview

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use log::info;
use minifb::{Key, Window, WindowOptions};

use raycaster::{
    engine::Engine,
    media::load_texture,
    renderer::{
        RenderConfig, Renderer, Rgba, Software, TextureSet,
        overview::{Canvas, draw_overview},
    },
    sim::{InputCmd, axis},
    world::{Level, MipmapThresholds},
};

#[derive(Parser, Debug)]
#[command(about = "Line-segment ray caster")]
struct Opts {
    #[arg(long, default_value_t = 800)]
    width: usize,
    #[arg(long, default_value_t = 600)]
    height: usize,

    #[arg(long, default_value = "assets/textures/brick.bmp")]
    wall: PathBuf,
    #[arg(long, default_value = "assets/textures/mud.bmp")]
    floor: PathBuf,
    /// Leave unset to show the sky above the walls.
    #[arg(long)]
    ceiling: Option<PathBuf>,
    #[arg(long, default_value = "assets/textures/sky.bmp")]
    sky: PathBuf,
    /// Billboard texture placed around the demo room.
    #[arg(long)]
    sprite: Option<PathBuf>,

    /// Raster worker threads (default: one per core).
    #[arg(long)]
    workers: Option<usize>,
    /// Open a second window with the top-down map.
    #[arg(long)]
    overview: bool,
    /// Switch mip levels at shorter distances.
    #[arg(long)]
    compact_mipmaps: bool,
}

/// Owns a window and the buffer dimensions it expects.
struct Presenter {
    window: Window,
    width: usize,
    height: usize,
}

impl Presenter {
    fn open(title: &str, width: usize, height: usize) -> anyhow::Result<Self> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .with_context(|| format!("cannot open window `{title}`"))?;
        Ok(Self { window, width, height })
    }

    fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    fn present(&mut self, pixels: &[Rgba], width: usize, height: usize) -> anyhow::Result<()> {
        self.window.update_with_buffer(pixels, width, height)?;
        Ok(())
    }

    fn held(&self, key: Key) -> bool {
        self.window.is_key_down(key)
    }

    /// Decode the held keys into one frame of input.
    fn input(&self) -> InputCmd {
        let held = |k| self.held(k);
        let toggle = |on: Key, off: Key| {
            if held(on) {
                Some(true)
            } else if held(off) {
                Some(false)
            } else {
                None
            }
        };

        InputCmd {
            forward: axis(held(Key::W), held(Key::S)),
            strafe: axis(held(Key::D), held(Key::A)),
            turn: axis(held(Key::Left), held(Key::Right)),
            fov: axis(held(Key::NumPadPlus), held(Key::NumPadMinus)),
            lift: axis(held(Key::Q), held(Key::E)),
            mipmap: toggle(Key::M, Key::N),
            filtering: toggle(Key::B, Key::P),
        }
    }
}

fn load_textures(opts: &Opts) -> anyhow::Result<TextureSet> {
    Ok(TextureSet {
        wall: load_texture(&opts.wall)?,
        floor: load_texture(&opts.floor)?,
        ceiling: opts.ceiling.as_ref().map(load_texture).transpose()?,
        sky: load_texture(&opts.sky)?,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let textures = load_textures(&opts)?;
    let sprite = opts.sprite.as_ref().map(load_texture).transpose()?;
    let level = Level::demo(sprite.as_ref());

    let mut config = RenderConfig::default();
    if let Some(workers) = opts.workers {
        config.workers = workers;
    }
    if opts.compact_mipmaps {
        config.mipmap = MipmapThresholds::COMPACT;
    }
    let renderer = Software::new(config)?;
    let mut engine = Engine::new(renderer, level, textures, opts.width, opts.height);

    let mut main_win = Presenter::open("Ray caster", opts.width, opts.height)?;
    let mut overview = opts
        .overview
        .then(|| Presenter::open("Overview", 800, 600))
        .transpose()?;
    let mut overview_px: Vec<Rgba> = vec![0; 800 * 600];

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_frame = Instant::now();

    while main_win.is_open() {
        let t0 = Instant::now();
        let dt = t0.duration_since(last_frame).as_secs_f32();
        last_frame = t0;

        let cmd = main_win.input();
        let mut presented = Ok(());
        engine.frame(&cmd, dt, |px, w, h| presented = main_win.present(px, w, h));
        presented?;

        if let Some(win) = overview.as_mut() {
            let mut canvas = Canvas {
                pixels: &mut overview_px,
                width: win.width,
                height: win.height,
            };
            draw_overview(
                &mut canvas,
                engine.renderer.config().pixel_format,
                &engine.camera,
                &engine.level,
            );
            win.present(&overview_px, win.width, win.height)?;
        }

        acc_time += t0.elapsed();
        acc_frames += 1;
        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!("avg frame: {:.2} ms  ({:.1} FPS)", avg_ms, 1000.0 / avg_ms);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }

    info!("{}x{} viewer closed", main_win.width, main_win.height);
    Ok(())
}
