use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Context;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use gridcaster::clock::FrameClock;
use gridcaster::effect::{Effect, EffectKind, FizzleTable};
use gridcaster::player::PLAYER_TURNING_SPEED;
use gridcaster::scaler::{ScaleLut, blit_bilinear};
use gridcaster::{
    Color, EngineConfig, Input, Renderer, Rotation, Textures, Tilemap, World, WorldAction,
};

mod artwork;

const LEVELS: [&str; 2] = [
    include_str!("../levels/level1.json"),
    include_str!("../levels/level2.json"),
];

/// Levels wrap around once the last one is finished.
fn level(index: usize) -> anyhow::Result<Tilemap> {
    let source = LEVELS[index % LEVELS.len()];
    serde_json::from_str(source).with_context(|| format!("parsing level {index}"))
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    config: EngineConfig,
    clock: FrameClock,
    world: World,
    textures: Textures,
    show_map: bool,

    // HUD
    frame_counter: u32,
    last_fps_print: Instant,

    // Internal framebuffer, upscaled to the window
    fb_w: usize,
    fb_h: usize,
    packed: Vec<u32>,
    scale_lut: ScaleLut,

    keys_down: HashSet<KeyCode>,
    last_tick: Instant,
}

impl App {
    fn new(config: EngineConfig) -> anyhow::Result<Self> {
        FizzleTable::install(config.fizzle_seed);
        let world = World::with_vision(level(0)?, config.vision)?;
        Ok(Self {
            window: None,
            surface: None,
            clock: FrameClock::new(&config),
            fb_w: config.internal_height * 4 / 3,
            fb_h: config.internal_height,
            config,
            world,
            textures: Textures::new(artwork::load),
            show_map: false,
            frame_counter: 0,
            last_fps_print: Instant::now(),
            packed: Vec::new(),
            scale_lut: ScaleLut::default(),
            keys_down: HashSet::new(),
            last_tick: Instant::now(),
        })
    }

    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let attributes = Window::default_attributes()
            .with_title("gridcaster")
            .with_inner_size(LogicalSize::new(800.0, 600.0));
        let window = Rc::new(event_loop.create_window(attributes)?);

        let context = softbuffer::Context::new(window.clone())
            .map_err(|error| anyhow::anyhow!("softbuffer context: {error}"))?;
        let surface = softbuffer::Surface::new(&context, window.clone())
            .map_err(|error| anyhow::anyhow!("softbuffer surface: {error}"))?;

        let size = window.inner_size();
        self.resize_internal(size.width as usize, size.height as usize);
        window.request_redraw();

        self.surface = Some(surface);
        self.window = Some(window);
        self.last_tick = Instant::now();
        Ok(())
    }

    fn tick(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick).as_secs_f64();
        self.last_tick = now;
        let steps = self.clock.sub_steps(elapsed);

        let mut speed = 0.0;
        if self.keys_down.contains(&KeyCode::KeyW) {
            speed += 1.0;
        }
        if self.keys_down.contains(&KeyCode::KeyS) {
            speed -= 1.0;
        }
        let mut turn = 0.0;
        if self.keys_down.contains(&KeyCode::KeyA) {
            turn -= 1.0;
        }
        if self.keys_down.contains(&KeyCode::KeyD) {
            turn += 1.0;
        }

        let input = Input::new(
            speed,
            Rotation::from_radians(turn * PLAYER_TURNING_SPEED * steps.step),
            self.keys_down.contains(&KeyCode::Space),
        );
        for _ in 0..steps.count {
            if let Some(WorldAction::LoadLevel(index)) = self.world.update(steps.step, &input) {
                self.load_level(index);
            }
        }
    }

    fn load_level(&mut self, index: usize) {
        let loaded = level(index)
            .and_then(|map| self.world.set_level(map).map_err(anyhow::Error::from));
        match loaded {
            Ok(()) => self
                .world
                .push_effect(Effect::new(EffectKind::FadeIn, Color::BLACK, 0.5)),
            Err(error) => tracing::error!(index, "failed to load level: {error:#}"),
        }
    }

    fn present(&mut self, id: WindowId) -> anyhow::Result<()> {
        let Some(window) = self.window.clone().filter(|window| window.id() == id) else {
            return Ok(());
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            return Ok(()); // Minimized window, skip drawing
        };
        let (width, height) = (dw.get() as usize, dh.get() as usize);
        if !self.scale_lut.matches(width, height, self.fb_w) {
            self.resize_internal(width, height);
        }

        let mut renderer = Renderer::new(self.fb_w, self.fb_h, &self.textures);
        if self.show_map {
            renderer.draw_2d(&self.world);
        } else {
            renderer.draw(&self.world);
        }

        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        surface
            .resize(dw, dh)
            .map_err(|error| anyhow::anyhow!("resizing surface: {error}"))?;
        let mut buffer = surface
            .buffer_mut()
            .map_err(|error| anyhow::anyhow!("surface buffer: {error}"))?;
        blit_bilinear(&mut buffer, &renderer.bitmap, &mut self.packed, &self.scale_lut);
        buffer
            .present()
            .map_err(|error| anyhow::anyhow!("presenting frame: {error}"))?;

        self.frame_counter += 1;
        let now = Instant::now();
        let since = now.duration_since(self.last_fps_print).as_secs_f64();
        if since >= 1.0 {
            tracing::debug!(fps = self.frame_counter as f64 / since, "frame rate");
            self.frame_counter = 0;
            self.last_fps_print = now;
        }
        window.request_redraw();
        Ok(())
    }

    /// Keeps the internal height fixed and follows the window's aspect.
    fn resize_internal(&mut self, dst_w: usize, dst_h: usize) {
        let target_h = self.config.internal_height;
        let aspect = if dst_h > 0 {
            dst_w as f64 / dst_h as f64
        } else {
            1.0
        };
        let mut target_w = ((target_h as f64 * aspect).round() as usize).max(160);
        if target_w % 2 != 0 {
            target_w += 1;
        }
        self.fb_w = target_w;
        self.fb_h = target_h;
        self.scale_lut = ScaleLut::new(dst_w, dst_h, self.fb_w, self.fb_h);
    }

    fn key_pressed(&mut self, code: KeyCode, repeat: bool) {
        if !repeat {
            match code {
                KeyCode::KeyM => self.show_map = !self.show_map,
                KeyCode::KeyL => self.world.is_revealed = !self.world.is_revealed,
                _ => {}
            }
        }
        tracing::trace!(?code, "key down");
        self.keys_down.insert(code);
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(error) = self.create_surface(event_loop) {
            tracing::error!("window setup failed: {error:#}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.key_pressed(code, repeat),
                ElementState::Released => {
                    self.keys_down.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                self.tick();
                if let Err(error) = self.present(id) {
                    tracing::error!("{error:#}");
                    event_loop.exit();
                }
            }

            WindowEvent::Resized(new_size) => {
                self.resize_internal(new_size.width as usize, new_size.height as usize);
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("gridcaster=info".parse()?))
        .init();

    let mut app = App::new(EngineConfig::default())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);
    event_loop.run_app(&mut app)?;
    Ok(())
}
