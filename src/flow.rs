//! Application event loop.
//!
//! [`App`] owns the async runtime used for loading and, once the window exists, an
//! [`AppState`] with the GPU context, the scene, the HUD and the audio sources.
//!
//! # Frame sequence
//!
//! Each redraw:
//! 1. Play the trigger source if its key was pressed since the last frame
//! 2. Move the trigger source to the camera
//! 3. Move the camera by the accumulated input
//! 4. Move the listener to the camera
//! 5. Run the scene's passes and present
//!
//! Redraws are requested from `about_to_wait`, no faster than the configured frame cap.

use std::sync::Arc;

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window},
};

use crate::{
    audio::{AudioSystem, source::Source},
    config::AppConfig,
    context::Context,
    hud::Hud,
    scene::Scene,
};

/// Minimum time between two frames for a frame cap, `None` when uncapped.
pub fn frame_interval(fps_cap: u32) -> Option<Duration> {
    if fps_cap == 0 {
        None
    } else {
        Some(Duration::from_secs_f64(1.0 / fps_cap as f64))
    }
}

pub struct AppState {
    pub(crate) ctx: Context,
    scene: Scene,
    hud: Hud,
    audio: AudioSystem,
    ambient: Source,
    trigger: Source,
    trigger_requested: bool,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &AppConfig) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config).await?;
        let audio = if config.audio.enabled {
            AudioSystem::new()
        } else {
            log::info!("Audio disabled by configuration");
            AudioSystem::disabled()
        };
        let root = &config.assets.root;
        let (scene, ambient, trigger) = futures::join!(
            Scene::load(&ctx, config),
            Source::load(&audio, root, &config.audio.ambient),
            Source::load(&audio, root, &config.audio.trigger),
        );
        let scene = scene?;
        if !scene.has_feedback() {
            log::info!("No framebuffer feedback target in this scene");
        }
        let hud = Hud::new(&ctx, config);
        Ok(Self {
            ctx,
            scene,
            hud,
            audio,
            ambient,
            trigger,
            trigger_requested: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.resize(width, height);
            self.scene.resize(&self.ctx);
        }
    }

    fn camera_pose(&self) -> (cgmath::Vector3<f32>, cgmath::Vector3<f32>) {
        let camera = &self.ctx.camera.camera;
        (
            cgmath::Vector3::new(camera.position.x, camera.position.y, camera.position.z),
            camera.forward(),
        )
    }

    fn update(&mut self, dt: Duration) {
        if std::mem::take(&mut self.trigger_requested) {
            self.trigger.play();
        }
        let (position, _) = self.camera_pose();
        self.trigger.set_position(position, &self.audio.listener);

        self.ctx.update_camera(dt);

        let (position, forward) = self.camera_pose();
        self.audio
            .listener
            .update(position, forward, cgmath::Vector3::unit_y());
        self.ambient.update(&self.audio.listener);
        self.trigger.update(&self.audio.listener);

        self.hud.update(dt);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.scene.render(&self.ctx, &mut self.hud)
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match (code, event.state) {
            (KeyCode::Escape, ElementState::Pressed) => event_loop.exit(),
            (KeyCode::Digit0, ElementState::Pressed) if !event.repeat => {
                self.trigger_requested = true;
            }
            (code, state) => {
                self.ctx.camera.controller.process_keyboard(code, state);
            }
        }
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: AppConfig,
    state: Option<AppState>,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: AppConfig) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            last_time: Instant::now(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }
}

fn grab_cursor(window: &Window) {
    window.set_cursor_visible(false);
    if let Err(e) = window
        .set_cursor_grab(CursorGrabMode::Confined)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
    {
        log::warn!("Cursor could not be grabbed: {e}");
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let start = Instant::now();
        let display = &self.config.display;
        let window_attributes = Window::default_attributes()
            .with_title(display.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(display.width, display.height));
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };

        let mut app_state = match self
            .async_runtime
            .block_on(AppState::new(window.clone(), &self.config))
        {
            Ok(app_state) => app_state,
            Err(e) => return self.fail(event_loop, e),
        };

        grab_cursor(&window);
        log::info!("Execution Time: {} us", start.elapsed().as_micros());
        app_state.ambient.play();

        self.last_time = Instant::now();
        self.state = Some(app_state);
        window.request_redraw();
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            state.ctx.camera.controller.process_mouse(dx, dy);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => state.handle_key(event_loop, &event),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state.update(dt);
                match state.render() {
                    Ok(_) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = &self.state else {
            return;
        };
        match frame_interval(self.config.display.fps_cap) {
            None => {
                event_loop.set_control_flow(ControlFlow::Poll);
                state.ctx.window.request_redraw();
            }
            Some(interval) => {
                let next_frame = self.last_time + interval;
                if Instant::now() >= next_frame {
                    state.ctx.window.request_redraw();
                } else {
                    event_loop.set_control_flow(ControlFlow::WaitUntil(next_frame));
                }
            }
        }
    }
}

/// Initialise logging, load the configuration and run the window until it closes.
pub fn run() -> anyhow::Result<()> {
    if let Err(e) =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init()
    {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let config = AppConfig::load()?;
    log::debug!("Configuration: {config:?}");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
