//! Wavefront - real-time wave propagation visualizer
//!
//! An expanding circular wavefront or a sinusoidal height-field, sampled
//! every frame from wall-clock time and streamed to the GPU.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use wavefront::cli::Args;
use wavefront::frame::{FrameDriver, FrameState};
use wavefront::params::RenderConfig;
use wavefront::rendering::RenderSystem;
use wavefront::wave::WaveField;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Frame loop
    field: WaveField,
    driver: Option<FrameDriver>,

    // Configuration
    render_config: RenderConfig,

    /// Set when window or GPU setup fails; reported after the loop exits
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(field: WaveField, render_config: RenderConfig) -> Self {
        Self {
            window: None,
            render_system: None,
            field,
            driver: None,
            render_config,
            startup_error: None,
        }
    }

    /// Open the window and build the GPU pipeline
    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.render_config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("Failed to open window")?,
        );
        log::info!("Window opened");

        let render_system = pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.render_config,
            &self.field,
        ))
        .context("Failed to initialize renderer")?;

        // Clock starts once the program is ready to draw
        self.driver = Some(FrameDriver::new(self.field.clone()));
        self.window = Some(window);
        self.render_system = Some(render_system);

        log::info!("Press ESC to quit");
        Ok(())
    }

    /// Render a single frame, leaving the loop once cleanup has run
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(driver), Some(render_system)) =
            (self.driver.as_mut(), self.render_system.as_mut())
        else {
            return;
        };

        if driver.frame(render_system) == FrameState::Finished {
            event_loop.exit();
        }
    }

    fn request_close(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(driver) = self.driver.as_mut() {
            driver.request_close();
        }
        self.render_frame(event_loop);
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.startup_error.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init(event_loop) {
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.request_close(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => self.request_close(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = self.render_system.as_mut() {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let (Some(driver), Some(render_system)) =
            (self.driver.as_mut(), self.render_system.as_mut())
        {
            driver.shutdown(render_system);
        }
        self.render_system = None;
        self.window = None;
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let field = WaveField::new(args.wave_mode()).context("Invalid wave configuration")?;
    let mut app = App::new(field, args.render_config());

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop
        .run_app(&mut app)
        .context("Event loop terminated abnormally")?;

    match app.startup_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}
