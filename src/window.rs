//! The windowed viewer.
//!
//! Wires `winit` events into a [`Simulation`] through the [`Driver`]
//! interface and presents each frame with [`GpuState`]. The lattice is laid
//! out in physical pixels so it stays crisp on high-DPI displays.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::SimulationConfig;
use crate::error::ViewerError;
use crate::gpu::{GpuState, MeshBuilder};
use crate::input::{Command, Input};
use crate::simulation::{Driver, Simulation};
use crate::time::Time;

/// Frames between FPS log lines.
const FPS_LOG_INTERVAL: u64 = 600;

/// Window and engine settings for [`run`].
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    pub title: String,
    /// Initial inner size in logical pixels.
    pub width: u32,
    pub height: u32,
    /// Seed for the per-point jitter.
    pub seed: u64,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            title: "Spacetime Fabric".to_owned(),
            width: 1280,
            height: 720,
            seed: 0,
        }
    }
}

/// Open a window and run the simulation until it is closed.
pub fn run(config: SimulationConfig, options: ViewerOptions) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, options);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    options: ViewerOptions,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    simulation: Simulation,
    mesh: MeshBuilder,
    input: Input,
    time: Time,
    /// Startup failure to report once the event loop returns.
    error: Option<ViewerError>,
}

impl App {
    fn new(config: SimulationConfig, options: ViewerOptions) -> Self {
        let simulation = Simulation::new(config, options.seed);
        Self {
            options,
            window: None,
            gpu_state: None,
            simulation,
            mesh: MeshBuilder::default(),
            input: Input::new(),
            time: Time::new(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let window_attrs = Window::default_attributes()
            .with_title(self.options.title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(self.options.width, self.options.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        self.window = Some(window.clone());

        let size = window.inner_size();
        let gpu_state = pollster::block_on(GpuState::new(window))?;
        self.mesh = MeshBuilder::new(gpu_state.is_srgb());
        self.gpu_state = Some(gpu_state);

        self.simulation.on_resize(size.width as f32, size.height as f32);
        log::info!("Viewer started at {}x{}", size.width, size.height);

        Ok(())
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop) {
        for command in self.input.drain_commands() {
            match command {
                Command::TogglePause => {
                    self.time.toggle_pause();
                    log::info!("{}", if self.time.is_paused() { "Paused" } else { "Resumed" });
                }
                Command::Reset => {
                    self.simulation.reset();
                    log::info!("Lattice reset");
                }
                Command::Quit => event_loop.exit(),
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.apply_commands(event_loop);

        if let Some(pointer) = self.input.take_pointer_move() {
            self.simulation.on_pointer_move(pointer.x, pointer.y);
        }

        let dt = self.time.tick();
        if !self.time.is_paused() {
            self.simulation.on_frame(dt);
        }
        if self.time.frame() % FPS_LOG_INTERVAL == 0 {
            log::debug!("{:.1} fps, {} steps", self.time.fps(), self.simulation.steps());
        }

        let Some(gpu_state) = &mut self.gpu_state else {
            return;
        };

        self.simulation.render(&mut self.mesh);
        match gpu_state.render(&self.mesh) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = winit::dpi::PhysicalSize {
                    width: gpu_state.config.width,
                    height: gpu_state.config.height,
                };
                gpu_state.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::error!("Render error: {:?}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        self.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                // Minimising reports 0x0, which the engine ignores.
                self.simulation
                    .on_resize(physical_size.width as f32, physical_size.height as f32);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
