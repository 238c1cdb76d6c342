//! Sonosphere - audio-reactive sphere visualizer
//!
//! Decodes an audio file, plays it, and continuously reshapes and recolors
//! a 3D sphere from the signal: the waveform ripples the surface, overall
//! spectral energy inflates it, and loudness picks the hue.

mod cli;

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use glam::{Mat4, Vec3};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use sonosphere::camera::CameraSystem;
use sonosphere::error::StartError;
use sonosphere::params::{RenderConfig, SphereGeometry};
use sonosphere::rendering::{RenderSystem, Uniforms};
use sonosphere::session::VisualizationSession;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Visualization pipeline
    session: VisualizationSession,
    camera: CameraSystem,

    // Configuration
    render_config: RenderConfig,

    // Audio bytes read from the command line, waiting for the window
    pending_audio: Option<Vec<u8>>,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(
        session: VisualizationSession,
        camera: CameraSystem,
        render_config: RenderConfig,
        pending_audio: Option<Vec<u8>>,
    ) -> Self {
        Self {
            window: None,
            render_system: None,
            session,
            camera,
            render_config,
            pending_audio,
            start_time: Instant::now(),
        }
    }

    /// Hand audio bytes to the session and report failures appropriately:
    /// a missing file is a user-facing notice, a decode failure goes to the
    /// diagnostic log. Either way the session stays idle.
    fn try_start(&mut self, bytes: Option<Vec<u8>>) {
        match self.session.start(bytes) {
            Ok(()) => {}
            Err(StartError::MissingInput) => {
                eprintln!("No audio file provided; drop one onto the window to start");
            }
            Err(e) => log::error!("visualization not started: {}", e),
        }
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.render_config.window_width = size.width;
        self.render_config.window_height = size.height;
        if let Some(render_system) = &mut self.render_system {
            render_system.resize(size.width, size.height);
        }
    }

    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(render_system) = &self.render_system else {
            return;
        };

        let time_s = self.start_time.elapsed().as_secs_f32();
        let (view_proj, _camera_pos) = self
            .camera
            .create_view_proj_matrix(time_s, &self.render_config);

        let visual = self.session.tick();
        if let Some(visual) = visual {
            // Uniform scale rides on top of the per-vertex displacement
            let model = Mat4::from_scale(Vec3::splat(visual.scale));
            let mvp = view_proj * model;

            render_system.update_vertices(&self.session.mesh().vertices);
            render_system.update_uniforms(&Uniforms {
                view_proj: mvp.to_cols_array_2d(),
                color: [visual.color[0], visual.color[1], visual.color[2], 1.0],
            });
        }

        if let Err(e) = render_system.render(visual.is_some()) {
            log::error!("render error: {:?}", e);
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title("Sonosphere - Audio-Reactive Sphere")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes).unwrap());

        // Initialize rendering system
        let render_system =
            pollster::block_on(RenderSystem::new(Arc::clone(&window), self.session.mesh()))
                .unwrap();

        println!("\nSonosphere is running!");
        println!("Press ESC to quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);

        // Start visualizing the file named on the command line, if any
        if let Some(bytes) = self.pending_audio.take() {
            self.try_start(Some(bytes));
        }
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.handle_resize(size);
            }
            WindowEvent::DroppedFile(path) => match std::fs::read(&path) {
                Ok(bytes) => self.try_start(Some(bytes)),
                Err(e) => log::error!("failed to read {}: {}", path.display(), e),
            },
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

fn main() {
    env_logger::init();

    let args = cli::Args::parse();

    println!("Sonosphere - audio-reactive sphere visualizer");

    let session = match VisualizationSession::new(
        args.analysis_config(),
        &SphereGeometry::default(),
        args.deformation_params(),
    ) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Invalid analysis configuration: {}", e);
            std::process::exit(1);
        }
    };

    let camera = CameraSystem::new(args.parse_camera_preset());
    let render_config = RenderConfig::default();

    let pending_audio = args.read_audio_bytes();
    if pending_audio.is_none() {
        println!("Drop an audio file onto the window to start the visualization");
    }

    let mut app = App::new(session, camera, render_config, pending_audio);
    let event_loop = EventLoop::new().unwrap();
    let _ = event_loop.run_app(&mut app);
}
