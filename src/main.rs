//! Spacey - portfolio landing page with a starfield and a procedural soundtrack
//!
//! Stars drift across a fading trail while a toggle starts and stops an
//! ambient chiptune composed fresh for every session.

use std::sync::Arc;

use clap::Parser;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use spacey::audio::{AudioSystem, OfflineBackend};
use spacey::cli::Args;
use spacey::error::AudioError;
use spacey::music::{MusicSession, SeededRandom};
use spacey::params::*;
use spacey::rendering::RenderSystem;
use spacey::starfield::{Canvas, Starfield};
use spacey::toggle::PlayToggle;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Visuals: the starfield keeps its trails on `canvas`; `frame` adds the toggle on top
    starfield: Starfield,
    canvas: Canvas,
    frame: Canvas,
    toggle: PlayToggle,

    // Music (None when no output device is available)
    session: Option<MusicSession<AudioSystem, SeededRandom>>,

    // Configuration
    render_config: RenderConfig,
    recording_config: Option<RecordingConfig>,

    // Input and frame tracking
    cursor: Vec2,
    frame_num: usize,
}

impl App {
    fn new(args: &Args, recording_config: Option<RecordingConfig>) -> Self {
        let render_config = args.render_config();
        let music_rng = args.random_source();
        let seed = music_rng.seed();
        log::info!("Session seed: {}", seed);

        // Stars draw from their own stream so the music does not depend on --stars
        let mut star_rng = SeededRandom::new(seed.wrapping_add(1));
        let starfield = Starfield::new(
            args.starfield_params(),
            render_config.window_width,
            render_config.window_height,
            &mut star_rng,
        );
        let canvas = starfield.create_canvas();
        let frame = canvas.clone();
        let toggle = PlayToggle::new(
            ToggleStyle::default(),
            render_config.window_width,
            render_config.window_height,
        );

        let session = match AudioSystem::new(AudioConfig::default(), recording_config.as_ref()) {
            Ok(audio) => Some(MusicSession::new(audio, music_rng, MusicRanges::default())),
            Err(e) => {
                log::error!("Audio unavailable, continuing without music: {}", e);
                None
            }
        };

        Self {
            window: None,
            render_system: None,
            starfield,
            canvas,
            frame,
            toggle,
            session,
            render_config,
            recording_config,
            cursor: Vec2::ZERO,
            frame_num: 0,
        }
    }

    fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_playing())
    }

    /// Start or stop the music (only ever called from a user gesture)
    fn toggle_music(&mut self) {
        let Some(session) = self.session.as_mut() else {
            log::warn!("No audio output; toggle ignored");
            return;
        };
        if let Err(e) = pollster::block_on(session.toggle()) {
            log::error!("Could not start music: {}", e);
        }
        self.update_title();
    }

    fn update_title(&self) {
        if let Some(window) = &self.window {
            window.set_title(&self.render_config.title(PlayToggle::label(self.is_playing())));
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if let Some(render_system) = self.render_system.as_mut() {
            render_system.resize(size.width, size.height);
        }
        self.starfield.resize(size.width, size.height);
        self.canvas = self.starfield.create_canvas();
        self.toggle.resize(size.width, size.height);
    }

    /// Stop the music, release the synthesis graph and leave the event loop
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if event_loop.exiting() {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.cleanup();
            if let Err(e) = session.backend_mut().finish_recording() {
                log::error!("Failed to finalize audio recording: {}", e);
            }
        }
        if let Some(ref config) = self.recording_config {
            println!("\nRecording complete: {}", config.output_dir);
        }
        event_loop.exit();
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let playing = self.is_playing();
        let Some(render_system) = self.render_system.as_mut() else {
            return;
        };

        self.starfield.step_and_draw(&mut self.canvas);
        self.frame.clone_from(&self.canvas);
        self.toggle.draw(&mut self.frame, playing);

        match render_system.render(&self.frame, self.frame_num) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(window) = &self.window {
                    let size = window.inner_size();
                    render_system.resize(size.width, size.height);
                }
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
        self.frame_num += 1;

        if let Some(total) = self.recording_config.as_ref().map(|c| c.total_frames()) {
            if self.frame_num >= total {
                self.shutdown(event_loop);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title(self.render_config.title(PlayToggle::label(false)))
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Initialize rendering system
        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.recording_config.clone(),
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.window = Some(window);
        self.render_system = Some(render_system);
        self.resize(size);

        // Recording has no user at the controls; start straight away
        if self.recording_config.is_some() {
            self.toggle_music();
        }

        println!("\nSpacey is running!");
        println!("Click the button or press Space/M to play music, ESC to quit\n");
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => self.shutdown(event_loop),
                KeyCode::Space | KeyCode::KeyM => self.toggle_music(),
                _ => {}
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if self.toggle.hit_test(self.cursor) {
                    self.toggle_music();
                }
            }
            WindowEvent::Resized(size) => self.resize(size),
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }
}

/// Render one session straight to a WAV file, without a window or device
fn bounce(args: &Args, seconds: f32) -> Result<(), AudioError> {
    let rng = args.random_source();
    log::info!("Session seed: {}", rng.seed());

    let backend = OfflineBackend::new(AudioConfig::default())?;
    let mut session = MusicSession::new(backend, rng, MusicRanges::default());
    pollster::block_on(session.start())?;

    let frames = session.backend_mut().bounce_to_wav(seconds, &args.output)?;
    println!("Wrote {} frames ({:.1}s) to {}", frames, seconds, args.output);
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Some(seconds) = args.bounce {
        if let Err(e) = bounce(&args, seconds) {
            eprintln!("Bounce failed: {}", e);
            std::process::exit(1);
        }
        return;
    }

    println!("Spacey - starfield landing page with procedural chiptune");
    println!("Initializing systems...\n");

    let recording_config = match args.create_recording_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to create recording directories: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(ref config) = recording_config {
        println!(
            "Recording {} frames to {}/",
            config.total_frames(),
            config.output_dir
        );
    }

    let mut app = App::new(&args, recording_config);
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            eprintln!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = event_loop.run_app(&mut app) {
        eprintln!("Event loop error: {}", e);
    }
}
