use std::sync::Arc;

use anyhow::{Context, Result};
use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::error::ConfigError;
use crate::graphics::{FrameOutcome, GraphicsContext};
use crate::input::Input;
use crate::orbit_camera::OrbitCamera;
use crate::render_state::{RenderState, Viewport};
use crate::scene::SphereImpostor;
use crate::vector::Vector3;

/// Fixed scene parameters: camera rig, sphere and background.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Largest eye offset along X and Y.
    pub orbit_radius: f32,
    /// Eye Z coordinate.
    pub camera_depth: f32,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub sphere_position: Vector3,
    pub sphere_size: f32,
    pub clear_color: [f32; 4],
    /// Normalized pointer position used until the cursor first moves.
    pub initial_pointer: Vec2,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            orbit_radius: 10.0,
            camera_depth: 5.0,
            fov_y_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
            sphere_position: Vector3::ZERO,
            sphere_size: 1.0,
            clear_color: [0.5, 0.5, 0.5, 1.0],
            initial_pointer: Vec2::new(0.5, 0.5),
        }
    }
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orbit(mut self, radius: f32, depth: f32) -> Self {
        self.orbit_radius = radius;
        self.camera_depth = depth;
        self
    }

    pub fn fov(mut self, fov_degrees: f32) -> Self {
        self.fov_y_degrees = fov_degrees;
        self
    }

    pub fn clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn sphere(mut self, position: Vector3, size: f32) -> Self {
        self.sphere_position = position;
        self.sphere_size = size;
        self
    }

    pub fn clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    pub fn initial_pointer(mut self, pointer: Vec2) -> Self {
        self.initial_pointer = pointer;
        self
    }

    /// Checks the values the projection and the billboard depend on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("orbit radius", self.orbit_radius),
            ("camera depth", self.camera_depth),
            ("sphere position", self.sphere_position.x),
            ("sphere position", self.sphere_position.y),
            ("sphere position", self.sphere_position.z),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite(*name));
        }
        if !(self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0) {
            return Err(ConfigError::FieldOfView(self.fov_y_degrees));
        }
        if !(self.near > 0.0 && self.near < self.far && self.far.is_finite()) {
            return Err(ConfigError::ClipPlanes {
                near: self.near,
                far: self.far,
            });
        }
        if !(self.sphere_size > 0.0 && self.sphere_size.is_finite()) {
            return Err(ConfigError::SphereSize(self.sphere_size));
        }
        Ok(())
    }

    /// The camera rig described by this config.
    pub fn orbit_camera(&self) -> OrbitCamera {
        OrbitCamera::new()
            .radius(self.orbit_radius)
            .depth(self.camera_depth)
            .fov(self.fov_y_degrees)
            .clip(self.near, self.far)
    }

    /// The sphere described by this config.
    pub fn sphere_impostor(&self) -> SphereImpostor {
        SphereImpostor {
            position: self.sphere_position,
            size: self.sphere_size,
        }
    }
}

/// Configuration for the app window.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Prefer an sRGB surface. Off by default so the flat shading colors reach
    /// the screen as written.
    pub prefer_srgb: bool,
    pub scene: SceneConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Sphere Impostor".to_string(),
            width: 800,
            height: 600,
            prefer_srgb: false,
            scene: SceneConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn srgb(mut self, prefer_srgb: bool) -> Self {
        self.prefer_srgb = prefer_srgb;
        self
    }

    pub fn scene(mut self, scene: SceneConfig) -> Self {
        self.scene = scene;
        self
    }
}

/// Open a window and render the impostor until it is closed.
pub fn run() -> Result<()> {
    run_with_config(AppConfig::default())
}

/// Open a window with custom configuration and render until it is closed.
///
/// Returns the error that stopped rendering, if any: an invalid scene, GPU
/// initialization, a shader that fails to compile, or a degenerate camera
/// during a frame.
pub fn run_with_config(config: AppConfig) -> Result<()> {
    config.scene.validate().context("invalid scene configuration")?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = ImpostorApp::Pending { config };
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    match app {
        ImpostorApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

struct Running {
    window: Arc<Window>,
    graphics: GraphicsContext,
    state: RenderState,
    input: Input,
    frames_presented: u64,
}

impl Running {
    fn start(event_loop: &ActiveEventLoop, config: &AppConfig) -> Result<Self> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let graphics = GraphicsContext::new(
            window.clone(),
            config.prefer_srgb,
            config.scene.clear_color,
        )?;

        let size = window.inner_size();
        let state = RenderState::new(
            config.scene.orbit_camera(),
            config.scene.sphere_impostor(),
            config.scene.initial_pointer,
            Viewport::new(size.width, size.height),
        );

        window.request_redraw();
        log::info!("rendering at {}x{}", size.width, size.height);

        Ok(Self {
            window,
            graphics,
            state,
            input: Input::new(size.width, size.height),
            frames_presented: 0,
        })
    }

    /// Runs one frame if one is pending. Errors stop the loop.
    fn redraw(&mut self) -> Result<()> {
        let Some(request) = self.state.take_frame() else {
            return Ok(());
        };

        let matrices = self
            .state
            .frame_matrices()
            .context("failed to derive frame matrices")?;

        match self.graphics.render(&matrices.uniforms()) {
            FrameOutcome::Presented => {
                self.frames_presented += 1;
                log::trace!(
                    "presented frame {} (request {})",
                    self.frames_presented,
                    request.id()
                );
            }
            FrameOutcome::Skipped => log::debug!("skipped frame request {}", request.id()),
            FrameOutcome::Fatal => anyhow::bail!("surface lost beyond recovery"),
        }

        self.input.begin_frame();
        self.state.request_frame();
        self.window.request_redraw();
        Ok(())
    }
}

enum ImpostorApp {
    Pending { config: AppConfig },
    Running(Box<Running>),
    Failed(anyhow::Error),
}

impl ImpostorApp {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:?}");
        *self = ImpostorApp::Failed(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for ImpostorApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let ImpostorApp::Pending { config } = self {
            match Running::start(event_loop, config) {
                Ok(running) => *self = ImpostorApp::Running(Box::new(running)),
                Err(err) => self.fail(event_loop, err),
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let ImpostorApp::Running(running) = self else {
            return;
        };

        running.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("closing after {} frames", running.frames_presented);
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { .. } if running.input.key_pressed(KeyCode::Escape) => {
                event_loop.exit();
            }
            WindowEvent::CursorMoved { .. } => {
                let pointer = running.input.pointer();
                running.state.set_pointer(pointer);
            }
            WindowEvent::Resized(size) => {
                running.graphics.resize(size.width, size.height);
                if running
                    .state
                    .resize(Viewport::new(size.width, size.height))
                    .is_some()
                {
                    running.window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = running.redraw() {
                    self.fail(event_loop, err);
                }
            }
            _ => {}
        }
    }
}
