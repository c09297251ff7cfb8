use std::ffi::CString;
use std::num::NonZeroU32;
use std::panic::{self, AssertUnwindSafe};

use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::run_return::EventLoopExtRunReturn;
use winit::window::{Window, WindowBuilder};

use gl_wrapper::framebuffer::read_pixels_rgb;
use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{Program, ProgramBuilder, ProgramError, UniformLocation};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::status::Checked;

use crate::backend::Backend;
use crate::config::WindowConfig;

/// A winit window with a current OpenGL context.
pub struct GlBackend {
    renderer: GlRenderer,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    event_loop: EventLoop<()>,
    close_requested: bool,
}

impl GlBackend {
    pub fn new(config: &WindowConfig) -> Result<Self, BackendError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(
                config.width,
                config.height,
            )))
            .with_title(&config.title);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new();

        let (window, gl_config) = catch_missing_config(|| {
            display_builder.build(&event_loop, template, |configs| pick_config(configs))
        })?
        .map_err(|e| BackendError::Display(e.to_string()))?;

        let window = window.ok_or(BackendError::NoWindow)?;
        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let (major, minor) = config.gl_version;
        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        tracing::info!(
            title = %config.title,
            gl = %format!("{major}.{minor}"),
            "opened window"
        );

        Ok(Self {
            renderer: GlRenderer::new(),
            gl_context,
            gl_window,
            event_loop,
            close_requested: false,
        })
    }
}

impl Backend for GlBackend {
    type Program = Program;
    type Geometry = Geometry;
    type Uniform = UniformLocation;
    type Error = BackendError;

    fn framebuffer_size(&self) -> (u32, u32) {
        self.gl_window.window.inner_size().into()
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn poll_events(&mut self) {
        let Self {
            event_loop,
            gl_window,
            gl_context,
            close_requested,
            ..
        } = self;

        event_loop.run_return(|event, _window_target, control_flow| {
            control_flow.set_poll();
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => *close_requested = true,
                    WindowEvent::Resized(size) => {
                        if let (Some(w), Some(h)) =
                            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                        {
                            gl_window.surface.resize(gl_context, w, h);
                            tracing::debug!(width = size.width, height = size.height, "resized");
                        }
                    }
                    _ => (),
                },
                Event::MainEventsCleared => control_flow.set_exit(),
                _ => (),
            }
        });
    }

    fn create_program(&mut self, vert: &str, frag: &str) -> Checked<Program, ProgramError> {
        ProgramBuilder::new(vert, frag).build()
    }

    fn create_geometry(&mut self, vertices: &[f32], indices: &[u32]) -> Result<Geometry, GBError> {
        GeometryBuilder::new(vertices, indices)
            .with_attribute(VertexAttribute::Vec2)
            .build()
    }

    fn uniform_location(&self, program: &Program, name: &str) -> UniformLocation {
        let location = program.uniform_location(name);
        if !location.is_active() {
            tracing::debug!(name, "uniform not used by shader");
        }
        location
    }

    fn set_uniform(&mut self, program: &Program, uniform: &UniformLocation, value: f32) {
        self.renderer.set_f32(program, *uniform, value);
    }

    fn clear(&mut self) {
        self.renderer.clear();
    }

    fn draw(&mut self, program: &Program, geometry: &Geometry) {
        self.renderer.draw(geometry, program);
    }

    fn read_pixels(&mut self, width: u32, height: u32) -> Vec<u8> {
        read_pixels_rgb(width, height)
    }

    fn swap_buffers(&mut self) -> Result<(), BackendError> {
        self.gl_window.surface.swap_buffers(&self.gl_context)?;
        Ok(())
    }

    fn destroy_geometry(&mut self, geometry: Geometry) {
        drop(geometry);
    }

    fn destroy_program(&mut self, program: Program) {
        self.renderer.forget_program();
        drop(program);
    }

    fn terminate(self) {
        tracing::debug!("closing window");
        drop(self);
    }
}

/// Unwind payload for a display that offers no configs at all.
struct NoGlConfig;

/// Keeps the config with the most samples.
///
/// glutin wants a config back from the picker, so an empty list unwinds with
/// [`NoGlConfig`], which [`catch_missing_config`] turns into [`BackendError::NoConfig`].
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    match configs.reduce(|best, c| if c.num_samples() > best.num_samples() { c } else { best }) {
        Some(config) => config,
        None => panic::panic_any(NoGlConfig),
    }
}

fn catch_missing_config<T>(f: impl FnOnce() -> T) -> Result<T, BackendError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        if payload.is::<NoGlConfig>() {
            BackendError::NoConfig
        } else {
            panic::resume_unwind(payload)
        }
    })
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, BackendError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(BackendError::EmptySurface)?,
            NonZeroU32::new(height).ok_or(BackendError::EmptySurface)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Could not open display: {0}")]
    Display(String),
    #[error("Display offered no GL configs")]
    NoConfig,
    #[error("Display did not create a window")]
    NoWindow,
    #[error("Window has a zero sized surface")]
    EmptySurface,
    #[error(transparent)]
    Gl(#[from] glutin::error::Error),
}
