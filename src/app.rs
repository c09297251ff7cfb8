use thiserror::Error;

use gl_wrapper::geometry::GBError;
use gl_wrapper::program::ProgramError;
use gl_wrapper::status::Checked;
use gl_wrapper::{QUAD, QUAD_INDICES};

use crate::backend::Backend;
use crate::capture::{CaptureError, FrameCapture};
use crate::clock::FrameClock;
use crate::config::PreviewConfig;
use crate::source::{load_source, LoadError};
use crate::uniforms::Uniforms;

/// Everything the preview owns between setup and teardown.
pub struct App<B: Backend> {
    backend: B,
    clock: FrameClock,
    program: B::Program,
    quad: B::Geometry,
    uniforms: Uniforms<B::Uniform>,
    // queried once, resizes are not picked up
    framebuffer: (u32, u32),
    capture: Option<FrameCapture>,
    frames: u64,
}

impl<B: Backend> App<B> {
    pub fn new(mut backend: B, clock: FrameClock, config: &PreviewConfig) -> Result<Self, AppError> {
        let vert = load_source(&config.vertex_path)?.unwrap_or_default();
        let frag = load_source(&config.fragment_path)?.unwrap_or_default();

        let program = accept_program(
            backend.create_program(&vert, &frag),
            config.strict_shaders,
        )?;

        let framebuffer = backend.framebuffer_size();
        let uniforms = Uniforms::resolve(|name| backend.uniform_location(&program, name));

        let quad = backend.create_geometry(&QUAD, &QUAD_INDICES)?;

        let capture = match &config.capture_dir {
            Some(dir) => {
                let capture = FrameCapture::new(dir)?;
                tracing::info!(dir = %capture.directory().display(), "capturing frames");
                Some(capture)
            }
            None => None,
        };

        tracing::info!(
            width = framebuffer.0,
            height = framebuffer.1,
            "preview ready"
        );

        Ok(Self {
            backend,
            clock,
            program,
            quad,
            uniforms,
            framebuffer,
            capture,
            frames: 0,
        })
    }

    /// Renders until the window asks to close, then tears everything down.
    pub fn run(mut self) -> Result<(), AppError> {
        let result = self.run_until_closed();
        self.teardown();
        result
    }

    fn run_until_closed(&mut self) -> Result<(), AppError> {
        while !self.backend.should_close() {
            self.frame()?;
        }

        tracing::info!(frames = self.frames, "window closed");
        Ok(())
    }

    pub fn frame(&mut self) -> Result<(), AppError> {
        let (width, height) = self.framebuffer;

        self.backend
            .set_uniform(&self.program, &self.uniforms.screen_width, width as f32);
        self.backend
            .set_uniform(&self.program, &self.uniforms.screen_height, height as f32);

        self.backend.poll_events();

        // one read per frame, the capture name matches the `time` the frame was drawn with
        let elapsed = self.clock.elapsed();
        self.backend
            .set_uniform(&self.program, &self.uniforms.time, elapsed.as_secs_f32());

        self.backend.clear();
        self.backend.draw(&self.program, &self.quad);

        if let Some(capture) = &self.capture {
            let pixels = self.backend.read_pixels(width, height);
            let path = capture.save(
                self.frames,
                elapsed.as_secs_f32() as f64,
                width,
                height,
                &pixels,
            )?;
            tracing::trace!(path = %path.display(), "captured frame");
        }

        self.backend
            .swap_buffers()
            .map_err(|e| AppError::Backend(Box::new(e)))?;

        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Releases the quad and program while the context is still alive, then the backend.
    pub fn teardown(self) {
        let Self {
            mut backend,
            program,
            quad,
            ..
        } = self;

        backend.destroy_geometry(quad);
        backend.destroy_program(program);
        backend.terminate();
    }
}

fn accept_program<P>(
    checked: Checked<P, ProgramError>,
    strict: bool,
) -> Result<P, ProgramError> {
    if strict {
        return checked.check();
    }

    for diagnostic in checked.diagnostics() {
        tracing::warn!("{diagnostic}");
    }

    Ok(checked.ignore())
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Source(#[from] LoadError),
    #[error(transparent)]
    Shader(#[from] ProgramError),
    #[error(transparent)]
    Geometry(#[from] GBError),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error("Window system failure: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync>),
}
