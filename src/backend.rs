use gl_wrapper::geometry::GBError;
use gl_wrapper::program::ProgramError;
use gl_wrapper::status::Checked;

/// Window, context and GPU calls the preview loop is driven through.
///
/// [`crate::window::GlBackend`] implements it on winit/glutin. Everything runs on the
/// thread that owns the context.
pub trait Backend {
    type Program;
    type Geometry;
    type Uniform;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Size of the drawable surface in pixels.
    fn framebuffer_size(&self) -> (u32, u32);

    fn should_close(&self) -> bool;

    /// Processes whatever events are pending, never blocks waiting for new ones.
    fn poll_events(&mut self);

    fn create_program(&mut self, vert: &str, frag: &str) -> Checked<Self::Program, ProgramError>;

    fn create_geometry(
        &mut self,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<Self::Geometry, GBError>;

    fn uniform_location(&self, program: &Self::Program, name: &str) -> Self::Uniform;

    fn set_uniform(&mut self, program: &Self::Program, uniform: &Self::Uniform, value: f32);

    fn clear(&mut self);

    fn draw(&mut self, program: &Self::Program, geometry: &Self::Geometry);

    /// RGB8 pixels of the current back buffer, bottom row first.
    fn read_pixels(&mut self, width: u32, height: u32) -> Vec<u8>;

    fn swap_buffers(&mut self) -> Result<(), Self::Error>;

    fn destroy_geometry(&mut self, geometry: Self::Geometry);

    fn destroy_program(&mut self, program: Self::Program);

    /// Shuts the window system down. GPU objects must already be destroyed.
    fn terminate(self);
}
