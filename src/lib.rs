//! Shader preview: runs a vertex/fragment shader pair over a fullscreen quad.
//!
//! Shaders can rely on three `float` uniforms: `screenWidth` and `screenHeight` in pixels,
//! and `time` in seconds since start.

pub mod app;
pub mod backend;
pub mod capture;
pub mod clock;
pub mod config;
pub mod source;
pub mod uniforms;
pub mod window;

pub use app::{App, AppError};
pub use backend::Backend;
pub use config::{PreviewConfig, WindowConfig};
