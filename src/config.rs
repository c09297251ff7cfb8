use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewConfig {
    pub vertex_path: PathBuf,
    pub fragment_path: PathBuf,
    pub window: WindowConfig,
    /// Directory for per-frame PNG captures, capture is off when `None`.
    pub capture_dir: Option<PathBuf>,
    /// Abort on shader compile/link errors instead of logging them.
    pub strict_shaders: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            vertex_path: PathBuf::from("vertex.vert"),
            fragment_path: PathBuf::from("fragment.frag"),
            window: WindowConfig::default(),
            capture_dir: None,
            strict_shaders: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub gl_version: (u8, u8),
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            title: String::from("Shader"),
            gl_version: (3, 3),
        }
    }
}
