use std::path::PathBuf;

use clap::Parser;

use shader_preview::{PreviewConfig, WindowConfig};

#[derive(Debug, Parser)]
pub struct Args {
    /// Vertex shader source
    #[arg(long, default_value_os_t = PathBuf::from("vertex.vert"))]
    pub vertex: PathBuf,
    /// Fragment shader source
    #[arg(long, default_value_os_t = PathBuf::from("fragment.frag"))]
    pub fragment: PathBuf,
    /// Width of the window
    #[arg(long, default_value_t = 1200)]
    pub width: u32,
    /// Height of the window
    #[arg(long, default_value_t = 600)]
    pub height: u32,
    #[arg(long, default_value = "Shader")]
    pub title: String,
    /// OpenGL context version to request, as MAJOR.MINOR
    #[arg(long, default_value = "3.3", value_parser = parse_gl_version)]
    pub gl_version: (u8, u8),
    /// Save every frame as a PNG into this directory
    #[arg(short, long)]
    pub capture: Option<PathBuf>,
    /// Exit on shader compile or link errors instead of logging them
    #[arg(long)]
    pub strict_shaders: bool,
    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_gl_version(s: &str) -> Result<(u8, u8), String> {
    let (major, minor) = s
        .split_once('.')
        .ok_or_else(|| format!("expected MAJOR.MINOR, got {s:?}"))?;

    let major = major.parse().map_err(|e| format!("bad major version: {e}"))?;
    let minor = minor.parse().map_err(|e| format!("bad minor version: {e}"))?;

    Ok((major, minor))
}

impl From<Args> for PreviewConfig {
    fn from(args: Args) -> Self {
        Self {
            vertex_path: args.vertex,
            fragment_path: args.fragment,
            window: WindowConfig {
                width: args.width,
                height: args.height,
                title: args.title,
                gl_version: args.gl_version,
            },
            capture_dir: args.capture,
            strict_shaders: args.strict_shaders,
        }
    }
}
