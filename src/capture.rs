use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Writes every presented frame to `<directory>/frame_<index>_<seconds>.png`.
pub struct FrameCapture {
    directory: PathBuf,
}

impl FrameCapture {
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self, CaptureError> {
        let directory = directory.into();

        std::fs::create_dir_all(&directory).map_err(|source| CaptureError::Io {
            path: directory.clone(),
            source,
        })?;

        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The frame index keeps names unique when two frames land in the same microsecond.
    pub fn path_for(&self, frame: u64, seconds: f64) -> PathBuf {
        self.directory
            .join(format!("frame_{frame:06}_{seconds:.6}.png"))
    }

    /// `rgb` comes straight from a GL read-back, bottom row first.
    pub fn save(
        &self,
        frame: u64,
        seconds: f64,
        width: u32,
        height: u32,
        rgb: &[u8],
    ) -> Result<PathBuf, CaptureError> {
        let path = self.path_for(frame, seconds);
        let file = File::create(&path).map_err(|source| CaptureError::Io {
            path: path.clone(),
            source,
        })?;

        write_png(BufWriter::new(file), width, height, &flip_rows(rgb, width, height)?)?;

        Ok(path)
    }
}

/// Reverses row order of a tightly packed RGB8 image.
pub fn flip_rows(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CaptureError> {
    let stride = width as usize * 3;
    let expected = stride * height as usize;

    if rgb.len() != expected {
        return Err(CaptureError::InvalidSrcLength {
            expected,
            actual: rgb.len(),
        });
    }

    if stride == 0 {
        return Ok(Vec::new());
    }

    Ok(rgb.chunks_exact(stride).rev().flatten().copied().collect())
}

pub fn write_png<W: Write>(
    writer: W,
    width: u32,
    height: u32,
    rgb: &[u8],
) -> Result<(), CaptureError> {
    let mut encoder = png::Encoder::new(writer, width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgb)?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Expected {expected} bytes of pixel data, got {actual}")]
    InvalidSrcLength { expected: usize, actual: usize },
    #[error("Could not write frame to {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("PNG encoding failed: {0}")]
    Encoding(#[from] png::EncodingError),
}
