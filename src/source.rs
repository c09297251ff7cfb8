use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Reads shader source verbatim.
///
/// A missing file is not an error: it is reported on the console and `None` is returned,
/// leaving it to the compiler to reject the empty stage.
pub fn load_source(path: impl AsRef<Path>) -> Result<Option<String>, LoadError> {
    let path = path.as_ref();

    match std::fs::read_to_string(path) {
        Ok(src) => {
            tracing::debug!(path = %path.display(), bytes = src.len(), "read shader source");
            Ok(Some(src))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "File not found.");
            Ok(None)
        }
        Err(source) => Err(LoadError {
            path: path.to_owned(),
            source,
        }),
    }
}

#[derive(Debug, Error)]
#[error("Could not read shader source {path:?}: {source}")]
pub struct LoadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}
