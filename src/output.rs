//! Writing generated sheets and their sidecars to disk

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// Could not create the output directory
    #[error("cannot create output directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Could not write an output file
    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Path of the PNG for a sprite: `{out_dir}/{name}.png`.
pub fn sheet_path(out_dir: &Path, sprite_name: &str) -> PathBuf {
    out_dir.join(format!("{}.png", sprite_name))
}

/// Path of the metadata sidecar for a sprite: `{out_dir}/{name}.json`.
pub fn metadata_path(out_dir: &Path, sprite_name: &str) -> PathBuf {
    out_dir.join(format!("{}.json", sprite_name))
}

/// Create a directory and all of its parents if they don't exist.
pub fn ensure_dir(dir: &Path) -> Result<(), OutputError> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir { path: dir.to_path_buf(), source })
}

/// Write a fully encoded buffer to `path`, creating parent directories.
///
/// The buffer is complete before this is called, so a failure here is
/// always an I/O problem, never an encoding one.
pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            ensure_dir(parent)?;
        }
    }
    fs::write(path, bytes).map_err(|source| OutputError::Write { path: path.to_path_buf(), source })
}
