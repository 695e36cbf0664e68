//! Input loading
//!
//! Opens the document to scan and reports its size, which the progress
//! display needs. The returned handle is owned by the caller, so it is
//! closed on every exit path, including a failed scan.

use crate::error::{Error, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// An opened input document
#[derive(Debug)]
pub struct Input {
    /// Where the document came from
    pub path: PathBuf,
    /// Open file handle, positioned at the start
    pub file: File,
    /// Size in bytes at the time it was opened
    pub size: u64,
}

/// Open `path` for scanning
pub fn open_input(path: impl AsRef<Path>) -> Result<Input> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        Error::Resource(format!("Failed to open file '{}': {}", path.display(), e))
    })?;
    let size = file
        .metadata()
        .map_err(|e| {
            Error::Resource(format!("Failed to read metadata of '{}': {}", path.display(), e))
        })?
        .len();

    log::debug!("opened {} ({} bytes)", path.display(), size);
    Ok(Input {
        path: path.to_path_buf(),
        file,
        size,
    })
}
