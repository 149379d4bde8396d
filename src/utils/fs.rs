//! Text file access for template files.

use std::fs;
use std::path::Path;

use crate::core::{Result, ViewError};

/// Reads a template file as UTF-8 text.
///
/// # Errors
/// Returns [`ViewError::IoFailure`] carrying the path if the file cannot be read.
pub fn read_text_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ViewError::IoFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a file exists and is readable.
///
/// Directories never count: a view name that maps onto a directory is absent.
pub fn file_exists_and_readable(path: &Path) -> bool {
    path.is_file() && fs::metadata(path).is_ok()
}
