//! Path expansion helpers.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Expands `~` and environment variables (`$VAR`, `${VAR}`) in a path.
///
/// Relative paths stay relative; they are resolved against the process
/// working directory when the theme root is probed.
///
/// # Errors
/// Returns an error naming the path if a referenced variable is undefined.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| {
        format!(
            "Failed to expand environment variables in path: {path}\n\n\
            Common issues:\n\
            - Undefined environment variable (e.g., $UNDEFINED_VAR)\n\
            - Invalid variable syntax (use $VAR or ${{VAR}})"
        )
    })?;
    Ok(PathBuf::from(expanded.as_ref()))
}
