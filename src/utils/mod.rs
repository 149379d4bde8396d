//! File system and path helpers used by the resolver, cache, and config.
//!
//! # Modules
//!
//! - [`fs`] - Text file reads mapped onto [`ViewError`](crate::core::ViewError)
//! - [`platform`] - Home directory and environment variable expansion

pub mod fs;
pub mod platform;

pub use fs::{file_exists_and_readable, read_text_file};
pub use platform::resolve_path;
