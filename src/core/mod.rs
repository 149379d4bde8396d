//! Core types shared by every module: the error taxonomy and result alias.

pub mod error;

pub use error::{ErrorContext, Result, ViewError, user_friendly_error};
