//! Error handling for viewcraft
//!
//! This module provides the error types and user-friendly error reporting for
//! the view composition engine. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for operators
//!
//! # Error Categories
//!
//! - **Resolution**: [`ViewError::ViewNotFound`], [`ViewError::UnknownAlias`]
//! - **Parsing**: [`ViewError::ParseFailure`] wraps a [`TemplateError`] from the tag parser
//! - **File System**: [`ViewError::IoFailure`]
//! - **Configuration**: [`ViewError::ConfigError`], [`ViewError::ConfigParse`]
//! - **Data**: [`ViewError::Serialization`]
//!
//! Every failure aborts the current render. Nothing is retried and nothing is
//! swallowed: rendering is all-or-nothing.
//!
//! # Examples
//!
//! ```rust,no_run
//! use viewcraft::core::{ViewError, user_friendly_error};
//!
//! let error = ViewError::UnknownAlias {
//!     alias: "sidebar".to_string(),
//! };
//! user_friendly_error(error).display();
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::templating::TemplateError;

/// Result type used throughout the crate.
pub type Result<T, E = ViewError> = std::result::Result<T, E>;

/// Errors raised while resolving, loading, or rendering views.
#[derive(Error, Debug)]
pub enum ViewError {
    /// A view, partial, or layout name did not resolve to a file on disk.
    ///
    /// Raised at construction for the primary view and for partials, and at
    /// render time for the layout. There is no fallback view.
    #[error("View [{view}] doesn't exist.")]
    ViewNotFound {
        /// The logical view name as requested
        view: String,
        /// The physical path that was probed
        path: PathBuf,
    },

    /// A `"name: <alias>"` reference used an alias that is not registered.
    #[error("View alias '{alias}' is not registered")]
    UnknownAlias {
        /// The alias after the `name: ` prefix
        alias: String,
    },

    /// The tag parser rejected a template.
    #[error("Failed to parse template '{template}': {source}")]
    ParseFailure {
        /// View name or file path of the template being parsed
        template: String,
        /// The underlying parser error
        #[source]
        source: TemplateError,
    },

    /// Reading a template file failed.
    #[error("Failed to read template file: {}", path.display())]
    IoFailure {
        /// The file that could not be read
        path: PathBuf,
        /// The underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration values.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Bound data could not be converted to template data.
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// An error wrapped with details and a suggestion for the operator.
///
/// # Examples
///
/// ```rust,no_run
/// use viewcraft::core::{ErrorContext, ViewError};
///
/// let context = ErrorContext::new(ViewError::UnknownAlias { alias: "nav".into() })
///     .with_suggestion("Add `nav = \"partials.nav\"` under [names]");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: ViewError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: ViewError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    ///
    /// - Error message: Red and bold
    /// - Details: Yellow
    /// - Suggestion: Green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Attach operator-facing details and suggestions to a [`ViewError`].
pub fn user_friendly_error(error: ViewError) -> ErrorContext {
    let (details, suggestion) = match &error {
        ViewError::ViewNotFound {
            view,
            path,
        } => (
            Some(format!("'{}' was expected at {}", view, path.display())),
            Some("Check the theme location and name; dots in view names map to directories".into()),
        ),
        ViewError::UnknownAlias {
            alias,
        } => (
            None,
            Some(format!(
                "Register the alias under [names] in the template config, e.g. {alias} = \"partials.{alias}\""
            )),
        ),
        ViewError::ParseFailure {
            source,
            ..
        } => (Some(source.format_with_context()), None),
        ViewError::IoFailure {
            source,
            ..
        } => (
            Some(source.to_string()),
            Some("Check that the file is readable by the current process".into()),
        ),
        ViewError::ConfigParse(_)
        | ViewError::ConfigError {
            ..
        } => (None, Some("Check the location, theme and layout keys in the config file".into())),
        ViewError::Serialization(source) => (Some(source.to_string()), None),
    };

    ErrorContext {
        error,
        suggestion,
        details,
    }
}
