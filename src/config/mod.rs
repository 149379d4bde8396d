//! Template configuration.
//!
//! The configuration names where themes live on disk, which theme and layout
//! are used by default, and an optional alias table for `"name: <alias>"`
//! view references.
//!
//! # File Format
//!
//! ```toml
//! location = "~/site/public/themes"
//! theme = "main"
//! layout = "layout"
//!
//! [names]
//! footer = "partials.footer"
//! sidebar = "partials.nav.sidebar"
//! ```
//!
//! Every key is optional; missing keys fall back to [`TemplateConfig::default`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::ViewError;
use crate::utils::resolve_path;

/// Default theme root, relative to the working directory.
pub const DEFAULT_LOCATION: &str = "public/themes";
/// Default theme name.
pub const DEFAULT_THEME: &str = "main";
/// Default layout name, resolved as `layouts.<layout>`.
pub const DEFAULT_LAYOUT: &str = "layout";

/// Settings for locating themes, views and layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Theme root; may contain `~` and environment variables.
    pub location: String,
    /// Theme directory under [`location`](Self::location).
    pub theme: String,
    /// Layout name used when a view does not pick its own.
    pub layout: String,
    /// Alias table for `"name: <alias>"` references, alias -> dotted view name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub names: BTreeMap<String, String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            theme: DEFAULT_THEME.to_string(),
            layout: DEFAULT_LAYOUT.to_string(),
            names: BTreeMap::new(),
        }
    }
}

impl TemplateConfig {
    /// Config rooted at `location` with default theme and layout.
    pub fn with_location(location: impl AsRef<Path>) -> Self {
        Self {
            location: location.as_ref().to_string_lossy().into_owned(),
            ..Self::default()
        }
    }

    /// Parses configuration from TOML text and validates it.
    pub fn from_toml_str(content: &str) -> Result<Self, ViewError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    /// Fails if the file cannot be read, is not valid TOML, or names an empty
    /// theme or layout.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read template config: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid template config: {}", path.display()))?;
        tracing::debug!(
            "Loaded template config from {} (theme={}, layout={}, {} alias(es))",
            path.display(),
            config.theme,
            config.layout,
            config.names.len()
        );
        Ok(config)
    }

    /// Loads from `path` when given and present, otherwise returns defaults.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                tracing::debug!("Template config {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Theme root with `~` and environment variables expanded.
    pub fn expanded_location(&self) -> Result<PathBuf> {
        resolve_path(&self.location)
    }

    fn validate(&self) -> Result<(), ViewError> {
        if self.theme.trim().is_empty() {
            return Err(ViewError::ConfigError {
                message: "theme must not be empty".to_string(),
            });
        }
        if self.layout.trim().is_empty() {
            return Err(ViewError::ConfigError {
                message: "layout must not be empty".to_string(),
            });
        }
        if let Some((alias, _)) = self.names.iter().find(|(_, view)| view.trim().is_empty()) {
            return Err(ViewError::ConfigError {
                message: format!("alias '{alias}' maps to an empty view name"),
            });
        }
        Ok(())
    }
}
