//! View name resolution.
//!
//! A logical view name maps onto exactly one file under the theme root:
//!
//! ```text
//! <location>/<theme>/views/<name with '.' replaced by '/'>.html
//! ```
//!
//! so `home.index` in theme `main` is `<location>/main/views/home/index.html`
//! and layout `layout` is the view `layouts.layout`. A name of the form
//! `"name: <alias>"` is first looked up in the alias table.
//!
//! Existence is a single file-system probe: there is no extension fallback
//! and no partial matching.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::core::{Result, ViewError};
use crate::utils::file_exists_and_readable;

/// Prefix marking an alias reference.
pub const ALIAS_PREFIX: &str = "name: ";

/// Extension of every view file.
pub const VIEW_EXTENSION: &str = "html";

/// A view reference, classified by variant instead of string probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSource<'a> {
    /// A dotted view name used as-is.
    Literal(&'a str),
    /// A `"name: <alias>"` reference; holds the alias.
    Alias(&'a str),
}

impl<'a> ViewSource<'a> {
    /// Classifies a raw view reference.
    pub fn parse(name: &'a str) -> Self {
        match name.strip_prefix(ALIAS_PREFIX) {
            Some(alias) => Self::Alias(alias),
            None => Self::Literal(name),
        }
    }
}

/// Maps view names to physical paths for one theme.
#[derive(Debug, Clone, Copy)]
pub struct ViewResolver<'a> {
    location: &'a Path,
    theme: &'a str,
    names: &'a BTreeMap<String, String>,
}

impl<'a> ViewResolver<'a> {
    /// Resolver for `theme` under `location`, using `names` for aliases.
    pub fn new(location: &'a Path, theme: &'a str, names: &'a BTreeMap<String, String>) -> Self {
        Self {
            location,
            theme,
            names,
        }
    }

    /// The theme this resolver looks in.
    pub fn theme(&self) -> &str {
        self.theme
    }

    /// Turns a reference into the dotted view name it stands for.
    ///
    /// # Errors
    /// [`ViewError::UnknownAlias`] if an alias reference is not registered.
    pub fn view_name<'n>(&'n self, name: &'n str) -> Result<&'n str> {
        match ViewSource::parse(name) {
            ViewSource::Literal(view) => Ok(view),
            ViewSource::Alias(alias) => self.names.get(alias).map(String::as_str).ok_or_else(|| {
                ViewError::UnknownAlias {
                    alias: alias.to_string(),
                }
            }),
        }
    }

    /// The path a view name maps to, whether or not the file exists.
    ///
    /// The result always lies under `<location>/<theme>/views`; leading
    /// separators in the name are dropped.
    ///
    /// # Errors
    /// [`ViewError::UnknownAlias`] for an unregistered alias, and
    /// [`ViewError::ViewNotFound`] if the name carries a path prefix such as
    /// a drive letter.
    pub fn candidate(&self, name: &str) -> Result<PathBuf> {
        let view = self.view_name(name)?;

        let views = self.location.join(self.theme).join("views");

        // Always relative to `views`, even for names that start with a separator
        let file = format!("{}.{VIEW_EXTENSION}", view.replace('.', "/"));
        let relative = Path::new(file.trim_start_matches(['/', '\\']));
        if !relative.components().all(|component| matches!(component, Component::Normal(_))) {
            tracing::debug!("View name '{}' does not map into {}", name, views.display());
            return Err(ViewError::ViewNotFound {
                view: name.to_string(),
                path: views,
            });
        }
        Ok(views.join(relative))
    }

    /// Resolves a view name to an existing file, or `None` if it is absent.
    ///
    /// # Errors
    /// Only [`ViewError::UnknownAlias`]; absence is not an error here.
    pub fn resolve(&self, name: &str) -> Result<Option<PathBuf>> {
        let path = self.candidate(name)?;
        if file_exists_and_readable(&path) {
            tracing::trace!("Resolved view '{}' -> {}", name, path.display());
            Ok(Some(path))
        } else {
            tracing::debug!("View '{}' not found at {}", name, path.display());
            Ok(None)
        }
    }

    /// Whether a view name resolves to an existing file.
    pub fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.resolve(name)?.is_some())
    }

    /// Resolves a view name, failing loudly if it does not exist.
    ///
    /// # Errors
    /// [`ViewError::ViewNotFound`] if the file is absent,
    /// [`ViewError::UnknownAlias`] for an unregistered alias.
    pub fn path(&self, name: &str) -> Result<PathBuf> {
        let candidate = self.candidate(name)?;
        if file_exists_and_readable(&candidate) {
            Ok(candidate)
        } else {
            Err(ViewError::ViewNotFound {
                view: name.to_string(),
                path: candidate,
            })
        }
    }
}
