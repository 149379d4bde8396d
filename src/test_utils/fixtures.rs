//! On-disk theme trees for tests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{DEFAULT_THEME, TemplateConfig};
use crate::engine::Engine;

/// A temporary theme root with helpers to write views and layouts.
///
/// Files go to `<root>/<theme>/views/<dotted/name>.html`; the directory is
/// removed when the fixture is dropped.
#[derive(Debug)]
pub struct ThemeFixture {
    temp_dir: TempDir,
}

impl ThemeFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new().context("Failed to create theme root")?,
        })
    }

    /// The theme root directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes a view of the default theme.
    pub fn view(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.themed_view(DEFAULT_THEME, name, content)
    }

    /// Writes `layouts.<name>` in the default theme.
    pub fn layout(&self, name: &str, content: &str) -> Result<PathBuf> {
        self.view(&format!("layouts.{name}"), content)
    }

    /// Writes a view of `theme`.
    pub fn themed_view(&self, theme: &str, name: &str, content: &str) -> Result<PathBuf> {
        let mut path = self.root().join(theme).join("views");
        path.extend(name.split('.'));
        path.set_extension("html");

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Configuration rooted at this fixture.
    pub fn config(&self) -> TemplateConfig {
        TemplateConfig::with_location(self.root())
    }

    /// A fresh engine rooted at this fixture, with empty stores.
    pub fn engine(&self) -> Engine {
        Engine::new(self.config()).expect("fixture root is a plain path")
    }
}
