//! The engine handle: process-wide stores and settings.
//!
//! An [`Engine`] is created once at process start and cloned into every
//! [`View`] it makes. Clones share the same [`ContentCache`] and
//! [`SharedData`] stores, so everything cached or shared through one handle
//! is visible through all of them.
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use viewcraft::{Engine, TemplateConfig, data_from_json};
//!
//! # fn main() -> viewcraft::Result<()> {
//! let engine = Engine::new(TemplateConfig::with_location("public/themes"))?;
//! engine.share("title", "Site");
//!
//! let mut view = engine.make("home.index", data_from_json(json!({ "name": "Ann" })))?;
//! view.partial("footer", "partials.footer", data_from_json(json!({ "year": 2024 })))?;
//! let html = view.render()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Overrides
//!
//! Setters on `&mut Engine` change the defaults for views made afterwards
//! from that handle; views already constructed keep their resolved path.
//! [`Engine::with_theme`] hands out a second handle on the same stores with a
//! different theme.

use anyhow::Context;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::ContentCache;
use crate::config::TemplateConfig;
use crate::core::{Result, ViewError};
use crate::resolver::ViewResolver;
use crate::session::{ErrorBagProvider, MessageBag, NoSession};
use crate::shared::SharedData;
use crate::templating::{ParserFactory, TagParser, default_parser_factory};
use crate::view::{Data, DataValue, View};

/// Cheaply cloneable handle to the composition engine.
#[derive(Clone)]
pub struct Engine {
    config: Arc<TemplateConfig>,
    /// Theme root after `~` and variable expansion
    location: PathBuf,
    content: Arc<ContentCache>,
    shared: Arc<SharedData>,
    parser: ParserFactory,
    errors: Arc<dyn ErrorBagProvider>,
}

impl Engine {
    /// Creates an engine with empty stores, the default parser and no session.
    ///
    /// # Errors
    /// [`ViewError::ConfigError`] if the theme location cannot be expanded.
    pub fn new(config: TemplateConfig) -> Result<Self> {
        let location = expand_location(&config)?;
        tracing::debug!(
            "Template engine rooted at {} (theme={}, layout={})",
            location.display(),
            config.theme,
            config.layout
        );

        Ok(Self {
            config: Arc::new(config),
            location,
            content: Arc::new(ContentCache::new()),
            shared: Arc::new(SharedData::new()),
            parser: default_parser_factory(),
            errors: Arc::new(NoSession),
        })
    }

    /// Creates an engine from a TOML configuration file.
    pub fn from_config_file(path: &Path) -> anyhow::Result<Self> {
        let config = TemplateConfig::load_from(path)?;
        Self::new(config).with_context(|| {
            format!("Failed to initialize template engine from {}", path.display())
        })
    }

    /// Replaces the tag parser used by views made from this handle.
    pub fn with_parser(mut self, factory: ParserFactory) -> Self {
        self.parser = factory;
        self
    }

    /// Installs the session error-bag provider.
    pub fn with_error_bag(mut self, provider: impl ErrorBagProvider + 'static) -> Self {
        self.errors = Arc::new(provider);
        self
    }

    /// A handle on the same stores that resolves views in `theme`.
    pub fn with_theme(&self, theme: impl Into<String>) -> Self {
        let mut engine = self.clone();
        engine.set_theme(theme);
        engine
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) {
        Arc::make_mut(&mut self.config).theme = theme.into();
    }

    /// Sets the default layout for views made afterwards.
    pub fn set_layout(&mut self, layout: impl Into<String>) {
        Arc::make_mut(&mut self.config).layout = layout.into();
    }

    /// Moves the theme root.
    ///
    /// # Errors
    /// [`ViewError::ConfigError`] if the new location cannot be expanded; the
    /// engine is left unchanged in that case.
    pub fn set_location(&mut self, location: impl AsRef<Path>) -> Result<()> {
        let mut config = (*self.config).clone();
        config.location = location.as_ref().to_string_lossy().into_owned();
        self.location = expand_location(&config)?;
        self.config = Arc::new(config);
        Ok(())
    }

    /// Registers `alias` so that `"name: <alias>"` resolves to `view`.
    pub fn register_alias(&mut self, alias: impl Into<String>, view: impl Into<String>) {
        Arc::make_mut(&mut self.config).names.insert(alias.into(), view.into());
    }

    /// Constructs a view, resolving its file immediately.
    ///
    /// # Errors
    /// [`ViewError::ViewNotFound`] or [`ViewError::UnknownAlias`] if `name`
    /// does not resolve.
    pub fn make(&self, name: &str, data: Data) -> Result<View> {
        View::new(self.clone(), name, self.config.theme.clone(), data)
    }

    /// Constructs and renders a view in one call.
    pub fn render(&self, name: &str, data: Data) -> Result<String> {
        self.make(name, data)?.render()
    }

    /// Whether `name` resolves to a view file in the current theme.
    pub fn exists(&self, name: &str) -> Result<bool> {
        self.resolver().exists(name)
    }

    /// Shares a value with every view rendered from this engine's stores.
    pub fn share(&self, key: impl Into<String>, value: impl Into<DataValue>) {
        self.shared.share(key, value);
    }

    pub fn shared(&self) -> &SharedData {
        &self.shared
    }

    pub fn content(&self) -> &ContentCache {
        &self.content
    }

    pub fn config(&self) -> &TemplateConfig {
        &self.config
    }

    /// Theme root after expansion.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Resolver for the current theme.
    pub fn resolver(&self) -> ViewResolver<'_> {
        self.resolver_for(&self.config.theme)
    }

    /// Resolver for an arbitrary theme under this engine's location.
    pub fn resolver_for<'a>(&'a self, theme: &'a str) -> ViewResolver<'a> {
        ViewResolver::new(&self.location, theme, &self.config.names)
    }

    /// A fresh parser for one render pass.
    pub fn parser(&self) -> Box<dyn TagParser> {
        (self.parser)()
    }

    /// The session's error bag, or an empty one.
    pub fn error_bag(&self) -> MessageBag {
        self.errors.errors().unwrap_or_default()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("location", &self.location)
            .field("theme", &self.config.theme)
            .field("layout", &self.config.layout)
            .field("aliases", &self.config.names.len())
            .field("cached_files", &self.content.len())
            .field("shared_keys", &self.shared.len())
            .finish_non_exhaustive()
    }
}

fn expand_location(config: &TemplateConfig) -> Result<PathBuf> {
    config.expanded_location().map_err(|e| ViewError::ConfigError {
        message: format!("{e:#}"),
    })
}
