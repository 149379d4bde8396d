//! Drives a [`TagParser`] over view files and strings.
//!
//! Every render pass follows the same protect/parse/inject sequence:
//!
//! 1. cumulative no-parse mode is switched on, so plugin output is collected
//!    behind placeholders instead of being written into the text;
//! 2. the parser runs over the content with a [`PluginBridge`] callback;
//! 3. once the whole pass has completed, the collected output is injected
//!    back verbatim.
//!
//! Plugin output therefore never goes through tag interpretation a second
//! time, even when it contains `{{` or `{%`.

use std::path::Path;
use std::sync::Arc;

use super::error::TemplateError;
use super::parser::{PluginCall, PluginCallback, TagParser, TeraTagParser};
use crate::cache::ContentCache;
use crate::core::{Result, ViewError};
use crate::view::Scope;

/// Maximum number of nested plugin levels before a render is aborted.
pub const MAX_PLUGIN_DEPTH: usize = 10;

/// Label used in errors for templates that did not come from a file.
const INLINE_TEMPLATE: &str = "inline";

/// Creates a fresh parser for each render pass.
pub type ParserFactory = Arc<dyn Fn() -> Box<dyn TagParser> + Send + Sync>;

/// Factory producing [`TeraTagParser`] instances.
pub fn default_parser_factory() -> ParserFactory {
    Arc::new(|| -> Box<dyn TagParser> { Box::new(TeraTagParser::new()) })
}

/// Plugin callback that parses the plugin body again with an empty scope.
///
/// Plugin bodies do not inherit the data of the surrounding template. Each
/// level of re-entry carries its own depth; past [`MAX_PLUGIN_DEPTH`] the
/// call fails with [`TemplateError::DepthExceeded`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PluginBridge {
    depth: usize,
}

impl PluginBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl PluginCallback for PluginBridge {
    fn call(
        &self,
        parser: &mut dyn TagParser,
        call: &PluginCall<'_>,
    ) -> Result<String, TemplateError> {
        if self.depth >= MAX_PLUGIN_DEPTH {
            return Err(TemplateError::DepthExceeded {
                plugin: call.name.to_string(),
                depth: MAX_PLUGIN_DEPTH,
            });
        }

        tracing::trace!("Re-entering parser for plugin '{}' at depth {}", call.name, self.depth + 1);
        let nested = Self {
            depth: self.depth + 1,
        };
        parser.parse(call.content, &Scope::new(), Some(&nested))
    }
}

/// Renders templates with no-parse protection around plugin output.
///
/// A renderer owns one parser for its lifetime and borrows the engine's
/// content cache for file loads.
pub struct TagRenderer<'a> {
    parser: Box<dyn TagParser>,
    content: &'a ContentCache,
}

impl<'a> TagRenderer<'a> {
    /// Creates a renderer around `parser`, loading files through `content`.
    pub fn new(parser: Box<dyn TagParser>, content: &'a ContentCache) -> Self {
        Self {
            parser,
            content,
        }
    }

    /// Loads `path` through the content cache and renders it against `data`.
    ///
    /// # Errors
    ///
    /// - [`ViewError::IoFailure`] if the file has to be read and cannot be
    /// - [`ViewError::ParseFailure`] if the parser rejects the content
    pub fn render_file(&mut self, path: &Path, data: &Scope) -> Result<String> {
        let text = self.content.load(path)?;
        tracing::debug!("Rendering template file {}", path.display());
        self.render_named(&path.display().to_string(), &text, data)
    }

    /// Renders a literal template string against `data`.
    pub fn render_string(&mut self, text: &str, data: &Scope) -> Result<String> {
        self.render_named(INLINE_TEMPLATE, text, data)
    }

    /// Renders `text`, reporting parse failures under `label`.
    pub fn render_named(&mut self, label: &str, text: &str, data: &Scope) -> Result<String> {
        self.render_content(text, data).map_err(|source| ViewError::ParseFailure {
            template: label.to_string(),
            source,
        })
    }

    fn render_content(&mut self, text: &str, data: &Scope) -> Result<String, TemplateError> {
        self.parser.cumulative_noparse(true);

        let bridge = PluginBridge::new();
        match self.parser.parse(text, data, Some(&bridge)) {
            Ok(parsed) => Ok(self.parser.inject_noparse(&parsed)),
            Err(e) => {
                // Drop whatever was protected before the failure
                self.parser.inject_noparse("");
                Err(e)
            }
        }
    }
}
