//! Tag parsing and rendering for view templates.
//!
//! The composition engine treats the tag parser as a collaborator behind the
//! [`TagParser`] trait and only decides what gets parsed, with what data, and
//! in which order. [`TagRenderer`] wraps a parser with the no-parse
//! protection that keeps plugin output away from a second round of tag
//! interpretation.
//!
//! # Template Syntax
//!
//! With the default [`TeraTagParser`], view files are tera templates with two
//! additions:
//!
//! ```html
//! <h1>{{ title }}</h1>
//! {% if errors.messages.email %}<p>{{ errors.messages.email[0] }}</p>{% endif %}
//!
//! {{ noparse }}{{ shown literally }}{{ /noparse }}
//! {{ code:block lang="rust" }}fn main() {}{{ /code:block }}
//! ```
//!
//! Plugin bodies are parsed again with an empty data scope, up to
//! [`MAX_PLUGIN_DEPTH`] levels deep.
//!
//! # Errors
//!
//! Parser failures are [`TemplateError`]s; [`TemplateError::format_with_context`]
//! renders a multi-line report with suggestions for misspelled variables.

pub mod error;
pub mod parser;
pub mod renderer;


pub use error::{ErrorLocation, TemplateError};
pub use parser::{PluginCall, PluginCallback, TagParser, TeraTagParser, format_tera_error};
pub use renderer::{
    MAX_PLUGIN_DEPTH, ParserFactory, PluginBridge, TagRenderer, default_parser_factory,
};
