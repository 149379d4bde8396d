//! viewcraft - themed view composition
//!
//! Resolves named views to files under a theme, merges shared and per-view
//! data, renders nested views and partials, and wraps the result in a layout.
//! Tag syntax is handled by a pluggable parser; output produced by parser
//! plugins is protected from being parsed a second time.
//!
//! # Architecture Overview
//!
//! ```text
//! Engine ──make──▶ View ──render──▶ data()        shared + own, renderables rendered
//!   │                                 │
//!   │                                 ├─ partials   each partial file, own data on top
//!   │                                 ├─ body       the view's file
//!   │                                 └─ layout     layouts.<layout> with body + partials
//!   ├─ ContentCache   path -> text, append-only
//!   ├─ SharedData     key -> value, lowest precedence
//!   └─ TagParser      protect / parse / inject
//! ```
//!
//! # Core Modules
//!
//! - [`engine`] - The process-wide handle views are made from
//! - [`view`] - Views, view data and partials
//! - [`resolver`] - View name to file path mapping, including aliases
//! - [`cache`] - Append-only cache of template file contents
//! - [`shared`] - Data shared with every view
//! - [`templating`] - Tag parser seam, default parser, and renderer
//! - [`session`] - Validation error bag bound into every view
//!
//! ## Supporting Modules
//! - [`config`] - Theme location, default theme and layout, alias table
//! - [`core`] - Error types and user-facing error reports
//! - [`utils`] - File reading and path expansion
//!
//! # Theme Layout
//!
//! ```text
//! <location>/
//! └── main/                     theme
//!     └── views/
//!         ├── home/index.html   view "home.index"
//!         ├── partials/footer.html
//!         └── layouts/
//!             └── layout.html   layout "layout"
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use viewcraft::{Engine, TemplateConfig, data_from_json};
//!
//! # fn main() -> viewcraft::Result<()> {
//! let engine = Engine::new(TemplateConfig::default())?;
//! engine.share("title", "Site");
//!
//! let html = engine.render("home.index", data_from_json(json!({ "name": "Ann" })))?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod engine;
pub mod resolver;
pub mod session;
pub mod shared;
pub mod templating;
pub mod utils;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use crate::cache::ContentCache;
pub use crate::config::TemplateConfig;
pub use crate::core::{ErrorContext, Result, ViewError, user_friendly_error};
pub use crate::engine::Engine;
pub use crate::session::{ErrorBagProvider, MessageBag};
pub use crate::shared::SharedData;
pub use crate::view::{Data, DataValue, PartialSpec, RenderFn, Renderable, View, data_from_json};
