//! Test utilities for viewcraft
//!
//! Helpers shared by unit and integration tests: one-time logging setup and
//! [`ThemeFixture`], which lays out a throwaway theme tree on disk.
//!
//! # Example
//!
//! ```rust,no_run
//! use viewcraft::test_utils::ThemeFixture;
//! use viewcraft::view::Data;
//!
//! let fixture = ThemeFixture::new().unwrap();
//! fixture.view("home.index", "Hello {{ name }}").unwrap();
//! fixture.layout("layout", "<main>{{ body }}</main>").unwrap();
//!
//! let engine = fixture.engine();
//! let html = engine.render("home.index", Data::new());
//! ```

pub mod fixtures;

pub use fixtures::ThemeFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honoured if present, and nothing is logged if not.
///
/// ```bash
/// RUST_LOG=viewcraft=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
