//! Integration test suite for viewcraft
//!
//! End-to-end tests that lay out a theme tree on disk with
//! [`ThemeFixture`](viewcraft::test_utils::ThemeFixture), build an engine on
//! it, and render views through the full pipeline.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **caching**: Content cache behaviour across renders and engine clones
//! - **composition**: Data merging, nested renderables, body and layout
//! - **errors**: Failure taxonomy and all-or-nothing rendering
//! - **noparse**: Protection of plugin output and noparse blocks
//! - **partials**: Partial registration, precedence and ordering
//! - **resolution**: Themes, aliases and fail-fast construction

mod errors;
mod noparse;
mod partials;
mod resolution;
