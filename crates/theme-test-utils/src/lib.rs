//! Shared test utilities for the theme-schema workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`theme`]: [`ThemeFixture`], a temporary theme with schema and section directories

pub mod theme;

pub use theme::ThemeFixture;
