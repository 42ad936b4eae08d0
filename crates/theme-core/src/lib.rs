//! Core synchronization layer for theme schema templates
//!
//! Ties the template matcher and renderer from `theme-blocks` to the
//! filesystem: discovers section documents, injects or refreshes schema
//! templates, re-formats the embedded `{% schema %}` JSON and writes the
//! result back only when something actually changed.

pub mod config;
pub mod error;
pub mod format;
pub mod sync;

pub use config::{CONFIG_FILE, Config, ResolvedConfig};
pub use error::{Error, Result};
pub use format::{JsonFormatter, PrettyJson, format_embedded_json, try_format_embedded_json};
pub use sync::{
    SectionReport, SectionStatus, SyncEngine, SyncOptions, SyncPhase, SyncReport, SyncState,
    Trigger,
};
