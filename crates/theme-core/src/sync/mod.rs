//! Synchronization of schema templates into section documents
//!
//! This module provides:
//! - `SyncEngine`: drives full, targeted and schema-triggered syncs
//! - `SyncState`: the cooldown gate that absorbs self-triggered change events
//! - `SyncReport`: what a sync did, per section

mod engine;
mod report;
mod state;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{SectionReport, SectionStatus, SyncReport, Trigger};
pub use state::{SyncPhase, SyncState};
