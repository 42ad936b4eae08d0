//! Command implementations for theme-cli

pub mod init;
pub mod report;
pub mod sync;
pub mod watch;

pub use init::run_init;
pub use sync::{run_check, run_sync};
pub use watch::run_watch;
