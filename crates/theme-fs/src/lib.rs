//! Filesystem abstraction for theme schema synchronization
//!
//! Provides normalized path handling and safe text I/O for section and
//! schema template files.

pub mod error;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use path::NormalizedPath;
