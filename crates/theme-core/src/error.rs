//! Error types for theme-core

use std::path::PathBuf;

/// Result type for theme-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in theme-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A configured root directory does not exist
    #[error("{kind} directory not found at {path}")]
    MissingDirectory { kind: &'static str, path: PathBuf },

    /// The config file could not be parsed
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// The JSON formatter rejected its input
    #[error("Unable to format JSON: {message}")]
    Format { message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from theme-fs
    #[error(transparent)]
    Fs(#[from] theme_fs::Error),

    /// Template error from theme-blocks
    #[error(transparent)]
    Blocks(#[from] theme_blocks::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            message: message.into(),
        }
    }
}
