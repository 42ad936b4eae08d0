//! Error types for theme-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from theme-core
    #[error(transparent)]
    Core(#[from] theme_core::Error),

    /// Error from theme-fs
    #[error(transparent)]
    Fs(#[from] theme_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// File watcher error
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
