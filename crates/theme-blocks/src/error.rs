//! Error types for theme-blocks

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] theme_fs::Error),

    #[error("schema template name must be a plain file name: {name}")]
    InvalidTemplateName { name: String },

    #[error("schema template does not exist: {name} ({path})")]
    MissingTemplate { name: String, path: PathBuf },

    #[error("schema template is empty: {name}")]
    EmptyTemplate { name: String },

    #[error("schema template is not an array: {name}")]
    MalformedTemplate { name: String },

    #[error("schema template is not valid JSON: {name}: {message}")]
    InvalidTemplateJson { name: String, message: String },
}
