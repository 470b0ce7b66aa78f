//! Common error types for standup

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for standup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the standup crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid config file {path}: {message}")]
    TomlParse { path: PathBuf, message: String },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
