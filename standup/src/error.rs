//! Error types for standup
//!
//! Player failures are split by kind: `Command` errors abort a run, `Query`
//! errors are tolerated while polling and only logged.

use crate::orchestrator::Stage;
use thiserror::Error;

/// Main error type for the standup crate
#[derive(Error, Debug)]
pub enum Error {
    /// A control command sent to the player failed
    #[error("Player command '{command}' failed: {message}")]
    Command {
        command: &'static str,
        message: String,
    },

    /// A status query against the player failed
    #[error("Player query '{query}' failed: {message}")]
    Query { query: &'static str, message: String },

    /// The player answered a query with something unparseable
    #[error("Unexpected response to '{query}': {response:?}")]
    UnexpectedResponse {
        query: &'static str,
        response: String,
    },

    /// Track list loading or selection errors
    #[error("Track list error: {0}")]
    TrackList(String),

    /// Run configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Desktop notification errors
    #[error("Notification error: {0}")]
    Notify(String),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from the shared crate
    #[error(transparent)]
    Common(#[from] standup_common::Error),

    /// A transition run failed while entering `stage`
    #[error("Run aborted while entering {stage}: {source}")]
    Aborted {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// True for failures of imperative player commands
    pub fn is_command_failure(&self) -> bool {
        match self {
            Error::Command { .. } => true,
            Error::Aborted { source, .. } => source.is_command_failure(),
            _ => false,
        }
    }
}

/// Convenience Result type using standup Error
pub type Result<T> = std::result::Result<T, Error>;
