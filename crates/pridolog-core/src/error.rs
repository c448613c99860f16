//! Error types for document access and navigation

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a document store
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("not a file URI: {0}")]
    InvalidUri(String),

    #[error("failed to read {uri}: {source}")]
    Io {
        uri: String,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentError {
    /// The document does not exist, as opposed to existing but being unreadable
    pub fn is_not_found(&self) -> bool {
        matches!(self, DocumentError::NotFound(_))
    }
}

/// Errors raised when resolving the log entry under a cursor
#[derive(Error, Debug)]
pub enum NavigatorError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("line {line} is out of range in {uri}")]
    LineOutOfRange { uri: String, line: usize },

    #[error("line {line} of {uri} is not a JSON log entry: {source}")]
    NotJson {
        uri: String,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
