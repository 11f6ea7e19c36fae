//! Error handling for the portfolio content client

use std::fmt;
use thiserror::Error;

/// Unified error type for backend calls
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The table API answered with a non-success status
    #[error("Database error ({status}): {message}")]
    Database { status: u16, message: String },

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new database error
    pub fn database<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Database {
            status,
            message: msg.to_string(),
        }
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}

/// A draft that cannot be turned into a write.
///
/// Raised before any remote call is made.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty
    #[error("{0} is required")]
    Required(&'static str),

    /// A JSON-bearing field did not parse into its expected shape
    #[error("Invalid format in {field}: {reason}")]
    InvalidFormat { field: &'static str, reason: String },

    /// The screen only edits existing rows
    #[error("Select a {0} to edit first")]
    NothingSelected(&'static str),

    /// Rows of this kind are not edited from the admin panel
    #[error("A {0} cannot be edited")]
    ReadOnly(&'static str),
}

impl ValidationError {
    pub(crate) fn invalid_format<T: fmt::Display>(field: &'static str, reason: T) -> Self {
        ValidationError::InvalidFormat {
            field,
            reason: reason.to_string(),
        }
    }
}

/// The remote operation a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Load,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Verb used in user-facing notices
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Load => "load",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a screen-level action
#[derive(Error, Debug)]
pub enum SyncError {
    /// Local validation failed; nothing was sent
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The store rejected or never answered the call
    #[error("Failed to {op}: {source}")]
    Remote {
        op: Operation,
        #[source]
        source: Error,
    },
}

impl SyncError {
    pub(crate) fn remote(op: Operation, source: Error) -> Self {
        SyncError::Remote { op, source }
    }

    /// Whether this is a local validation failure
    pub fn is_invalid(&self) -> bool {
        matches!(self, SyncError::Invalid(_))
    }
}
