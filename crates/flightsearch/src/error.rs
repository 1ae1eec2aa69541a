//! Error types for flightsearch.
//!
//! This module defines all error types used throughout the flightsearch crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for flightsearch operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The on-disk schema is newer than this binary understands.
    #[error("unsupported schema version {found} (expected at most {supported})")]
    SchemaVersion {
        /// Version found in the database.
        found: i32,
        /// Newest version this binary supports.
        supported: i32,
    },

    /// The metadata table contains an unreadable entry.
    #[error("invalid metadata entry for '{key}': {value}")]
    MetadataInvalid {
        /// Metadata key.
        key: String,
        /// The stored value that failed to parse.
        value: String,
    },

    // === Lookup Errors ===
    /// No airport matches the given name or code.
    #[error("no airport matches '{query}'")]
    AirportNotFound {
        /// The name or code that was looked up.
        query: String,
    },

    // === Session Errors ===
    /// The session task has shut down and no longer accepts commands.
    #[error("session is closed")]
    SessionClosed,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for flightsearch operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an airport-not-found error.
    #[must_use]
    pub fn airport_not_found(query: impl Into<String>) -> Self {
        Self::AirportNotFound {
            query: query.into(),
        }
    }
}
