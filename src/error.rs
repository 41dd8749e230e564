//! Error types for the training console core

use thiserror::Error;

/// Main error type for console operations
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Form input rejected before any mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Participant email already used by another row
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),

    /// Requested row does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("course", "participant", "enrollment")
        entity: &'static str,
        /// Requested identifier
        id: i64,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A schema migration step failed
    #[error("Migration '{name}' failed: {message}")]
    Migration {
        /// Name of the failed step
        name: String,
        /// Underlying store message
        message: String,
    },

    /// Table name outside the known set
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Upload sink rejected or failed to store a file
    #[error("Upload error: {0}")]
    Upload(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<rusqlite::Error> for ConsoleError {
    fn from(err: rusqlite::Error) -> Self {
        ConsoleError::DatabaseError(err.to_string())
    }
}

impl ConsoleError {
    /// True for errors the operator can fix by changing form input
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            ConsoleError::Validation(_)
                | ConsoleError::DuplicateEmail(_)
                | ConsoleError::NotFound { .. }
                | ConsoleError::Upload(_)
        )
    }
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
