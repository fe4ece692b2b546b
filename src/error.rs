/// Error types for errand
///
/// This module defines all possible errors that can occur in the application.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for errand operations
#[derive(Error, Debug)]
pub enum ErrandError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A recognition pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Task referenced by id does not exist
    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    /// Invalid utterance or command arguments
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Result type alias for errand operations
pub type Result<T> = std::result::Result<T, ErrandError>;

/// Convert ErrandError to a user-friendly error message
impl ErrandError {
    pub fn user_message(&self) -> String {
        match self {
            ErrandError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            ErrandError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            ErrandError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            ErrandError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            ErrandError::Pattern(e) => {
                format!("Command pattern could not be built: {}", e)
            }
            ErrandError::TaskNotFound(id) => {
                format!("No open task with id {}", id)
            }
            ErrandError::InvalidCommand(reason) => {
                format!("Invalid command: {}", reason)
            }
            ErrandError::Generic(msg) => msg.clone(),
        }
    }
}
