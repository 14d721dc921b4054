//! Error types for the juhannus engine.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur in juhannus operations.
#[derive(Error, Debug)]
pub enum JuhannusError {
    #[error("Invalid name '{0}': only letters, digits, whitespace and common punctuation are allowed (max 32)")]
    InvalidName(String),

    #[error("Invalid vote {0}: must be between 0 and 100")]
    InvalidVote(i64),

    #[error("Name '{0}' already in use. Choose another")]
    DuplicateName(String),

    #[error("No event for year {0}")]
    EventNotFound(i32),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(Uuid),

    #[error("Text block not found: {0}")]
    TextNotFound(Uuid),

    #[error("This action requires staff privileges")]
    Unauthorized,

    #[error("No events yet")]
    NoEvents,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl JuhannusError {
    /// Field-level input rejections the caller should show next to the form.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            JuhannusError::InvalidName(_)
                | JuhannusError::InvalidVote(_)
                | JuhannusError::DuplicateName(_)
        )
    }

    /// Missing-record conditions (a 404 in a web shell).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            JuhannusError::EventNotFound(_)
                | JuhannusError::ParticipantNotFound(_)
                | JuhannusError::TextNotFound(_)
        )
    }
}

/// Result type alias for juhannus operations.
pub type JuhannusResult<T> = Result<T, JuhannusError>;
