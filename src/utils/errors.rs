//! Error handling for HomeworkBuddy
//!
//! This module defines the main error type used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for HomeworkBuddy application
#[derive(Error, Debug)]
pub enum HomeworkBuddyError {
    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Subject not found: {subject_id}")]
    SubjectNotFound { subject_id: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Result type alias for HomeworkBuddy operations
pub type Result<T> = std::result::Result<T, HomeworkBuddyError>;

impl HomeworkBuddyError {
    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HomeworkBuddyError::Io(_) => ErrorSeverity::Critical,
            HomeworkBuddyError::Config(_) => ErrorSeverity::Critical,
            HomeworkBuddyError::Serialization(_) => ErrorSeverity::Critical,
            HomeworkBuddyError::Delivery(_) => ErrorSeverity::Warning,
            HomeworkBuddyError::InvalidStateTransition { .. } => ErrorSeverity::Warning,
            HomeworkBuddyError::InvalidInput(_) => ErrorSeverity::Info,
            HomeworkBuddyError::SubjectNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
