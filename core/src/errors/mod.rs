//! Domain-specific error types and error handling.

mod types;


pub use types::{TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Business rule violation: {message}")]
    BusinessRule { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Persistence layer failure; propagated to the caller without retry
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Shorthand for wrapping a store failure
    pub fn storage(message: impl std::fmt::Display) -> Self {
        DomainError::Storage {
            message: message.to_string(),
        }
    }

    /// Whether the error must surface to an external caller as a plain
    /// access denial
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            DomainError::Token(TokenError::InvalidToken | TokenError::TokenNotFound)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
