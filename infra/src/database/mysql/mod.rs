//! MySQL-specific database implementations
//!
//! This module contains MySQL implementations of repository traits
//! using SQLx for database operations.

pub mod user_repository_impl;
pub mod verification_repository_impl;

// Re-export the MySQL implementations
pub use user_repository_impl::MySqlUserRepository;
pub use verification_repository_impl::MySqlVerificationRepository;

use es_core::errors::DomainError;

/// Map a SQLx error to a domain storage error
pub(crate) fn storage_error(context: &str, error: sqlx::Error) -> DomainError {
    DomainError::storage(format!("{}: {}", context, error))
}

/// Whether the error is a unique-key violation
pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}
