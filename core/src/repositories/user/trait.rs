//! User repository trait defining the interface for account persistence.
//!
//! The verification flow only needs to look accounts up and mark their
//! current address verified; registration and email changes go through the same
//! trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError::Conflict)` - The email is already registered
    /// * `Err(DomainError::Storage)` - The store failed
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Find a user by ID
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that ID
    /// * `Err(DomainError)` - Database error occurred
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by normalized email address
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Mark the account verified, but only while it still holds `email`
    ///
    /// # Returns
    /// * `Ok(true)` - The user exists with that address and is now verified
    /// * `Ok(false)` - No user with that ID, or the address has changed
    async fn mark_verified(&self, id: Uuid, email: &str) -> Result<bool, DomainError>;

    /// Replace the email address and reset the verification flag in one
    /// update
    ///
    /// # Returns
    /// * `Ok(Some(User))` - The updated user
    /// * `Ok(None)` - No user with that ID
    /// * `Err(DomainError::Conflict)` - Another account owns the address
    async fn change_email(&self, id: Uuid, email: &str) -> Result<Option<User>, DomainError>;

    /// Check whether an email address is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
