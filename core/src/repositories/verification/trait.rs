//! Verification record store.
//!
//! Every mutating operation must be atomic per record. Consumption goes
//! through [`VerificationRepository::clear_if_matches`] so that exactly one
//! of several concurrent confirmations of the same token wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::verification_record::VerificationRecord;
use crate::errors::DomainError;

/// Repository trait for per-user verification records
#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Create the empty record that accompanies a new account.
    ///
    /// Returns the existing record unchanged if one is already present.
    async fn create_for_user(&self, user_id: Uuid) -> Result<VerificationRecord, DomainError>;

    /// Store a new token and expiry for the user, overwriting any previous
    /// token (last write wins)
    ///
    /// # Arguments
    /// * `user_id` - Owner of the record
    /// * `token` - Plaintext token
    /// * `expires_at` - Instant after which the token is rejected
    ///
    /// # Returns
    /// * `Ok(VerificationRecord)` - The record as stored
    /// * `Err(DomainError::Storage)` - The store failed
    async fn issue(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<VerificationRecord, DomainError>;

    /// Exact-match lookup by plaintext token
    async fn find_by_plaintext(&self, token: &str) -> Result<Option<VerificationRecord>, DomainError>;

    /// Lookup by owning user
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<VerificationRecord>, DomainError>;

    /// Null both the token and the expiry
    ///
    /// # Returns
    /// * `Ok(true)` - A record existed and was cleared
    /// * `Ok(false)` - No record for this user
    async fn clear(&self, user_id: Uuid) -> Result<bool, DomainError>;

    /// Clear the record only if it still holds `token`
    ///
    /// # Returns
    /// * `Ok(true)` - This caller consumed the token
    /// * `Ok(false)` - The token was already consumed or replaced
    async fn clear_if_matches(&self, user_id: Uuid, token: &str) -> Result<bool, DomainError>;

    /// True if the record has no expiry or it lies strictly before `now`
    fn is_expired(&self, record: &VerificationRecord, now: DateTime<Utc>) -> bool {
        record.is_expired(now)
    }
}
