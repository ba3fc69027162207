//! Main verification service implementation

use mockable::Clock;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::domain::entities::verification_record::generate_plaintext_token;
use crate::domain::entities::verification_state::VerificationState;
use crate::errors::{DomainError, DomainResult, TokenError};
use crate::repositories::user::UserRepository;
use crate::repositories::verification::VerificationRepository;
use crate::services::encryption::SymmetricCipher;

use super::config::VerificationServiceConfig;
use super::traits::DeliveryScheduler;
use super::types::{ConfirmOutcome, IssueReceipt};

/// Verification service driving the email token state machine.
///
/// Type parameters accept trait objects so the binary can choose the
/// storage backend at startup.
pub struct VerificationService<U, V, C, D>
where
    U: UserRepository + ?Sized,
    V: VerificationRepository + ?Sized,
    C: SymmetricCipher + ?Sized,
    D: DeliveryScheduler + ?Sized,
{
    users: Arc<U>,
    records: Arc<V>,
    cipher: Arc<C>,
    scheduler: Arc<D>,
    clock: Arc<dyn Clock>,
    config: VerificationServiceConfig,
}

impl<U, V, C, D> VerificationService<U, V, C, D>
where
    U: UserRepository + ?Sized,
    V: VerificationRepository + ?Sized,
    C: SymmetricCipher + ?Sized,
    D: DeliveryScheduler + ?Sized,
{
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `users` - User repository
    /// * `records` - Verification record store
    /// * `cipher` - Cipher holding the process-wide key
    /// * `scheduler` - Background delivery of confirmation links
    /// * `clock` - Time source for expiry decisions
    /// * `config` - Validity window and link prefix
    pub fn new(
        users: Arc<U>,
        records: Arc<V>,
        cipher: Arc<C>,
        scheduler: Arc<D>,
        clock: Arc<dyn Clock>,
        config: VerificationServiceConfig,
    ) -> Self {
        Self {
            users,
            records,
            cipher,
            scheduler,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a fresh token for `user` and hand its link to delivery.
    ///
    /// Any previous token of the user stops matching. Delivery happens in
    /// the background, so a failing provider never fails issuance.
    ///
    /// # Returns
    ///
    /// * `Ok(IssueReceipt)` - The owner and expiry of the new token
    /// * `Err(DomainError::Storage)` - The record could not be written
    pub async fn issue(&self, user: &User) -> DomainResult<IssueReceipt> {
        let token = generate_plaintext_token();
        let expires_at = self.clock.utc() + self.config.token_validity;

        self.records.issue(user.id, &token, expires_at).await?;

        let transport_token = self.cipher.encrypt(&token)?;
        let link = format!("{}{}", self.config.confirmation_link_base, transport_token);
        self.scheduler.dispatch(&user.email, link);

        tracing::info!(
            user_id = %user.id,
            expires_at = %expires_at,
            event = "verification_token_issued",
            "Issued email verification token"
        );

        Ok(IssueReceipt {
            user_id: user.id,
            expires_at,
        })
    }

    /// Issue a fresh token for the user with the given ID
    pub async fn issue_for_user(&self, user_id: Uuid) -> DomainResult<IssueReceipt> {
        let user = self.find_user(user_id).await?;
        self.issue(&user).await
    }

    /// Confirm a transport token taken from a confirmation link.
    ///
    /// This method:
    /// 1. Rejects an absent or undecryptable token as `InvalidToken`
    /// 2. Looks the plaintext up, `TokenNotFound` if nothing matches
    /// 3. Consumes the token with compare-and-clear
    /// 4. Marks the account verified, or reissues if the token had expired
    ///
    /// Only one of several concurrent confirmations of the same token can
    /// consume it; the others see `TokenNotFound`.
    pub async fn confirm(&self, transport_token: Option<&str>) -> DomainResult<ConfirmOutcome> {
        let transport_token = transport_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(TokenError::InvalidToken)?;

        let plaintext = self.cipher.decrypt(transport_token).map_err(|e| {
            tracing::warn!(event = "verification_token_rejected", "Undecryptable verification token");
            e
        })?;

        let record = self
            .records
            .find_by_plaintext(&plaintext)
            .await?
            .ok_or(TokenError::TokenNotFound)?;
        let user_id = record.user_id;

        // Address the token was sent to; a later email change voids it
        let recipient = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(TokenError::TokenNotFound)?
            .email;

        let expired = self.records.is_expired(&record, self.clock.utc());

        if !self.records.clear_if_matches(user_id, &plaintext).await? {
            tracing::info!(
                user_id = %user_id,
                event = "verification_token_race_lost",
                "Verification token consumed by a concurrent request"
            );
            return Err(TokenError::TokenNotFound.into());
        }

        if expired {
            tracing::info!(
                user_id = %user_id,
                event = "verification_token_expired",
                "Verification token expired, issuing a new one"
            );
            let user = self
                .users
                .find_by_id(user_id)
                .await?
                .ok_or(TokenError::TokenNotFound)?;
            self.issue(&user).await?;
            return Ok(ConfirmOutcome::Reissued { user_id });
        }

        if !self.users.mark_verified(user_id, &recipient).await? {
            tracing::info!(
                user_id = %user_id,
                event = "verification_address_changed",
                "Email address changed while the token was being confirmed"
            );
            return Err(TokenError::TokenNotFound.into());
        }

        tracing::info!(
            user_id = %user_id,
            event = "email_verified",
            "Email address verified"
        );

        Ok(ConfirmOutcome::Verified { user_id })
    }

    /// Current verification state of a user
    pub async fn state(&self, user_id: Uuid) -> DomainResult<VerificationState> {
        let user = self.find_user(user_id).await?;
        let record = self.records.find_by_user_id(user_id).await?;
        Ok(VerificationState::derive(
            user.is_verified,
            record.as_ref(),
            self.clock.utc(),
        ))
    }

    async fn find_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {}", user_id),
            })
    }
}
