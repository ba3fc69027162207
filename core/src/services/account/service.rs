//! Account service implementation

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::user::{normalize_email, User};
use crate::errors::{DomainError, DomainResult, ValidationError};
use crate::repositories::user::UserRepository;
use crate::repositories::verification::VerificationRepository;
use crate::services::encryption::SymmetricCipher;
use crate::services::verification::{DeliveryScheduler, IssueReceipt, VerificationService};

/// A freshly created account and its first token
#[derive(Debug, Clone)]
pub struct RegisteredAccount {
    pub user: User,
    pub receipt: IssueReceipt,
}

/// An account after its email address changed
#[derive(Debug, Clone)]
pub struct UpdatedEmail {
    pub user: User,
    pub receipt: IssueReceipt,
}

/// Account operations that start or restart email verification
pub struct AccountService<U, V, C, D>
where
    U: UserRepository + ?Sized,
    V: VerificationRepository + ?Sized,
    C: SymmetricCipher + ?Sized,
    D: DeliveryScheduler + ?Sized,
{
    users: Arc<U>,
    records: Arc<V>,
    verification: Arc<VerificationService<U, V, C, D>>,
}

impl<U, V, C, D> AccountService<U, V, C, D>
where
    U: UserRepository + ?Sized,
    V: VerificationRepository + ?Sized,
    C: SymmetricCipher + ?Sized,
    D: DeliveryScheduler + ?Sized,
{
    pub fn new(
        users: Arc<U>,
        records: Arc<V>,
        verification: Arc<VerificationService<U, V, C, D>>,
    ) -> Self {
        Self {
            users,
            records,
            verification,
        }
    }

    /// Register a new account and send its first confirmation link.
    ///
    /// # Arguments
    ///
    /// * `email` - Raw email address; trimmed and domain-lowercased
    /// * `password_hash` - Already hashed password
    ///
    /// # Returns
    ///
    /// * `Ok(RegisteredAccount)` - The unverified user and the token receipt
    /// * `Err(DomainError::ValidationErr)` - The address is malformed
    /// * `Err(DomainError::Conflict)` - The address is already registered
    pub async fn register(&self, email: &str, password_hash: String) -> DomainResult<RegisteredAccount> {
        let email = normalize_email(email).ok_or(ValidationError::InvalidEmail)?;

        if self.users.email_exists(&email).await? {
            return Err(DomainError::Conflict {
                message: "Email already registered".to_string(),
            });
        }

        let user = self.users.create(User::new(email, password_hash)).await?;
        self.records.create_for_user(user.id).await?;

        tracing::info!(user_id = %user.id, event = "account_registered", "Account registered");

        let receipt = self.verification.issue(&user).await?;
        Ok(RegisteredAccount { user, receipt })
    }

    /// Replace the account's email address.
    ///
    /// Any outstanding link is revoked before the address changes, then the
    /// verification flag is reset and a link is sent to the new address.
    /// Setting the current address again is rejected.
    pub async fn change_email(&self, user_id: Uuid, new_email: &str) -> DomainResult<UpdatedEmail> {
        let email = normalize_email(new_email).ok_or(ValidationError::InvalidEmail)?;
        let current = self.find_user(user_id).await?;

        if current.email == email {
            return Err(DomainError::BusinessRule {
                message: "Email address is unchanged".to_string(),
            });
        }

        if self.users.email_exists(&email).await? {
            return Err(DomainError::Conflict {
                message: "Email already registered".to_string(),
            });
        }

        // Links already sent to the previous address must not verify the new one
        self.records.clear(user_id).await?;

        let user = self
            .users
            .change_email(user_id, &email)
            .await?
            .ok_or_else(|| not_found(user_id))?;

        tracing::info!(user_id = %user.id, event = "email_changed", "Account email changed");

        let receipt = self.verification.issue(&user).await?;
        Ok(UpdatedEmail { user, receipt })
    }

    /// Send a new confirmation link to an unverified account
    pub async fn resend_verification(&self, user_id: Uuid) -> DomainResult<IssueReceipt> {
        let user = self.find_user(user_id).await?;

        if user.is_verified {
            return Err(DomainError::Conflict {
                message: "Email address already verified".to_string(),
            });
        }

        self.verification.issue(&user).await
    }

    /// Look up an account
    pub async fn find_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found(user_id))
    }
}

fn not_found(user_id: Uuid) -> DomainError {
    DomainError::NotFound {
        resource: format!("user {}", user_id),
    }
}
