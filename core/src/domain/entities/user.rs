//! User entity representing a registered account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Normalized email address, unique across accounts
    pub email: String,

    /// bcrypt hash of the account password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Whether the current email address has been confirmed
    pub is_verified: bool,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the user was last updated
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new, unverified User
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            is_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the user as verified
    pub fn verify(&mut self) {
        self.is_verified = true;
        self.updated_at = Utc::now();
    }

    /// Replaces the email address; the new address must be verified again
    pub fn change_email(&mut self, email: String) {
        self.email = email;
        self.is_verified = false;
        self.updated_at = Utc::now();
    }
}

/// Normalizes an email address by trimming it and lowercasing the domain.
///
/// Returns `None` when the input does not have exactly one `@` separating a
/// non-empty local part from a dotted domain.
pub fn normalize_email(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (local, domain) = trimmed.split_once('@')?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return None;
    }
    if trimmed.chars().any(char::is_whitespace) {
        return None;
    }

    Some(format!("{}@{}", local, domain.to_lowercase()))
}
