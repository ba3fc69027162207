//! Per-user verification record holding the current email token.

use chrono::{DateTime, Duration, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default validity window of an issued token
pub const TOKEN_VALIDITY_MINUTES: i64 = 60;

/// Random bytes drawn for each plaintext token
pub const TOKEN_ENTROPY_BYTES: usize = 128;

/// Length of the hex-encoded plaintext token (and of its storage column)
pub const TOKEN_MAX_LENGTH: usize = TOKEN_ENTROPY_BYTES * 2;

/// Verification record owned 1:1 by a user.
///
/// `token_plaintext` and `expires_at` are set together on issuance and
/// cleared together on consumption. A record whose `expires_at` is missing
/// counts as expired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Owning account
    pub user_id: Uuid,

    /// Current raw token; never sent over the network
    #[serde(skip_serializing)]
    pub token_plaintext: Option<String>,

    /// When the current token stops being accepted
    pub expires_at: Option<DateTime<Utc>>,
}

impl VerificationRecord {
    /// Creates the empty record that accompanies a new account
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            token_plaintext: None,
            expires_at: None,
        }
    }

    /// Creates a record carrying a freshly issued token
    pub fn issued(user_id: Uuid, token: String, issued_at: DateTime<Utc>, validity: Duration) -> Self {
        Self {
            user_id,
            token_plaintext: Some(token),
            expires_at: Some(issued_at + validity),
        }
    }

    /// True when `expires_at` is missing or strictly before `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at < now,
            None => true,
        }
    }

    /// Whether a token is currently stored, expired or not
    pub fn has_token(&self) -> bool {
        self.token_plaintext.is_some()
    }

    /// Whether the stored token equals `token`
    pub fn matches(&self, token: &str) -> bool {
        self.token_plaintext.as_deref() == Some(token)
    }

    /// Drops the token and its expiry
    pub fn clear(&mut self) {
        self.token_plaintext = None;
        self.expires_at = None;
    }
}

/// Generates a plaintext token from the operating system CSPRNG.
///
/// The result is the lowercase hex encoding of `TOKEN_ENTROPY_BYTES` bytes.
pub fn generate_plaintext_token() -> String {
    let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
