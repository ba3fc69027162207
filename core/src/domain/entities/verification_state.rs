//! Derived verification state of an account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::verification_record::VerificationRecord;

/// Where an account stands in the email verification lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VerificationState {
    /// Email confirmed
    Verified,
    /// Unverified and no token outstanding
    NoToken,
    /// Unverified with a live token
    TokenPending { expires_at: DateTime<Utc> },
    /// Unverified with a token past its expiry (or missing one)
    TokenExpired,
}

impl VerificationState {
    /// Derives the state from the account flag and its record at `now`.
    ///
    /// A verified account reports `Verified` even if a token is still
    /// stored; `is_consistent` detects that combination.
    pub fn derive(
        is_verified: bool,
        record: Option<&VerificationRecord>,
        now: DateTime<Utc>,
    ) -> Self {
        if is_verified {
            return VerificationState::Verified;
        }

        match record {
            Some(record) if record.has_token() => match record.expires_at {
                Some(expires_at) if !record.is_expired(now) => {
                    VerificationState::TokenPending { expires_at }
                }
                _ => VerificationState::TokenExpired,
            },
            _ => VerificationState::NoToken,
        }
    }

    /// False when a verified account still holds a token
    pub fn is_consistent(is_verified: bool, record: Option<&VerificationRecord>) -> bool {
        !(is_verified && record.is_some_and(VerificationRecord::has_token))
    }

    /// Whether a confirmation link would currently be accepted
    pub fn accepts_confirmation(&self) -> bool {
        matches!(self, VerificationState::TokenPending { .. })
    }
}
