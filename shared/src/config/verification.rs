//! Email verification token configuration

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or};

/// Default lifetime of an issued verification token
pub const DEFAULT_TOKEN_VALIDITY_MINUTES: i64 = 60;

/// Settings for the verification token lifecycle
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// URL-safe base64 encoding of the 256-bit symmetric key.
    ///
    /// When absent outside production an ephemeral key is generated at
    /// startup, which invalidates every outstanding link on restart.
    #[serde(skip_serializing)]
    pub encryption_key: Option<String>,

    /// Minutes an issued token stays valid
    pub token_validity_minutes: i64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            encryption_key: None,
            token_validity_minutes: DEFAULT_TOKEN_VALIDITY_MINUTES,
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            encryption_key: env_opt("VERIFICATION_ENCRYPTION_KEY"),
            token_validity_minutes: env_or(
                "VERIFICATION_TOKEN_VALIDITY_MINUTES",
                DEFAULT_TOKEN_VALIDITY_MINUTES,
            ),
        }
    }
}
