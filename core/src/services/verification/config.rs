//! Configuration for the verification service

use chrono::Duration;
use es_shared::AppConfig;

use crate::domain::entities::verification_record::TOKEN_VALIDITY_MINUTES;

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// How long an issued token stays valid
    pub token_validity: Duration,
    /// Prefix the transport token is appended to when building the link
    pub confirmation_link_base: String,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            token_validity: Duration::minutes(TOKEN_VALIDITY_MINUTES),
            confirmation_link_base: String::from(
                "http://127.0.0.1:8080/api/v1/users/confirm?token=",
            ),
        }
    }
}

impl From<&AppConfig> for VerificationServiceConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            token_validity: Duration::minutes(config.verification.token_validity_minutes),
            confirmation_link_base: config.confirmation_link_base(),
        }
    }
}
