//! Notification delivery configuration

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or, ConfigError};

/// Email provider used for verification messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailProvider {
    /// Log messages instead of sending them
    #[default]
    Mock,
    /// Brevo transactional email API
    Brevo,
}

impl std::str::FromStr for EmailProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(EmailProvider::Mock),
            "brevo" => Ok(EmailProvider::Brevo),
            _ => Err(format!("Unknown email provider: {}", s)),
        }
    }
}

/// Email provider credentials and retry policy for background delivery
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeliveryConfig {
    /// Which provider sends the messages
    pub provider: EmailProvider,

    /// Provider API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Sender address
    pub sender_address: String,

    /// Sender display name
    pub sender_name: Option<String>,

    /// Retries after the first failed attempt
    pub max_retries: u32,

    /// Delay before the first retry, doubled on each subsequent retry
    pub initial_backoff_ms: u64,

    /// Upper bound on a single retry delay
    pub max_backoff_ms: u64,

    /// Timeout for a single provider request in seconds
    pub request_timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            provider: EmailProvider::Mock,
            api_key: None,
            sender_address: String::from("no-reply@events-scheduler.local"),
            sender_name: Some(String::from("Events Scheduler")),
            max_retries: 3,
            initial_backoff_ms: 1000,
            max_backoff_ms: 600_000,
            request_timeout_secs: 30,
        }
    }
}

impl DeliveryConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            provider: env_or("EMAIL_PROVIDER", defaults.provider),
            api_key: env_opt("BREVO_API_KEY"),
            sender_address: env_opt("EMAIL_SENDER_ADDRESS").unwrap_or(defaults.sender_address),
            sender_name: env_opt("EMAIL_SENDER_NAME").or(defaults.sender_name),
            max_retries: env_or("DELIVERY_MAX_RETRIES", defaults.max_retries),
            initial_backoff_ms: env_or("DELIVERY_INITIAL_BACKOFF_MS", defaults.initial_backoff_ms),
            max_backoff_ms: env_or("DELIVERY_MAX_BACKOFF_MS", defaults.max_backoff_ms),
            request_timeout_secs: env_or("EMAIL_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
        }
    }

    /// Check provider credentials and backoff bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider == EmailProvider::Brevo && self.api_key.is_none() {
            return Err(ConfigError::Missing("BREVO_API_KEY"));
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(ConfigError::Invalid {
                key: "DELIVERY_INITIAL_BACKOFF_MS",
                reason: "must not exceed DELIVERY_MAX_BACKOFF_MS".to_string(),
            });
        }
        Ok(())
    }
}
