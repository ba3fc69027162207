//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Bearer token signing for authenticated endpoints
//! - `database` - Database connection and pool configuration
//! - `delivery` - Notification email provider and retry policy
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server and public URL configuration
//! - `verification` - Email verification token encryption and validity

pub mod auth;
pub mod database;
pub mod delivery;
pub mod environment;
pub mod server;
pub mod verification;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

// Re-export commonly used types
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use delivery::{DeliveryConfig, EmailProvider};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use verification::VerificationConfig;

/// Errors raised while validating configuration at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Verification token configuration
    pub verification: VerificationConfig,

    /// Notification delivery configuration
    pub delivery: DeliveryConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            verification: VerificationConfig::default(),
            delivery: DeliveryConfig::default(),
            auth: AuthConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            verification: VerificationConfig::from_env(),
            delivery: DeliveryConfig::from_env(),
            auth: AuthConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }

    /// Reject settings that are only acceptable during development
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() {
            if self.verification.encryption_key.is_none() {
                return Err(ConfigError::Missing("VERIFICATION_ENCRYPTION_KEY"));
            }
            if self.auth.is_using_default_secret() {
                return Err(ConfigError::Missing("JWT_SECRET"));
            }
        }

        if self.verification.token_validity_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "VERIFICATION_TOKEN_VALIDITY_MINUTES",
                reason: "must be a positive number of minutes".to_string(),
            });
        }

        self.delivery.validate()
    }

    /// Full link prefix that a transport token is appended to
    pub fn confirmation_link_base(&self) -> String {
        format!(
            "{}/api/v1/users/confirm?token=",
            self.server.public_base_url.trim_end_matches('/')
        )
    }
}

/// Read an environment variable and parse it, falling back to `default`
/// when it is absent or malformed
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a non-empty environment variable
pub(crate) fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
