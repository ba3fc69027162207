//! Authentication configuration for bearer-protected endpoints

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or};

const DEFAULT_SECRET: &str = "your-secret-key-change-in-production";

/// JWT signing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// HS256 secret used to sign and verify access tokens
    pub jwt_secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 3600,
        }
    }
}

impl AuthConfig {
    /// Create a new configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self {
            jwt_secret: env_opt("JWT_SECRET").unwrap_or_else(|| String::from(DEFAULT_SECRET)),
            access_token_expiry: env_or("JWT_ACCESS_TOKEN_EXPIRY", 3600),
        }
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_SECRET
    }
}
