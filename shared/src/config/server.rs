//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{env_opt, env_or};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Externally reachable origin used when building confirmation links
    pub public_base_url: String,

    /// Page users land on after following a confirmation link
    pub landing_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            public_base_url: String::from("http://127.0.0.1:8080"),
            landing_path: String::from("/"),
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let host = env_opt("SERVER_HOST").unwrap_or(defaults.host);
        let port = env_or("SERVER_PORT", defaults.port);
        let public_base_url =
            env_opt("PUBLIC_BASE_URL").unwrap_or_else(|| format!("http://{}:{}", host, port));

        Self {
            host,
            port,
            public_base_url,
            landing_path: env_opt("LANDING_PATH").unwrap_or(defaults.landing_path),
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
