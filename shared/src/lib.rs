//! Shared utilities and common types for the Events Scheduler server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures returned by the HTTP layer
//! - Log redaction helpers

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, DatabaseConfig, DeliveryConfig, EmailProvider,
    Environment, LogFormat, LoggingConfig, ServerConfig, VerificationConfig,
};
pub use types::{ErrorResponse, MessageResponse};
pub use utils::mask_email;
