//! # Events Scheduler Core
//!
//! Core business logic and domain layer for the Events Scheduler backend.
//! This crate contains the account and verification entities, the repository
//! interfaces they are persisted through, the token cipher, and the services
//! that drive the email verification lifecycle.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
