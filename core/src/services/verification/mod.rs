//! Email verification token lifecycle
//!
//! This module provides:
//! - Token issuance (generate, persist, encrypt, hand off for delivery)
//! - Confirmation (decrypt, look up, expiry check, consume or reissue)
//! - The delivery seams the service hands links to

mod config;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use service::VerificationService;
pub use traits::{DeliveryScheduler, Notifier};
pub use types::{ConfirmOutcome, IssueReceipt};
