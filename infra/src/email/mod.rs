//! Email service module
//!
//! This module provides email functionality including:
//! - Transactional email providers (Brevo, mock)
//! - The notifier that sends verification links by email
//! - A factory selecting the provider from configuration

pub mod brevo;
pub mod email_service;
pub mod mock_email;
pub mod verification_notifier;


pub use brevo::BrevoEmailService;
pub use email_service::{EmailMessage, EmailService};
pub use mock_email::MockEmailService;
pub use verification_notifier::EmailVerificationNotifier;

use es_shared::{DeliveryConfig, EmailProvider};
use std::sync::Arc;

use crate::InfrastructureError;

/// Create the email service selected by `config.provider`
pub fn create_email_service(
    config: &DeliveryConfig,
) -> Result<Arc<dyn EmailService>, InfrastructureError> {
    match config.provider {
        EmailProvider::Mock => {
            tracing::warn!("Using mock email service; messages are not sent");
            Ok(Arc::new(MockEmailService::new()))
        }
        EmailProvider::Brevo => {
            tracing::info!("Using Brevo email service");
            Ok(Arc::new(BrevoEmailService::from_config(config)?))
        }
    }
}
