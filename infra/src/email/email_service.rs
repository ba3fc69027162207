//! Email Service Interface
//!
//! Defines the trait for providers that send transactional email.

use async_trait::async_trait;

use crate::InfrastructureError;

/// A rendered email ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Email service trait for sending transactional messages
///
/// Implementations include:
/// - Brevo transactional email API
/// - Mock implementation for development and tests
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Send a message once
    ///
    /// # Returns
    ///
    /// * `Ok(message_id)` - Provider identifier of the sent message
    /// * `Err(InfrastructureError)` - If sending fails
    async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError>;

    /// Get the service provider name
    fn provider_name(&self) -> &str;
}
