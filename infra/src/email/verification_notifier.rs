//! Notifier delivering confirmation links by email

use async_trait::async_trait;
use std::sync::Arc;

use es_core::services::verification::Notifier;

use super::email_service::{EmailMessage, EmailService};

pub const VERIFICATION_SUBJECT: &str = "Validate your email";

/// Renders the confirmation email and sends it through an [`EmailService`]
pub struct EmailVerificationNotifier<E: EmailService + ?Sized> {
    email: Arc<E>,
}

impl<E: EmailService + ?Sized> EmailVerificationNotifier<E> {
    pub fn new(email: Arc<E>) -> Self {
        Self { email }
    }

    /// Build the message for `recipient`
    pub fn render(recipient: &str, link: &str) -> EmailMessage {
        let html_body = format!(
            "<p>Hello,</p>\
             <p>Please confirm your email address to finish setting up your account.</p>\
             <p><a href=\"{link}\">Validate my email</a></p>\
             <p>The link is valid for a limited time. If it has expired, opening it sends you a new one.</p>",
            link = link
        );
        let text_body = format!(
            "Hello,\n\n\
             Please confirm your email address to finish setting up your account:\n\n\
             {link}\n\n\
             The link is valid for a limited time. If it has expired, opening it sends you a new one.\n",
            link = link
        );

        EmailMessage {
            to: recipient.to_string(),
            subject: VERIFICATION_SUBJECT.to_string(),
            html_body,
            text_body,
        }
    }
}

#[async_trait]
impl<E: EmailService + ?Sized> Notifier for EmailVerificationNotifier<E> {
    async fn notify(&self, recipient: &str, link: &str) -> Result<String, String> {
        let message = Self::render(recipient, link);
        self.email
            .send_email(&message)
            .await
            .map_err(|e| e.to_string())
    }

    fn channel_name(&self) -> &'static str {
        "email"
    }
}
