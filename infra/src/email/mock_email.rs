//! Mock Email Service Implementation
//!
//! Keeps messages in memory instead of sending them. Only the masked
//! recipient and subject reach the logs.

use async_trait::async_trait;
use es_shared::mask_email;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use uuid::Uuid;

use super::email_service::{EmailMessage, EmailService};
use crate::InfrastructureError;

/// Mock email service for development and testing
#[derive(Clone, Default)]
pub struct MockEmailService {
    /// Counter for tracking number of messages sent
    message_count: Arc<AtomicU64>,
    /// Whether to simulate failures (for testing)
    simulate_failure: Arc<AtomicBool>,
    outbox: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the total number of messages sent
    pub fn get_message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    /// Enable or disable failure simulation
    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Messages sent so far, oldest first
    pub fn sent(&self) -> Vec<EmailMessage> {
        match self.outbox.lock() {
            Ok(outbox) => outbox.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: &EmailMessage) -> Result<String, InfrastructureError> {
        let recipient = mask_email(&message.to);

        if self.simulate_failure.load(Ordering::SeqCst) {
            warn!(recipient = %recipient, "Mock email service simulating failure");
            return Err(InfrastructureError::Email(
                "Simulated email sending failure".to_string(),
            ));
        }

        let message_id = format!("mock_{}", Uuid::new_v4());
        self.message_count.fetch_add(1, Ordering::SeqCst);
        match self.outbox.lock() {
            Ok(mut outbox) => outbox.push(message.clone()),
            Err(poisoned) => poisoned.into_inner().push(message.clone()),
        }

        info!(
            target: "email_service",
            provider = "mock",
            recipient = %recipient,
            subject = %message.subject,
            message_id = %message_id,
            "Email accepted (mock)"
        );

        Ok(message_id)
    }

    fn provider_name(&self) -> &str {
        "Mock"
    }
}
