//! Tokio-backed delivery scheduler

use es_shared::mask_email;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::services::verification::{DeliveryScheduler, Notifier};

use super::policy::RetryPolicy;

/// How a delivery ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered { message_id: String },
    GaveUp { last_error: String },
}

/// Summary of one background delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub attempts: u32,
    pub outcome: DeliveryOutcome,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        matches!(self.outcome, DeliveryOutcome::Delivered { .. })
    }
}

/// Spawns one tokio task per dispatched link and retries the notifier
/// according to its [`RetryPolicy`].
pub struct TokioDeliveryScheduler<N: Notifier + ?Sized> {
    notifier: Arc<N>,
    policy: RetryPolicy,
}

impl<N: Notifier + ?Sized + 'static> TokioDeliveryScheduler<N> {
    pub fn new(notifier: Arc<N>, policy: RetryPolicy) -> Self {
        Self { notifier, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Start delivering `link` in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_delivery(&self, recipient: String, link: String) -> JoinHandle<DeliveryReport> {
        let notifier = self.notifier.clone();
        let policy = self.policy.clone();
        tokio::spawn(async move { deliver(notifier.as_ref(), &policy, &recipient, &link).await })
    }
}

impl<N: Notifier + ?Sized + 'static> DeliveryScheduler for TokioDeliveryScheduler<N> {
    fn dispatch(&self, recipient: &str, link: String) {
        // detached; the report only reaches the logs
        drop(self.spawn_delivery(recipient.to_string(), link));
    }
}

async fn deliver<N: Notifier + ?Sized>(
    notifier: &N,
    policy: &RetryPolicy,
    recipient: &str,
    link: &str,
) -> DeliveryReport {
    let total = policy.total_attempts();
    let mut attempt = 0;

    loop {
        attempt += 1;
        match notifier.notify(recipient, link).await {
            Ok(message_id) => {
                info!(
                    channel = notifier.channel_name(),
                    recipient = %mask_email(recipient),
                    attempt,
                    message_id = %message_id,
                    event = "verification_link_delivered",
                    "Verification link delivered"
                );
                return DeliveryReport {
                    attempts: attempt,
                    outcome: DeliveryOutcome::Delivered { message_id },
                };
            }
            Err(error) if attempt >= total => {
                warn!(
                    channel = notifier.channel_name(),
                    recipient = %mask_email(recipient),
                    attempts = attempt,
                    error = %error,
                    event = "verification_link_undeliverable",
                    "Giving up on verification link delivery"
                );
                return DeliveryReport {
                    attempts: attempt,
                    outcome: DeliveryOutcome::GaveUp { last_error: error },
                };
            }
            Err(error) => {
                let delay = policy.delay(attempt - 1);
                warn!(
                    channel = notifier.channel_name(),
                    recipient = %mask_email(recipient),
                    attempt,
                    error = %error,
                    retry_in_ms = delay.as_millis() as u64,
                    "Verification link delivery failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
