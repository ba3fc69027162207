//! Traits for handing confirmation links to the outside world

use async_trait::async_trait;

/// One delivery attempt of a confirmation link over an out-of-band channel
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send `link` to `recipient` once.
    ///
    /// Returns the provider message id. Failures are retried by the caller.
    async fn notify(&self, recipient: &str, link: &str) -> Result<String, String>;

    /// Channel name used in logs
    fn channel_name(&self) -> &'static str;
}

/// Fire-and-forget delivery of confirmation links.
///
/// `dispatch` must return without waiting for the notifier; retries happen
/// in the background.
pub trait DeliveryScheduler: Send + Sync {
    fn dispatch(&self, recipient: &str, link: String);
}
