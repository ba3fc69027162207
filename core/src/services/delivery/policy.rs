//! Retry policy for notification delivery

use es_shared::DeliveryConfig;
use rand::Rng;
use std::time::Duration;

/// Exponential backoff with a cap.
///
/// The delay before retry `n` (zero-based) is `initial_backoff * 2^n`,
/// capped at `max_backoff`. With jitter enabled the actual delay is drawn
/// uniformly from the upper half of that value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(600),
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// Policy without jitter, for deterministic schedules
    pub fn fixed(max_retries: u32, initial_backoff: Duration, max_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            max_backoff,
            jitter: false,
        }
    }

    pub fn from_config(config: &DeliveryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            jitter: true,
        }
    }

    /// First attempt plus retries
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Backoff before retry `retry` (zero-based), before jitter
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    /// Delay actually waited before retry `retry`
    pub fn delay(&self, retry: u32) -> Duration {
        let backoff = self.backoff(retry);
        if !self.jitter || backoff.is_zero() {
            return backoff;
        }
        let half = backoff / 2;
        let extra = rand::thread_rng().gen_range(0..=(backoff - half).as_millis() as u64);
        half + Duration::from_millis(extra)
    }
}
