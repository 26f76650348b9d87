//! # Upload Retry Policy
//!
//! Explicit, caller-owned retry configuration for the upload loop: a
//! bounded attempt count with linearly increasing backoff, and a hook
//! invoked with the attempt number before each try so callers can surface
//! progress.

use std::sync::Arc;
use std::time::Duration;

/// Called with the 1-based attempt number before each upload attempt.
pub type AttemptHook = Arc<dyn Fn(u32) + Send + Sync>;

/// Bounded-retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Must be at least 1.
    pub max_attempts: u32,
    /// Backoff unit. The wait before attempt `n` is
    /// `base_delay * (n - 1)`: no wait before the first attempt.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait before the given 1-based attempt.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        self.base_delay * attempt.saturating_sub(1)
    }
}
