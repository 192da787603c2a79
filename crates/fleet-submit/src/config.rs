//! Submission settings.

use std::time::Duration;

use fleet_model::DEFAULT_BATCH_SIZE;
use serde::{Deserialize, Serialize};

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default number of extra attempts for a batch after a retryable failure.
pub const DEFAULT_MAX_BATCH_RETRIES: u32 = 1;

/// Knobs for preview and chunked submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitSettings {
    /// Records per batch request.
    pub batch_size: usize,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Extra attempts per batch, only for retryable failures.
    pub max_batch_retries: u32,
    /// Pause before each retry, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_batch_retries: DEFAULT_MAX_BATCH_RETRIES,
            retry_delay_ms: 500,
        }
    }
}

impl SubmitSettings {
    /// Batch size, never below one.
    pub fn batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Total attempts allowed per batch.
    pub fn max_attempts(&self) -> u32 {
        self.max_batch_retries.saturating_add(1)
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn with_retries(mut self, max_batch_retries: u32, retry_delay_ms: u64) -> Self {
        self.max_batch_retries = max_batch_retries;
        self.retry_delay_ms = retry_delay_ms;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = SubmitSettings::default();
        assert_eq!(settings.batch_size(), 500);
        assert_eq!(settings.request_timeout(), Duration::from_secs(60));
        assert_eq!(settings.max_attempts(), 2);
    }

    #[test]
    fn zero_batch_size_is_clamped() {
        assert_eq!(SubmitSettings::default().with_batch_size(0).batch_size(), 1);
    }
}
