//! Status-triggered retry policy applied by `Session`.
//!
//! # Design
//! The policy is plain configuration: it decides whether a status is worth
//! another attempt and how long to wait first. Only idempotent GETs are ever
//! issued, so every request is eligible. Transport failures are never
//! retried.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::HttpResponse;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];
pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Statuses whose `Retry-After` header is honored.
const RETRY_AFTER_STATUS_CODES: [u16; 3] = [413, 429, 503];

/// How many times to try a request and which statuses trigger another try.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries allowed after the first request, so one call issues at most
    /// `max_attempts + 1` requests. Zero disables retrying.
    pub max_attempts: u32,
    /// Statuses that trigger another attempt. Anything else non-2xx fails
    /// immediately.
    pub retryable_status_codes: Vec<u16>,
    /// Seconds multiplied by `2^(n-1)` before the n-th consecutive retry.
    /// The first retry never waits.
    pub backoff_factor: f64,
    /// Upper bound for any single wait.
    #[serde(with = "secs")]
    pub max_backoff: Duration,
    /// Prefer the server's `Retry-After` seconds over the computed backoff.
    pub respect_retry_after: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.to_vec(),
            backoff_factor: 0.0,
            max_backoff: DEFAULT_MAX_BACKOFF,
            respect_retry_after: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that issues every request exactly once.
    pub fn none() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Upper bound on requests issued for one call.
    pub fn attempts(&self) -> u32 {
        self.max_attempts.saturating_add(1)
    }

    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Whether another request should follow `attempt` (1-based) that
    /// returned `status`.
    pub fn should_retry(&self, status: u16, attempt: u32) -> bool {
        self.is_retryable(status) && attempt <= self.max_attempts
    }

    /// Computed wait after `attempt` consecutive failures.
    pub fn backoff(&self, attempt: u32) -> Duration {
        if attempt <= 1 || self.backoff_factor <= 0.0 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let secs = self.backoff_factor * 2f64.powi(exponent);
        if !secs.is_finite() || secs >= self.max_backoff.as_secs_f64() {
            return self.max_backoff;
        }
        Duration::from_secs_f64(secs)
    }

    /// Wait before retrying `response`, the result of `attempt`.
    pub fn delay_for(&self, response: &HttpResponse, attempt: u32) -> Duration {
        if self.respect_retry_after && RETRY_AFTER_STATUS_CODES.contains(&response.status) {
            if let Some(secs) = response
                .header("retry-after")
                .and_then(|value| value.trim().parse::<u64>().ok())
            {
                return Duration::from_secs(secs).min(self.max_backoff);
            }
        }
        self.backoff(attempt)
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
