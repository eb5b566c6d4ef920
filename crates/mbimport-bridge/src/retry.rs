//! Retry with exponential back-off and jitter.
//!
//! [`RetryPolicy::run`] wraps any fallible async operation and retries it
//! while the supplied classifier says the error is transient. The policy is
//! composed at each call site rather than baked into the transport, so the
//! attempt budgets of different layers never multiply.

use std::future::Future;
use std::time::Duration;

use crate::error::BridgeError;

/// Returns `true` for failures worth retrying on entity sync and image fetch.
///
/// **Retriable:**
/// - [`BridgeError::Http`]: connection errors, timeouts, broken bodies.
/// - [`BridgeError::UnexpectedStatus`]: any non-2xx other than 401.
///
/// **Not retriable:**
/// - [`BridgeError::Http`] raised while building the request (e.g. an
///   unparseable URL): it never left the process.
/// - [`BridgeError::Unauthorized`]: handled by re-authentication instead.
/// - [`BridgeError::Deserialize`] and [`BridgeError::InvalidBaseUrl`]:
///   repeating the request cannot fix them.
#[must_use]
pub fn is_transient(err: &BridgeError) -> bool {
    match err {
        BridgeError::Http(e) => !e.is_builder(),
        BridgeError::UnexpectedStatus { .. } => true,
        BridgeError::Unauthorized { .. }
        | BridgeError::Deserialize { .. }
        | BridgeError::InvalidBaseUrl { .. } => false,
    }
}

/// Returns `true` only for connection-level failures (refused connection,
/// timeout). Used for token exchanges, where an HTTP status is final.
#[must_use]
pub fn is_connection_failure(err: &BridgeError) -> bool {
    matches!(err, BridgeError::Http(e) if e.is_connect() || e.is_timeout())
}

/// Attempt budget and back-off schedule shared by every outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Upper bound for a single back-off sleep, before jitter.
    pub const MAX_DELAY: Duration = Duration::from_secs(60);

    /// Creates a policy allowing `max_attempts` total attempts (clamped to at
    /// least one) with `base_delay` before the first retry.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Nominal delay before the `retry`-th retry (1-based), without jitter.
    ///
    /// | Retry | Delay (`base_delay` = 1 s) |
    /// |-------|----------------------------|
    /// | 1     | 1 s                        |
    /// | 2     | 2 s                        |
    /// | 3     | 4 s                        |
    ///
    /// Capped at [`Self::MAX_DELAY`].
    #[must_use]
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(Self::MAX_DELAY)
    }

    /// Runs `operation` until it succeeds, fails with an error `is_retriable`
    /// rejects, or the attempt budget is spent. The last error is returned.
    ///
    /// # Errors
    ///
    /// Returns the error of the final attempt.
    pub async fn run<T, F, Fut>(
        &self,
        is_retriable: fn(&BridgeError) -> bool,
        mut operation: F,
    ) -> Result<T, BridgeError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BridgeError>>,
    {
        let mut attempt = 1u32;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if !is_retriable(&err) || attempt >= self.max_attempts {
                        return Err(err);
                    }
                    let delay = jittered(self.backoff_delay(attempt));
                    #[allow(clippy::cast_possible_truncation)]
                    let delay_ms = delay.as_millis() as u64;
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms,
                        error = %err,
                        "transient bridge error, retrying after back-off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Applies ±25 % jitter. Doubling delays stay strictly increasing under it.
fn jittered(delay: Duration) -> Duration {
    if delay.is_zero() {
        return delay;
    }
    delay.mul_f64(rand::random::<f64>() * 0.5 + 0.75)
}
