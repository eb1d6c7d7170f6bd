//! Retry with exponential back-off and jitter for inference calls.
//!
//! This is the HTTP client's own policy; the pipeline never retries a failed
//! stage on top of it.

use std::future::Future;
use std::time::Duration;

use crate::error::InferenceError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** connect failures, timeouts, HTTP 429 and 5xx (hosted models
/// answer 503 while loading).
///
/// **Not retriable:** other 4xx statuses and malformed payloads.
pub(crate) fn is_retriable(err: &InferenceError) -> bool {
    match err {
        InferenceError::Http { source, .. } => source.is_timeout() || source.is_connect(),
        InferenceError::Status { status, .. } => *status == 429 || (500..=599).contains(status),
        InferenceError::Timeout { .. } => true,
        InferenceError::MalformedResponse { .. } => false,
    }
}

const MAX_DELAY_MS: u64 = 30_000;

/// Back-off before retry `attempt` (1-based), before jitter.
fn capped_delay_ms(attempt: u32, backoff_base_ms: u64) -> u64 {
    backoff_base_ms
        .saturating_mul(1u64 << attempt.saturating_sub(1).min(10))
        .min(MAX_DELAY_MS)
}

/// Longest time one call can spend in [`retry_with_backoff`] when every
/// attempt runs into its `attempt_timeout`: all attempts plus every back-off
/// at maximum jitter.
#[must_use]
pub fn retry_budget(attempt_timeout: Duration, max_retries: u32, backoff_base_ms: u64) -> Duration {
    let backoff_ms = (1..=max_retries)
        .map(|attempt| capped_delay_ms(attempt, backoff_base_ms))
        .fold(0u64, u64::saturating_add);
    attempt_timeout
        .saturating_mul(max_retries.saturating_add(1))
        .saturating_add(Duration::from_millis(backoff_ms.saturating_mul(5) / 4))
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The wait before retry `n` is `backoff_base_ms × 2^(n-1)` ± 25 % jitter,
/// capped at 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, InferenceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, InferenceError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let capped = capped_delay_ms(attempt, backoff_base_ms);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "inference transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
