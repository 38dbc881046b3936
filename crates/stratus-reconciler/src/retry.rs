use std::future::Future;
use std::time::Duration;

use stratus_core::ProviderError;

use crate::error::ReconcileError;

/// Bounded retry for read-only listing calls. Mutating calls are never
/// retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Run `op` until it succeeds, fails permanently, or exhausts the budget.
    ///
    /// Only throttled and transient errors are retried. Exhaustion is
    /// reported as `RetryExhausted` wrapping the last error; a permanent
    /// error is returned as-is after a single attempt.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T, ReconcileError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(label, attempt, error = %e, "retryable failure, backing off");
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) if e.is_retryable() => {
                    tracing::error!(label, attempts = attempt + 1, "retry budget exhausted");
                    return Err(ReconcileError::RetryExhausted { last: e });
                }
                Err(e) => return Err(ReconcileError::Provider(e)),
            }
        }
    }
}
