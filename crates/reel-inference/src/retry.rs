//! Bounded retry for remote models that report they are still loading.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::InferenceResult;

pub const DEFAULT_LOADING_RETRIES: u32 = 1;
pub const DEFAULT_LOADING_DELAY: Duration = Duration::from_secs(5);

/// Retries an operation a fixed number of times after a fixed delay, only for
/// "model loading" failures. Every other error is returned immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingRetryPolicy {
    /// Retries after the initial attempt
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for LoadingRetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_LOADING_RETRIES,
            delay: DEFAULT_LOADING_DELAY,
        }
    }
}

impl LoadingRetryPolicy {
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// No retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub async fn run<F, Fut, T>(&self, operation_name: &str, operation: F) -> InferenceResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = InferenceResult<T>>,
    {
        let mut attempt = 0u32;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_loading() && attempt < self.max_retries => {
                    attempt += 1;
                    warn!(
                        operation = operation_name,
                        attempt,
                        delay_ms = self.delay.as_millis() as u64,
                        "Model loading, retrying: {}",
                        e
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
