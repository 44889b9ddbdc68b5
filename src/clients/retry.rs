//! Retry and fallback wrappers for backend operations.
//!
//! This module provides [`RetryPolicy`] for re-invoking failed asynchronous
//! operations with linear backoff, and the [`with_fallback`] /
//! [`with_fallback_if`] helpers for substituting a default value on failure.
//!
//! # Retry Behavior
//!
//! The default policy reproduces the storefront's behavior: up to 3 attempts,
//! a base delay of 1000 ms growing linearly (`delay × attempt`), and an
//! immediate rethrow when the classified error is an authentication or
//! authorization failure (401/403). Both the backoff curve and the
//! retryability test are configurable.
//!
//! # Example
//!
//! ```rust,ignore
//! use storefront_api::clients::{RetryPolicy, StoreError};
//!
//! let policy = RetryPolicy::default();
//! let products = policy.run(|| api.list_products()).await?;
//! ```

use std::future::Future;
use std::time::Duration;

use crate::clients::errors::{classify, StoreError};

/// Default maximum number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default base delay between attempts.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

type BackoffFn = Box<dyn Fn(Duration, u32) -> Duration + Send + Sync>;
type RetryPredicate = Box<dyn Fn(&StoreError) -> bool + Send + Sync>;

/// A configurable retry policy for asynchronous backend operations.
///
/// # Defaults
///
/// - `max_attempts`: 3
/// - `base_delay`: 1000 ms
/// - backoff: linear, `base_delay × attempt_number` (no jitter, no cap)
/// - retryable: everything except classified 401/403 failures
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use storefront_api::clients::RetryPolicy;
///
/// let policy = RetryPolicy::new(5, Duration::from_millis(200))
///     .with_backoff(|base, attempt| base * 2_u32.pow(attempt - 1));
/// assert_eq!(policy.max_attempts(), 5);
/// ```
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    backoff: BackoffFn,
    retryable: RetryPredicate,
}

impl std::fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("base_delay", &self.base_delay)
            .finish_non_exhaustive()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt limit and base delay.
    #[must_use]
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            backoff: Box::new(|base, attempt| base * attempt),
            retryable: Box::new(|error| {
                !matches!(classify(error).status, Some(401 | 403))
            }),
        }
    }

    /// Creates a policy with the given attempt limit and the default delay.
    #[must_use]
    pub fn attempts(max_attempts: u32) -> Self {
        Self::new(max_attempts, DEFAULT_BASE_DELAY)
    }

    /// Replaces the backoff function.
    ///
    /// The function receives the base delay and the 1-based number of the
    /// attempt that just failed, and returns the wait before the next one.
    #[must_use]
    pub fn with_backoff<F>(mut self, backoff: F) -> Self
    where
        F: Fn(Duration, u32) -> Duration + Send + Sync + 'static,
    {
        self.backoff = Box::new(backoff);
        self
    }

    /// Replaces the retryability predicate.
    ///
    /// When the predicate returns `false` the error is rethrown immediately
    /// without consuming further attempts.
    #[must_use]
    pub fn with_retryable<F>(mut self, retryable: F) -> Self
    where
        F: Fn(&StoreError) -> bool + Send + Sync + 'static,
    {
        self.retryable = Box::new(retryable);
        self
    }

    /// Returns the attempt limit.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Invokes `op` until it succeeds or the policy gives up.
    ///
    /// Waits `backoff(base_delay, attempt)` between attempts. Never sleeps
    /// after the final attempt: when attempts are exhausted the last error is
    /// rethrown immediately.
    ///
    /// # Errors
    ///
    /// Returns the last error once attempts are exhausted, or the first
    /// non-retryable error encountered.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt >= self.max_attempts || !(self.retryable)(&error) {
                        return Err(error);
                    }
                    let delay = (self.backoff)(self.base_delay, attempt);
                    tracing::debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "retrying failed operation"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Runs `op`, substituting `fallback` for any failure.
///
/// The substitution is logged at `warn` level.
///
/// # Example
///
/// ```rust,ignore
/// let count = with_fallback(|| api.category_product_count(&id), 0).await;
/// ```
pub async fn with_fallback<T, F, Fut>(op: F, fallback: T) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    match op().await {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(error = %error, "primary source failed, using fallback value");
            fallback
        }
    }
}

/// Runs `op`, substituting `fallback` only when `should_fall_back` allows it.
///
/// # Errors
///
/// Rethrows the original error when the predicate returns `false`.
pub async fn with_fallback_if<T, F, Fut, P>(
    op: F,
    fallback: T,
    should_fall_back: P,
) -> Result<T, StoreError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
    P: FnOnce(&StoreError) -> bool,
{
    match op().await {
        Ok(value) => Ok(value),
        Err(error) => {
            if should_fall_back(&error) {
                tracing::warn!(error = %error, "primary source failed, using fallback value");
                Ok(fallback)
            } else {
                Err(error)
            }
        }
    }
}
