//! Polling waits with timeouts.
//!
//! Every wait in this crate is a condition polled at a fixed interval until
//! it holds or the timeout expires. Visibility expectations use the shorter
//! [`DEFAULT_EXPECT_TIMEOUT`]; navigation and selector waits default to
//! [`DEFAULT_TIMEOUT`].

use crate::error::{BrowserError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};

/// Default timeout for wait operations (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for visibility expectations (5 seconds).
pub const DEFAULT_EXPECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default poll interval for checking conditions (100ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for wait operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitConfig {
    /// Maximum time to wait for the condition.
    pub timeout: Duration,

    /// How often to check if the condition is satisfied.
    pub poll_interval: Duration,
}

impl WaitConfig {
    /// Creates a new wait configuration.
    #[must_use]
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    /// Creates a config with custom timeout and default poll interval.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(timeout, DEFAULT_POLL_INTERVAL)
    }

    /// The config used by `expect_visible` when none is given.
    #[must_use]
    pub fn expect() -> Self {
        Self::with_timeout(DEFAULT_EXPECT_TIMEOUT)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_POLL_INTERVAL)
    }
}

/// Waits for a condition to become true, with timeout.
///
/// The condition is checked at least once, even with a zero timeout. A
/// check still running at the deadline is cancelled.
///
/// # Errors
///
/// Returns `WaitTimeout` if the condition is still false when the timeout
/// expires.
pub async fn wait_for<F, Fut>(condition: F, config: WaitConfig, description: &str) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = bool>,
{
    wait_for_result(
        || {
            let check = condition();
            async move { Ok(check.await) }
        },
        config,
        description,
    )
    .await
}

/// Waits for a condition that returns a `Result<bool>`.
///
/// Errors from the condition are treated as "not yet": a page that is
/// mid-navigation rejects script evaluation for a moment. Each check is
/// bounded by the time left, so a hung check cannot stretch the wait.
///
/// # Errors
///
/// Returns `WaitTimeout` if the condition never returned `Ok(true)`.
pub async fn wait_for_result<F, Fut>(
    condition: F,
    config: WaitConfig,
    description: &str,
) -> Result<()>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + config.timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match timeout(remaining, condition()).await {
            Ok(Ok(true)) => return Ok(()),
            Ok(Ok(false)) => {}
            Ok(Err(e)) => tracing::trace!("transient error while waiting for {description}: {e}"),
            Err(_) => tracing::trace!("check for {description} still running at the deadline"),
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(BrowserError::WaitTimeout {
                condition: description.to_string(),
                timeout: config.timeout,
            });
        }

        sleep(config.poll_interval.min(remaining)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn wait_for_succeeds_immediately() {
        let result = wait_for(|| async { true }, WaitConfig::default(), "test condition").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn wait_for_succeeds_eventually() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = wait_for(
            move || {
                let c = counter_clone.clone();
                async move {
                    let count = c.fetch_add(1, Ordering::SeqCst);
                    count >= 3
                }
            },
            WaitConfig::with_timeout(Duration::from_secs(5)),
            "counter >= 3",
        )
        .await;

        assert!(result.is_ok());
        assert!(counter.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn wait_for_times_out() {
        let result = wait_for(
            || async { false },
            WaitConfig::new(Duration::from_millis(100), Duration::from_millis(10)),
            "impossible condition",
        )
        .await;

        assert!(matches!(result, Err(BrowserError::WaitTimeout { .. })));
    }

    #[tokio::test]
    async fn wait_for_result_keeps_polling_through_errors() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = wait_for_result(
            move || {
                let c = counter_clone.clone();
                async move {
                    match c.fetch_add(1, Ordering::SeqCst) {
                        0 | 1 => Err(BrowserError::ScriptExecutionFailed("navigating".into())),
                        _ => Ok(true),
                    }
                }
            },
            WaitConfig::new(Duration::from_secs(5), Duration::from_millis(5)),
            "recovers after errors",
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn wait_for_result_reports_description_on_timeout() {
        let result = wait_for_result(
            || async { Ok(false) },
            WaitConfig::new(Duration::from_millis(50), Duration::from_millis(10)),
            "text=Pricing & Values",
        )
        .await;

        match result {
            Err(BrowserError::WaitTimeout { condition, timeout }) => {
                assert_eq!(condition, "text=Pricing & Values");
                assert_eq!(timeout, Duration::from_millis(50));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wait_for_result_cancels_a_hung_check_at_the_deadline() {
        let started = Instant::now();
        let result = wait_for_result(
            || async {
                sleep(Duration::from_secs(2)).await;
                Ok(true)
            },
            WaitConfig::new(Duration::from_millis(100), Duration::from_millis(10)),
            "slow evaluate",
        )
        .await;

        assert!(matches!(result, Err(BrowserError::WaitTimeout { .. })));
        assert!(started.elapsed() < Duration::from_secs(1), "{:?}", started.elapsed());
    }

    #[tokio::test]
    async fn wait_for_stops_at_the_deadline_with_a_slow_condition() {
        let started = Instant::now();
        let result = wait_for(
            || async {
                sleep(Duration::from_secs(2)).await;
                true
            },
            WaitConfig::new(Duration::from_millis(100), Duration::from_millis(10)),
            "slow condition",
        )
        .await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(1), "{:?}", started.elapsed());
    }

    #[tokio::test]
    async fn zero_timeout_still_checks_once() {
        let result = wait_for(
            || async { true },
            WaitConfig::new(Duration::ZERO, Duration::from_millis(10)),
            "ready now",
        )
        .await;

        assert!(result.is_ok());
    }

    #[test]
    fn expect_config_uses_five_seconds() {
        assert_eq!(WaitConfig::expect().timeout, Duration::from_secs(5));
        assert_eq!(WaitConfig::expect().poll_interval, DEFAULT_POLL_INTERVAL);
    }
}
