//! Bounded-retry assertion runner.
//!
//! Re-evaluates a caller-supplied check until it stops failing or a deadline
//! passes. Waiting is done on tokio timers, so the caller's other tasks keep
//! running while a sequence is pending.
//!
//! Semantics:
//! - the first attempt happens one `interval` after the call, never at elapsed zero;
//! - attempts are strictly sequential, each preceded by an `interval` wait;
//! - the deadline is only checked after a failing attempt, with a strict
//!   `elapsed > timeout` comparison;
//! - on timeout the assertion's own error is returned unchanged. There is no
//!   dedicated timeout error; [`RetryOutcome::elapsed`] tells the two apart.
//!
//! Every failure is treated as retryable, including ones that can never
//! succeed. Callers that need a fail-fast path should check for it inside the
//! assertion.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(20);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Pacing of a retry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryOptions {
    /// Wait before every attempt, the first included.
    pub interval: Duration,
    /// Elapsed time after which a failing attempt settles the sequence.
    pub timeout: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RetryOptions {
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub const fn from_millis(interval_ms: u64, timeout_ms: u64) -> Self {
        Self::new(
            Duration::from_millis(interval_ms),
            Duration::from_millis(timeout_ms),
        )
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Phase of a retry sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    Waiting,
    Attempting,
    Retrying,
    Succeeded,
    Failed,
}

enum Step<T, E> {
    Waiting,
    Attempting,
    Retrying,
    Succeeded(T),
    Failed(E),
}

impl<T, E> Step<T, E> {
    fn state(&self) -> RetryState {
        match self {
            Step::Waiting => RetryState::Waiting,
            Step::Attempting => RetryState::Attempting,
            Step::Retrying => RetryState::Retrying,
            Step::Succeeded(_) => RetryState::Succeeded,
            Step::Failed(_) => RetryState::Failed,
        }
    }
}

/// Settled result of a retry sequence plus how it got there.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    /// Number of times the assertion was invoked.
    pub attempts: u32,
    /// Time from the call to settlement.
    pub elapsed: Duration,
}

impl<T, E> RetryOutcome<T, E> {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// True when the sequence gave up because the deadline passed.
    pub fn timed_out(&self, options: &RetryOptions) -> bool {
        self.result.is_err() && self.elapsed > options.timeout
    }

    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Retry `assertion` until it returns `Ok` or the deadline passes.
///
/// Resolves with the first success value, or with the error of the failing
/// attempt that found the deadline exceeded.
pub async fn try_assertion<T, E, F>(assertion: F, options: RetryOptions) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
{
    try_assertion_with_outcome(assertion, options)
        .await
        .into_result()
}

/// Like [`try_assertion`], also reporting attempt count and elapsed time.
pub async fn try_assertion_with_outcome<T, E, F>(
    mut assertion: F,
    options: RetryOptions,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Result<T, E>,
{
    let start = Instant::now();
    let mut attempts: u32 = 0;
    let mut step = Step::Waiting;

    loop {
        trace!(state = ?step.state(), attempts, "Retry step");
        step = match step {
            Step::Waiting => {
                wait(options.interval).await;
                Step::Attempting
            }
            Step::Attempting => {
                attempts = attempts.saturating_add(1);
                match assertion() {
                    Ok(value) => Step::Succeeded(value),
                    Err(err) => {
                        let elapsed = start.elapsed();
                        if elapsed > options.timeout {
                            Step::Failed(err)
                        } else {
                            debug!(
                                attempt = attempts,
                                elapsed_ms = saturating_millis(elapsed),
                                timeout_ms = saturating_millis(options.timeout),
                                "Assertion failed, retrying"
                            );
                            Step::Retrying
                        }
                    }
                }
            }
            Step::Retrying => Step::Waiting,
            Step::Succeeded(value) => {
                if attempts > 1 {
                    debug!(attempts, "Assertion passed after retry");
                }
                return RetryOutcome {
                    result: Ok(value),
                    attempts,
                    elapsed: start.elapsed(),
                };
            }
            Step::Failed(err) => {
                let elapsed = start.elapsed();
                debug!(
                    attempts,
                    elapsed_ms = saturating_millis(elapsed),
                    "Assertion still failing after timeout"
                );
                return RetryOutcome {
                    result: Err(err),
                    attempts,
                    elapsed,
                };
            }
        };
    }
}

/// Start a retry sequence on the tokio runtime and return its handle at once.
///
/// Must be called from within a runtime. The sequence keeps running even if
/// the handle is dropped.
pub fn spawn_try_assertion<T, E, F>(assertion: F, options: RetryOptions) -> JoinHandle<Result<T, E>>
where
    F: FnMut() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    tokio::spawn(try_assertion(assertion, options))
}

/// Whole milliseconds of `duration`, saturating at `u64::MAX`.
pub(crate) fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

async fn wait(interval: Duration) {
    if interval.is_zero() {
        // A zero interval still gives other tasks a turn between attempts.
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RetryOptions::default();
        assert_eq!(options.interval, Duration::from_millis(20));
        assert_eq!(options.timeout, Duration::from_millis(1000));
        assert_eq!(options, RetryOptions::from_millis(20, 1000));
    }

    #[test]
    fn test_builder() {
        let options = RetryOptions::default()
            .with_interval(Duration::from_millis(5))
            .with_timeout(Duration::from_millis(50));
        assert_eq!(options, RetryOptions::from_millis(5, 50));
    }

    #[test]
    fn test_saturating_millis() {
        assert_eq!(saturating_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_fourth_attempt() {
        let start = Instant::now();
        let mut calls = Vec::new();

        let result: Result<i32, String> = try_assertion(
            || {
                calls.push(start.elapsed());
                if calls.len() < 4 {
                    Err(format!("attempt {}", calls.len()))
                } else {
                    Ok(42)
                }
            },
            RetryOptions::from_millis(10, 1000),
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.len(), 4);
        assert!(calls[3] >= Duration::from_millis(40));
        for pair in calls.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(10));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_rejects_with_own_error() {
        let start = Instant::now();
        let outcome = try_assertion_with_outcome(
            || Err::<(), _>("nope".to_string()),
            RetryOptions::from_millis(50, 100),
        )
        .await;

        assert_eq!(outcome.result, Err("nope".to_string()));
        assert!(outcome.elapsed > Duration::from_millis(100));
        assert!(outcome.elapsed <= Duration::from_millis(200));
        assert!(start.elapsed() <= Duration::from_millis(200));
        // Attempts at 50, 100 (not past the deadline) and 150.
        assert_eq!(outcome.attempts, 3);
        assert!(outcome.timed_out(&RetryOptions::from_millis(50, 100)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_waits_one_interval() {
        let start = Instant::now();
        let mut first_call = None;
        let result: Result<(), ()> = try_assertion(
            || {
                first_call.get_or_insert(start.elapsed());
                Ok(())
            },
            RetryOptions::from_millis(30, 1000),
        )
        .await;

        assert!(result.is_ok());
        let first_call = first_call.unwrap();
        assert!(first_call >= Duration::from_millis(30));
        assert!(first_call < Duration::from_millis(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_equal_interval_and_timeout_still_retries_once() {
        let mut attempts = 0;
        let result: Result<(), u32> = try_assertion(
            || {
                attempts += 1;
                Err(attempts)
            },
            RetryOptions::from_millis(100, 100),
        )
        .await;

        // Attempt 1 at 100ms is not past the deadline; attempt 2 at 200ms is.
        assert_eq!(result, Err(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_sequence_does_not_block_caller() {
        let handle = spawn_try_assertion(
            || Err::<(), _>("still failing"),
            RetryOptions::from_millis(20, 60),
        );
        // The caller gets control back before any attempt has run.
        assert!(!handle.is_finished());
        let result = handle.await.unwrap();
        assert_eq!(result, Err("still failing"));
    }

    #[tokio::test]
    async fn test_zero_interval_yields_between_attempts() {
        let mut attempts = 0;
        let result: Result<u32, ()> = try_assertion(
            || {
                attempts += 1;
                if attempts == 5 { Ok(attempts) } else { Err(()) }
            },
            RetryOptions::from_millis(0, 1000),
        )
        .await;
        assert_eq!(result, Ok(5));
    }
}
