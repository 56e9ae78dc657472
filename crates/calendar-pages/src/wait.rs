//! Wait mechanisms
//!
//! Every wait in this crate is a bounded poll: check a condition, sleep for
//! the poll interval, and give up with [`PageError::Timeout`] once the timeout
//! has elapsed. The condition is always checked at least once, so a zero
//! timeout degrades to a single attempt.

use crate::result::{PageError, PageResult};
use std::time::{Duration, Instant};

/// Default search timeout applied to a scoped session (5 seconds)
pub const DEFAULT_SEARCH_TIMEOUT_MS: u64 = 5000;

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for wait operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_SEARCH_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create new wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Get timeout as Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Get poll interval as Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Result of a successful wait
#[derive(Debug, Clone)]
pub struct WaitResult {
    /// Time spent waiting
    pub elapsed: Duration,
    /// Number of times the condition was checked
    pub attempts: u32,
    /// Description of what was waited for
    pub waited_for: String,
}

/// Poll `check` until it yields `Some`, or time out.
///
/// Errors returned by `check` end the wait immediately.
pub fn poll_until<T, F>(
    options: &WaitOptions,
    waited_for: &str,
    mut check: F,
) -> PageResult<(T, WaitResult)>
where
    F: FnMut() -> PageResult<Option<T>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let mut attempts = 0_u32;

    loop {
        attempts += 1;
        if let Some(value) = check()? {
            let result = WaitResult {
                elapsed: start.elapsed(),
                attempts,
                waited_for: waited_for.to_string(),
            };
            return Ok((value, result));
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            tracing::debug!(waited_for, attempts, "wait timed out");
            return Err(PageError::Timeout {
                ms: options.timeout_ms,
                waited_for: waited_for.to_string(),
            });
        }
        std::thread::sleep(options.poll_interval().min(timeout - elapsed));
    }
}

/// Poll a boolean predicate until it returns true, or time out.
pub fn wait_for<F>(
    options: &WaitOptions,
    waited_for: &str,
    mut predicate: F,
) -> PageResult<WaitResult>
where
    F: FnMut() -> PageResult<bool>,
{
    poll_until(options, waited_for, || Ok(predicate()?.then_some(())))
        .map(|((), result)| result)
}
