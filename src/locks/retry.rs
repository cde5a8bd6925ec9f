//! Bounded, interval-spaced acquisition on top of any [`LockHandle`].
//!
//! The wrapped backend keeps its single-shot semantics; the retry loop lives
//! here once so every backend gets it by composition. The loop sleeps the
//! calling thread between attempts, so run it somewhere that may block.

use super::handle::LockHandle;
use super::types::LockIdentity;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Default number of acquisition attempts.
pub const DEFAULT_ATTEMPTS: u32 = 3;

/// Default wait between attempts.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// How many times to try, and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    interval: Duration,
}

impl RetryPolicy {
    /// Create a policy. An attempt count of zero is raised to one.
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            interval,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS, DEFAULT_INTERVAL)
    }
}

/// A [`LockHandle`] whose `acquire` retries the wrapped handle.
///
/// There is no fairness between competing retriers and no way to cancel the
/// loop other than exhausting the attempt budget.
#[derive(Debug)]
pub struct RetryingAcquirer<H> {
    inner: H,
    policy: RetryPolicy,
}

impl<H: LockHandle> RetryingAcquirer<H> {
    pub fn new(inner: H, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// The wrapped handle.
    pub fn inner(&self) -> &H {
        &self.inner
    }

    pub fn into_inner(self) -> H {
        self.inner
    }

    /// Run the retry loop. Returns `true` on the first successful attempt.
    pub fn acquire_with_retries(&mut self) -> bool {
        let attempts = self.policy.attempts;

        for attempt in 1..=attempts {
            if self.inner.acquire() {
                if attempt > 1 {
                    debug!(
                        lock = %self.inner.identity(),
                        attempt,
                        "Lock acquired after retry"
                    );
                }
                return true;
            }

            log_failed_attempt(self.inner.identity(), attempt, attempts);

            if attempt < attempts {
                thread::sleep(self.policy.interval);
            }
        }

        warn!(
            lock = %self.inner.identity(),
            attempts,
            "Giving up on lock after exhausting retries"
        );
        false
    }
}

fn log_failed_attempt(identity: &LockIdentity, attempt: u32, attempts: u32) {
    debug!(
        lock = %identity,
        attempt,
        attempts,
        "Lock not available"
    );
}

impl<H: LockHandle> LockHandle for RetryingAcquirer<H> {
    fn identity(&self) -> &LockIdentity {
        self.inner.identity()
    }

    fn acquire(&mut self) -> bool {
        self.acquire_with_retries()
    }

    fn release(&mut self) -> bool {
        self.inner.release()
    }

    fn is_held(&self) -> bool {
        self.inner.is_held()
    }
}
