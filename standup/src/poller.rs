//! Bounded polling of asynchronous conditions
//!
//! The predicate is evaluated immediately, then once per interval, until it
//! holds or the timeout elapses. A timeout is an outcome, not an error: the
//! caller decides whether an unmet condition should escalate.
//!
//! Predicate errors are logged at trace level and count as "not yet".

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::trace;

/// Result of a [`ConditionPoller::wait_for`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The predicate returned true
    Satisfied { attempts: u32, elapsed: Duration },

    /// The timeout elapsed first
    TimedOut { attempts: u32, elapsed: Duration },
}

impl PollOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, PollOutcome::Satisfied { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            PollOutcome::Satisfied { attempts, .. } | PollOutcome::TimedOut { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            PollOutcome::Satisfied { elapsed, .. } | PollOutcome::TimedOut { elapsed, .. } => {
                *elapsed
            }
        }
    }
}

/// Fixed-interval poller with an optional deadline
#[derive(Debug, Clone, Copy)]
pub struct ConditionPoller {
    interval: Duration,
    timeout: Option<Duration>,
}

impl ConditionPoller {
    /// Poll every `interval` until `timeout` (forever when `None`)
    pub fn new(interval: Duration, timeout: Option<Duration>) -> Self {
        Self { interval, timeout }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Evaluate `predicate` until it returns `Ok(true)` or the timeout elapses
    ///
    /// Checks run strictly one after another. The elapsed time is measured
    /// from just before the first evaluation; a timed-out result is never
    /// returned before `timeout` has passed.
    pub async fn wait_for<F, Fut, E>(&self, mut predicate: F) -> PollOutcome
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<bool, E>>,
        E: Display,
    {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            attempts = attempts.saturating_add(1);
            match predicate().await {
                Ok(true) => {
                    return PollOutcome::Satisfied {
                        attempts,
                        elapsed: started.elapsed(),
                    };
                }
                Ok(false) => trace!(attempts, "Condition not met yet"),
                Err(e) => trace!(attempts, error = %e, "Condition check failed, retrying"),
            }

            let elapsed = started.elapsed();
            let pause = match self.timeout {
                Some(timeout) if elapsed >= timeout => {
                    return PollOutcome::TimedOut { attempts, elapsed };
                }
                // Never sleep past the deadline
                Some(timeout) => self.interval.min(timeout - elapsed),
                None => self.interval,
            };
            sleep(pause).await;
        }
    }
}

/// Convenience form of [`ConditionPoller::wait_for`]
pub async fn wait_for<F, Fut, E>(
    predicate: F,
    interval: Duration,
    timeout: Option<Duration>,
) -> PollOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<bool, E>>,
    E: Display,
{
    ConditionPoller::new(interval, timeout)
        .wait_for(predicate)
        .await
}
