//! Exponential backoff bounded by a wall-clock deadline.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep, timeout_at, Instant};

/// Doubling backoff schedule with a hard deadline measured from the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    /// Delay after the first failed attempt.
    pub base: Duration,
    /// Give up once this much time has passed since the first attempt.
    pub deadline: Duration,
}

impl BackoffPolicy {
    pub fn new(base: Duration, deadline: Duration) -> Self {
        Self { base, deadline }
    }

    /// Delay after the given (1-based) failed attempt: `base * 2^(attempt - 1)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let factor = 2u32.saturating_pow(attempt - 1);
        self.base.saturating_mul(factor)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            deadline: Duration::from_secs(60 * 60),
        }
    }
}

/// How the last attempt ended.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttemptError<E> {
    #[error("{0}")]
    Failed(E),

    #[error("attempt still pending at the deadline")]
    TimedOut,
}

/// Returned when every attempt failed and the deadline passed.
#[derive(Debug, Error)]
#[error("gave up after {attempts} attempts in {elapsed:?}: {last_error}")]
pub struct DeadlineExceeded<E> {
    pub attempts: u32,
    pub elapsed: Duration,
    pub last_error: AttemptError<E>,
}

/// Run `op` until it succeeds, sleeping per `policy` between failures.
///
/// Every attempt is cut off at the deadline. The final sleep is clamped to
/// the time left, so one last attempt starts exactly at the deadline and its
/// failure is returned immediately.
pub async fn retry_until_deadline<T, E, F, Fut>(
    policy: &BackoffPolicy,
    what: &str,
    mut op: F,
) -> Result<T, DeadlineExceeded<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let started = Instant::now();
    let give_up_at = started + policy.deadline;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let err = match timeout_at(give_up_at, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => e,
            Err(_) => {
                return Err(DeadlineExceeded {
                    attempts,
                    elapsed: Instant::now() - started,
                    last_error: AttemptError::TimedOut,
                });
            }
        };

        let now = Instant::now();
        if now >= give_up_at {
            return Err(DeadlineExceeded {
                attempts,
                elapsed: now - started,
                last_error: AttemptError::Failed(err),
            });
        }

        let delay = policy.delay_for(attempts).min(give_up_at - now);
        tracing::warn!(
            what,
            attempt = attempts,
            error = %err,
            retry_in = ?delay,
            "Attempt failed, will retry"
        );
        sleep(delay).await;
    }
}
