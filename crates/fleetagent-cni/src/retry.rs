//! Bounded retry loop for task network setup.

use std::time::Duration;

use fleetagent_common::config::BackoffConfig;

use crate::backoff::ExponentialBackoff;
use crate::error::{CniError, Result};

/// Waits between retry attempts.
pub trait Sleeper {
    /// Blocks for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Sleeps on the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Runs `setup` until it succeeds or `config.max_retries` attempts fail.
///
/// `setup` receives the one-based attempt number. An invalid `config` is
/// rejected before the first attempt, and errors that are already terminal
/// (an invalid plugin config) are returned without retrying.
/// When the last allowed attempt fails, the result is
/// [`CniError::RetriesExhausted`] wrapping that attempt's error.
///
/// # Errors
///
/// Returns the terminal error described above.
pub fn retry_setup<T, S, F>(config: &BackoffConfig, sleeper: &S, mut setup: F) -> Result<T>
where
    S: Sleeper + ?Sized,
    F: FnMut(u32) -> Result<T>,
{
    config.validate().map_err(|err| CniError::InvalidConfig {
        field: "setupBackoff",
        message: err.to_string(),
    })?;
    let mut backoff = ExponentialBackoff::new(config.clone());
    let max_attempts = config.max_retries.max(1);
    let mut attempt = 1;
    loop {
        match setup(attempt) {
            Ok(value) => {
                if attempt > 1 {
                    tracing::info!(attempt, "network setup succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if err.is_terminal() => return Err(err),
            Err(err) if attempt >= max_attempts => {
                tracing::error!(
                    attempts = attempt,
                    error = %err,
                    "network setup retries exhausted"
                );
                return Err(CniError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }
            Err(err) => {
                let delay = backoff.next_delay();
                tracing::warn!(attempt, ?delay, error = %err, "network setup failed, retrying");
                sleeper.sleep(delay);
                attempt += 1;
            }
        }
    }
}
