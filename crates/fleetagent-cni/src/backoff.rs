//! Capped exponential backoff with multiplicative jitter.

use std::time::Duration;

use fleetagent_common::config::BackoffConfig;
use rand::Rng;

/// Produces successive retry delays from a [`BackoffConfig`].
///
/// The n-th delay (zero-based) is `min * multiple^n`, capped at `max`, then
/// scaled by a random factor in `[1 - jitter, 1 + jitter]` and capped at
/// `max` again. Out-of-range parameters are clamped so that a delay is
/// never negative; [`BackoffConfig::validate`] rejects them up front.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    config: BackoffConfig,
    retries: u32,
}

impl ExponentialBackoff {
    /// Creates a backoff positioned before its first delay.
    #[must_use]
    pub const fn new(config: BackoffConfig) -> Self {
        Self { config, retries: 0 }
    }

    /// The configuration this backoff was built from.
    pub const fn config(&self) -> &BackoffConfig {
        &self.config
    }

    /// Un-jittered delay before retry number `retry` (zero-based).
    #[must_use]
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.config.min.as_secs_f64() * self.config.multiple.powi(exponent);
        if !secs.is_finite() || secs >= self.config.max.as_secs_f64() {
            return self.config.max;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }

    /// Returns the next jittered delay and advances.
    pub fn next_delay(&mut self) -> Duration {
        self.next_delay_with(&mut rand::thread_rng())
    }

    /// Same as [`next_delay`](Self::next_delay) with a caller-supplied RNG.
    pub fn next_delay_with<R: Rng>(&mut self, rng: &mut R) -> Duration {
        let base = self.base_delay(self.retries);
        self.retries = self.retries.saturating_add(1);
        let jitter = self.config.jitter;
        if jitter.is_nan() || jitter <= 0.0 {
            return base;
        }
        let jitter = jitter.min(1.0);
        let factor = rng.gen_range((1.0 - jitter)..=(1.0 + jitter)).max(0.0);
        base.mul_f64(factor).min(self.config.max)
    }

    /// Restarts the sequence from the minimum delay.
    pub const fn reset(&mut self) {
        self.retries = 0;
    }

    /// Un-jittered delays slept between consecutive attempts of a full
    /// retry loop; one fewer than the number of attempts.
    #[must_use]
    pub fn schedule(&self) -> Vec<Duration> {
        (0..self.config.max_retries.saturating_sub(1))
            .map(|retry| self.base_delay(retry))
            .collect()
    }
}
