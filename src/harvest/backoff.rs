//! Retry delays for a rate-limited upstream.
//!
//! Delays grow exponentially from [`RetryPolicy::initial_delay`] and are capped at
//! [`RetryPolicy::max_delay`]; a jitter fraction drawn from an injected [`JitterSource`] is then
//! added on top. With a [`SeededJitter`] the whole schedule is reproducible.

use std::time::Duration;

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

use crate::foundation::error::{BandtreeError, BandtreeResult};

/// Source of jitter fractions in `[0, 1)`.
pub trait JitterSource {
    fn next_unit(&mut self) -> f64;
}

/// Jitter drawn from a seeded `StdRng`: same seed, same fractions.
#[derive(Clone, Debug)]
pub struct SeededJitter {
    rng: StdRng,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl JitterSource for SeededJitter {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Unseeded jitter for live harvesting.
impl JitterSource for ThreadRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Always zero; delays are the bare capped exponential.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn next_unit(&mut self) -> f64 {
        0.0
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Attempts including the first; retries = `max_attempts - 1`.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Largest jitter as a fraction of the capped delay.
    pub jitter_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            jitter_factor: 0.3,
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> BandtreeResult<()> {
        if self.max_attempts == 0 {
            return Err(BandtreeError::validation("max_attempts must be > 0"));
        }
        if self.initial_delay > self.max_delay {
            return Err(BandtreeError::validation(
                "initial_delay must not exceed max_delay",
            ));
        }
        if !self.jitter_factor.is_finite() || self.jitter_factor < 0.0 {
            return Err(BandtreeError::validation(
                "jitter_factor must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// Capped exponential delay before retry `attempt` (1-based), without jitter.
    pub fn base_delay(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(31);
        self.initial_delay
            .checked_mul(1u32 << exp)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Delay before retry `attempt`, in `[base, base * (1 + jitter_factor))`.
    pub fn delay_for(&self, attempt: u32, jitter: &mut impl JitterSource) -> Duration {
        let base = self.base_delay(attempt);
        let unit = jitter.next_unit().clamp(0.0, 1.0);
        base + base.mul_f64(self.jitter_factor * unit)
    }

    /// Every retry delay the policy allows, in order.
    pub fn delays(&self, jitter: &mut impl JitterSource) -> Vec<Duration> {
        (1..self.max_attempts)
            .map(|attempt| self.delay_for(attempt, jitter))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/harvest/backoff.rs"]
mod tests;
