//! Request pacing
//!
//! Every outbound request, retries included, is preceded by a random pause
//! drawn from a configured range. Retries additionally wait an exponential
//! backoff of `base * 2^attempt`.

use crate::config::FetcherConfig;
use rand::Rng;
use std::time::Duration;

/// Longest backoff a single retry may wait
const MAX_BACKOFF: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct Politeness {
    min_delay: Duration,
    max_delay: Duration,
    backoff_base: Duration,
}

impl Politeness {
    /// Creates a pacing policy; the delay bounds are swapped if given in reverse
    pub fn new(min_delay: Duration, max_delay: Duration, backoff_base: Duration) -> Self {
        let (min_delay, max_delay) = if min_delay <= max_delay {
            (min_delay, max_delay)
        } else {
            (max_delay, min_delay)
        };

        Self {
            min_delay,
            max_delay,
            backoff_base,
        }
    }

    pub fn from_config(config: &FetcherConfig) -> Self {
        Self::new(config.min_delay(), config.max_delay(), config.backoff_base())
    }

    /// No pauses and no backoff
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    /// Draws the next politeness delay, uniform in `[min, max]`
    pub fn next_delay(&self) -> Duration {
        if self.max_delay.is_zero() {
            return Duration::ZERO;
        }

        let min = self.min_delay.as_millis() as u64;
        let max = self.max_delay.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    /// Sleeps for a freshly drawn politeness delay
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    /// Backoff before retry number `attempt` (0-based): `base * 2^attempt`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.backoff_base
            .checked_mul(factor)
            .unwrap_or(MAX_BACKOFF)
            .min(MAX_BACKOFF)
    }
}

impl Default for Politeness {
    fn default() -> Self {
        Self::from_config(&FetcherConfig::default())
    }
}
