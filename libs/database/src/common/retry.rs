use core_config::{ConfigError, FromEnv, env_parse_or};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How hard startup tries to reach PostgreSQL before giving up.
///
/// The API container usually starts next to the database, so the first few
/// connection attempts are expected to fail. Requests themselves are never
/// retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait before the first retry; doubles on each further retry
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Shrink each wait to a random 50-100% of itself
    pub jitter: bool,
}

impl RetryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Wait before retry `retry` (1-based), before jitter.
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32
            .checked_shl(retry.saturating_sub(1))
            .unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// The waits between attempts, in order. Its length is the retry budget.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + Clone + '_ {
        (1..=self.max_retries).map(|retry| {
            let delay = self.backoff(retry);
            if self.jitter { jittered(delay) } else { delay }
        })
    }
}

impl Default for RetryConfig {
    /// 5 retries, 200ms doubling up to 5s, jittered.
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            jitter: true,
        }
    }
}

/// Environment variables:
/// - `DB_CONNECT_RETRIES` (default 5)
/// - `DB_RETRY_BASE_MS` (default 200)
/// - `DB_RETRY_MAX_MS` (default 5000)
impl FromEnv for RetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let base_ms = env_parse_or("DB_RETRY_BASE_MS", defaults.base_delay.as_millis() as u64)?;
        let max_ms = env_parse_or("DB_RETRY_MAX_MS", defaults.max_delay.as_millis() as u64)?;

        Ok(Self {
            max_retries: env_parse_or("DB_CONNECT_RETRIES", defaults.max_retries)?,
            base_delay: Duration::from_millis(base_ms),
            max_delay: Duration::from_millis(max_ms),
            jitter: defaults.jitter,
        })
    }
}

/// Run `operation` until it succeeds or `config.delays()` runs out.
///
/// The last error is returned unchanged.
pub async fn retry_with_backoff<F, Fut, T, E>(mut operation: F, config: RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut delays = config.delays();
    let mut failures = 0u32;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if failures > 0 {
                    debug!(failures, "Connected after retrying");
                }
                return Ok(value);
            }
            Err(e) => e,
        };
        failures += 1;

        let Some(delay) = delays.next() else {
            warn!(attempts = failures, error = %error, "Giving up on PostgreSQL");
            return Err(error);
        };

        warn!(
            attempt = failures,
            max_retries = config.max_retries,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "PostgreSQL not reachable yet, retrying"
        );
        tokio::time::sleep(delay).await;
    }
}

fn jittered(delay: Duration) -> Duration {
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    let percent = 50 + RandomState::new().hash_one(std::time::Instant::now()) % 51;
    delay.mul_f64(percent as f64 / 100.0)
}
