use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use palavra_config::generator::GeneratorConfig;

/// Exponential backoff: `initial_delay` after the first failure, doubling after each
/// further failure, for at most `max_attempts` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl BackoffPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(config.max_attempts, config.initial_delay())
    }

    /// Delay to wait after failed attempt number `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}

/// Abstracts waiting so retry loops can be tested without real delays
#[async_trait::async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, delay: Duration);
}

pub struct TokioSleeper;

#[async_trait::async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Every attempt failed
#[derive(Debug, thiserror::Error)]
#[error("gave up after {attempts} attempts: {last_error}")]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `operation` until it succeeds or the policy runs out of attempts.
/// The operation receives the 1-based attempt number.
pub async fn retry<T, E, F, Fut>(
    policy: &BackoffPolicy,
    sleeper: &dyn Sleeper,
    mut operation: F,
) -> Result<T, Exhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= policy.max_attempts => {
                tracing::warn!("Attempt {}/{} failed: {}", attempt, policy.max_attempts, e);
                return Err(Exhausted {
                    attempts: attempt,
                    last_error: e,
                });
            }
            Err(e) => {
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    "Attempt {}/{} failed: {}, retrying in {:?}",
                    attempt,
                    policy.max_attempts,
                    e,
                    delay
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
