#![forbid(unsafe_code)]

use crate::clock::Clock;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

/// Fixed number of attempts with a fixed pause in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    pub fn from_config(persistence: &config::Persistence) -> Self {
        Self::new(persistence.save_attempts, persistence.save_retry_delay)
    }

    /// Run `op` until it succeeds or the attempts are used up. Every outcome
    /// is logged. On success returns the value and the 1-based attempt that
    /// produced it, otherwise the last error.
    pub async fn run<T, E, F, Fut>(
        &self,
        clock: &dyn Clock,
        what: &str,
        mut op: F,
    ) -> Result<(T, u32), E>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => {
                    info!(attempt, attempts, "{what} succeeded");
                    return Ok((value, attempt));
                }
                Err(err) if attempt >= attempts => {
                    warn!(attempt, attempts, %err, "{what} failed, giving up");
                    return Err(err);
                }
                Err(err) => {
                    warn!(attempt, attempts, %err, delay = ?self.delay, "{what} failed, retrying");
                    clock.sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
