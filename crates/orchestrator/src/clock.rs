#![forbid(unsafe_code)]

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::time::Duration;

#[async_trait::async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default)]
pub struct SystemClock;

#[async_trait::async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Clock standing still at a chosen instant. Sleeping advances it instead
/// of blocking, and every requested sleep is remembered.
#[derive(Debug)]
pub struct FixedClock {
    inner: Mutex<FixedInner>,
}

#[derive(Debug)]
struct FixedInner {
    now: DateTime<Local>,
    sleeps: Vec<Duration>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            inner: Mutex::new(FixedInner {
                now,
                sleeps: Vec::new(),
            }),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        self.inner.lock().now = now;
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner.lock().sleeps.clone()
    }
}

#[async_trait::async_trait]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.inner.lock().now
    }

    async fn sleep(&self, duration: Duration) {
        let mut inner = self.inner.lock();
        inner.sleeps.push(duration);
        if let Ok(delta) = chrono::TimeDelta::from_std(duration) {
            inner.now += delta;
        }
    }
}
