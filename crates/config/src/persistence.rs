#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::{path::PathBuf, time::Duration};

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Persistence {
    /// Path of the pending snapshot state file.
    pub state_path: PathBuf,

    /// Attempts against `state_path` once the primary write and the
    /// timestamped fallback have both failed.
    pub save_attempts: u32,

    /// Delay between two save attempts, in seconds.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub save_retry_delay: Duration,

    /// Hold `<state_path>.lock` while a pass touches the state file.
    pub lock: bool,
}

impl Default for Persistence {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("checker.json"),
            save_attempts: 10,
            save_retry_delay: Duration::from_secs(20),
            lock: false,
        }
    }
}

impl Persistence {
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.state_path.clone().into_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }
}
