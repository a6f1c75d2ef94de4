#![forbid(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cloud API error: {0}")]
    Api(#[from] cloudapi::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("state file does not exist: {0}")]
    StateMissing(PathBuf),

    #[error("state file {path} is unreadable: {source}")]
    StateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state file {path} is corrupt: {reason}")]
    CorruptState { path: PathBuf, reason: String },

    #[error("state file version {found} is not supported (expected {expected})")]
    UnsupportedStateVersion { found: u32, expected: u32 },

    #[error("state could not be saved to {path} after {attempts} attempts: {source}")]
    SaveExhausted {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("another pass is running (lock file {0} exists)")]
    Locked(PathBuf),

    #[error("notification failed: {0}")]
    Notification(String),
}

impl Error {
    /// Whether the cloud API refused the configured credentials.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_unauthorized())
    }
}
