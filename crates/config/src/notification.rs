#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where snapshot success messages go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Notification {
    /// Pipe the message to a sendmail-compatible program.
    Sendmail {
        to: String,
        from: String,
        #[serde(default = "default_sendmail")]
        program: PathBuf,
    },
    /// POST the message as JSON.
    Webhook { url: String },
    /// Only write the message to the log.
    #[default]
    Log,
}

fn default_sendmail() -> PathBuf {
    PathBuf::from("/usr/sbin/sendmail")
}
