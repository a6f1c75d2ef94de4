#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use std::{fmt, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://api.profitbricks.com/cloudapi/v3";

#[serde_as]
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Api {
    pub user: String,

    pub password: String,

    /// Root of the cloud REST API, without trailing slash.
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde_as(as = "serde_with::DurationSeconds")]
    pub timeout: Duration,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl Api {
    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty() && !self.password.is_empty()
    }
}

// keep the password out of debug logs
impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
