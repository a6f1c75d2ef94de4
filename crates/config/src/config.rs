#![forbid(unsafe_code)]

use crate::{Api, BackupPolicy, Error, Notification, Persistence};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};

/// Prefix of environment variables overriding the file, e.g.
/// `SNAPKEEPER_API__PASSWORD`.
pub const ENV_PREFIX: &str = "SNAPKEEPER_";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub api: Api,
    pub persistence: Persistence,
    pub notification: Notification,
    /// Backup policies keyed by virtual machine name.
    pub policies: BTreeMap<String, BackupPolicy>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the configuration from a TOML file, overridden by the
    /// environment, and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::InvalidPath(path.to_owned()));
        }
        let config = Self::figment()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract::<Self>()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Same as [`Config::load`] without a file: defaults plus environment.
    pub fn from_env() -> Result<Self, Error> {
        let config = Self::figment()
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract::<Self>()
            .map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.api.has_credentials() {
            return Err(Error::MissingCredentials);
        }
        for (vm, policy) in &self.policies {
            policy.validate().map_err(|reason| Error::InvalidPolicy {
                vm: vm.clone(),
                reason,
            })?;
        }
        Ok(())
    }

    /// Policy of the virtual machine named `vm_name`, if it opted in.
    pub fn policy(&self, vm_name: &str) -> Option<&BackupPolicy> {
        self.policies.get(vm_name)
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        Ok(toml_edit::ser::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use pretty_assertions::assert_eq;
    use std::{io::Write, path::PathBuf, time::Duration};

    const SAMPLE: &str = r#"
[api]
user = "backup@example.com"
password = "hunter2"

[persistence]
state_path = "/var/lib/snapkeeper/checker.json"
save_retry_delay = 5

[notification]
kind = "sendmail"
to = "ops@example.com"
from = "snapkeeper@example.com"

[policies.web01]
interval_days = 7
start_day = "Monday"
retention_days = 30

[policies.db01]
snapshotInterval = 1
snapshotStartDay = "sun"
deleteSnapshotsOlderThan = 8
"#;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_file_over_defaults() {
        let file = write_config(SAMPLE);
        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.api.user, "backup@example.com");
        assert_eq!(config.api.base_url, crate::api::DEFAULT_BASE_URL);
        assert_eq!(
            config.persistence.state_path,
            PathBuf::from("/var/lib/snapkeeper/checker.json")
        );
        assert_eq!(config.persistence.save_attempts, 10);
        assert_eq!(config.persistence.save_retry_delay, Duration::from_secs(5));
        assert_eq!(
            config.notification,
            Notification::Sendmail {
                to: "ops@example.com".into(),
                from: "snapkeeper@example.com".into(),
                program: PathBuf::from("/usr/sbin/sendmail"),
            }
        );
        assert_eq!(
            config.policy("web01"),
            Some(&BackupPolicy {
                interval_days: 7,
                start_day: Weekday::Mon,
                retention_days: 30,
            })
        );
        assert_eq!(config.policy("db01").map(|p| p.start_day), Some(Weekday::Sun));
        assert_eq!(config.policy("mail01"), None);
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let file = write_config("[policies.web01]\ninterval_days = 7\nstart_day = \"Mon\"\nretention_days = 30\n");
        assert!(matches!(
            Config::load(file.path()),
            Err(Error::MissingCredentials)
        ));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let file = write_config(
            "[api]\nuser = \"u\"\npassword = \"p\"\n[policies.web01]\ninterval_days = 0\nstart_day = \"Mon\"\nretention_days = 30\n",
        );
        assert!(matches!(
            Config::load(file.path()),
            Err(Error::InvalidPolicy { vm, .. }) if vm == "web01"
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(matches!(Config::load(&path), Err(Error::InvalidPath(p)) if p == path));
    }

    #[test]
    fn rendered_toml_loads_back() {
        let file = write_config(SAMPLE);
        let config = Config::load(file.path()).unwrap();
        let rendered = config.to_toml().unwrap();
        let again = write_config(&rendered);
        assert_eq!(Config::load(again.path()).unwrap(), config);
    }

    #[test]
    fn debug_output_hides_password() {
        let file = write_config(SAMPLE);
        let config = Config::load(file.path()).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
    }
}
