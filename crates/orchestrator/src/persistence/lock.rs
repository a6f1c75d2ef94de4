#![forbid(unsafe_code)]

use crate::error::Error;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Exclusive marker file held while a pass reads and rewrites the state.
///
/// Passes are expected to be started by cron at times that do not overlap;
/// the lock only turns an overlap into an error instead of a lost update.
/// A lock left behind by a crashed run must be removed by hand.
#[derive(Debug)]
pub struct PassLock {
    path: PathBuf,
}

impl PassLock {
    pub fn acquire(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_owned();
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::Locked(path));
            }
            Err(err) => return Err(err.into()),
        };
        writeln!(file, "{}", std::process::id())?;
        debug!(path = %path.display(), "lock acquired");
        Ok(Self { path })
    }
}

impl Drop for PassLock {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), %err, "failed to remove lock file");
        }
    }
}
