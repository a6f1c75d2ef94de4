#![forbid(unsafe_code)]

use crate::clock::Clock;
use crate::domain::PendingState;
use crate::error::Error;
use crate::persistence::{AtomicFileWriter, RetryPolicy, StateDocument, StateWriter};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, warn};

#[async_trait]
pub trait StateRepository: Send + Sync {
    /// Load the pending state. A missing store is reported as
    /// [`Error::StateMissing`], distinct from a damaged one.
    async fn load(&self) -> Result<PendingState, Error>;
    /// Persist the pending state, replacing what was stored before.
    async fn save(&self, state: &PendingState) -> Result<SaveOutcome, Error>;
}

/// Where a successful save ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to the configured path on the first try.
    Primary,
    /// The configured path failed; written next to it under this name.
    Alternate(PathBuf),
    /// Written to the configured path by the n-th retry.
    Retried(u32),
    /// Nothing was written (dry run).
    Skipped,
}

/// Pending state in a versioned JSON file.
///
/// Saving tolerates a full or failing disk: when the file cannot be
/// replaced, the state goes to a timestamped sibling instead, and when that
/// fails too the original path is retried according to [`RetryPolicy`].
/// The previous file is never partially overwritten.
pub struct JsonFileRepository<W = AtomicFileWriter> {
    path: PathBuf,
    writer: W,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl JsonFileRepository<AtomicFileWriter> {
    pub fn new(path: impl Into<PathBuf>, retry: RetryPolicy, clock: Arc<dyn Clock>) -> Self {
        Self::with_writer(path, AtomicFileWriter, retry, clock)
    }
}

impl<W: StateWriter> JsonFileRepository<W> {
    pub fn with_writer(
        path: impl Into<PathBuf>,
        writer: W,
        retry: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            path: path.into(),
            writer,
            retry,
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn alternate_path(&self) -> PathBuf {
        let stamp = self.clock.now().format("%Y%m%d%H%M%S");
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{stamp}"));
        PathBuf::from(name)
    }
}

#[async_trait]
impl<W: StateWriter> StateRepository for JsonFileRepository<W> {
    async fn load(&self) -> Result<PendingState, Error> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(Error::StateMissing(self.path.clone()));
            }
            Err(source) => {
                return Err(Error::StateUnreadable {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let state = StateDocument::decode(&bytes).map_err(|err| match err {
            Error::Serialize(err) => Error::CorruptState {
                path: self.path.clone(),
                reason: err.to_string(),
            },
            other => other,
        })?;
        debug!(path = %self.path.display(), snapshots = state.len(), "state loaded");
        Ok(state)
    }

    async fn save(&self, state: &PendingState) -> Result<SaveOutcome, Error> {
        let bytes = StateDocument::encode(state)?;

        let err = match self.writer.write(&self.path, &bytes) {
            Ok(()) => {
                debug!(path = %self.path.display(), "state persisted");
                return Ok(SaveOutcome::Primary);
            }
            Err(err) => err,
        };
        warn!(path = %self.path.display(), %err, "failed to write state file");

        let alternate = self.alternate_path();
        match self.writer.write(&alternate, &bytes) {
            Ok(()) => {
                warn!(path = %alternate.display(), "state written to alternate file");
                return Ok(SaveOutcome::Alternate(alternate));
            }
            Err(err) => {
                warn!(path = %alternate.display(), %err, "failed to write alternate state file");
            }
        }

        let what = format!("saving state to {}", self.path.display());
        match self
            .retry
            .run(self.clock.as_ref(), &what, || {
                std::future::ready(self.writer.write(&self.path, &bytes))
            })
            .await
        {
            Ok(((), attempt)) => Ok(SaveOutcome::Retried(attempt)),
            Err(source) => {
                error!(path = %self.path.display(), %source, "state could not be saved");
                Err(Error::SaveExhausted {
                    path: self.path.clone(),
                    attempts: self.retry.attempts.max(1),
                    source,
                })
            }
        }
    }
}
