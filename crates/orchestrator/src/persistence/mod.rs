#![forbid(unsafe_code)]

mod document;
mod lock;
mod repo;
mod retry;
mod writer;

pub use document::{STATE_SCHEMA_VERSION, StateDocument};
pub use lock::PassLock;
pub use repo::{JsonFileRepository, SaveOutcome, StateRepository};
pub use retry::RetryPolicy;
pub use writer::{AtomicFileWriter, StateWriter};
