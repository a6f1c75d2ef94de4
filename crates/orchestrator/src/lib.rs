#![forbid(unsafe_code)]

pub mod clock;
pub mod domain;
pub mod engine;
mod error;
pub mod initiator;
pub mod matcher;
pub mod notify;
pub mod persistence;
pub mod reaper;
pub mod reconcile;
pub mod report;
pub mod schedule;

pub use engine::{Scheduler, Services};
pub use error::Error;
pub use persistence::StateRepository;
