//! Per-pass summaries, rendered as plain aligned tables for the run log.

#![forbid(unsafe_code)]

mod check;
mod creation;
mod reap;
mod table;

pub use check::{CheckAction, CheckReport, CheckRow};
pub use creation::{CreationAction, CreationReport, CreationRow};
pub use reap::ReapReport;
pub use table::Table;

use crate::error::Error;
use crate::persistence::SaveOutcome;
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use std::fmt;

/// How the end-of-pass save went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persisted {
    Saved(SaveOutcome),
    Failed(String),
}

impl Persisted {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl From<Result<SaveOutcome, Error>> for Persisted {
    fn from(result: Result<SaveOutcome, Error>) -> Self {
        match result {
            Ok(outcome) => Self::Saved(outcome),
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

impl fmt::Display for Persisted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Saved(SaveOutcome::Primary) => write!(f, "state saved"),
            Self::Saved(SaveOutcome::Alternate(path)) => {
                write!(f, "state saved to alternate file {}", path.display())
            }
            Self::Saved(SaveOutcome::Retried(attempt)) => {
                write!(f, "state saved on retry {attempt}")
            }
            Self::Saved(SaveOutcome::Skipped) => write!(f, "state not saved (dry run)"),
            Self::Failed(reason) => write!(f, "STATE NOT SAVED: {reason}"),
        }
    }
}

fn title(f: &mut fmt::Formatter<'_>, text: &str, at: DateTime<Local>) -> fmt::Result {
    let line = format!("{text}  {}", at.format("%d.%m.%Y %H:%M"));
    writeln!(f, "{line}")?;
    writeln!(f, "{}", "=".repeat(line.chars().count()))?;
    writeln!(f)
}

fn day(at: Option<NaiveDateTime>) -> String {
    at.map_or_else(|| "never".to_owned(), |at| at.format("%d.%m.%Y").to_string())
}

fn stamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string()
}
