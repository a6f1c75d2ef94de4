#![forbid(unsafe_code)]

use super::{Table, stamp, title};
use crate::reaper::{Outcome, ReapOutcome};
use chrono::{DateTime, Local};
use humansize::{DECIMAL, format_size};
use std::fmt;

#[derive(Debug)]
pub struct ReapReport {
    pub started_at: DateTime<Local>,
    /// Nothing was deleted; expired snapshots are listed as `WouldDelete`.
    pub dry_run: bool,
    pub rows: Vec<ReapOutcome>,
}

impl ReapReport {
    fn with_outcome(&self, wanted: fn(&Outcome) -> bool) -> impl Iterator<Item = &ReapOutcome> {
        self.rows.iter().filter(move |r| wanted(&r.outcome))
    }

    fn removed(&self) -> impl Iterator<Item = &ReapOutcome> {
        if self.dry_run {
            self.with_outcome(|o| matches!(o, Outcome::WouldDelete))
        } else {
            self.with_outcome(|o| matches!(o, Outcome::Deleted))
        }
    }

    pub fn deleted_count(&self) -> usize {
        self.with_outcome(|o| matches!(o, Outcome::Deleted)).count()
    }

    pub fn would_delete_count(&self) -> usize {
        self.with_outcome(|o| matches!(o, Outcome::WouldDelete)).count()
    }

    pub fn failed_count(&self) -> usize {
        self.with_outcome(|o| matches!(o, Outcome::DeleteFailed(_))).count()
    }

    /// Size of the deleted snapshots, or of the ones a dry run would delete,
    /// human readable.
    pub fn reclaimed(&self) -> String {
        let gb: u64 = self.removed().map(|r| r.snapshot.size_gb).sum();
        format_size(gb.saturating_mul(1_000_000_000), DECIMAL)
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new(["ID", "Name", "Description", "Date       Time", "Size", "State"]);
        for row in &self.rows {
            let state = match &row.outcome {
                Outcome::Unmatched => "no valid server name!".to_owned(),
                Outcome::Unconfigured { vm_name } => format!("no configuration for server {vm_name}!"),
                Outcome::Kept { deletion_due: Some(due) } => format!("deletion time: {}", stamp(*due)),
                Outcome::Kept { deletion_due: None } => "kept (not auto-created)".to_owned(),
                Outcome::Deleted => "deleted!".to_owned(),
                Outcome::WouldDelete => "would delete".to_owned(),
                Outcome::DeleteFailed(err) => format!("deletion failed! {err}"),
            };
            let snapshot = &row.snapshot;
            table.push([
                snapshot.id.clone(),
                snapshot.name.clone(),
                snapshot.description.clone(),
                stamp(snapshot.created_at),
                format!("{} GB", snapshot.size_gb),
                state,
            ]);
        }
        table
    }
}

impl fmt::Display for ReapReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        title(f, "Snapshots automatic deletion", self.started_at)?;
        write!(f, "{}", self.table())?;
        writeln!(f)?;
        let (count, verb) = if self.dry_run {
            (self.would_delete_count(), "would delete")
        } else {
            (self.deleted_count(), "deleted")
        };
        writeln!(
            f,
            "Counter: {count}  Total: {} {verb}, {} failed",
            self.reclaimed(),
            self.failed_count()
        )
    }
}
