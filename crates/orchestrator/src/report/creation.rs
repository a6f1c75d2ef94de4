#![forbid(unsafe_code)]

use super::{Persisted, Table, day, title};
use crate::initiator::DiskOutcome;
use crate::schedule::Evaluation;
use chrono::{DateTime, Local};
use config::BackupPolicy;
use std::fmt;

#[derive(Debug)]
pub enum CreationAction {
    /// The machine has no policy.
    NotConfigured,
    /// Listing the data center's machines or the machine's disks failed.
    ListingFailed(String),
    NotDue,
    /// Due, but the run was a dry run; names of the snapshots that would be requested.
    WouldCreate(Vec<String>),
    Requested(Vec<DiskOutcome>),
}

#[derive(Debug)]
pub struct CreationRow {
    pub data_center: String,
    pub vm_name: String,
    pub policy: Option<BackupPolicy>,
    pub evaluation: Option<Evaluation>,
    pub action: CreationAction,
}

#[derive(Debug)]
pub struct CreationReport {
    pub started_at: DateTime<Local>,
    pub rows: Vec<CreationRow>,
    pub persisted: Persisted,
}

impl CreationReport {
    /// Snapshot requests accepted by the API.
    pub fn requested(&self) -> usize {
        self.disk_outcomes().filter(|d| d.result.is_ok()).count()
    }

    /// Snapshot requests refused or lost.
    pub fn failed(&self) -> usize {
        self.disk_outcomes().filter(|d| d.result.is_err()).count()
    }

    fn disk_outcomes(&self) -> impl Iterator<Item = &DiskOutcome> {
        self.rows.iter().flat_map(|row| match &row.action {
            CreationAction::Requested(disks) => disks.as_slice(),
            _ => &[][..],
        })
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new([
            "DataCenter",
            "VirtualHost",
            "isConfigured",
            "last snapshot",
            "last by autoscript",
            "action",
        ]);
        for row in &self.rows {
            let configured = row.policy.map_or_else(
                || "NO".to_owned(),
                |p| format!("YES  {} days", p.interval_days),
            );
            let (last_any, last_auto) = row
                .evaluation
                .map_or((String::new(), String::new()), |e| {
                    (day(e.last_any), day(e.last_auto))
                });
            let action = match &row.action {
                CreationAction::NotConfigured => String::new(),
                CreationAction::ListingFailed(reason) => format!("failed: {reason}"),
                CreationAction::NotDue => match row.evaluation.and_then(|e| e.next_due) {
                    Some(next) => format!("next on {}", next.format("%d.%m.%Y")),
                    None => "waiting for start day".to_owned(),
                },
                CreationAction::WouldCreate(names) => format!("due, would create {}", names.len()),
                CreationAction::Requested(disks) => format!("due, {} disk(s)", disks.len()),
            };
            table.push([
                row.data_center.clone(),
                row.vm_name.clone(),
                configured,
                last_any,
                last_auto,
                action,
            ]);

            if let CreationAction::Requested(disks) = &row.action {
                for disk in disks {
                    let result = match &disk.result {
                        Ok(id) => format!("done! {id}"),
                        Err(err) => format!("failed: {err}"),
                    };
                    table.push([
                        String::new(),
                        format!("Disk {}", disk.disk.name),
                        String::new(),
                        String::new(),
                        disk.snapshot_name.clone(),
                        result,
                    ]);
                }
            }
        }
        table
    }
}

impl fmt::Display for CreationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        title(f, "Snapshots automatic creation", self.started_at)?;
        write!(f, "{}", self.table())?;
        writeln!(f)?;
        writeln!(
            f,
            "{} snapshot(s) requested, {} failed; {}",
            self.requested(),
            self.failed(),
            self.persisted
        )
    }
}
