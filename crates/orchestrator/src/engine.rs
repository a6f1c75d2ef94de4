#![forbid(unsafe_code)]

use crate::clock::Clock;
use crate::domain::{PendingState, snapshot_name};
use crate::error::Error;
use crate::initiator::create_snapshots_for_due_vm;
use crate::notify::{Notifier, SuccessMessage};
use crate::persistence::{PassLock, SaveOutcome, StateRepository};
use crate::reaper::reap;
use crate::reconcile::reconcile;
use crate::report::{
    CheckAction, CheckReport, CheckRow, CreationAction, CreationReport, CreationRow, Persisted,
    ReapReport,
};
use crate::schedule;
use chrono::Utc;
use cloudapi::{CloudApi, SnapshotRecord, VirtualMachine};
use config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, warn};

pub struct Services {
    pub api: Box<dyn CloudApi>,
    pub repo: Box<dyn StateRepository>,
    pub notifier: Box<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
}

/// Runs the three passes. Every pass fetches what it needs fresh from the
/// API; nothing is carried over between passes.
pub struct Scheduler {
    config: Config,
    services: Services,
}

impl Scheduler {
    pub fn new(config: Config, services: Services) -> Self {
        Self { config, services }
    }

    /// Request snapshots for every configured machine that is due and
    /// remember them as pending.
    ///
    /// Failing to list data centers or snapshots aborts the pass. Failures
    /// below that are recorded in the affected row.
    pub async fn create_pass(&self, dry_run: bool) -> Result<CreationReport, Error> {
        let started_at = self.services.clock.now();
        let _lock = self.lock(dry_run)?;
        info!(dry_run, "creation pass started");

        let mut state = match self.services.repo.load().await {
            Ok(state) => state,
            Err(Error::StateMissing(path)) => {
                info!(path = %path.display(), "no state file yet, starting empty");
                PendingState::new()
            }
            Err(err) => return Err(err),
        };

        let api = self.services.api.as_ref();
        let snapshots = api.snapshots().await?;
        let data_centers = api.data_centers().await?;

        let mut rows = Vec::new();
        for data_center in &data_centers {
            let vms = match api.virtual_machines(data_center).await {
                Ok(vms) => vms,
                Err(err) => {
                    warn!(data_center = %data_center.name, %err, "listing virtual machines failed");
                    rows.push(CreationRow {
                        data_center: data_center.name.clone(),
                        vm_name: String::new(),
                        policy: None,
                        evaluation: None,
                        action: CreationAction::ListingFailed(err.to_string()),
                    });
                    continue;
                }
            };

            for vm in &vms {
                let mut row = CreationRow {
                    data_center: data_center.name.clone(),
                    vm_name: vm.name.clone(),
                    policy: self.config.policy(&vm.name).copied(),
                    evaluation: None,
                    action: CreationAction::NotConfigured,
                };
                let Some(policy) = row.policy else {
                    info!(vm = %vm.name, "no policy, skipped");
                    rows.push(row);
                    continue;
                };

                let disks = match api.virtual_disks(data_center, vm).await {
                    Ok(disks) => disks,
                    Err(err) => {
                        warn!(vm = %vm.name, %err, "listing disks failed");
                        row.action = CreationAction::ListingFailed(err.to_string());
                        rows.push(row);
                        continue;
                    }
                };

                let evaluation = schedule::evaluate(&policy, vm, &disks, &snapshots, started_at);
                row.evaluation = Some(evaluation);
                info!(
                    vm = %vm.name,
                    disks = disks.len(),
                    due = evaluation.due,
                    next_due = ?evaluation.next_due,
                    "evaluated"
                );

                row.action = if !evaluation.due {
                    CreationAction::NotDue
                } else if dry_run {
                    CreationAction::WouldCreate(
                        disks
                            .iter()
                            .map(|disk| snapshot_name(vm, disk, &started_at))
                            .collect(),
                    )
                } else {
                    CreationAction::Requested(
                        create_snapshots_for_due_vm(
                            api,
                            data_center,
                            vm,
                            &disks,
                            started_at,
                            &mut state,
                        )
                        .await,
                    )
                };
                rows.push(row);
            }
        }

        let persisted = self.persist(&state, dry_run).await;
        Ok(CreationReport {
            started_at,
            rows,
            persisted,
        })
    }

    /// Refresh the status of every pending snapshot, announce machines whose
    /// snapshots all completed during this run and write the state back.
    ///
    /// A missing or corrupt state file aborts the pass. A machine is cleared
    /// from the state once its notification went out.
    pub async fn check_pass(&self) -> Result<CheckReport, Error> {
        let started_at = self.services.clock.now();
        let _lock = self.lock(false)?;
        info!("checker pass started");

        let state = self.services.repo.load().await?;
        let live: HashMap<String, SnapshotRecord> = self
            .services
            .api
            .snapshots()
            .await?
            .into_iter()
            .map(|snapshot| (snapshot.id.clone(), snapshot))
            .collect();
        let vms: HashMap<String, VirtualMachine> = self
            .all_virtual_machines()
            .await?
            .into_iter()
            .map(|vm| (vm.id.clone(), vm))
            .collect();

        let reconciliation = reconcile(state, &live, &vms);
        let mut state = reconciliation.state;

        let mut rows = Vec::with_capacity(reconciliation.vms.len());
        for vm in reconciliation.vms {
            let action = if vm.should_notify() {
                let message = SuccessMessage {
                    vm_id: vm.vm_id.clone(),
                    vm_name: vm.display_name().to_owned(),
                    completed_at: vm.completed_at.clone(),
                };
                match self.services.notifier.notify(&message).await {
                    Ok(()) => {
                        info!(vm = %message.vm_name, "completion notified");
                        state.clear_vm(&vm.vm_id);
                        CheckAction::Notified
                    }
                    Err(err) => {
                        warn!(vm = %message.vm_name, %err, "notification failed");
                        CheckAction::NotifyFailed(err.to_string())
                    }
                }
            } else if vm.complete {
                CheckAction::NothingToDo
            } else {
                CheckAction::Waiting
            };
            rows.push(CheckRow {
                vm_name: vm.display_name().to_owned(),
                vm_id: vm.vm_id,
                statuses: vm.statuses,
                action,
            });
        }

        let persisted = self.persist(&state, false).await;
        Ok(CheckReport {
            started_at,
            rows,
            persisted,
        })
    }

    /// Delete automatic snapshots that outlived their machine's retention.
    pub async fn reap_pass(&self, dry_run: bool) -> Result<ReapReport, Error> {
        let started_at = self.services.clock.now();
        info!(dry_run, "reaper pass started");

        let snapshots = self.services.api.snapshots().await?;
        let vms = self.all_virtual_machines().await?;
        let rows = reap(
            self.services.api.as_ref(),
            snapshots,
            &vms,
            &self.config.policies,
            started_at.with_timezone(&Utc),
            dry_run,
        )
        .await;

        Ok(ReapReport {
            started_at,
            dry_run,
            rows,
        })
    }

    /// Machines of every data center. A data center whose machines cannot be
    /// listed is skipped with a warning.
    async fn all_virtual_machines(&self) -> Result<Vec<VirtualMachine>, Error> {
        let api = self.services.api.as_ref();
        let mut vms = Vec::new();
        for data_center in api.data_centers().await? {
            match api.virtual_machines(&data_center).await {
                Ok(found) => vms.extend(found),
                Err(err) => {
                    warn!(data_center = %data_center.name, %err, "listing virtual machines failed");
                }
            }
        }
        Ok(vms)
    }

    fn lock(&self, dry_run: bool) -> Result<Option<PassLock>, Error> {
        if !self.config.persistence.lock || dry_run {
            return Ok(None);
        }
        PassLock::acquire(self.config.persistence.lock_path()).map(Some)
    }

    async fn persist(&self, state: &PendingState, dry_run: bool) -> Persisted {
        if dry_run {
            return Persisted::Saved(SaveOutcome::Skipped);
        }
        let result = self.services.repo.save(state).await;
        if let Err(err) = &result {
            error!(%err, "pending state was not saved");
        }
        result.into()
    }
}
