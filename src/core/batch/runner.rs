//! Phased cleanup runner

use super::types::{CleanupSummary, DryRunPlan, Phase};
use crate::config::CleanupConfig;
use crate::core::context::RunContext;
use crate::core::executor::{ExecuteOptions, OperationExecutor};
use crate::core::lanes::LanePermit;
use crate::core::models::{OperationKind, RelationshipEntity, Worklist};
use crate::core::report::{ReportPaths, ReportWriter};
use crate::core::session::RemoteSession;
use crate::utils::error::{CleanupError, Result};
use crate::utils::format_duration;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// Runs the four cleanup phases over a worklist
///
/// Within a phase every item is dispatched as its own task and limited only
/// by the phase's lane. Phases run strictly one after another.
pub struct BatchRunner {
    ctx: Arc<RunContext>,
    executor: Arc<OperationExecutor>,
    writer: ReportWriter,
}

impl BatchRunner {
    pub fn new(ctx: Arc<RunContext>, session: Arc<dyn RemoteSession>) -> Self {
        let writer = ReportWriter::new(ctx.config().report_dir());
        let executor = Arc::new(OperationExecutor::new(ctx.clone(), session));
        Self {
            ctx,
            executor,
            writer,
        }
    }

    /// Write reports somewhere other than the configured directory
    pub fn with_writer(mut self, writer: ReportWriter) -> Self {
        self.writer = writer;
        self
    }

    pub fn context(&self) -> &Arc<RunContext> {
        &self.ctx
    }

    /// Counts of what a run over `worklist` would touch
    pub fn plan(worklist: &Worklist) -> DryRunPlan {
        DryRunPlan::from_worklist(worklist)
    }

    /// Run every phase and write the report
    ///
    /// A dry run only counts the worklist: no session call is made and no
    /// report is written.
    pub async fn run(&self, worklist: &Worklist, dry_run: bool) -> CleanupSummary {
        if dry_run {
            let plan = Self::plan(worklist);
            info!(
                "Dry run for {}: {} to leave ({} groups, {} channels), {} to erase ({} direct, {} bots), contacts: {}",
                self.ctx.account_name(),
                plan.leave_total,
                plan.groups,
                plan.channels,
                plan.erase_total,
                plan.direct,
                plan.bots,
                plan.contacts
                    .map_or_else(|| "unknown".to_string(), |n| n.to_string())
            );
            return CleanupSummary::dry_run(plan, self.ctx.elapsed());
        }

        info!("Starting cleanup for {}", self.ctx.account_name());
        let outcome = self.run_phases(worklist).await;

        let (failed, cancelled, error) = match outcome {
            Ok(()) => (false, false, None),
            Err(CleanupError::Cancelled(reason)) => {
                warn!("Cleanup cancelled: {}", reason);
                (false, true, None)
            }
            Err(err) => {
                error!("Cleanup aborted: {}", err);
                (true, false, Some(err.to_string()))
            }
        };

        let elapsed = self.ctx.elapsed();
        let report = self.ctx.report().finalize(elapsed, failed);
        let paths = match self.writer.write(&report).await {
            Ok(paths) => Some(paths),
            Err(err) => {
                error!("Error saving reports: {}", err);
                None
            }
        };
        let (json_path, csv_path) = match paths {
            Some(ReportPaths { csv, json }) => (Some(json), Some(csv)),
            None => (None, None),
        };

        let statistics = report.statistics;
        info!(
            "Cleanup finished in {}: {} groups left, {} channels left, {} histories deleted, {} contacts deleted, {} dialogs archived, {} errors, {} skipped ({} never dispatched)",
            format_duration(elapsed.as_millis() as u64),
            statistics.groups_left,
            statistics.channels_left,
            statistics.histories_deleted,
            statistics.contacts_deleted,
            statistics.dialogs_closed,
            statistics.errors,
            statistics.skipped,
            report.undispatched
        );

        CleanupSummary {
            success: !failed && !cancelled,
            failed,
            cancelled,
            dry_run: false,
            error,
            elapsed,
            statistics,
            degraded: report.degraded,
            undispatched: report.undispatched,
            report: Some(report),
            json_path,
            csv_path,
            plan: None,
        }
    }

    async fn run_phases(&self, worklist: &Worklist) -> Result<()> {
        for phase in Phase::ORDER {
            if self.ctx.is_cancelled() {
                self.skip_undispatched(phase, worklist);
                return Err(CleanupError::cancelled(format!("before phase {}", phase)));
            }

            debug!("Starting phase {}", phase);
            match phase {
                Phase::Leave => {
                    self.run_entity_phase(
                        OperationKind::Leave,
                        worklist.leave_targets(),
                        ExecuteOptions::default(),
                    )
                    .await?
                }
                Phase::EraseHistory => {
                    let options = ExecuteOptions {
                        revoke: self.ctx.config().revoke_by_default,
                    };
                    self.run_entity_phase(
                        OperationKind::EraseHistory,
                        worklist.erase_targets(),
                        options,
                    )
                    .await?
                }
                Phase::RemoveContacts => self.remove_contacts(worklist.contacts.clone()).await?,
                Phase::ArchiveRemainder => self.archive_remainder().await?,
            }
        }

        if self.ctx.is_cancelled() {
            return Err(CleanupError::cancelled("after the last phase"));
        }
        Ok(())
    }

    /// Skipped records for the entities of a phase that never started
    fn skip_undispatched(&self, phase: Phase, worklist: &Worklist) {
        let entities = match phase {
            Phase::Leave => worklist.leave_targets(),
            Phase::EraseHistory => worklist.erase_targets(),
            Phase::RemoveContacts | Phase::ArchiveRemainder => return,
        };
        for entity in &entities {
            self.executor.skip_cancelled(entity, phase.kind());
        }
        // Later entity phases never start either
        if phase == Phase::Leave {
            for entity in &worklist.erase_targets() {
                self.executor
                    .skip_cancelled(entity, OperationKind::EraseHistory);
            }
        }
    }

    async fn run_entity_phase(
        &self,
        kind: OperationKind,
        entities: Vec<RelationshipEntity>,
        options: ExecuteOptions,
    ) -> Result<()> {
        if entities.is_empty() {
            debug!("Nothing to do for {}", kind);
            return Ok(());
        }
        info!("Running {} on {} entities", kind, entities.len());

        let mut tasks = JoinSet::new();
        for entity in entities {
            let ctx = self.ctx.clone();
            let executor = self.executor.clone();
            tasks.spawn(async move {
                let _permit = match acquire_or_cancel(&ctx, kind).await {
                    Some(Ok(permit)) => permit,
                    Some(Err(err)) => {
                        executor.abandon(&entity, kind, &err.to_string());
                        return Err(err);
                    }
                    None => {
                        executor.skip_cancelled(&entity, kind);
                        return Ok(());
                    }
                };
                executor.execute(&entity, kind, options).await.map(|_| ())
            });
        }

        self.drain(kind, tasks).await
    }

    async fn remove_contacts(&self, prefetched: Option<Vec<i64>>) -> Result<()> {
        let ids = match prefetched {
            Some(ids) => ids,
            None => match self.executor.list_contacts().await? {
                Some(ids) => ids,
                None => return Ok(()),
            },
        };
        if ids.is_empty() {
            info!("No contacts to delete");
            return Ok(());
        }

        let batch_size = self.ctx.config().contact_batch_size.max(1);
        info!(
            "Deleting {} contacts in batches of {}",
            ids.len(),
            batch_size
        );

        let mut tasks = JoinSet::new();
        for batch in ids.chunks(batch_size) {
            let batch = batch.to_vec();
            let ctx = self.ctx.clone();
            let executor = self.executor.clone();
            tasks.spawn(async move {
                let _permit = match acquire_or_cancel(&ctx, OperationKind::RemoveContact).await {
                    Some(permit) => permit?,
                    None => {
                        debug!("Contact batch of {} not dispatched", batch.len());
                        return Ok(());
                    }
                };
                executor.remove_contacts(&batch).await.map(|_| ())
            });
        }

        self.drain(OperationKind::RemoveContact, tasks).await
    }

    async fn archive_remainder(&self) -> Result<()> {
        let dialogs = self.executor.list_dialogs().await?;
        if dialogs.is_empty() {
            debug!("No dialogs left to archive");
            return Ok(());
        }
        info!("Archiving {} remaining dialogs", dialogs.len());

        let mut tasks = JoinSet::new();
        for dialog in dialogs {
            let ctx = self.ctx.clone();
            let executor = self.executor.clone();
            tasks.spawn(async move {
                let _permit = match acquire_or_cancel(&ctx, OperationKind::Archive).await {
                    Some(permit) => permit?,
                    None => return Ok(()),
                };
                executor.archive(&dialog).await.map(|_| ())
            });
        }

        self.drain(OperationKind::Archive, tasks).await?;
        info!(
            "Archived {} dialogs",
            self.ctx.report().statistics().dialogs_closed
        );
        Ok(())
    }

    /// Wait for every task of a phase
    ///
    /// The first fatal error cancels the run; tasks not yet dispatched then
    /// record themselves as skipped. Panicked tasks are logged; entity
    /// records were already appended by the executor.
    async fn drain(&self, kind: OperationKind, mut tasks: JoinSet<Result<()>>) -> Result<()> {
        let mut fatal = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => {}
                Ok(Err(err)) if !err.is_fatal() => {
                    warn!("Error during {}: {}", kind, err);
                }
                Ok(Err(err)) => {
                    if fatal.is_none() {
                        error!("Fatal error during {}, stopping: {}", kind, err);
                        self.ctx.cancel();
                        fatal = Some(err);
                    } else {
                        debug!("Further error during {}: {}", kind, err);
                    }
                }
                Err(join_err) => {
                    error!("Task during {} did not complete: {}", kind, join_err);
                    if kind == OperationKind::RemoveContact {
                        self.ctx.report().note_error();
                    }
                }
            }
        }
        fatal.map_or(Ok(()), Err)
    }
}

/// Wait for a slot on the lane of `kind`, or for cancellation
///
/// `None` means the run was cancelled first; the operation must not start.
async fn acquire_or_cancel(
    ctx: &RunContext,
    kind: OperationKind,
) -> Option<Result<LanePermit>> {
    let token = ctx.cancellation_token();
    let acquired = tokio::select! {
        biased;
        _ = token.cancelled() => None,
        permit = ctx.lanes().lane(kind).acquire() => Some(permit),
    };
    match acquired {
        Some(Ok(_)) if token.is_cancelled() => None,
        other => other,
    }
}

/// Run a full cleanup with a fresh context
///
/// Convenience wrapper for callers that do not need to cancel the run.
pub async fn run_cleanup(
    session: Arc<dyn RemoteSession>,
    account_name: &str,
    config: CleanupConfig,
    worklist: &Worklist,
    dry_run: bool,
) -> CleanupSummary {
    let ctx = Arc::new(RunContext::new(account_name, config));
    BatchRunner::new(ctx, session).run(worklist, dry_run).await
}
