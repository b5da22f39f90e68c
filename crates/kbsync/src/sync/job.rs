//! Sync job bookkeeping.
//!
//! [`JobTracker`] owns the in-memory counters and error log of a running job
//! and writes them back after every item so pollers see live progress.

use chrono::Utc;
use uuid::Uuid;

use crate::entity::provider_kind::ProviderKind;
use crate::entity::sync_direction::SyncDirection;
use crate::entity::sync_job::ErrorLogEntry;
use crate::entity::sync_job_status::SyncJobStatus;
use crate::store::{SyncJobChanges, SyncStore};

use super::errors::SyncError;
use super::types::SyncResult;

/// What happened to one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Created,
    Updated,
    Skipped,
}

fn to_count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Drives one job through `pending → running → {completed | failed}`.
pub struct JobTracker<'a> {
    store: &'a dyn SyncStore,
    job_id: Uuid,
    result: SyncResult,
}

impl<'a> JobTracker<'a> {
    /// Validate the job and move it to running.
    ///
    /// # Errors
    /// `JobNotFound`, `JobNotPending`, `ProviderMismatch` or `DirectionMismatch`
    /// leave the job untouched.
    pub async fn start(
        store: &'a dyn SyncStore,
        job_id: Uuid,
        provider: ProviderKind,
        direction: SyncDirection,
    ) -> Result<Self, SyncError> {
        let job = store
            .get_sync_job(job_id)
            .await?
            .ok_or(SyncError::JobNotFound(job_id))?;

        if job.status != SyncJobStatus::Pending {
            return Err(SyncError::JobNotPending {
                id: job_id,
                status: job.status,
            });
        }
        if job.provider != provider {
            return Err(SyncError::ProviderMismatch {
                id: job_id,
                expected: job.provider,
                actual: provider,
            });
        }
        if job.direction != direction {
            return Err(SyncError::DirectionMismatch {
                id: job_id,
                expected: job.direction,
                actual: direction,
            });
        }

        store
            .update_sync_job(
                job_id,
                SyncJobChanges {
                    status: Some(SyncJobStatus::Running),
                    started_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(%job_id, %provider, %direction, "Sync job started");

        Ok(Self {
            store,
            job_id,
            result: SyncResult::default(),
        })
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub fn result(&self) -> &SyncResult {
        &self.result
    }

    /// Grow the known total and persist it immediately.
    pub async fn add_total(&mut self, count: usize) -> Result<(), SyncError> {
        if count == 0 {
            return Ok(());
        }
        self.result.total += count;
        self.store
            .update_sync_job(
                self.job_id,
                SyncJobChanges {
                    total_items: Some(to_count(self.result.total)),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    pub fn record(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Created => self.result.created += 1,
            ItemOutcome::Updated => self.result.updated += 1,
            ItemOutcome::Skipped => self.result.skipped += 1,
        }
    }

    pub fn record_failure(&mut self, item_id: impl Into<String>, error: impl Into<String>) {
        self.result
            .errors
            .push(ErrorLogEntry::new(Some(item_id.into()), error));
        self.result.failed += 1;
    }

    /// Count one item as processed and persist counters and error log.
    pub async fn advance(&mut self) -> Result<(), SyncError> {
        self.result.processed += 1;
        self.store
            .update_sync_job(self.job_id, self.counters())
            .await?;
        Ok(())
    }

    /// Mark the job completed and return the final summary.
    pub async fn complete(self) -> Result<SyncResult, SyncError> {
        let changes = SyncJobChanges {
            status: Some(SyncJobStatus::Completed),
            completed_at: Some(Utc::now()),
            ..self.counters()
        };
        self.store.update_sync_job(self.job_id, changes).await?;

        tracing::info!(
            job_id = %self.job_id,
            total = self.result.total,
            created = self.result.created,
            updated = self.result.updated,
            skipped = self.result.skipped,
            failed = self.result.failed,
            "Sync job completed"
        );
        Ok(self.result)
    }

    /// Mark the job failed with one job-level error log entry.
    pub async fn fail(mut self, error: &str) -> Result<SyncResult, SyncError> {
        self.result.errors.push(ErrorLogEntry::new(None, error));
        let changes = SyncJobChanges {
            status: Some(SyncJobStatus::Failed),
            completed_at: Some(Utc::now()),
            ..self.counters()
        };
        self.store.update_sync_job(self.job_id, changes).await?;

        tracing::error!(job_id = %self.job_id, error, "Sync job failed");
        Ok(self.result)
    }

    fn counters(&self) -> SyncJobChanges {
        SyncJobChanges {
            total_items: Some(to_count(self.result.total)),
            processed_items: Some(to_count(self.result.processed)),
            created_items: Some(to_count(self.result.created)),
            updated_items: Some(to_count(self.result.updated)),
            skipped_items: Some(to_count(self.result.skipped)),
            failed_items: Some(to_count(self.result.failed)),
            error_log: Some(self.result.errors.clone()),
            ..Default::default()
        }
    }
}
