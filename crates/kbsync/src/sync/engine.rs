//! Import and export orchestration.
//!
//! Both directions share one shape: validate and start the job, process
//! articles one at a time, record per-item failures in the job's error log, and
//! finish the job as completed. Errors outside the per-item loop (listing,
//! configuration, job persistence) fail the job and are returned to the caller.
//!
//! Runs are sequential. Concurrent jobs against the same provider share its
//! rate limit budget through the client's limiter.

mod export;
mod import;

pub use export::export_articles;
pub use import::import_articles;

use super::errors::SyncError;
use super::job::JobTracker;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::SyncResult;
use crate::provider::short_error_message;

/// Complete the job on success, fail it on error.
async fn finish(
    tracker: JobTracker<'_>,
    outcome: Result<(), SyncError>,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncResult, SyncError> {
    match outcome {
        Ok(()) => {
            let result = tracker.complete().await?;
            emit(
                on_progress,
                SyncProgress::JobCompleted {
                    total: result.total,
                    created: result.created,
                    updated: result.updated,
                    skipped: result.skipped,
                    failed: result.failed,
                },
            );
            Ok(result)
        }
        Err(err) => {
            let message = short_error_message(&err);
            let job_id = tracker.job_id();
            if let Err(persist_err) = tracker.fail(&message).await {
                tracing::error!(
                    %job_id,
                    error = %persist_err,
                    "Could not mark sync job as failed"
                );
            }
            emit(on_progress, SyncProgress::JobFailed { error: message });
            Err(err)
        }
    }
}
