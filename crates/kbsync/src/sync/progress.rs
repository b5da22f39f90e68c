//! Progress reporting types for sync runs.
//!
//! The engine emits events through an optional callback so the CLI can drive a
//! progress bar or a log, while library callers can ignore them.

use uuid::Uuid;

use crate::entity::provider_kind::ProviderKind;
use crate::entity::sync_direction::SyncDirection;

/// Progress events emitted during import and export runs.
///
/// Item ids are remote article ids during import and local article ids during
/// export.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum SyncProgress {
    /// The job moved to running.
    JobStarted {
        job_id: Uuid,
        provider: ProviderKind,
        direction: SyncDirection,
    },

    /// Articles of one remote container are known. During import the total
    /// grows with each container.
    ContainerListed {
        container_id: String,
        name: String,
        articles: usize,
        total_so_far: usize,
    },

    /// Export candidates are resolved.
    ExportPlanned { candidates: usize },

    /// A local category was created for a remote container.
    CategoryCreated { category_id: Uuid, name: String },

    ItemCreated { item_id: String, title: String },

    ItemUpdated { item_id: String, title: String },

    /// Content hash unchanged; nothing written.
    ItemSkipped { item_id: String, title: String },

    /// The item failed and was recorded in the error log.
    ItemFailed {
        item_id: String,
        title: String,
        error: String,
    },

    /// Non-fatal condition worth surfacing (e.g. an unknown article id).
    Warning { message: String },

    JobCompleted {
        total: usize,
        created: usize,
        updated: usize,
        skipped: usize,
        failed: usize,
    },

    JobFailed { error: String },
}

/// Callback for progress updates during sync runs.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}
