//! Lifecycle status of a sync job.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sync job status.
///
/// Transitions are monotonic: `Pending → Running → {Completed | Failed}`.
/// `Completed` and `Failed` are terminal; a re-run is always a new job.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum SyncJobStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "running")]
    Running,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl SyncJobStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, SyncJobStatus::Completed | SyncJobStatus::Failed)
    }

    /// Whether moving from `self` to `next` is a legal forward transition.
    ///
    /// `Pending → Failed` is allowed so a caller can fail a job the orchestrator
    /// never started.
    #[must_use]
    pub fn can_transition_to(self, next: SyncJobStatus) -> bool {
        use SyncJobStatus::*;
        matches!(
            (self, next),
            (Pending, Running) | (Pending, Failed) | (Running, Completed) | (Running, Failed)
        )
    }
}

impl std::fmt::Display for SyncJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncJobStatus::Pending => write!(f, "pending"),
            SyncJobStatus::Running => write!(f, "running"),
            SyncJobStatus::Completed => write!(f, "completed"),
            SyncJobStatus::Failed => write!(f, "failed"),
        }
    }
}
