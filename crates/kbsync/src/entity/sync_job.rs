//! SyncJob entity - progress and error log for one import or export run.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::provider_kind::ProviderKind;
use crate::entity::sync_direction::SyncDirection;
use crate::entity::sync_job_status::SyncJobStatus;

/// A sync job record. Pollers read it by id while the orchestrator updates it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sync_jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub knowledge_base_id: Uuid,
    pub provider: ProviderKind,
    pub direction: SyncDirection,
    pub status: SyncJobStatus,

    // ─── Counters ────────────────────────────────────────────────────────────
    /// Lower bound while an import is running; final once the job is terminal.
    pub total_items: i32,
    pub processed_items: i32,
    pub created_items: i32,
    pub updated_items: i32,
    pub skipped_items: i32,
    pub failed_items: i32,

    /// Ordered list of [`ErrorLogEntry`] values (JSON array).
    #[sea_orm(column_type = "Json")]
    pub error_log: serde_json::Value,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    pub started_at: Option<DateTimeWithTimeZone>,
    pub completed_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// One error log entry. `item_id` is `None` for job-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorLogEntry {
    pub fn new(item_id: Option<String>, error: impl Into<String>) -> Self {
        Self {
            item_id,
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}

impl Model {
    /// Decode the error log into typed entries.
    ///
    /// Malformed entries (written by something other than kbsync) are skipped.
    pub fn error_entries(&self) -> Vec<ErrorLogEntry> {
        match &self.error_log {
            serde_json::Value::Array(values) => values
                .iter()
                .filter_map(|v| serde_json::from_value(v.clone()).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Percentage of known items processed, or `None` before anything was counted.
    pub fn progress_percent(&self) -> Option<f64> {
        if self.total_items <= 0 {
            return None;
        }
        Some(f64::from(self.processed_items) * 100.0 / f64::from(self.total_items))
    }
}

/// Serialize entries for the `error_log` column.
pub fn error_log_value(entries: &[ErrorLogEntry]) -> serde_json::Value {
    serde_json::to_value(entries).unwrap_or_else(|_| serde_json::Value::Array(Vec::new()))
}
