use thiserror::Error;
use uuid::Uuid;

use crate::entity::provider_kind::ProviderKind;
use crate::entity::sync_direction::SyncDirection;
use crate::entity::sync_job_status::SyncJobStatus;
use crate::provider::ProviderError;
use crate::store::StoreError;

/// Errors that abort a sync run.
///
/// Per-article failures never surface here; they are recorded in the job's
/// error log instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Configuration does not allow the run to proceed.
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Sync job not found: {0}")]
    JobNotFound(Uuid),

    #[error("Sync job {id} is {status}, expected pending")]
    JobNotPending { id: Uuid, status: SyncJobStatus },

    #[error("Sync job {id} is for {expected}, but the client talks to {actual}")]
    ProviderMismatch {
        id: Uuid,
        expected: ProviderKind,
        actual: ProviderKind,
    },

    #[error("Sync job {id} is an {expected} job, cannot run it as {actual}")]
    DirectionMismatch {
        id: Uuid,
        expected: SyncDirection,
        actual: SyncDirection,
    },
}

impl SyncError {
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_not_pending_message() {
        let id = Uuid::new_v4();
        let err = SyncError::JobNotPending {
            id,
            status: SyncJobStatus::Completed,
        };
        let msg = err.to_string();
        assert!(msg.contains(&id.to_string()));
        assert!(msg.contains("completed"));
    }

    #[test]
    fn test_provider_error_is_transparent() {
        let err: SyncError = ProviderError::api(500, "boom").into();
        assert_eq!(err.to_string(), "API error (HTTP 500): boom");
    }

    #[test]
    fn test_provider_mismatch_message() {
        let err = SyncError::ProviderMismatch {
            id: Uuid::new_v4(),
            expected: ProviderKind::Zendesk,
            actual: ProviderKind::Freshdesk,
        };
        let msg = err.to_string();
        assert!(msg.contains("zendesk"));
        assert!(msg.contains("freshdesk"));
    }
}
