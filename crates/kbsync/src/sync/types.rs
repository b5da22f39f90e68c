//! Sync requests and results.

use uuid::Uuid;

use crate::entity::sync_job::ErrorLogEntry;
use crate::provider::{CategoryMapping, ProviderConfig};

/// Summary of a finished sync run. Mirrors the persisted job counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResult {
    pub total: usize,
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Items recorded in `errors` with an item id.
    pub failed: usize,
    /// The job's error log, in order.
    pub errors: Vec<ErrorLogEntry>,
}

/// Parameters for an import (remote → local) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    pub knowledge_base_id: Uuid,
    /// An existing job in `pending` status.
    pub job_id: Uuid,
    pub category_mappings: Vec<CategoryMapping>,
}

impl ImportRequest {
    pub fn new(
        knowledge_base_id: Uuid,
        job_id: Uuid,
        category_mappings: Vec<CategoryMapping>,
    ) -> Self {
        Self {
            knowledge_base_id,
            job_id,
            category_mappings,
        }
    }

    pub fn from_config(knowledge_base_id: Uuid, job_id: Uuid, config: &ProviderConfig) -> Self {
        Self::new(
            knowledge_base_id,
            job_id,
            config.category_mappings.clone(),
        )
    }
}

/// Parameters for an export (local → remote) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub knowledge_base_id: Uuid,
    /// An existing job in `pending` status.
    pub job_id: Uuid,
    pub category_mappings: Vec<CategoryMapping>,
    /// Container for articles whose category has no mapping.
    pub default_section_id: Option<String>,
    /// Export only these articles. `None` exports every public article.
    pub article_ids: Option<Vec<Uuid>>,
}

impl ExportRequest {
    pub fn new(
        knowledge_base_id: Uuid,
        job_id: Uuid,
        category_mappings: Vec<CategoryMapping>,
    ) -> Self {
        Self {
            knowledge_base_id,
            job_id,
            category_mappings,
            default_section_id: None,
            article_ids: None,
        }
    }

    pub fn from_config(knowledge_base_id: Uuid, job_id: Uuid, config: &ProviderConfig) -> Self {
        let mut request = Self::new(
            knowledge_base_id,
            job_id,
            config.category_mappings.clone(),
        );
        request.default_section_id = config.default_section_id.clone();
        request
    }

    pub fn with_default_section(mut self, section_id: impl Into<String>) -> Self {
        self.default_section_id = Some(section_id.into());
        self
    }

    pub fn with_article_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.article_ids = Some(ids);
        self
    }
}
