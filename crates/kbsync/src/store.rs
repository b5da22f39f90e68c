//! Persistence collaborator for the sync engine.
//!
//! The orchestrator only talks to storage through the [`SyncStore`] trait so it
//! can run against the bundled sea-orm [`DatabaseStore`] or against test doubles.
//! Inputs are plain structs; partial updates use `Option` fields where `None`
//! means "leave unchanged".

mod database;
mod errors;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::entity::article::Model as ArticleModel;
use crate::entity::category::Model as CategoryModel;
use crate::entity::external_article_mapping::Model as MappingModel;
use crate::entity::mapping_direction::MappingDirection;
use crate::entity::provider_kind::ProviderKind;
use crate::entity::sync_direction::SyncDirection;
use crate::entity::sync_job::{ErrorLogEntry, Model as SyncJobModel};
use crate::entity::sync_job_status::SyncJobStatus;

pub use database::DatabaseStore;
pub use errors::{Result, StoreError};

/// Fields for a new local category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub knowledge_base_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub position: i32,
}

/// Fields for a new local article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    pub knowledge_base_id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub is_public: bool,
}

/// Partial update of a local article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` clears the category.
    pub category_id: Option<Option<Uuid>>,
}

/// Fields for a new external article mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExternalMapping {
    pub knowledge_base_id: Uuid,
    pub local_article_id: Uuid,
    pub provider: ProviderKind,
    pub external_id: String,
    pub external_url: Option<String>,
    pub sync_direction: MappingDirection,
    pub content_hash: String,
    pub local_updated_at: Option<DateTime<Utc>>,
    pub external_updated_at: Option<DateTime<Utc>>,
}

/// Partial update of an external article mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingChanges {
    pub local_article_id: Option<Uuid>,
    pub external_url: Option<String>,
    pub content_hash: Option<String>,
    pub local_updated_at: Option<DateTime<Utc>>,
    pub external_updated_at: Option<DateTime<Utc>>,
}

/// Fields for a new sync job. Jobs always start `pending` with zeroed counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSyncJob {
    pub knowledge_base_id: Uuid,
    pub provider: ProviderKind,
    pub direction: SyncDirection,
}

impl NewSyncJob {
    pub fn import(knowledge_base_id: Uuid, provider: ProviderKind) -> Self {
        Self {
            knowledge_base_id,
            provider,
            direction: SyncDirection::Import,
        }
    }

    pub fn export(knowledge_base_id: Uuid, provider: ProviderKind) -> Self {
        Self {
            knowledge_base_id,
            provider,
            direction: SyncDirection::Export,
        }
    }
}

/// Partial update of a sync job record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncJobChanges {
    pub status: Option<SyncJobStatus>,
    pub total_items: Option<i32>,
    pub processed_items: Option<i32>,
    pub created_items: Option<i32>,
    pub updated_items: Option<i32>,
    pub skipped_items: Option<i32>,
    pub failed_items: Option<i32>,
    /// Replaces the whole error log.
    pub error_log: Option<Vec<ErrorLogEntry>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Storage operations required by the sync engine.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Categories of a knowledge base, ordered by position.
    async fn get_categories_by_knowledge_base_id(
        &self,
        knowledge_base_id: Uuid,
    ) -> Result<Vec<CategoryModel>>;

    async fn create_category(&self, category: NewCategory) -> Result<CategoryModel>;

    async fn get_articles_by_knowledge_base_id(
        &self,
        knowledge_base_id: Uuid,
    ) -> Result<Vec<ArticleModel>>;

    async fn create_article(&self, article: NewArticle) -> Result<ArticleModel>;

    /// # Errors
    /// Returns `StoreError::NotFound` if the article does not exist.
    async fn update_article(&self, id: Uuid, changes: ArticleChanges) -> Result<ArticleModel>;

    async fn get_external_mapping_by_external_id(
        &self,
        knowledge_base_id: Uuid,
        external_id: &str,
        provider: ProviderKind,
    ) -> Result<Option<MappingModel>>;

    async fn get_external_mapping_by_local_article(
        &self,
        knowledge_base_id: Uuid,
        local_article_id: Uuid,
        provider: ProviderKind,
    ) -> Result<Option<MappingModel>>;

    async fn create_external_mapping(&self, mapping: NewExternalMapping) -> Result<MappingModel>;

    async fn update_external_mapping(
        &self,
        id: Uuid,
        changes: MappingChanges,
    ) -> Result<MappingModel>;

    async fn create_sync_job(&self, job: NewSyncJob) -> Result<SyncJobModel>;

    async fn get_sync_job(&self, id: Uuid) -> Result<Option<SyncJobModel>>;

    async fn update_sync_job(&self, id: Uuid, changes: SyncJobChanges) -> Result<SyncJobModel>;
}
