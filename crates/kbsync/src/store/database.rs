//! sea-orm backed [`SyncStore`] implementation.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::errors::{Result, StoreError};
use super::{
    ArticleChanges, MappingChanges, NewArticle, NewCategory, NewExternalMapping, NewSyncJob,
    SyncJobChanges, SyncStore,
};
use crate::entity::article::{self, Entity as Article, Model as ArticleModel};
use crate::entity::category::{self, Entity as Category, Model as CategoryModel};
use crate::entity::external_article_mapping::{
    self, Entity as ExternalArticleMapping, Model as MappingModel,
};
use crate::entity::provider_kind::ProviderKind;
use crate::entity::sync_job::{self, Entity as SyncJob, Model as SyncJobModel, error_log_value};
use crate::entity::sync_job_status::SyncJobStatus;

/// Store backed by a sea-orm [`DatabaseConnection`].
#[derive(Debug)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection, for queries outside the sync surface.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl SyncStore for DatabaseStore {
    async fn get_categories_by_knowledge_base_id(
        &self,
        knowledge_base_id: Uuid,
    ) -> Result<Vec<CategoryModel>> {
        Category::find()
            .filter(category::Column::KnowledgeBaseId.eq(knowledge_base_id))
            .order_by_asc(category::Column::Position)
            .all(&self.db)
            .await
            .map_err(StoreError::from)
    }

    async fn create_category(&self, input: NewCategory) -> Result<CategoryModel> {
        if input.name.trim().is_empty() {
            return Err(StoreError::InvalidInput {
                message: "category name must not be empty".to_string(),
            });
        }

        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            knowledge_base_id: Set(input.knowledge_base_id),
            name: Set(input.name),
            description: Set(input.description),
            position: Set(input.position),
            created_at: Set(Utc::now().fixed_offset()),
        };
        model.insert(&self.db).await.map_err(StoreError::from)
    }

    async fn get_articles_by_knowledge_base_id(
        &self,
        knowledge_base_id: Uuid,
    ) -> Result<Vec<ArticleModel>> {
        Article::find()
            .filter(article::Column::KnowledgeBaseId.eq(knowledge_base_id))
            .order_by_asc(article::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(StoreError::from)
    }

    async fn create_article(&self, input: NewArticle) -> Result<ArticleModel> {
        let now = Utc::now().fixed_offset();
        let model = article::ActiveModel {
            id: Set(Uuid::new_v4()),
            knowledge_base_id: Set(input.knowledge_base_id),
            category_id: Set(input.category_id),
            title: Set(input.title),
            content: Set(input.content),
            is_public: Set(input.is_public),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&self.db).await.map_err(StoreError::from)
    }

    async fn update_article(&self, id: Uuid, changes: ArticleChanges) -> Result<ArticleModel> {
        let existing = Article::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::not_found("article", id))?;

        let mut model: article::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            model.title = Set(title);
        }
        if let Some(content) = changes.content {
            model.content = Set(content);
        }
        if let Some(category_id) = changes.category_id {
            model.category_id = Set(category_id);
        }
        model.updated_at = Set(Utc::now().fixed_offset());
        model.update(&self.db).await.map_err(StoreError::from)
    }

    async fn get_external_mapping_by_external_id(
        &self,
        knowledge_base_id: Uuid,
        external_id: &str,
        provider: ProviderKind,
    ) -> Result<Option<MappingModel>> {
        ExternalArticleMapping::find()
            .filter(external_article_mapping::Column::KnowledgeBaseId.eq(knowledge_base_id))
            .filter(external_article_mapping::Column::Provider.eq(provider))
            .filter(external_article_mapping::Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .map_err(StoreError::from)
    }

    async fn get_external_mapping_by_local_article(
        &self,
        knowledge_base_id: Uuid,
        local_article_id: Uuid,
        provider: ProviderKind,
    ) -> Result<Option<MappingModel>> {
        ExternalArticleMapping::find()
            .filter(external_article_mapping::Column::KnowledgeBaseId.eq(knowledge_base_id))
            .filter(external_article_mapping::Column::Provider.eq(provider))
            .filter(external_article_mapping::Column::LocalArticleId.eq(local_article_id))
            .one(&self.db)
            .await
            .map_err(StoreError::from)
    }

    async fn create_external_mapping(&self, input: NewExternalMapping) -> Result<MappingModel> {
        let now = Utc::now().fixed_offset();
        let model = external_article_mapping::ActiveModel {
            id: Set(Uuid::new_v4()),
            knowledge_base_id: Set(input.knowledge_base_id),
            local_article_id: Set(Some(input.local_article_id)),
            provider: Set(input.provider),
            external_id: Set(input.external_id),
            external_url: Set(input.external_url),
            sync_direction: Set(input.sync_direction),
            content_hash: Set(input.content_hash),
            local_updated_at: Set(input.local_updated_at.map(|t| t.fixed_offset())),
            external_updated_at: Set(input.external_updated_at.map(|t| t.fixed_offset())),
            has_conflict: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        model.insert(&self.db).await.map_err(StoreError::from)
    }

    async fn update_external_mapping(
        &self,
        id: Uuid,
        changes: MappingChanges,
    ) -> Result<MappingModel> {
        let existing = ExternalArticleMapping::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::not_found("external article mapping", id))?;

        let mut model: external_article_mapping::ActiveModel = existing.into();
        if let Some(local_article_id) = changes.local_article_id {
            model.local_article_id = Set(Some(local_article_id));
        }
        if let Some(url) = changes.external_url {
            model.external_url = Set(Some(url));
        }
        if let Some(hash) = changes.content_hash {
            model.content_hash = Set(hash);
        }
        if let Some(at) = changes.local_updated_at {
            model.local_updated_at = Set(Some(at.fixed_offset()));
        }
        if let Some(at) = changes.external_updated_at {
            model.external_updated_at = Set(Some(at.fixed_offset()));
        }
        model.updated_at = Set(Utc::now().fixed_offset());
        model.update(&self.db).await.map_err(StoreError::from)
    }

    async fn create_sync_job(&self, input: NewSyncJob) -> Result<SyncJobModel> {
        let model = sync_job::ActiveModel {
            id: Set(Uuid::new_v4()),
            knowledge_base_id: Set(input.knowledge_base_id),
            provider: Set(input.provider),
            direction: Set(input.direction),
            status: Set(SyncJobStatus::Pending),
            total_items: Set(0),
            processed_items: Set(0),
            created_items: Set(0),
            updated_items: Set(0),
            skipped_items: Set(0),
            failed_items: Set(0),
            error_log: Set(serde_json::Value::Array(Vec::new())),
            started_at: Set(None),
            completed_at: Set(None),
            created_at: Set(Utc::now().fixed_offset()),
        };
        model.insert(&self.db).await.map_err(StoreError::from)
    }

    async fn get_sync_job(&self, id: Uuid) -> Result<Option<SyncJobModel>> {
        SyncJob::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(StoreError::from)
    }

    async fn update_sync_job(&self, id: Uuid, changes: SyncJobChanges) -> Result<SyncJobModel> {
        let existing = SyncJob::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| StoreError::not_found("sync job", id))?;

        if let Some(next) = changes.status
            && !existing.status.can_transition_to(next)
        {
            return Err(StoreError::InvalidInput {
                message: format!(
                    "illegal sync job transition {} -> {}",
                    existing.status, next
                ),
            });
        }

        let expected_status = existing.status;
        let status_changes = changes.status.is_some();
        let mut model: sync_job::ActiveModel = existing.into();
        if let Some(status) = changes.status {
            model.status = Set(status);
        }
        if let Some(n) = changes.total_items {
            model.total_items = Set(n);
        }
        if let Some(n) = changes.processed_items {
            model.processed_items = Set(n);
        }
        if let Some(n) = changes.created_items {
            model.created_items = Set(n);
        }
        if let Some(n) = changes.updated_items {
            model.updated_items = Set(n);
        }
        if let Some(n) = changes.skipped_items {
            model.skipped_items = Set(n);
        }
        if let Some(n) = changes.failed_items {
            model.failed_items = Set(n);
        }
        if let Some(entries) = changes.error_log {
            model.error_log = Set(error_log_value(&entries));
        }
        if let Some(at) = changes.started_at {
            model.started_at = Set(Some(at.fixed_offset()));
        }
        if let Some(at) = changes.completed_at {
            model.completed_at = Set(Some(at.fixed_offset()));
        }

        if !status_changes {
            return model.update(&self.db).await.map_err(StoreError::from);
        }

        // The status read above must still hold when the row is written, so two
        // runners cannot both move the same job out of `pending`.
        match SyncJob::update(model)
            .filter(sync_job::Column::Status.eq(expected_status))
            .exec(&self.db)
            .await
        {
            Ok(updated) => Ok(updated),
            Err(sea_orm::DbErr::RecordNotUpdated) => Err(StoreError::InvalidInput {
                message: format!("sync job {} is no longer {}", id, expected_status),
            }),
            Err(err) => Err(err.into()),
        }
    }
}
