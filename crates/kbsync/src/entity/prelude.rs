//! Common re-exports for convenient entity usage.

pub use super::article::{
    ActiveModel as ArticleActiveModel, Column as ArticleColumn, Entity as Article,
    Model as ArticleModel,
};
pub use super::category::{
    ActiveModel as CategoryActiveModel, Column as CategoryColumn, Entity as Category,
    Model as CategoryModel,
};
pub use super::external_article_mapping::{
    ActiveModel as ExternalArticleMappingActiveModel, Column as ExternalArticleMappingColumn,
    Entity as ExternalArticleMapping, Model as ExternalArticleMappingModel,
};
pub use super::mapping_direction::MappingDirection;
pub use super::provider_kind::ProviderKind;
pub use super::sync_direction::SyncDirection;
pub use super::sync_job::{
    ActiveModel as SyncJobActiveModel, Column as SyncJobColumn, Entity as SyncJob, ErrorLogEntry,
    Model as SyncJobModel,
};
pub use super::sync_job_status::SyncJobStatus;
