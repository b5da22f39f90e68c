//! Initial migration creating the knowledge base and sync bookkeeping tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_categories(manager).await?;
        self.create_articles(manager).await?;
        self.create_external_article_mappings(manager).await?;
        self.create_sync_jobs(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SyncJobs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ExternalArticleMappings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Articles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_categories(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::KnowledgeBaseId).uuid().not_null())
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Description).text().null())
                    .col(
                        ColumnDef::new(Categories::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categories_kb_position")
                    .table(Categories::Table)
                    .col(Categories::KnowledgeBaseId)
                    .col(Categories::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_articles(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Articles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Articles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Articles::KnowledgeBaseId).uuid().not_null())
                    .col(ColumnDef::new(Articles::CategoryId).uuid().null())
                    .col(ColumnDef::new(Articles::Title).string().not_null())
                    .col(ColumnDef::new(Articles::Content).text().not_null())
                    .col(
                        ColumnDef::new(Articles::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Articles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Articles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_articles_category")
                            .from(Articles::Table, Articles::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_articles_kb")
                    .table(Articles::Table)
                    .col(Articles::KnowledgeBaseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_external_article_mappings(
        &self,
        manager: &SchemaManager<'_>,
    ) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExternalArticleMappings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExternalArticleMappings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    // Identity
                    .col(
                        ColumnDef::new(ExternalArticleMappings::KnowledgeBaseId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExternalArticleMappings::LocalArticleId)
                            .uuid()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExternalArticleMappings::Provider)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExternalArticleMappings::ExternalId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExternalArticleMappings::ExternalUrl)
                            .text()
                            .null(),
                    )
                    // Reconciliation
                    .col(
                        ColumnDef::new(ExternalArticleMappings::SyncDirection)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExternalArticleMappings::ContentHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExternalArticleMappings::LocalUpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExternalArticleMappings::ExternalUpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ExternalArticleMappings::HasConflict)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // Timestamps
                    .col(
                        ColumnDef::new(ExternalArticleMappings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ExternalArticleMappings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_external_mappings_article")
                            .from(
                                ExternalArticleMappings::Table,
                                ExternalArticleMappings::LocalArticleId,
                            )
                            .to(Articles::Table, Articles::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique on (knowledge_base_id, provider, external_id)
        manager
            .create_index(
                Index::create()
                    .name("idx_external_mappings_external")
                    .table(ExternalArticleMappings::Table)
                    .col(ExternalArticleMappings::KnowledgeBaseId)
                    .col(ExternalArticleMappings::Provider)
                    .col(ExternalArticleMappings::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique on (knowledge_base_id, provider, local_article_id); NULLs never collide
        manager
            .create_index(
                Index::create()
                    .name("idx_external_mappings_local")
                    .table(ExternalArticleMappings::Table)
                    .col(ExternalArticleMappings::KnowledgeBaseId)
                    .col(ExternalArticleMappings::Provider)
                    .col(ExternalArticleMappings::LocalArticleId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_sync_jobs(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncJobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SyncJobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SyncJobs::KnowledgeBaseId).uuid().not_null())
                    .col(ColumnDef::new(SyncJobs::Provider).string().not_null())
                    .col(ColumnDef::new(SyncJobs::Direction).string().not_null())
                    .col(
                        ColumnDef::new(SyncJobs::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    // Counters
                    .col(
                        ColumnDef::new(SyncJobs::TotalItems)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::ProcessedItems)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::CreatedItems)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::UpdatedItems)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::SkippedItems)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::FailedItems)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::ErrorLog)
                            .json()
                            .not_null()
                            .default(Expr::cust("'[]'")),
                    )
                    // Timestamps
                    .col(
                        ColumnDef::new(SyncJobs::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sync_jobs_kb_provider")
                    .table(SyncJobs::Table)
                    .col(SyncJobs::KnowledgeBaseId)
                    .col(SyncJobs::Provider)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
#[sea_orm(iden = "categories")]
enum Categories {
    Table,
    Id,
    KnowledgeBaseId,
    Name,
    Description,
    Position,
    CreatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "articles")]
enum Articles {
    Table,
    Id,
    KnowledgeBaseId,
    CategoryId,
    Title,
    Content,
    IsPublic,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "external_article_mappings")]
enum ExternalArticleMappings {
    Table,
    Id,
    KnowledgeBaseId,
    LocalArticleId,
    Provider,
    ExternalId,
    ExternalUrl,
    SyncDirection,
    ContentHash,
    LocalUpdatedAt,
    ExternalUpdatedAt,
    HasConflict,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "sync_jobs")]
enum SyncJobs {
    Table,
    Id,
    KnowledgeBaseId,
    Provider,
    Direction,
    Status,
    TotalItems,
    ProcessedItems,
    CreatedItems,
    UpdatedItems,
    SkippedItems,
    FailedItems,
    ErrorLog,
    StartedAt,
    CompletedAt,
    CreatedAt,
}
