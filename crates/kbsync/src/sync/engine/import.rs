//! Remote → local import.

use chrono::Utc;
use uuid::Uuid;

use super::finish;
use crate::entity::mapping_direction::MappingDirection;
use crate::entity::provider_kind::ProviderKind;
use crate::entity::sync_direction::SyncDirection;
use crate::provider::{HelpdeskClient, RemoteArticle, RemoteSection, short_error_message};
use crate::store::{ArticleChanges, MappingChanges, NewArticle, NewExternalMapping, SyncStore};
use crate::sync::category_mapper::{CategoryMapper, CategoryResolution};
use crate::sync::errors::SyncError;
use crate::sync::hash::content_hash;
use crate::sync::job::{ItemOutcome, JobTracker};
use crate::sync::progress::{ProgressCallback, SyncProgress, emit};
use crate::sync::types::{ImportRequest, SyncResult};

/// Import every article of the remote help center into the knowledge base.
///
/// Walks categories → sections → articles in remote order. The job total grows
/// as each section is listed, so it is a lower bound until the job is terminal.
/// For each article the content hash decides between skip, update (remote wins)
/// and create.
///
/// # Errors
/// Job validation errors leave the job untouched. Listing failures and job
/// persistence failures mark the job failed and are returned.
#[tracing::instrument(
    skip_all,
    fields(job_id = %request.job_id, provider = %client.provider())
)]
pub async fn import_articles(
    store: &dyn SyncStore,
    client: &dyn HelpdeskClient,
    request: &ImportRequest,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncResult, SyncError> {
    let provider = client.provider();
    let mut tracker =
        JobTracker::start(store, request.job_id, provider, SyncDirection::Import).await?;

    emit(
        on_progress,
        SyncProgress::JobStarted {
            job_id: request.job_id,
            provider,
            direction: SyncDirection::Import,
        },
    );

    let outcome = run(store, client, request, &mut tracker, on_progress).await;
    finish(tracker, outcome, on_progress).await
}

async fn run(
    store: &dyn SyncStore,
    client: &dyn HelpdeskClient,
    request: &ImportRequest,
    tracker: &mut JobTracker<'_>,
    on_progress: Option<&ProgressCallback>,
) -> Result<(), SyncError> {
    let mut ctx = ImportContext {
        store,
        knowledge_base_id: request.knowledge_base_id,
        provider: client.provider(),
        mapper: CategoryMapper::new(store, request.knowledge_base_id, &request.category_mappings),
        on_progress,
    };

    for category in client.list_categories().await? {
        let sections = client.list_sections(Some(&category.id)).await?;
        tracing::debug!(category = %category.name, sections = sections.len(), "Listed sections");

        for section in sections {
            let articles = client.list_articles(Some(&section.id)).await?;
            tracker.add_total(articles.len()).await?;

            emit(
                on_progress,
                SyncProgress::ContainerListed {
                    container_id: section.id.clone(),
                    name: section.name.clone(),
                    articles: articles.len(),
                    total_so_far: tracker.result().total,
                },
            );

            for article in &articles {
                match ctx.import_one(&section, article).await {
                    Ok(outcome) => {
                        tracker.record(outcome);
                        emit(on_progress, item_event(outcome, article));
                    }
                    Err(err) => {
                        let message = short_error_message(&err);
                        tracing::warn!(
                            external_id = %article.id,
                            title = %article.title,
                            error = %message,
                            "Failed to import article"
                        );
                        tracker.record_failure(article.id.clone(), message.clone());
                        emit(
                            on_progress,
                            SyncProgress::ItemFailed {
                                item_id: article.id.clone(),
                                title: article.title.clone(),
                                error: message,
                            },
                        );
                    }
                }
                tracker.advance().await?;
            }
        }
    }

    Ok(())
}

fn item_event(outcome: ItemOutcome, article: &RemoteArticle) -> SyncProgress {
    let item_id = article.id.clone();
    let title = article.title.clone();
    match outcome {
        ItemOutcome::Created => SyncProgress::ItemCreated { item_id, title },
        ItemOutcome::Updated => SyncProgress::ItemUpdated { item_id, title },
        ItemOutcome::Skipped => SyncProgress::ItemSkipped { item_id, title },
    }
}

struct ImportContext<'a> {
    store: &'a dyn SyncStore,
    knowledge_base_id: Uuid,
    provider: ProviderKind,
    mapper: CategoryMapper<'a>,
    on_progress: Option<&'a ProgressCallback>,
}

impl ImportContext<'_> {
    async fn import_one(
        &mut self,
        section: &RemoteSection,
        article: &RemoteArticle,
    ) -> Result<ItemOutcome, SyncError> {
        let hash = content_hash(&article.body);
        let existing = self
            .store
            .get_external_mapping_by_external_id(self.knowledge_base_id, &article.id, self.provider)
            .await?;

        let Some(mapping) = existing else {
            let category_id = self.resolve_category(section).await?;
            let local = self
                .store
                .create_article(NewArticle {
                    knowledge_base_id: self.knowledge_base_id,
                    category_id,
                    title: article.title.clone(),
                    content: article.body.clone(),
                    is_public: article.is_published,
                })
                .await?;

            self.store
                .create_external_mapping(NewExternalMapping {
                    knowledge_base_id: self.knowledge_base_id,
                    local_article_id: local.id,
                    provider: self.provider,
                    external_id: article.id.clone(),
                    external_url: article.html_url.clone(),
                    sync_direction: MappingDirection::Imported,
                    content_hash: hash,
                    local_updated_at: Some(local.updated_at.with_timezone(&Utc)),
                    external_updated_at: article.updated_at,
                })
                .await?;

            tracing::debug!(external_id = %article.id, local_id = %local.id, "Created article");
            return Ok(ItemOutcome::Created);
        };

        if mapping.content_hash == hash {
            tracing::debug!(external_id = %article.id, "Unchanged, skipping");
            return Ok(ItemOutcome::Skipped);
        }

        let category_id = self.resolve_category(section).await?;
        let (local, relinked) = match mapping.local_article_id {
            Some(local_id) => {
                let local = self
                    .store
                    .update_article(
                        local_id,
                        ArticleChanges {
                            title: Some(article.title.clone()),
                            content: Some(article.body.clone()),
                            category_id: Some(category_id),
                        },
                    )
                    .await?;
                (local, false)
            }
            None => {
                // The local article was deleted; recreate it and relink the mapping.
                let local = self
                    .store
                    .create_article(NewArticle {
                        knowledge_base_id: self.knowledge_base_id,
                        category_id,
                        title: article.title.clone(),
                        content: article.body.clone(),
                        is_public: article.is_published,
                    })
                    .await?;
                (local, true)
            }
        };

        self.store
            .update_external_mapping(
                mapping.id,
                MappingChanges {
                    local_article_id: relinked.then_some(local.id),
                    external_url: article.html_url.clone(),
                    content_hash: Some(hash),
                    local_updated_at: Some(local.updated_at.with_timezone(&Utc)),
                    external_updated_at: article.updated_at,
                },
            )
            .await?;

        tracing::debug!(
            external_id = %article.id,
            local_id = %local.id,
            relinked,
            "Updated article"
        );
        Ok(ItemOutcome::Updated)
    }

    async fn resolve_category(&mut self, section: &RemoteSection) -> Result<Option<Uuid>, SyncError> {
        let resolution = self.mapper.resolve(section).await?;
        if let CategoryResolution::Created(category) = &resolution {
            emit(
                self.on_progress,
                SyncProgress::CategoryCreated {
                    category_id: category.id,
                    name: category.name.clone(),
                },
            );
        }
        Ok(resolution.category_id())
    }
}
