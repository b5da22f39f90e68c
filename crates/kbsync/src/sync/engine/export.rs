//! Local → remote export.

use std::collections::HashSet;

use chrono::Utc;
use uuid::Uuid;

use super::finish;
use crate::entity::mapping_direction::MappingDirection;
use crate::entity::prelude::ArticleModel;
use crate::entity::provider_kind::ProviderKind;
use crate::entity::sync_direction::SyncDirection;
use crate::provider::{HelpdeskClient, short_error_message};
use crate::store::{MappingChanges, NewExternalMapping, SyncStore};
use crate::sync::category_mapper::export_target;
use crate::sync::errors::SyncError;
use crate::sync::hash::content_hash;
use crate::sync::job::{ItemOutcome, JobTracker};
use crate::sync::progress::{ProgressCallback, SyncProgress, emit};
use crate::sync::types::{ExportRequest, SyncResult};

/// An article paired with the remote container it belongs in.
struct ExportItem {
    article: ArticleModel,
    section_id: String,
}

/// Push local articles to the remote help center.
///
/// Candidates are the requested article ids, or every public article of the
/// knowledge base. Every candidate's target container is resolved before the
/// first remote call: if any article has neither a category mapping nor a
/// default section, the job fails with [`SyncError::Config`] and nothing is
/// sent.
///
/// # Errors
/// Job validation errors leave the job untouched. Configuration, store listing
/// and job persistence failures mark the job failed and are returned.
#[tracing::instrument(
    skip_all,
    fields(job_id = %request.job_id, provider = %client.provider())
)]
pub async fn export_articles(
    store: &dyn SyncStore,
    client: &dyn HelpdeskClient,
    request: &ExportRequest,
    on_progress: Option<&ProgressCallback>,
) -> Result<SyncResult, SyncError> {
    let provider = client.provider();
    let mut tracker =
        JobTracker::start(store, request.job_id, provider, SyncDirection::Export).await?;

    emit(
        on_progress,
        SyncProgress::JobStarted {
            job_id: request.job_id,
            provider,
            direction: SyncDirection::Export,
        },
    );

    let outcome = run(store, client, request, &mut tracker, on_progress).await;
    finish(tracker, outcome, on_progress).await
}

async fn run(
    store: &dyn SyncStore,
    client: &dyn HelpdeskClient,
    request: &ExportRequest,
    tracker: &mut JobTracker<'_>,
    on_progress: Option<&ProgressCallback>,
) -> Result<(), SyncError> {
    let plan = plan(store, request, on_progress).await?;
    tracker.add_total(plan.len()).await?;
    emit(
        on_progress,
        SyncProgress::ExportPlanned {
            candidates: plan.len(),
        },
    );

    let provider = client.provider();
    for item in &plan {
        let item_id = item.article.id.to_string();
        match export_one(store, client, request.knowledge_base_id, provider, item).await {
            Ok(outcome) => {
                tracker.record(outcome);
                let title = item.article.title.clone();
                let event = match outcome {
                    ItemOutcome::Created => SyncProgress::ItemCreated { item_id, title },
                    ItemOutcome::Updated => SyncProgress::ItemUpdated { item_id, title },
                    ItemOutcome::Skipped => SyncProgress::ItemSkipped { item_id, title },
                };
                emit(on_progress, event);
            }
            Err(err) => {
                let message = short_error_message(&err);
                tracing::warn!(
                    article_id = %item.article.id,
                    title = %item.article.title,
                    error = %message,
                    "Failed to export article"
                );
                tracker.record_failure(item_id.clone(), message.clone());
                emit(
                    on_progress,
                    SyncProgress::ItemFailed {
                        item_id,
                        title: item.article.title.clone(),
                        error: message,
                    },
                );
            }
        }
        tracker.advance().await?;
    }

    Ok(())
}

/// Select candidates and resolve each one's target container.
async fn plan(
    store: &dyn SyncStore,
    request: &ExportRequest,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<ExportItem>, SyncError> {
    let articles = store
        .get_articles_by_knowledge_base_id(request.knowledge_base_id)
        .await?;

    let candidates: Vec<ArticleModel> = match &request.article_ids {
        Some(ids) => {
            let known: HashSet<Uuid> = articles.iter().map(|a| a.id).collect();
            for missing in ids.iter().filter(|id| !known.contains(*id)) {
                let message = format!("article {missing} not found in knowledge base");
                tracing::warn!(article_id = %missing, "Requested article not found, ignoring");
                emit(on_progress, SyncProgress::Warning { message });
            }
            let wanted: HashSet<&Uuid> = ids.iter().collect();
            articles
                .into_iter()
                .filter(|a| wanted.contains(&a.id))
                .collect()
        }
        None => articles.into_iter().filter(|a| a.is_public).collect(),
    };

    let default_section = request.default_section_id.as_deref();
    let mut plan = Vec::with_capacity(candidates.len());
    for article in candidates {
        let Some(section_id) =
            export_target(&request.category_mappings, article.category_id, default_section)
        else {
            return Err(SyncError::config(format!(
                "no default section configured and article '{}' has no category mapping",
                article.title
            )));
        };
        plan.push(ExportItem {
            article,
            section_id,
        });
    }

    tracing::info!(candidates = plan.len(), "Planned export");
    Ok(plan)
}

async fn export_one(
    store: &dyn SyncStore,
    client: &dyn HelpdeskClient,
    knowledge_base_id: Uuid,
    provider: ProviderKind,
    item: &ExportItem,
) -> Result<ItemOutcome, SyncError> {
    let article = &item.article;
    let hash = content_hash(&article.content);
    let local_updated_at = Some(article.updated_at.with_timezone(&Utc));

    let existing = store
        .get_external_mapping_by_local_article(knowledge_base_id, article.id, provider)
        .await?;

    let Some(mapping) = existing else {
        let remote = client
            .create_article(&item.section_id, &article.title, &article.content)
            .await?;

        store
            .create_external_mapping(NewExternalMapping {
                knowledge_base_id,
                local_article_id: article.id,
                provider,
                external_id: remote.id.clone(),
                external_url: remote.html_url,
                sync_direction: MappingDirection::Exported,
                content_hash: hash,
                local_updated_at,
                external_updated_at: remote.updated_at,
            })
            .await?;

        tracing::debug!(article_id = %article.id, external_id = %remote.id, "Created remote article");
        return Ok(ItemOutcome::Created);
    };

    if mapping.content_hash == hash {
        tracing::debug!(article_id = %article.id, "Unchanged, skipping");
        return Ok(ItemOutcome::Skipped);
    }

    let remote = client
        .update_article(&mapping.external_id, &article.title, &article.content)
        .await?;

    store
        .update_external_mapping(
            mapping.id,
            MappingChanges {
                external_url: remote.html_url,
                content_hash: Some(hash),
                local_updated_at,
                external_updated_at: remote.updated_at,
                ..Default::default()
            },
        )
        .await?;

    tracing::debug!(article_id = %article.id, external_id = %mapping.external_id, "Updated remote article");
    Ok(ItemOutcome::Updated)
}
