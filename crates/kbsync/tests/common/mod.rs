//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use kbsync::connect_and_migrate;
use kbsync::entity::prelude::*;
use kbsync::provider::{
    ConnectionInfo, HelpdeskClient, ProviderError, RemoteArticle, RemoteCategory, RemoteSection,
};
use kbsync::store::{
    ArticleChanges, DatabaseStore, MappingChanges, NewArticle, NewCategory, NewExternalMapping,
    NewSyncJob, StoreError, SyncJobChanges, SyncStore,
};
use kbsync::sync::{ProgressCallback, SyncProgress};
use uuid::Uuid;

/// Knowledge base used by every test.
pub fn kb_id() -> Uuid {
    Uuid::parse_str("00000000-0000-0000-0000-00000000000b").unwrap()
}

/// In-memory SQLite store with migrations applied.
pub async fn setup_store() -> DatabaseStore {
    let db = connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    DatabaseStore::new(db)
}

pub async fn pending_job(store: &dyn SyncStore, job: NewSyncJob) -> SyncJobModel {
    store
        .create_sync_job(job)
        .await
        .expect("Failed to create sync job")
}

pub async fn load_job(store: &dyn SyncStore, id: Uuid) -> SyncJobModel {
    store
        .get_sync_job(id)
        .await
        .expect("Failed to load sync job")
        .expect("sync job exists")
}

pub async fn articles(store: &dyn SyncStore) -> Vec<ArticleModel> {
    store
        .get_articles_by_knowledge_base_id(kb_id())
        .await
        .expect("Failed to list articles")
}

pub async fn categories(store: &dyn SyncStore) -> Vec<CategoryModel> {
    store
        .get_categories_by_knowledge_base_id(kb_id())
        .await
        .expect("Failed to list categories")
}

pub async fn local_article(
    store: &dyn SyncStore,
    category_id: Option<Uuid>,
    title: &str,
    content: &str,
    is_public: bool,
) -> ArticleModel {
    store
        .create_article(NewArticle {
            knowledge_base_id: kb_id(),
            category_id,
            title: title.to_string(),
            content: content.to_string(),
            is_public,
        })
        .await
        .expect("Failed to create article")
}

pub async fn local_category(store: &dyn SyncStore, name: &str) -> CategoryModel {
    let position = categories(store).await.len() as i32;
    store
        .create_category(NewCategory {
            knowledge_base_id: kb_id(),
            name: name.to_string(),
            description: None,
            position,
        })
        .await
        .expect("Failed to create category")
}

/// Progress callback that collects every event.
pub fn recorder() -> (ProgressCallback, Arc<Mutex<Vec<SyncProgress>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: ProgressCallback = Box::new(move |event: SyncProgress| {
        sink.lock().unwrap().push(event);
    });
    (callback, events)
}

// ─── Fake provider ──────────────────────────────────────────────────────────

#[derive(Default)]
struct FakeState {
    categories: Vec<RemoteCategory>,
    sections: Vec<RemoteSection>,
    articles: Vec<RemoteArticle>,
    calls: Vec<String>,
    fail_listing: bool,
    fail_create_titles: HashSet<String>,
    next_id: u64,
}

/// In-memory help center that records every call.
pub struct FakeProvider {
    provider: ProviderKind,
    state: Mutex<FakeState>,
}

impl FakeProvider {
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            state: Mutex::new(FakeState {
                next_id: 1000,
                ..Default::default()
            }),
        }
    }

    /// Add a section, creating its parent category on first use.
    pub fn section(&self, category_id: &str, section_id: &str, name: &str) -> &Self {
        let mut state = self.state.lock().unwrap();
        if !state.categories.iter().any(|c| c.id == category_id) {
            state.categories.push(RemoteCategory {
                id: category_id.to_string(),
                name: format!("Category {category_id}"),
                description: None,
                position: None,
            });
        }
        state.sections.push(RemoteSection {
            id: section_id.to_string(),
            category_id: Some(category_id.to_string()),
            name: name.to_string(),
            description: None,
        });
        self
    }

    /// Insert or replace a published remote article.
    pub fn article(&self, section_id: &str, id: &str, title: &str, body: &str) -> &Self {
        let mut state = self.state.lock().unwrap();
        state.articles.retain(|a| a.id != id);
        state.articles.push(RemoteArticle {
            id: id.to_string(),
            section_id: Some(section_id.to_string()),
            title: title.to_string(),
            body: body.to_string(),
            html_url: Some(format!("https://help.example.com/articles/{id}")),
            is_published: true,
            updated_at: Some(Utc::now()),
        });
        self
    }

    pub fn edit_body(&self, id: &str, body: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(article) = state.articles.iter_mut().find(|a| a.id == id) {
            article.body = body.to_string();
        }
    }

    pub fn fail_listing(&self) {
        self.state.lock().unwrap().fail_listing = true;
    }

    pub fn fail_create(&self, title: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_create_titles
            .insert(title.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that would write to the remote platform.
    pub fn write_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with("create") || c.starts_with("update"))
            .collect()
    }

    pub fn remote_article(&self, id: &str) -> Option<RemoteArticle> {
        let state = self.state.lock().unwrap();
        state.articles.iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl HelpdeskClient for FakeProvider {
    fn provider(&self) -> ProviderKind {
        self.provider
    }

    async fn list_categories(&self) -> Result<Vec<RemoteCategory>, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("list_categories".to_string());
        if state.fail_listing {
            return Err(ProviderError::api(503, "Service Unavailable"));
        }
        Ok(state.categories.clone())
    }

    async fn list_sections(
        &self,
        category_id: Option<&str>,
    ) -> Result<Vec<RemoteSection>, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list_sections:{}", category_id.unwrap_or("*")));
        Ok(state
            .sections
            .iter()
            .filter(|s| category_id.is_none() || s.category_id.as_deref() == category_id)
            .cloned()
            .collect())
    }

    async fn list_articles(
        &self,
        section_id: Option<&str>,
    ) -> Result<Vec<RemoteArticle>, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("list_articles:{}", section_id.unwrap_or("*")));
        Ok(state
            .articles
            .iter()
            .filter(|a| section_id.is_none() || a.section_id.as_deref() == section_id)
            .cloned()
            .collect())
    }

    async fn create_article(
        &self,
        section_id: &str,
        title: &str,
        body: &str,
    ) -> Result<RemoteArticle, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("create:{section_id}:{title}"));
        if state.fail_create_titles.contains(title) {
            return Err(ProviderError::api(422, "Unprocessable Entity"));
        }

        state.next_id += 1;
        let id = state.next_id.to_string();
        let article = RemoteArticle {
            id: id.clone(),
            section_id: Some(section_id.to_string()),
            title: title.to_string(),
            body: body.to_string(),
            html_url: Some(format!("https://help.example.com/articles/{id}")),
            is_published: true,
            updated_at: Some(Utc::now()),
        };
        state.articles.push(article.clone());
        Ok(article)
    }

    async fn update_article(
        &self,
        external_id: &str,
        title: &str,
        body: &str,
    ) -> Result<RemoteArticle, ProviderError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("update:{external_id}"));
        let Some(article) = state.articles.iter_mut().find(|a| a.id == external_id) else {
            return Err(ProviderError::api(404, "Not Found"));
        };
        article.title = title.to_string();
        article.body = body.to_string();
        article.updated_at = Some(Utc::now());
        Ok(article.clone())
    }

    async fn test_connection(&self) -> Result<ConnectionInfo, ProviderError> {
        Ok(ConnectionInfo {
            account: "agent@example.com".to_string(),
        })
    }
}

// ─── Failing store ──────────────────────────────────────────────────────────

/// Delegates to a [`DatabaseStore`] but rejects local article creation for
/// selected titles.
pub struct FailingStore {
    pub inner: DatabaseStore,
    fail_titles: HashSet<String>,
}

impl FailingStore {
    pub fn new(inner: DatabaseStore, titles: &[&str]) -> Self {
        Self {
            inner,
            fail_titles: titles.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[async_trait]
impl SyncStore for FailingStore {
    async fn get_categories_by_knowledge_base_id(
        &self,
        knowledge_base_id: Uuid,
    ) -> kbsync::store::Result<Vec<CategoryModel>> {
        self.inner
            .get_categories_by_knowledge_base_id(knowledge_base_id)
            .await
    }

    async fn create_category(&self, category: NewCategory) -> kbsync::store::Result<CategoryModel> {
        self.inner.create_category(category).await
    }

    async fn get_articles_by_knowledge_base_id(
        &self,
        knowledge_base_id: Uuid,
    ) -> kbsync::store::Result<Vec<ArticleModel>> {
        self.inner
            .get_articles_by_knowledge_base_id(knowledge_base_id)
            .await
    }

    async fn create_article(&self, article: NewArticle) -> kbsync::store::Result<ArticleModel> {
        if self.fail_titles.contains(&article.title) {
            return Err(StoreError::InvalidInput {
                message: format!("rejected '{}'", article.title),
            });
        }
        self.inner.create_article(article).await
    }

    async fn update_article(
        &self,
        id: Uuid,
        changes: ArticleChanges,
    ) -> kbsync::store::Result<ArticleModel> {
        self.inner.update_article(id, changes).await
    }

    async fn get_external_mapping_by_external_id(
        &self,
        knowledge_base_id: Uuid,
        external_id: &str,
        provider: ProviderKind,
    ) -> kbsync::store::Result<Option<ExternalArticleMappingModel>> {
        self.inner
            .get_external_mapping_by_external_id(knowledge_base_id, external_id, provider)
            .await
    }

    async fn get_external_mapping_by_local_article(
        &self,
        knowledge_base_id: Uuid,
        local_article_id: Uuid,
        provider: ProviderKind,
    ) -> kbsync::store::Result<Option<ExternalArticleMappingModel>> {
        self.inner
            .get_external_mapping_by_local_article(knowledge_base_id, local_article_id, provider)
            .await
    }

    async fn create_external_mapping(
        &self,
        mapping: NewExternalMapping,
    ) -> kbsync::store::Result<ExternalArticleMappingModel> {
        self.inner.create_external_mapping(mapping).await
    }

    async fn update_external_mapping(
        &self,
        id: Uuid,
        changes: MappingChanges,
    ) -> kbsync::store::Result<ExternalArticleMappingModel> {
        self.inner.update_external_mapping(id, changes).await
    }

    async fn create_sync_job(&self, job: NewSyncJob) -> kbsync::store::Result<SyncJobModel> {
        self.inner.create_sync_job(job).await
    }

    async fn get_sync_job(&self, id: Uuid) -> kbsync::store::Result<Option<SyncJobModel>> {
        self.inner.get_sync_job(id).await
    }

    async fn update_sync_job(
        &self,
        id: Uuid,
        changes: SyncJobChanges,
    ) -> kbsync::store::Result<SyncJobModel> {
        self.inner.update_sync_job(id, changes).await
    }
}
