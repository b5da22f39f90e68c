use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entity::provider_kind::ProviderKind;

use super::errors::Result;

/// A top-level category on a helpdesk platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCategory {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub position: Option<i32>,
}

/// A container that directly holds articles (Zendesk section, Freshdesk folder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSection {
    pub id: String,
    /// Parent category, when the platform reports it.
    pub category_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

/// An article on a helpdesk platform, in the common shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteArticle {
    pub id: String,
    /// Containing section/folder id.
    pub section_id: Option<String>,
    pub title: String,
    /// Body as HTML.
    pub body: String,
    pub html_url: Option<String>,
    /// Zendesk `draft == false`, Freshdesk `status == 2`.
    pub is_published: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Result of a successful connection test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    /// Name or email of the authenticated agent.
    pub account: String,
}

/// Unified interface over helpdesk knowledge base APIs.
///
/// Implementations route every network call through the provider's rate limiter
/// and follow pagination until the collection is exhausted.
#[async_trait]
pub trait HelpdeskClient: Send + Sync {
    /// Which platform this client talks to.
    fn provider(&self) -> ProviderKind;

    async fn list_categories(&self) -> Result<Vec<RemoteCategory>>;

    /// Sections (folders) of one category, or of the whole help center when
    /// `category_id` is `None`.
    async fn list_sections(&self, category_id: Option<&str>) -> Result<Vec<RemoteSection>>;

    /// Articles of one section (folder), or of the whole help center when
    /// `section_id` is `None`.
    async fn list_articles(&self, section_id: Option<&str>) -> Result<Vec<RemoteArticle>>;

    async fn create_article(
        &self,
        section_id: &str,
        title: &str,
        body: &str,
    ) -> Result<RemoteArticle>;

    async fn update_article(
        &self,
        external_id: &str,
        title: &str,
        body: &str,
    ) -> Result<RemoteArticle>;

    /// Verify the credentials. HTTP 401 maps to
    /// [`ProviderError::InvalidCredentials`](super::ProviderError::InvalidCredentials).
    async fn test_connection(&self) -> Result<ConnectionInfo>;
}
