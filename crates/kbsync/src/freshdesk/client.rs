//! Freshdesk Solutions client.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::convert::{to_remote_article, to_remote_category, to_remote_section};
use super::types::{
    ArticleUpdateBody, FreshdeskAgent, FreshdeskArticle, FreshdeskCategory, FreshdeskFolder,
    NewArticleBody, article_status,
};
use crate::entity::provider_kind::ProviderKind;
use crate::http::{DEFAULT_TIMEOUT, HttpMethod, HttpRequest, HttpTransport, ReqwestTransport};
use crate::provider::rest::{RestClient, basic_auth, decode, next_link};
use crate::provider::{
    ConnectionInfo, HelpdeskClient, ProviderError, ProviderRateLimiter, RemoteArticle,
    RemoteCategory, RemoteSection, Result, require,
};

/// Freshdesk caps `per_page` at 100.
const PAGE_SIZE: u32 = 100;

/// Freshdesk ignores the password part of Basic auth; `X` is the documented filler.
const PASSWORD_FILLER: &str = "X";

/// Normalize a Freshdesk domain setting into a base URL.
///
/// Accepts `acme`, `acme.freshdesk.com` or a full `https://` URL.
pub fn freshdesk_base_url(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else if domain.contains('.') {
        format!("https://{}", domain)
    } else {
        format!("https://{}.freshdesk.com", domain)
    }
}

/// Freshdesk Solutions API client.
#[derive(Clone)]
pub struct FreshdeskClient {
    rest: RestClient,
}

impl FreshdeskClient {
    /// # Errors
    /// Returns `ProviderError::Config` if the domain or API key is empty.
    pub fn new(domain: &str, api_key: &str, limiter: ProviderRateLimiter) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(DEFAULT_TIMEOUT)?;
        Self::new_with_transport(domain, api_key, limiter, Arc::new(transport))
    }

    pub fn new_with_transport(
        domain: &str,
        api_key: &str,
        limiter: ProviderRateLimiter,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        require("freshdesk domain", domain)?;
        require("freshdesk api_key", api_key)?;

        Ok(Self {
            rest: RestClient::new(
                ProviderKind::Freshdesk,
                freshdesk_base_url(domain),
                basic_auth(api_key.trim(), PASSWORD_FILLER),
                transport,
                limiter,
            ),
        })
    }

    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }

    /// Follow `Link: <…>; rel="next"` headers until exhausted.
    async fn collect_pages<T: DeserializeOwned>(&self, first_url: String) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut url = Some(first_url);

        while let Some(current) = url.take() {
            let response = self.rest.get(&current).await?;
            let batch: Vec<T> = decode(&response)?;
            tracing::debug!(url = %current, count = batch.len(), "Fetched Freshdesk page");
            items.extend(batch);

            url = response
                .header("link")
                .and_then(next_link)
                .and_then(|next| self.rest.resolve(&current, &next))
                .filter(|next| next != &current);
        }

        Ok(items)
    }

    async fn folders_of(&self, category_id: &str) -> Result<Vec<RemoteSection>> {
        let url = self.rest.url(&format!(
            "/api/v2/solutions/categories/{}/folders",
            category_id
        ));
        let folders: Vec<FreshdeskFolder> = self.collect_pages(url).await?;
        Ok(folders
            .into_iter()
            .map(|folder| to_remote_section(folder, Some(category_id)))
            .collect())
    }

    async fn articles_of(&self, folder_id: &str) -> Result<Vec<RemoteArticle>> {
        let url = self.rest.url(&format!(
            "/api/v2/solutions/folders/{}/articles?per_page={}",
            folder_id, PAGE_SIZE
        ));
        let articles: Vec<FreshdeskArticle> = self.collect_pages(url).await?;
        let base_url = self.base_url();
        Ok(articles
            .into_iter()
            .map(|article| to_remote_article(article, base_url))
            .collect())
    }
}

#[async_trait]
impl HelpdeskClient for FreshdeskClient {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Freshdesk
    }

    async fn list_categories(&self) -> Result<Vec<RemoteCategory>> {
        let url = self.rest.url("/api/v2/solutions/categories");
        let categories: Vec<FreshdeskCategory> = self.collect_pages(url).await?;
        Ok(categories.into_iter().map(to_remote_category).collect())
    }

    async fn list_sections(&self, category_id: Option<&str>) -> Result<Vec<RemoteSection>> {
        if let Some(id) = category_id {
            return self.folders_of(id).await;
        }

        // No account-wide folder endpoint: walk every category.
        let mut sections = Vec::new();
        for category in self.list_categories().await? {
            sections.extend(self.folders_of(&category.id).await?);
        }
        Ok(sections)
    }

    async fn list_articles(&self, section_id: Option<&str>) -> Result<Vec<RemoteArticle>> {
        if let Some(id) = section_id {
            return self.articles_of(id).await;
        }

        let mut articles = Vec::new();
        for folder in self.list_sections(None).await? {
            articles.extend(self.articles_of(&folder.id).await?);
        }
        Ok(articles)
    }

    async fn create_article(
        &self,
        section_id: &str,
        title: &str,
        body: &str,
    ) -> Result<RemoteArticle> {
        let url = self.rest.url(&format!(
            "/api/v2/solutions/folders/{}/articles",
            section_id
        ));
        let payload = NewArticleBody {
            title,
            description: body,
            status: article_status::PUBLISHED,
        };
        let article: FreshdeskArticle = self
            .rest
            .send_json(HttpMethod::Post, &url, &payload)
            .await?;
        Ok(to_remote_article(article, self.base_url()))
    }

    async fn update_article(
        &self,
        external_id: &str,
        title: &str,
        body: &str,
    ) -> Result<RemoteArticle> {
        let url = self
            .rest
            .url(&format!("/api/v2/solutions/articles/{}", external_id));
        let payload = ArticleUpdateBody {
            title,
            description: body,
        };
        let article: FreshdeskArticle = self
            .rest
            .send_json(HttpMethod::Put, &url, &payload)
            .await?;
        Ok(to_remote_article(article, self.base_url()))
    }

    async fn test_connection(&self) -> Result<ConnectionInfo> {
        let url = self.rest.url("/api/v2/agents/me");
        let response = self
            .rest
            .send_raw(HttpRequest::new(HttpMethod::Get, url))
            .await?;

        if response.status == 401 {
            return Err(ProviderError::InvalidCredentials);
        }
        if !response.is_success() {
            return Err(ProviderError::api(response.status, response.body_text()));
        }

        let agent: FreshdeskAgent = decode(&response)?;
        let account = agent
            .contact
            .email
            .or(agent.contact.name)
            .unwrap_or_else(|| "unknown".to_string());
        Ok(ConnectionInfo { account })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, MockTransport, header_get};
    use crate::provider::RateLimitSettings;

    const BASE: &str = "https://acme.freshdesk.com";

    fn client(mock: &MockTransport) -> FreshdeskClient {
        FreshdeskClient::new_with_transport(
            "acme",
            "key-123",
            ProviderRateLimiter::new(RateLimitSettings {
                zendesk_rpm: 6000,
                freshdesk_rpm: 6000,
            }),
            Arc::new(mock.clone()),
        )
        .unwrap()
    }

    fn json_response(status: u16, link: Option<&str>, body: serde_json::Value) -> HttpResponse {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(link) = link {
            headers.push(("Link".to_string(), link.to_string()));
        }
        HttpResponse {
            status,
            headers,
            body: body.to_string().into_bytes(),
        }
    }

    fn article_json(id: i64, title: &str, status: u8) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "folder_id": 77,
            "title": title,
            "description": format!("<p>{title}</p>"),
            "status": status,
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    #[test]
    fn test_freshdesk_base_url() {
        assert_eq!(freshdesk_base_url("acme"), BASE);
        assert_eq!(freshdesk_base_url("acme.freshdesk.com"), BASE);
        assert_eq!(
            freshdesk_base_url("https://support.acme.test/"),
            "https://support.acme.test"
        );
    }

    #[tokio::test]
    async fn auth_header_uses_api_key_and_filler() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{BASE}/api/v2/solutions/categories"),
            200,
            serde_json::json!([]),
        );

        client(&mock).list_categories().await.unwrap();

        // base64("key-123:X")
        assert_eq!(
            header_get(&mock.requests()[0].headers, "authorization"),
            Some("Basic a2V5LTEyMzpY")
        );
    }

    #[tokio::test]
    async fn list_articles_follows_link_header() {
        let mock = MockTransport::new();
        let first = format!("{BASE}/api/v2/solutions/folders/77/articles?per_page=100");
        let second = format!("{BASE}/api/v2/solutions/folders/77/articles?per_page=100&page=2");
        mock.push_response(
            HttpMethod::Get,
            first,
            json_response(
                200,
                Some(&format!("<{second}>; rel=\"next\"")),
                serde_json::json!([article_json(1, "Refunds", 2)]),
            ),
        );
        mock.push_response(
            HttpMethod::Get,
            second,
            json_response(200, None, serde_json::json!([article_json(2, "Taxes", 1)])),
        );

        let articles = client(&mock).list_articles(Some("77")).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert!(articles[0].is_published);
        assert!(!articles[1].is_published);
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn list_sections_without_category_walks_categories() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{BASE}/api/v2/solutions/categories"),
            200,
            serde_json::json!([
                {"id": 1, "name": "General"},
                {"id": 2, "name": "Payments"}
            ]),
        );
        mock.push_json(
            HttpMethod::Get,
            format!("{BASE}/api/v2/solutions/categories/1/folders"),
            200,
            serde_json::json!([{"id": 10, "name": "FAQ"}]),
        );
        mock.push_json(
            HttpMethod::Get,
            format!("{BASE}/api/v2/solutions/categories/2/folders"),
            200,
            serde_json::json!([{"id": 20, "name": "Billing"}, {"id": 21, "name": "Invoices"}]),
        );

        let sections = client(&mock).list_sections(None).await.unwrap();
        let names: Vec<_> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["FAQ", "Billing", "Invoices"]);
        assert_eq!(sections[1].category_id.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn create_article_publishes() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Post,
            format!("{BASE}/api/v2/solutions/folders/77/articles"),
            201,
            article_json(9, "Refunds", 2),
        );

        let created = client(&mock)
            .create_article("77", "Refunds", "<p>Refunds</p>")
            .await
            .unwrap();
        assert_eq!(created.id, "9");

        let body: serde_json::Value = serde_json::from_slice(&mock.requests()[0].body).unwrap();
        assert_eq!(body["status"], 2);
        assert_eq!(body["description"], "<p>Refunds</p>");
    }

    #[tokio::test]
    async fn update_article_puts_title_and_description() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Put,
            format!("{BASE}/api/v2/solutions/articles/9"),
            200,
            article_json(9, "Refunds v2", 2),
        );

        let updated = client(&mock)
            .update_article("9", "Refunds v2", "<p>Refunds v2</p>")
            .await
            .unwrap();
        assert_eq!(updated.title, "Refunds v2");
    }

    #[tokio::test]
    async fn server_error_is_api_error_with_body() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Get,
            format!("{BASE}/api/v2/solutions/categories"),
            json_response(500, None, serde_json::json!({"message": "oops"})),
        );

        let err = client(&mock).list_categories().await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(err.to_string().contains("oops"));
    }

    #[tokio::test]
    async fn test_connection_maps_401() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Get,
            format!("{BASE}/api/v2/agents/me"),
            json_response(401, None, serde_json::json!({"code": "invalid_credentials"})),
        );

        let err = client(&mock).test_connection().await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_connection_returns_agent_email() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{BASE}/api/v2/agents/me"),
            200,
            serde_json::json!({"id": 1, "contact": {"name": "Agent", "email": "agent@acme.test"}}),
        );

        let info = client(&mock).test_connection().await.unwrap();
        assert_eq!(info.account, "agent@acme.test");
    }
}
