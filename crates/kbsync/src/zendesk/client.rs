//! Zendesk Help Center client.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::convert::{
    to_remote_article, to_remote_category, to_remote_section, translation_to_remote_article,
};
use super::types::{
    ArticleEnvelope, ArticlesPage, CategoriesPage, NewArticle, NewArticleBody, Page, SectionsPage,
    TranslationBody, TranslationEnvelope, TranslationUpdate, UserEnvelope,
};
use crate::entity::provider_kind::ProviderKind;
use crate::http::{DEFAULT_TIMEOUT, HttpMethod, HttpRequest, HttpTransport, ReqwestTransport};
use crate::provider::rest::{RestClient, basic_auth, decode};
use crate::provider::{
    ConnectionInfo, HelpdeskClient, ProviderError, ProviderRateLimiter, RemoteArticle,
    RemoteCategory, RemoteSection, Result, require,
};

/// Locale used for created and updated articles unless configured otherwise.
pub const DEFAULT_LOCALE: &str = "en-us";

/// Zendesk caps `per_page` at 100.
const PAGE_SIZE: u32 = 100;

/// Zendesk Guide API client.
#[derive(Clone)]
pub struct ZendeskClient {
    rest: RestClient,
    locale: String,
    permission_group_id: Option<i64>,
}

impl ZendeskClient {
    /// Create a client for `https://{subdomain}.zendesk.com` authenticating with an
    /// API token.
    ///
    /// # Errors
    /// Returns `ProviderError::Config` if any credential is empty.
    pub fn new(
        subdomain: &str,
        email: &str,
        api_token: &str,
        limiter: ProviderRateLimiter,
    ) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(DEFAULT_TIMEOUT)?;
        Self::new_with_transport(subdomain, email, api_token, limiter, Arc::new(transport))
    }

    pub fn new_with_transport(
        subdomain: &str,
        email: &str,
        api_token: &str,
        limiter: ProviderRateLimiter,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self> {
        require("zendesk subdomain", subdomain)?;
        require("zendesk email", email)?;
        require("zendesk api_token", api_token)?;

        let base_url = format!("https://{}.zendesk.com", subdomain.trim());
        let authorization = basic_auth(&format!("{}/token", email.trim()), api_token.trim());

        Ok(Self {
            rest: RestClient::new(
                ProviderKind::Zendesk,
                base_url,
                authorization,
                transport,
                limiter,
            ),
            locale: DEFAULT_LOCALE.to_string(),
            permission_group_id: None,
        })
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = locale.to_string();
        self
    }

    pub fn with_permission_group_id(mut self, permission_group_id: i64) -> Self {
        self.permission_group_id = Some(permission_group_id);
        self
    }

    pub fn base_url(&self) -> &str {
        self.rest.base_url()
    }

    fn help_center_url(&self, path: &str) -> String {
        let sep = if path.contains('?') { '&' } else { '?' };
        self.rest.url(&format!(
            "/api/v2/help_center{}{}per_page={}",
            path, sep, PAGE_SIZE
        ))
    }

    /// Follow `next_page` links until exhausted.
    async fn collect_pages<P>(&self, first_url: String) -> Result<Vec<P::Item>>
    where
        P: Page + DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut url = Some(first_url);

        while let Some(current) = url.take() {
            let page: P = self.rest.get_json(&current).await?;
            let (batch, next) = page.into_parts();
            tracing::debug!(url = %current, count = batch.len(), "Fetched Zendesk page");
            items.extend(batch);

            // Some proxies echo the current URL back as next_page.
            url = next.filter(|next| next != &current);
        }

        Ok(items)
    }
}

#[async_trait]
impl HelpdeskClient for ZendeskClient {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Zendesk
    }

    async fn list_categories(&self) -> Result<Vec<RemoteCategory>> {
        let categories = self
            .collect_pages::<CategoriesPage>(self.help_center_url("/categories.json"))
            .await?;
        Ok(categories.into_iter().map(to_remote_category).collect())
    }

    async fn list_sections(&self, category_id: Option<&str>) -> Result<Vec<RemoteSection>> {
        let path = match category_id {
            Some(id) => format!("/categories/{}/sections.json", id),
            None => "/sections.json".to_string(),
        };
        let sections = self
            .collect_pages::<SectionsPage>(self.help_center_url(&path))
            .await?;
        Ok(sections.into_iter().map(to_remote_section).collect())
    }

    async fn list_articles(&self, section_id: Option<&str>) -> Result<Vec<RemoteArticle>> {
        let path = match section_id {
            Some(id) => format!("/sections/{}/articles.json", id),
            None => "/articles.json".to_string(),
        };
        let articles = self
            .collect_pages::<ArticlesPage>(self.help_center_url(&path))
            .await?;
        Ok(articles.into_iter().map(to_remote_article).collect())
    }

    async fn create_article(
        &self,
        section_id: &str,
        title: &str,
        body: &str,
    ) -> Result<RemoteArticle> {
        let url = self.rest.url(&format!(
            "/api/v2/help_center/sections/{}/articles.json",
            section_id
        ));
        let payload = NewArticleBody {
            article: NewArticle {
                title,
                body,
                locale: &self.locale,
                permission_group_id: self.permission_group_id,
                user_segment_id: None,
            },
        };
        let envelope: ArticleEnvelope = self
            .rest
            .send_json(HttpMethod::Post, &url, &payload)
            .await?;
        Ok(to_remote_article(envelope.article))
    }

    async fn update_article(
        &self,
        external_id: &str,
        title: &str,
        body: &str,
    ) -> Result<RemoteArticle> {
        let url = self.rest.url(&format!(
            "/api/v2/help_center/articles/{}/translations/{}.json",
            external_id, self.locale
        ));
        let payload = TranslationBody {
            translation: TranslationUpdate { title, body },
        };
        let envelope: TranslationEnvelope = self
            .rest
            .send_json(HttpMethod::Put, &url, &payload)
            .await?;
        Ok(translation_to_remote_article(envelope.translation))
    }

    async fn test_connection(&self) -> Result<ConnectionInfo> {
        let url = self.rest.url("/api/v2/users/me.json");
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

        let envelope: UserEnvelope = decode(&response)?;
        if envelope.user.id.is_none() {
            // Zendesk answers with the anonymous user instead of 401 on some plans.
            return Err(ProviderError::InvalidCredentials);
        }

        let account = envelope
            .user
            .email
            .or(envelope.user.name)
            .unwrap_or_else(|| "unknown".to_string());
        Ok(ConnectionInfo { account })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, MockTransport, header_get};
    use crate::provider::RateLimitSettings;

    const BASE: &str = "https://acme.zendesk.com";

    fn client(mock: &MockTransport) -> ZendeskClient {
        ZendeskClient::new_with_transport(
            "acme",
            "agent@acme.test",
            "tok",
            ProviderRateLimiter::new(RateLimitSettings::default()),
            Arc::new(mock.clone()),
        )
        .unwrap()
    }

    fn article_json(id: i64, title: &str, body: &str, draft: bool) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "section_id": 42,
            "title": title,
            "body": body,
            "html_url": format!("{BASE}/hc/en-us/articles/{id}"),
            "draft": draft,
            "updated_at": "2024-05-01T10:00:00Z"
        })
    }

    #[test]
    fn rejects_empty_credentials() {
        let result = ZendeskClient::new_with_transport(
            "acme",
            "",
            "tok",
            ProviderRateLimiter::new(RateLimitSettings::default()),
            Arc::new(MockTransport::new()),
        );
        assert!(matches!(result, Err(ProviderError::Config { .. })));
    }

    #[tokio::test]
    async fn auth_header_uses_email_token_form() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{BASE}/api/v2/help_center/categories.json?per_page=100"),
            200,
            serde_json::json!({"categories": [], "next_page": null}),
        );

        client(&mock).list_categories().await.unwrap();

        let requests = mock.requests();
        // base64("agent@acme.test/token:tok")
        assert_eq!(
            header_get(&requests[0].headers, "Authorization"),
            Some("Basic YWdlbnRAYWNtZS50ZXN0L3Rva2VuOnRvaw==")
        );
    }

    #[tokio::test]
    async fn list_articles_follows_next_page() {
        let mock = MockTransport::new();
        let first = format!("{BASE}/api/v2/help_center/sections/42/articles.json?per_page=100");
        let second = format!("{BASE}/api/v2/help_center/sections/42/articles.json?page=2&per_page=100");
        mock.push_json(
            HttpMethod::Get,
            first,
            200,
            serde_json::json!({
                "articles": [article_json(1, "Refunds", "<p>refund policy</p>", false)],
                "next_page": second,
            }),
        );
        mock.push_json(
            HttpMethod::Get,
            second.clone(),
            200,
            serde_json::json!({
                "articles": [article_json(2, "Taxes", "<p>tax info</p>", true)],
                "next_page": null,
            }),
        );

        let articles = client(&mock).list_articles(Some("42")).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Refunds");
        assert!(articles[0].is_published);
        assert_eq!(articles[1].id, "2");
        assert!(!articles[1].is_published);
        assert_eq!(mock.requests().len(), 2);
    }

    #[tokio::test]
    async fn list_sections_without_category_uses_global_endpoint() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{BASE}/api/v2/help_center/sections.json?per_page=100"),
            200,
            serde_json::json!({
                "sections": [{"id": 42, "category_id": 7, "name": "Billing", "description": ""}],
            }),
        );

        let sections = client(&mock).list_sections(None).await.unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "42");
        assert_eq!(sections[0].name, "Billing");
    }

    #[tokio::test]
    async fn create_article_posts_locale_and_permission_group() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Post,
            format!("{BASE}/api/v2/help_center/sections/42/articles.json"),
            201,
            serde_json::json!({"article": article_json(9, "Refunds", "<p>x</p>", false)}),
        );

        let created = client(&mock)
            .with_locale("de")
            .with_permission_group_id(5)
            .create_article("42", "Refunds", "<p>x</p>")
            .await
            .unwrap();
        assert_eq!(created.id, "9");

        let requests = mock.requests();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["article"]["title"], "Refunds");
        assert_eq!(body["article"]["locale"], "de");
        assert_eq!(body["article"]["permission_group_id"], 5);
        assert!(body["article"]["user_segment_id"].is_null());
    }

    #[tokio::test]
    async fn update_article_puts_translation() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Put,
            format!("{BASE}/api/v2/help_center/articles/9/translations/en-us.json"),
            200,
            serde_json::json!({"translation": {
                "source_id": 9,
                "title": "Refunds v2",
                "body": "<p>new</p>",
                "draft": false
            }}),
        );

        let updated = client(&mock)
            .update_article("9", "Refunds v2", "<p>new</p>")
            .await
            .unwrap();
        assert_eq!(updated.id, "9");
        assert_eq!(updated.body, "<p>new</p>");
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Post,
            format!("{BASE}/api/v2/help_center/sections/42/articles.json"),
            HttpResponse {
                status: 422,
                headers: Vec::new(),
                body: b"{\"error\":\"RecordInvalid\"}".to_vec(),
            },
        );

        let err = client(&mock)
            .create_article("42", "", "")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(422));
        assert!(err.to_string().contains("RecordInvalid"));
    }

    #[tokio::test]
    async fn test_connection_maps_401_to_invalid_credentials() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Get,
            format!("{BASE}/api/v2/users/me.json"),
            HttpResponse {
                status: 401,
                headers: Vec::new(),
                body: b"Couldn't authenticate you".to_vec(),
            },
        );

        let err = client(&mock).test_connection().await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_connection_rejects_anonymous_user() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{BASE}/api/v2/users/me.json"),
            200,
            serde_json::json!({"user": {"id": null, "name": "Anonymous user"}}),
        );

        let err = client(&mock).test_connection().await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_connection_returns_account() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            format!("{BASE}/api/v2/users/me.json"),
            200,
            serde_json::json!({"user": {"id": 3, "name": "Agent", "email": "agent@acme.test"}}),
        );

        let info = client(&mock).test_connection().await.unwrap();
        assert_eq!(info.account, "agent@acme.test");
    }
}
