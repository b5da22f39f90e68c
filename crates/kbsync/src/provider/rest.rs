//! Shared REST plumbing for provider clients: auth header, rate limiting and
//! status-code handling.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::entity::provider_kind::ProviderKind;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};

use super::errors::{ProviderError, Result};
use super::rate_limit::ProviderRateLimiter;

/// Build an HTTP Basic `Authorization` header value.
pub fn basic_auth(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, password))
    )
}

/// Extract the `rel="next"` URL from an RFC 8288 `Link` header.
pub fn next_link(link_header: &str) -> Option<String> {
    for part in link_header.split(',') {
        let mut url = None;
        let mut is_next = false;

        for segment in part.trim().split(';') {
            let segment = segment.trim();
            if segment.starts_with('<') && segment.ends_with('>') {
                url = Some(&segment[1..segment.len() - 1]);
            } else if let Some(rel) = segment.strip_prefix("rel=") {
                is_next = rel.trim_matches('"') == "next";
            }
        }

        if is_next && let Some(url) = url {
            return Some(url.to_string());
        }
    }
    None
}

/// Rate-limited, authenticated JSON client for one provider account.
#[derive(Clone)]
pub(crate) struct RestClient {
    provider: ProviderKind,
    base_url: String,
    authorization: String,
    transport: Arc<dyn HttpTransport>,
    limiter: ProviderRateLimiter,
}

impl RestClient {
    pub(crate) fn new(
        provider: ProviderKind,
        base_url: impl Into<String>,
        authorization: String,
        transport: Arc<dyn HttpTransport>,
        limiter: ProviderRateLimiter,
    ) -> Self {
        Self {
            provider,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            authorization,
            transport,
            limiter,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path starting with `/`.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Resolve a pagination link against the page it came from. Absolute links
    /// pass through; relative ones are joined onto `current`.
    pub(crate) fn resolve(&self, current: &str, link: &str) -> Option<String> {
        match url::Url::parse(link) {
            Ok(absolute) => Some(absolute.into()),
            Err(url::ParseError::RelativeUrlWithoutBase) => url::Url::parse(current)
                .and_then(|base| base.join(link))
                .map(String::from)
                .ok(),
            Err(err) => {
                tracing::warn!(provider = %self.provider, link, error = %err, "Ignoring malformed pagination link");
                None
            }
        }
    }

    /// Send one request through the rate limiter without checking the status.
    pub(crate) async fn send_raw(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = request
            .header("Authorization", self.authorization.as_str())
            .header("Accept", "application/json");

        tracing::trace!(
            provider = %self.provider,
            method = request.method.as_str(),
            url = %request.url,
            "Sending request"
        );

        let response = self
            .limiter
            .schedule(self.provider, || self.transport.send(request))
            .await?;
        Ok(response)
    }

    /// Send one request; any non-2xx status becomes [`ProviderError::Api`].
    pub(crate) async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self.send_raw(request).await?;
        if !response.is_success() {
            return Err(ProviderError::api(response.status, response.body_text()));
        }
        Ok(response)
    }

    pub(crate) async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.send(HttpRequest::new(HttpMethod::Get, url)).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get(url).await?;
        decode(&response)
    }

    /// POST or PUT a JSON body and decode the JSON response.
    pub(crate) async fn send_json<B, T>(&self, method: HttpMethod, url: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let request = HttpRequest::new(method, url).json(body)?;
        let response = self.send(request).await?;
        decode(&response)
    }
}

/// Decode a JSON response body.
pub(crate) fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(ProviderError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MockTransport;
    use crate::provider::rate_limit::RateLimitSettings;

    fn client(mock: &MockTransport) -> RestClient {
        RestClient::new(
            ProviderKind::Zendesk,
            "https://acme.zendesk.com/",
            basic_auth("user", "pass"),
            Arc::new(mock.clone()),
            ProviderRateLimiter::new(RateLimitSettings::default()),
        )
    }

    #[test]
    fn test_basic_auth() {
        // base64("user:pass")
        assert_eq!(basic_auth("user", "pass"), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_next_link() {
        let header = r#"<https://acme.freshdesk.com/api/v2/x?page=2>; rel="next", <https://acme.freshdesk.com/api/v2/x?page=1>; rel="prev""#;
        assert_eq!(
            next_link(header).as_deref(),
            Some("https://acme.freshdesk.com/api/v2/x?page=2")
        );
        assert_eq!(next_link(r#"<https://a.test/?page=1>; rel="prev""#), None);
        assert_eq!(next_link(""), None);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let mock = MockTransport::new();
        let client = client(&mock);
        assert_eq!(client.base_url(), "https://acme.zendesk.com");
        assert_eq!(client.url("/api"), "https://acme.zendesk.com/api");
    }

    #[test]
    fn resolve_joins_relative_links() {
        let mock = MockTransport::new();
        let client = client(&mock);
        let current = "https://acme.zendesk.com/api/v2/things?page=1";

        assert_eq!(
            client.resolve(current, "/api/v2/things?page=2").as_deref(),
            Some("https://acme.zendesk.com/api/v2/things?page=2")
        );
        assert_eq!(
            client.resolve(current, "https://other.test/p2").as_deref(),
            Some("https://other.test/p2")
        );
        assert_eq!(client.resolve(current, "http://[bad").as_deref(), None);
    }

    #[tokio::test]
    async fn requests_carry_auth_header() {
        let mock = MockTransport::new();
        mock.push_json(
            HttpMethod::Get,
            "https://acme.zendesk.com/ping",
            200,
            serde_json::json!({"ok": true}),
        );

        let value: serde_json::Value = client(&mock)
            .get_json("https://acme.zendesk.com/ping")
            .await
            .unwrap();
        assert_eq!(value["ok"], true);

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            crate::http::header_get(&requests[0].headers, "authorization"),
            Some("Basic dXNlcjpwYXNz")
        );
    }

    #[tokio::test]
    async fn non_success_status_becomes_api_error() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Get,
            "https://acme.zendesk.com/missing",
            HttpResponse {
                status: 404,
                headers: Vec::new(),
                body: b"RecordNotFound".to_vec(),
            },
        );

        let err = client(&mock)
            .get("https://acme.zendesk.com/missing")
            .await
            .unwrap_err();
        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "RecordNotFound");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn transport_failure_becomes_network_error() {
        let mock = MockTransport::new();
        let err = client(&mock)
            .get("https://acme.zendesk.com/nothing")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network { .. }));
    }

    #[tokio::test]
    async fn undecodable_body_becomes_decode_error() {
        let mock = MockTransport::new();
        mock.push_response(
            HttpMethod::Get,
            "https://acme.zendesk.com/html",
            HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: b"<html>".to_vec(),
            },
        );
        let err = client(&mock)
            .get_json::<serde_json::Value>("https://acme.zendesk.com/html")
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Decode { .. }));
    }
}
