//! Provider-agnostic interface over helpdesk knowledge base APIs.
//!
//! Each supported platform implements [`HelpdeskClient`]; the sync engine only
//! sees the trait object. [`connect`] picks the implementation from the tagged
//! [`ProviderCredentials`] in a [`ProviderConfig`].
//!
//! # Example
//!
//! ```ignore
//! use kbsync::provider::{ProviderConfig, ProviderCredentials, ProviderRateLimiter, connect};
//!
//! let config = ProviderConfig::new(ProviderCredentials::Freshdesk {
//!     domain: "acme.freshdesk.com".into(),
//!     api_key: api_key.into(),
//! });
//! let client = connect(&config, ProviderRateLimiter::shared())?;
//! for category in client.list_categories().await? {
//!     println!("{} ({})", category.name, category.id);
//! }
//! ```

mod config;
mod errors;
mod rate_limit;
pub(crate) mod rest;
mod types;

use std::sync::Arc;

pub use config::{CategoryMapping, ProviderConfig, ProviderCredentials};
pub use errors::{ProviderError, Result, short_error_message};
pub use rate_limit::{ProviderRateLimiter, RateLimitSettings, rate_limits};
pub use rest::{basic_auth, next_link};
pub use types::{ConnectionInfo, HelpdeskClient, RemoteArticle, RemoteCategory, RemoteSection};

use crate::freshdesk::FreshdeskClient;
use crate::http::{DEFAULT_TIMEOUT, HttpTransport, ReqwestTransport};
use crate::zendesk::ZendeskClient;

/// Build a client for the configured provider using the reqwest transport.
///
/// # Errors
/// Returns `ProviderError::Config` if required credential fields are empty, or
/// `ProviderError::Network` if the HTTP client cannot be built.
pub fn connect(
    config: &ProviderConfig,
    limiter: &ProviderRateLimiter,
) -> Result<Box<dyn HelpdeskClient>> {
    let transport = ReqwestTransport::with_timeout(DEFAULT_TIMEOUT)?;
    connect_with_transport(config, limiter, Arc::new(transport))
}

/// Build a client for the configured provider on top of an explicit transport.
pub fn connect_with_transport(
    config: &ProviderConfig,
    limiter: &ProviderRateLimiter,
    transport: Arc<dyn HttpTransport>,
) -> Result<Box<dyn HelpdeskClient>> {
    match &config.credentials {
        ProviderCredentials::Zendesk {
            subdomain,
            email,
            api_token,
            locale,
            permission_group_id,
        } => {
            let mut client = ZendeskClient::new_with_transport(
                subdomain,
                email,
                api_token,
                limiter.clone(),
                transport,
            )?;
            if let Some(locale) = locale {
                client = client.with_locale(locale);
            }
            if let Some(group) = permission_group_id {
                client = client.with_permission_group_id(*group);
            }
            Ok(Box::new(client))
        }
        ProviderCredentials::Freshdesk { domain, api_key } => Ok(Box::new(
            FreshdeskClient::new_with_transport(domain, api_key, limiter.clone(), transport)?,
        )),
    }
}

/// Reject empty credential fields. Credentials are never defaulted.
pub(crate) fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ProviderError::config(format!("{} must not be empty", field)));
    }
    Ok(())
}
