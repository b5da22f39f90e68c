//! Zendesk Guide (Help Center) client.
//!
//! Zendesk organizes its knowledge base as categories → sections → articles.
//! Article title and body live on per-locale translations, so updates go
//! through the translations endpoint for the configured locale.
//!
//! # Module Structure
//!
//! - [`types`] - Deserialization types for API payloads
//! - [`client`] - The [`ZendeskClient`] and its [`HelpdeskClient`](crate::provider::HelpdeskClient) impl
//! - [`convert`] - Conversion into the provider-agnostic shapes

mod client;
mod convert;
mod types;

pub use client::{DEFAULT_LOCALE, ZendeskClient};
pub use types::{ZendeskArticle, ZendeskCategory, ZendeskSection, ZendeskTranslation};
