//! Freshdesk Solutions client.
//!
//! Freshdesk organizes its knowledge base as categories → folders → articles.
//! Lists paginate with an RFC 8288 `Link` header and article status `2` means
//! published.

mod client;
mod convert;
mod types;

pub use client::{FreshdeskClient, freshdesk_base_url};
pub use types::{FreshdeskArticle, FreshdeskCategory, FreshdeskFolder, article_status};
