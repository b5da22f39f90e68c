//! Freshdesk Solutions API data types.
//!
//! API docs: https://developers.freshdesk.com/api/#solutions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article status codes.
pub mod article_status {
    pub const DRAFT: u8 = 1;
    pub const PUBLISHED: u8 = 2;
}

#[derive(Debug, Clone, Deserialize)]
pub struct FreshdeskCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FreshdeskFolder {
    pub id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FreshdeskArticle {
    pub id: i64,
    #[serde(default)]
    pub folder_id: Option<i64>,
    pub title: String,
    /// HTML body. Freshdesk calls it `description`.
    #[serde(default)]
    pub description: Option<String>,
    pub status: u8,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FreshdeskAgent {
    pub contact: FreshdeskContact,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FreshdeskContact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewArticleBody<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub status: u8,
}

#[derive(Debug, Serialize)]
pub(crate) struct ArticleUpdateBody<'a> {
    pub title: &'a str,
    pub description: &'a str,
}
