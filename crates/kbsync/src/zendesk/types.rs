//! Zendesk Help Center API data types.
//!
//! Only the fields kbsync needs are declared.
//!
//! API docs: https://developer.zendesk.com/api-reference/help_center/help-center-api/

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct ZendeskCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZendeskSection {
    pub id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ZendeskArticle {
    pub id: i64,
    #[serde(default)]
    pub section_id: Option<i64>,
    pub title: String,
    /// HTML body. Null for articles with an empty translation.
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    /// `false` means published.
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The locale-specific content of an article.
#[derive(Debug, Clone, Deserialize)]
pub struct ZendeskTranslation {
    /// Id of the article this translation belongs to.
    pub source_id: i64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ZendeskUser {
    /// Null for the anonymous user returned when credentials are not accepted.
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// ─── Envelopes ───────────────────────────────────────────────────────────────

/// A page of a cursor-paginated list; `next_page` is an absolute URL.
pub(crate) trait Page {
    type Item;
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesPage {
    pub categories: Vec<ZendeskCategory>,
    #[serde(default)]
    pub next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SectionsPage {
    pub sections: Vec<ZendeskSection>,
    #[serde(default)]
    pub next_page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArticlesPage {
    pub articles: Vec<ZendeskArticle>,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl Page for CategoriesPage {
    type Item = ZendeskCategory;
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
        (self.categories, self.next_page)
    }
}

impl Page for SectionsPage {
    type Item = ZendeskSection;
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
        (self.sections, self.next_page)
    }
}

impl Page for ArticlesPage {
    type Item = ZendeskArticle;
    fn into_parts(self) -> (Vec<Self::Item>, Option<String>) {
        (self.articles, self.next_page)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArticleEnvelope {
    pub article: ZendeskArticle,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TranslationEnvelope {
    pub translation: ZendeskTranslation,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: ZendeskUser,
}

// ─── Request bodies ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(crate) struct NewArticleBody<'a> {
    pub article: NewArticle<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewArticle<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub locale: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission_group_id: Option<i64>,
    /// Null makes the article visible to everyone.
    pub user_segment_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranslationBody<'a> {
    pub translation: TranslationUpdate<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranslationUpdate<'a> {
    pub title: &'a str,
    pub body: &'a str,
}
