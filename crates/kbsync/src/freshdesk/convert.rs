//! Conversion from Freshdesk payloads to provider-agnostic types.

use super::types::{FreshdeskArticle, FreshdeskCategory, FreshdeskFolder, article_status};
use crate::provider::{RemoteArticle, RemoteCategory, RemoteSection};

pub fn to_remote_category(category: FreshdeskCategory) -> RemoteCategory {
    RemoteCategory {
        id: category.id.to_string(),
        name: category.name,
        description: category.description.filter(|d| !d.is_empty()),
        position: None,
    }
}

/// Folders are the containers that hold articles. The parent category is taken
/// from the listing context when the payload omits it.
pub fn to_remote_section(folder: FreshdeskFolder, parent: Option<&str>) -> RemoteSection {
    RemoteSection {
        id: folder.id.to_string(),
        category_id: folder
            .category_id
            .map(|id| id.to_string())
            .or_else(|| parent.map(str::to_string)),
        name: folder.name,
        description: folder.description.filter(|d| !d.is_empty()),
    }
}

/// Freshdesk article payloads carry no URL; the portal URL is derived from the
/// account base URL.
pub fn to_remote_article(article: FreshdeskArticle, base_url: &str) -> RemoteArticle {
    RemoteArticle {
        html_url: Some(format!(
            "{}/support/solutions/articles/{}",
            base_url, article.id
        )),
        id: article.id.to_string(),
        section_id: article.folder_id.map(|id| id.to_string()),
        title: article.title,
        body: article.description.unwrap_or_default(),
        is_published: article.status == article_status::PUBLISHED,
        updated_at: article.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_two_is_published() {
        let article: FreshdeskArticle = serde_json::from_value(serde_json::json!({
            "id": 5001,
            "folder_id": 77,
            "title": "Taxes",
            "description": "<p>tax info</p>",
            "status": 2,
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        let remote = to_remote_article(article, "https://acme.freshdesk.com");
        assert!(remote.is_published);
        assert_eq!(remote.section_id.as_deref(), Some("77"));
        assert_eq!(
            remote.html_url.as_deref(),
            Some("https://acme.freshdesk.com/support/solutions/articles/5001")
        );
    }

    #[test]
    fn status_one_is_draft() {
        let article: FreshdeskArticle = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Draft",
            "status": 1
        }))
        .unwrap();
        let remote = to_remote_article(article, "https://acme.freshdesk.com");
        assert!(!remote.is_published);
        assert_eq!(remote.body, "");
    }

    #[test]
    fn folder_inherits_parent_category() {
        let folder: FreshdeskFolder = serde_json::from_value(serde_json::json!({
            "id": 77,
            "name": "Billing"
        }))
        .unwrap();
        let remote = to_remote_section(folder, Some("3"));
        assert_eq!(remote.category_id.as_deref(), Some("3"));
    }
}
