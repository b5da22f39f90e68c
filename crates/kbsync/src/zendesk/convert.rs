//! Conversion from Zendesk payloads to provider-agnostic types.

use super::types::{ZendeskArticle, ZendeskCategory, ZendeskSection, ZendeskTranslation};
use crate::provider::{RemoteArticle, RemoteCategory, RemoteSection};

pub fn to_remote_category(category: ZendeskCategory) -> RemoteCategory {
    RemoteCategory {
        id: category.id.to_string(),
        name: category.name,
        description: category.description.filter(|d| !d.is_empty()),
        position: category.position,
    }
}

pub fn to_remote_section(section: ZendeskSection) -> RemoteSection {
    RemoteSection {
        id: section.id.to_string(),
        category_id: section.category_id.map(|id| id.to_string()),
        name: section.name,
        description: section.description.filter(|d| !d.is_empty()),
    }
}

pub fn to_remote_article(article: ZendeskArticle) -> RemoteArticle {
    RemoteArticle {
        id: article.id.to_string(),
        section_id: article.section_id.map(|id| id.to_string()),
        title: article.title,
        body: article.body.unwrap_or_default(),
        html_url: article.html_url,
        is_published: !article.draft,
        updated_at: article.updated_at,
    }
}

/// A translation carries the article id but not its section.
pub fn translation_to_remote_article(translation: ZendeskTranslation) -> RemoteArticle {
    RemoteArticle {
        id: translation.source_id.to_string(),
        section_id: None,
        title: translation.title,
        body: translation.body.unwrap_or_default(),
        html_url: translation.html_url,
        is_published: !translation.draft,
        updated_at: translation.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_flag_maps_to_published() {
        let article: ZendeskArticle = serde_json::from_value(serde_json::json!({
            "id": 360001,
            "section_id": 42,
            "title": "Refunds",
            "body": "<p>refund policy</p>",
            "draft": true,
            "updated_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        let remote = to_remote_article(article);
        assert_eq!(remote.id, "360001");
        assert_eq!(remote.section_id.as_deref(), Some("42"));
        assert!(!remote.is_published);
        assert!(remote.updated_at.is_some());
    }

    #[test]
    fn null_body_becomes_empty() {
        let article: ZendeskArticle = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "Empty",
            "body": null
        }))
        .unwrap();
        let remote = to_remote_article(article);
        assert_eq!(remote.body, "");
        assert!(remote.is_published);
    }

    #[test]
    fn empty_description_is_dropped() {
        let section: ZendeskSection = serde_json::from_value(serde_json::json!({
            "id": 42,
            "category_id": 7,
            "name": "Billing",
            "description": ""
        }))
        .unwrap();
        let remote = to_remote_section(section);
        assert_eq!(remote.description, None);
        assert_eq!(remote.category_id.as_deref(), Some("7"));
    }
}
