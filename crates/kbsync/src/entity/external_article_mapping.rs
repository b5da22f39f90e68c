//! ExternalArticleMapping entity - correspondence between a local article and
//! its counterpart on a helpdesk platform.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::entity::mapping_direction::MappingDirection;
use crate::entity::provider_kind::ProviderKind;

/// One mapping row per (knowledge base, provider, remote article).
///
/// Rows are never deleted by sync. When the local article is removed the
/// `local_article_id` column is cleared and the row is left dangling.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "external_article_mappings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    // ─── Identity ──────────────────────────────────────────────────────────────
    pub knowledge_base_id: Uuid,
    /// Local article, or `None` once the local side has been deleted.
    pub local_article_id: Option<Uuid>,
    pub provider: ProviderKind,
    /// Provider-assigned article id, kept as a string for both platforms.
    pub external_id: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub external_url: Option<String>,

    // ─── Reconciliation ──────────────────────────────────────────────────────
    /// Which side the pair was first reconciled from.
    pub sync_direction: MappingDirection,
    /// SHA-256 hex digest of the content last written by sync.
    pub content_hash: String,
    pub local_updated_at: Option<DateTimeWithTimeZone>,
    pub external_updated_at: Option<DateTimeWithTimeZone>,
    /// Reserved. Conflicts are resolved last-write-wins and never flagged today.
    #[sea_orm(default_value = false)]
    pub has_conflict: bool,

    // ─── Timestamps ──────────────────────────────────────────────────────────
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::article::Entity",
        from = "Column::LocalArticleId",
        to = "super::article::Column::Id",
        on_delete = "SetNull"
    )]
    Article,
}

impl Related<super::article::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Article.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the local article this mapping pointed at has been deleted.
    pub fn is_dangling(&self) -> bool {
        self.local_article_id.is_none()
    }
}
