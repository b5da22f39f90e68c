//! Article entity - a local knowledge base article.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub knowledge_base_id: Uuid,
    /// `None` means uncategorized. Cleared when the category is deleted.
    pub category_id: Option<Uuid>,
    pub title: String,
    /// Article body as HTML.
    #[sea_orm(column_type = "Text")]
    pub content: String,
    /// Whether the article is visible to readers (and therefore exportable).
    #[sea_orm(default_value = false)]
    pub is_public: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::external_article_mapping::Entity")]
    ExternalArticleMapping,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::external_article_mapping::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExternalArticleMapping.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
