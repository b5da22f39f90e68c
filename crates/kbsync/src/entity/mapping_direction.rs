//! Origin of an external article mapping.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sync_direction::SyncDirection;

/// Records which side an article pair was first reconciled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum MappingDirection {
    #[sea_orm(string_value = "imported")]
    Imported,
    #[sea_orm(string_value = "exported")]
    Exported,
}

impl From<SyncDirection> for MappingDirection {
    fn from(direction: SyncDirection) -> Self {
        match direction {
            SyncDirection::Import => MappingDirection::Imported,
            SyncDirection::Export => MappingDirection::Exported,
        }
    }
}

impl std::fmt::Display for MappingDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingDirection::Imported => write!(f, "imported"),
            MappingDirection::Exported => write!(f, "exported"),
        }
    }
}
