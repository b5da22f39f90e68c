//! Direction of a sync job.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which way a sync job moves articles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum SyncDirection {
    /// Remote help center → local knowledge base.
    #[sea_orm(string_value = "import")]
    Import,
    /// Local knowledge base → remote help center.
    #[sea_orm(string_value = "export")]
    Export,
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncDirection::Import => write!(f, "import"),
            SyncDirection::Export => write!(f, "export"),
        }
    }
}
