//! Provider enum for type-safe helpdesk platform handling.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Supported external helpdesk platforms.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Zendesk Guide: categories → sections → articles.
    #[sea_orm(string_value = "zendesk")]
    Zendesk,
    /// Freshdesk Solutions: categories → folders → articles.
    #[sea_orm(string_value = "freshdesk")]
    Freshdesk,
}

impl ProviderKind {
    /// Name used as the rate limiter key and in log output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Zendesk => "zendesk",
            ProviderKind::Freshdesk => "freshdesk",
        }
    }

    /// What the provider calls the grouping unit that directly holds articles.
    #[must_use]
    pub fn container_noun(self) -> &'static str {
        match self {
            ProviderKind::Zendesk => "section",
            ProviderKind::Freshdesk => "folder",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zendesk" => Ok(ProviderKind::Zendesk),
            "freshdesk" => Ok(ProviderKind::Freshdesk),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ProviderKind::Zendesk.to_string(), "zendesk");
        assert_eq!(ProviderKind::Freshdesk.to_string(), "freshdesk");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "Zendesk".parse::<ProviderKind>().unwrap(),
            ProviderKind::Zendesk
        );
        assert_eq!(
            "freshdesk".parse::<ProviderKind>().unwrap(),
            ProviderKind::Freshdesk
        );
        assert!("intercom".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_container_noun() {
        assert_eq!(ProviderKind::Zendesk.container_noun(), "section");
        assert_eq!(ProviderKind::Freshdesk.container_noun(), "folder");
    }
}
