use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::provider_kind::ProviderKind;

/// Credentials for one helpdesk account, tagged by provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderCredentials {
    Zendesk {
        /// `acme` for `https://acme.zendesk.com`.
        subdomain: String,
        email: String,
        api_token: String,
        /// Locale for created articles. Defaults to `en-us`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        locale: Option<String>,
        /// Permission group attached to created articles.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        permission_group_id: Option<i64>,
    },
    Freshdesk {
        /// `acme.freshdesk.com` or a full `https://` URL.
        domain: String,
        api_key: String,
    },
}

impl ProviderCredentials {
    pub fn provider(&self) -> ProviderKind {
        match self {
            Self::Zendesk { .. } => ProviderKind::Zendesk,
            Self::Freshdesk { .. } => ProviderKind::Freshdesk,
        }
    }
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zendesk {
                subdomain,
                email,
                locale,
                permission_group_id,
                ..
            } => f
                .debug_struct("Zendesk")
                .field("subdomain", subdomain)
                .field("email", email)
                .field("api_token", &"<redacted>")
                .field("locale", locale)
                .field("permission_group_id", permission_group_id)
                .finish(),
            Self::Freshdesk { domain, .. } => f
                .debug_struct("Freshdesk")
                .field("domain", domain)
                .field("api_key", &"<redacted>")
                .finish(),
        }
    }
}

/// Operator-supplied link between a local category and a remote container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMapping {
    pub local_category_id: Uuid,
    pub external_section_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_section_name: Option<String>,
}

/// Everything the sync engine needs to know about one provider connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub credentials: ProviderCredentials,
    #[serde(default)]
    pub category_mappings: Vec<CategoryMapping>,
    /// Container that receives exported articles without an explicit mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_section_id: Option<String>,
}

impl ProviderConfig {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self {
            credentials,
            category_mappings: Vec::new(),
            default_section_id: None,
        }
    }

    pub fn provider(&self) -> ProviderKind {
        self.credentials.provider()
    }
}
