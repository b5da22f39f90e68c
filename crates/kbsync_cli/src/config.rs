//! Configuration file support for kbsync.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Secret environment variables (`KBSYNC_ZENDESK_API_TOKEN`, `KBSYNC_FRESHDESK_API_KEY`)
//! 3. Environment variables (prefixed with `KBSYNC_`, e.g., `KBSYNC_DATABASE_URL`)
//! 4. Config file (~/.config/kbsync/config.toml or ./kbsync.toml)
//! 5. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "sqlite://~/.local/state/kbsync/kbsync.db"  # optional, this is the default
//!
//! [rate_limits]
//! zendesk_rpm = 700
//! freshdesk_rpm = 100
//!
//! [zendesk]
//! subdomain = "acme"
//! email = "agent@acme.com"
//! api_token = "..."  # or use KBSYNC_ZENDESK_API_TOKEN env var
//! default_section_id = "360001234567"
//!
//! [[zendesk.category_mappings]]
//! local_category_id = "7f0c1a9e-7b1e-4a52-9a3e-0d6b2d1f4c11"
//! external_section_id = "360009876543"
//!
//! [freshdesk]
//! domain = "acme.freshdesk.com"
//! api_key = "..."  # or use KBSYNC_FRESHDESK_API_KEY env var
//! default_folder_id = "5000123456"
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use kbsync::provider::{CategoryMapping, RateLimitSettings};
use kbsync::{ProviderConfig, ProviderCredentials, ProviderKind};
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    /// Requests per minute per provider.
    pub rate_limits: RateLimitSettings,
    pub zendesk: ZendeskConfig,
    pub freshdesk: FreshdeskConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Supports sqlite:// and postgres:// schemes.
    /// Defaults to `sqlite://~/.local/state/kbsync/kbsync.db` if not specified.
    pub url: Option<String>,
}

/// Zendesk Guide account.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ZendeskConfig {
    /// `acme` for `https://acme.zendesk.com`.
    pub subdomain: Option<String>,
    pub email: Option<String>,
    /// Can also be set via KBSYNC_ZENDESK_API_TOKEN environment variable.
    pub api_token: Option<String>,
    pub locale: Option<String>,
    pub permission_group_id: Option<i64>,
    /// Section receiving exported articles whose category has no mapping.
    pub default_section_id: Option<String>,
    pub category_mappings: Vec<CategoryMapping>,
}

/// Freshdesk Solutions account.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FreshdeskConfig {
    /// `acme`, `acme.freshdesk.com` or a full URL.
    pub domain: Option<String>,
    /// Can also be set via KBSYNC_FRESHDESK_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Folder receiving exported articles whose category has no mapping.
    pub default_folder_id: Option<String>,
    pub category_mappings: Vec<CategoryMapping>,
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/kbsync/config.toml)
    /// 3. Local config file (./kbsync.toml)
    /// 4. Environment variables with KBSYNC_ prefix
    /// 5. Secret environment variables whose names contain the separator
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from("kbsync.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./kbsync.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., KBSYNC_DATABASE_URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix("KBSYNC")
                .separator("_")
                .try_parsing(true),
        );

        let mut config = match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        };

        config.apply_secret_overrides(|key| std::env::var(key).ok());
        config
    }

    /// `KBSYNC_ZENDESK_API_TOKEN` would split into `zendesk.api.token` with the
    /// `_` separator, so secrets are read by exact name.
    fn apply_secret_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("KBSYNC_ZENDESK_API_TOKEN").filter(|t| !t.is_empty()) {
            self.zendesk.api_token = Some(token);
        }
        if let Some(key) = lookup("KBSYNC_FRESHDESK_API_KEY").filter(|k| !k.is_empty()) {
            self.freshdesk.api_key = Some(key);
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The `mode=rwc` parameter creates the SQLite file if it doesn't exist.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join("kbsync.db");
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// Build the library-facing connection config for one provider.
    ///
    /// # Errors
    /// Names the first missing setting.
    pub fn provider_config(&self, provider: ProviderKind) -> Result<ProviderConfig, String> {
        let (credentials, mappings, default_section) = match provider {
            ProviderKind::Zendesk => {
                let zendesk = &self.zendesk;
                let credentials = ProviderCredentials::Zendesk {
                    subdomain: required(&zendesk.subdomain, "zendesk.subdomain")?,
                    email: required(&zendesk.email, "zendesk.email")?,
                    api_token: required(&zendesk.api_token, "zendesk.api_token")?,
                    locale: zendesk.locale.clone(),
                    permission_group_id: zendesk.permission_group_id,
                };
                (
                    credentials,
                    &zendesk.category_mappings,
                    &zendesk.default_section_id,
                )
            }
            ProviderKind::Freshdesk => {
                let freshdesk = &self.freshdesk;
                let credentials = ProviderCredentials::Freshdesk {
                    domain: required(&freshdesk.domain, "freshdesk.domain")?,
                    api_key: required(&freshdesk.api_key, "freshdesk.api_key")?,
                };
                (
                    credentials,
                    &freshdesk.category_mappings,
                    &freshdesk.default_folder_id,
                )
            }
        };

        Ok(ProviderConfig {
            credentials,
            category_mappings: mappings.clone(),
            default_section_id: default_section.clone(),
        })
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "kbsync").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/kbsync` or `~/.local/state/kbsync`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "kbsync").map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}

fn required(value: &Option<String>, key: &str) -> Result<String, String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(format!(
            "Missing configuration value '{}'. Set it in kbsync.toml or the environment.",
            key
        )),
    }
}
