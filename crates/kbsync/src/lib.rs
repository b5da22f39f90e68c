//! kbsync - synchronizes knowledge base articles with external helpdesk platforms.
//!
//! This library reconciles articles between a local knowledge base and third-party
//! help centers (Zendesk Guide and Freshdesk Solutions). A sync run is tracked by a
//! [`SyncJob`](entity::sync_job) record; each run lists the remote hierarchy, compares
//! content hashes against the persisted mapping table, and creates, updates or skips
//! articles so that repeated runs converge instead of duplicating.
//!
//! # Features
//!
//! - `sqlite` / `postgres` - Database backends for the bundled [`store::DatabaseStore`].
//! - `migrate` - Enables [`connect_and_migrate`] and the [`migration`] module.
//!
//! # Example
//!
//! ```ignore
//! use kbsync::provider::{ProviderRateLimiter, connect};
//! use kbsync::store::{DatabaseStore, NewSyncJob};
//! use kbsync::sync::{ImportRequest, import_articles};
//!
//! let db = kbsync::connect_and_migrate("sqlite://kbsync.db?mode=rwc").await?;
//! let store = DatabaseStore::new(db);
//! let client = connect(&provider_config, ProviderRateLimiter::shared())?;
//!
//! let job = store.create_sync_job(NewSyncJob::import(kb_id, client.provider())).await?;
//! let request = ImportRequest::new(kb_id, job.id, provider_config.category_mappings.clone());
//! let result = import_articles(&store, client.as_ref(), &request, None).await?;
//! println!("created {} articles", result.created);
//! ```

pub mod db;
pub mod entity;
pub mod freshdesk;
pub mod http;
pub mod provider;
pub mod store;
pub mod sync;
pub mod zendesk;

#[cfg(feature = "migrate")]
pub mod migration;

pub use db::connect;
#[cfg(feature = "migrate")]
pub use db::connect_and_migrate;
pub use entity::prelude::*;
pub use provider::{
    HelpdeskClient, ProviderConfig, ProviderCredentials, ProviderError, ProviderRateLimiter,
};
pub use store::{DatabaseStore, StoreError, SyncStore};
pub use sync::{SyncError, SyncResult};
