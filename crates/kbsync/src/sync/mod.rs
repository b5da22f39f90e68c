//! Article synchronization between the local knowledge base and helpdesk platforms.
//!
//! # Module Structure
//!
//! - [`types`] - Requests and the [`SyncResult`] summary
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`hash`] - Content hashing for change detection
//! - [`category_mapper`] - Remote container → local category resolution
//! - [`job`] - Sync job bookkeeping
//! - [`engine`] - Import and export orchestration
//!
//! # Example
//!
//! ```ignore
//! use kbsync::sync::{ExportRequest, export_articles};
//!
//! let request = ExportRequest::from_config(kb_id, job.id, &provider_config);
//! let result = export_articles(&store, client.as_ref(), &request, Some(&progress)).await?;
//! println!("{} created, {} updated, {} skipped", result.created, result.updated, result.skipped);
//! ```

pub mod category_mapper;
pub mod engine;
mod errors;
pub mod hash;
pub mod job;
mod progress;
mod types;

pub use category_mapper::{CategoryMapper, CategoryResolution, export_target};
pub use engine::{export_articles, import_articles};
pub use errors::SyncError;
pub use hash::content_hash;
pub use job::{ItemOutcome, JobTracker};
pub use progress::{ProgressCallback, SyncProgress, emit};
pub use types::{ExportRequest, ImportRequest, SyncResult};
