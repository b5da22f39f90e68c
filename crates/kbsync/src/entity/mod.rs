//! SeaORM entity definitions for the kbsync database schema.

pub mod article;
pub mod category;
pub mod external_article_mapping;
pub mod mapping_direction;
pub mod prelude;
pub mod provider_kind;
pub mod sync_direction;
pub mod sync_job;
pub mod sync_job_status;
