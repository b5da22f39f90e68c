//! Import, export and connection test commands.
//!
//! The CLI plays the caller role for the library: it creates the pending sync
//! job, runs the engine with a progress reporter, and prints the summary.

use std::sync::Arc;

use console::style;
use kbsync::provider::{HelpdeskClient, ProviderRateLimiter};
use kbsync::store::{DatabaseStore, NewSyncJob, SyncStore};
use kbsync::sync::{ExportRequest, ImportRequest, SyncResult, export_articles, import_articles};
use kbsync::{ProviderConfig, ProviderKind};
use uuid::Uuid;

use crate::commands::job::print_job;
use crate::config::Config;
use crate::progress::ProgressReporter;

/// Options for an export run.
#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ExportOptions {
    /// Export only these local article ids (default: every public article)
    #[arg(short, long = "article", value_name = "ID")]
    pub articles: Vec<Uuid>,

    /// Remote section/folder for articles without a category mapping
    /// (overrides config)
    #[arg(short = 'd', long)]
    pub default_section: Option<String>,
}

fn client_for(
    config: &Config,
    provider: ProviderKind,
) -> Result<(ProviderConfig, Box<dyn HelpdeskClient>), Box<dyn std::error::Error>> {
    let provider_config = config.provider_config(provider)?;
    if !ProviderRateLimiter::init_shared(config.rate_limits) {
        tracing::debug!("Shared rate limiter already initialized");
    }
    let client = kbsync::provider::connect(&provider_config, ProviderRateLimiter::shared())?;
    Ok((provider_config, client))
}

async fn open_store(database_url: &str) -> Result<DatabaseStore, Box<dyn std::error::Error>> {
    let db = kbsync::connect_and_migrate(database_url).await?;
    Ok(DatabaseStore::new(db))
}

/// Import remote articles into a knowledge base.
pub(crate) async fn handle_import(
    provider: ProviderKind,
    knowledge_base_id: Uuid,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (provider_config, client) = client_for(config, provider)?;
    let store = open_store(database_url).await?;

    let job = store
        .create_sync_job(NewSyncJob::import(knowledge_base_id, provider))
        .await?;
    let request = ImportRequest::from_config(knowledge_base_id, job.id, &provider_config);

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();
    let outcome = import_articles(&store, client.as_ref(), &request, Some(&callback)).await;
    reporter.finish();

    report(&store, job.id, outcome).await
}

/// Export local articles to the remote help center.
pub(crate) async fn handle_export(
    provider: ProviderKind,
    knowledge_base_id: Uuid,
    options: ExportOptions,
    config: &Config,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (provider_config, client) = client_for(config, provider)?;
    let store = open_store(database_url).await?;

    let job = store
        .create_sync_job(NewSyncJob::export(knowledge_base_id, provider))
        .await?;
    let mut request = ExportRequest::from_config(knowledge_base_id, job.id, &provider_config);
    if let Some(section) = options.default_section {
        request = request.with_default_section(section);
    }
    if !options.articles.is_empty() {
        request = request.with_article_ids(options.articles);
    }

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.as_callback();
    let outcome = export_articles(&store, client.as_ref(), &request, Some(&callback)).await;
    reporter.finish();

    report(&store, job.id, outcome).await
}

/// Verify credentials for one provider.
pub(crate) async fn handle_test(
    provider: ProviderKind,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, client) = client_for(config, provider)?;
    let info = client.test_connection().await?;
    println!(
        "{} Connected to {} as {}",
        style("✓").green(),
        provider,
        style(&info.account).bold()
    );
    Ok(())
}

async fn report(
    store: &DatabaseStore,
    job_id: Uuid,
    outcome: Result<SyncResult, kbsync::SyncError>,
) -> Result<(), Box<dyn std::error::Error>> {
    match outcome {
        Ok(result) => {
            println!();
            if let Some(job) = store.get_sync_job(job_id).await? {
                print_job(&job);
            }
            if result.failed > 0 {
                eprintln!(
                    "{} {} item(s) failed; re-run to retry them",
                    style("!").yellow(),
                    result.failed
                );
            }
            Ok(())
        }
        Err(err) => {
            tracing::error!(%job_id, error = %err, "Sync failed");
            if let Some(job) = store.get_sync_job(job_id).await? {
                print_job(&job);
            }
            Err(err.into())
        }
    }
}
