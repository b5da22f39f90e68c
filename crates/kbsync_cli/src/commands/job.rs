//! Job inspection, the polling surface for sync runs.

use console::style;
use kbsync::store::{DatabaseStore, SyncStore};
use kbsync::{SyncJobModel, SyncJobStatus};
use uuid::Uuid;

/// Print one sync job's status, counters and error log.
pub(crate) async fn handle_job(
    id: Uuid,
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = kbsync::connect_and_migrate(database_url).await?;
    let store = DatabaseStore::new(db);

    let job = store
        .get_sync_job(id)
        .await?
        .ok_or_else(|| format!("Sync job {} not found", id))?;

    print_job(&job);
    Ok(())
}

pub(crate) fn print_job(job: &SyncJobModel) {
    let status = match job.status {
        SyncJobStatus::Completed => style(job.status.to_string()).green(),
        SyncJobStatus::Failed => style(job.status.to_string()).red(),
        SyncJobStatus::Running => style(job.status.to_string()).yellow(),
        SyncJobStatus::Pending => style(job.status.to_string()).dim(),
    };

    println!("{} {}", style("Job").bold(), job.id);
    println!("  {:<10} {} {}", "kind", job.provider, job.direction);
    println!("  {:<10} {}", "status", status);
    match job.progress_percent() {
        Some(pct) if !job.status.is_terminal() => println!(
            "  {:<10} {}/{} ({:.0}%, total may still grow)",
            "progress", job.processed_items, job.total_items, pct
        ),
        _ => println!(
            "  {:<10} {}/{}",
            "progress", job.processed_items, job.total_items
        ),
    }
    println!(
        "  {:<10} {} created, {} updated, {} unchanged, {} failed",
        "items", job.created_items, job.updated_items, job.skipped_items, job.failed_items
    );
    if let Some(started) = job.started_at {
        println!("  {:<10} {}", "started", started.to_rfc3339());
    }
    if let Some(completed) = job.completed_at {
        println!("  {:<10} {}", "finished", completed.to_rfc3339());
    }

    let entries = job.error_entries();
    if !entries.is_empty() {
        println!("  {}", style("errors").bold());
        for entry in entries {
            let item = entry.item_id.as_deref().unwrap_or("job");
            println!("    {} {}: {}", entry.timestamp.to_rfc3339(), item, entry.error);
        }
    }
}
