use kbsync::sync::SyncProgress;

/// Logging reporter using tracing for structured output.
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::JobStarted {
                job_id,
                provider,
                direction,
            } => {
                tracing::info!(%job_id, %provider, %direction, "Sync job started");
            }

            SyncProgress::ContainerListed {
                container_id,
                name,
                articles,
                total_so_far,
            } => {
                tracing::info!(
                    container = %name,
                    container_id = %container_id,
                    articles,
                    total_so_far,
                    "Listed container"
                );
            }

            SyncProgress::ExportPlanned { candidates } => {
                tracing::info!(candidates, "Export planned");
            }

            SyncProgress::CategoryCreated { category_id, name } => {
                tracing::info!(%category_id, category = %name, "Created category");
            }

            SyncProgress::ItemCreated { item_id, title } => {
                tracing::info!(item = %item_id, title = %title, "Created");
            }

            SyncProgress::ItemUpdated { item_id, title } => {
                tracing::info!(item = %item_id, title = %title, "Updated");
            }

            SyncProgress::ItemSkipped { item_id, title } => {
                tracing::debug!(item = %item_id, title = %title, "Unchanged");
            }

            SyncProgress::ItemFailed {
                item_id,
                title,
                error,
            } => {
                tracing::warn!(item = %item_id, title = %title, error = %error, "Failed");
            }

            SyncProgress::Warning { message } => {
                tracing::warn!(message = %message, "Warning");
            }

            SyncProgress::JobCompleted {
                total,
                created,
                updated,
                skipped,
                failed,
            } => {
                tracing::info!(total, created, updated, skipped, failed, "Sync job completed");
            }

            SyncProgress::JobFailed { error } => {
                tracing::error!(error = %error, "Sync job failed");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}
