//! kbsync CLI - runs knowledge base sync jobs against helpdesk platforms.

mod commands;
mod config;
mod progress;

use clap::{Parser, Subcommand};
use console::Term;
use kbsync::ProviderKind;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::commands::sync::ExportOptions;

#[derive(Parser)]
#[command(name = "kbsync")]
#[command(version)]
#[command(about = "Synchronize knowledge base articles with helpdesk platforms")]
#[command(
    long_about = "kbsync imports help center articles from Zendesk Guide or Freshdesk \
Solutions into a local knowledge base and exports local articles back. Every run is \
recorded as a sync job; content hashes make repeated runs skip unchanged articles."
)]
#[command(after_long_help = r#"EXAMPLES
    Import every Zendesk article into a knowledge base:
        $ kbsync import zendesk --knowledge-base 3f6b...

    Export two articles to Freshdesk:
        $ kbsync export freshdesk -k 3f6b... --article 91c2... --article 0d44...

    Check credentials:
        $ kbsync test freshdesk

    Inspect a job:
        $ kbsync job 5a1e...

CONFIGURATION
    kbsync reads configuration from:
      1. ~/.config/kbsync/config.toml (or $XDG_CONFIG_HOME/kbsync/config.toml)
      2. ./kbsync.toml
      3. Environment variables (KBSYNC_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    KBSYNC_DATABASE_URL          Database connection string (default: ~/.local/state/kbsync/kbsync.db)
    KBSYNC_ZENDESK_API_TOKEN     Zendesk API token
    KBSYNC_FRESHDESK_API_KEY     Freshdesk API key
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Import remote articles into a knowledge base
    Import {
        /// Provider to import from (zendesk, freshdesk)
        provider: ProviderKind,

        /// Target knowledge base id
        #[arg(short, long)]
        knowledge_base: Uuid,
    },
    /// Export knowledge base articles to a provider
    Export {
        /// Provider to export to (zendesk, freshdesk)
        provider: ProviderKind,

        /// Source knowledge base id
        #[arg(short, long)]
        knowledge_base: Uuid,

        #[command(flatten)]
        options: ExportOptions,
    },
    /// Verify provider credentials
    Test {
        /// Provider to test (zendesk, freshdesk)
        provider: ProviderKind,
    },
    /// Show a sync job's status, counters and error log
    Job {
        /// Sync job id
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Rollback the last migration
    Down,
    /// Show migration status
    Status,
    /// Fresh install - drop all tables and reapply migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging only when progress bars are not drawn.
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("kbsync=info,kbsync_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }

    let config = config::Config::load();
    let cli = Cli::parse();

    if let Commands::Test { provider } = &cli.command {
        return commands::sync::handle_test(*provider, &config).await;
    }

    let database_url = config
        .database_url()
        .ok_or("Could not determine a database URL; set KBSYNC_DATABASE_URL")?;
    ensure_sqlite_dir(&database_url)?;

    match cli.command {
        Commands::Migrate { action } => {
            commands::migrate::handle_migrate(action, &database_url).await?;
        }
        Commands::Import {
            provider,
            knowledge_base,
        } => {
            commands::sync::handle_import(provider, knowledge_base, &config, &database_url).await?;
        }
        Commands::Export {
            provider,
            knowledge_base,
            options,
        } => {
            commands::sync::handle_export(
                provider,
                knowledge_base,
                options,
                &config,
                &database_url,
            )
            .await?;
        }
        Commands::Job { id } => {
            commands::job::handle_job(id, &database_url).await?;
        }
        Commands::Test { .. } => {}
    }

    Ok(())
}

/// Create the parent directory of a file-backed SQLite database.
fn ensure_sqlite_dir(database_url: &str) -> std::io::Result<()> {
    let Some(db_path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    // Strip query parameters (e.g., ?mode=rwc) before path operations
    let db_path = db_path.split('?').next().unwrap_or(db_path);
    let db_path = std::path::Path::new(db_path);

    if db_path.is_relative() && !db_path.as_os_str().is_empty() {
        tracing::warn!(
            "Database path '{}' is relative - behavior depends on current directory.",
            db_path.display()
        );
    }

    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
