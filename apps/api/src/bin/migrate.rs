//! Schema migration tool. Applies or reverts the reversible migrations under
//! `migrations/` and reports what the `_sqlx_migrations` ledger has recorded.

use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use listings_admin::config::require_env;
use listings_admin::db::create_pool;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Parser)]
#[command(name = "listings-migrate")]
#[command(about = "Apply, revert and inspect database schema migrations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply all pending migrations.
    Up,
    /// Revert applied migrations newer than `--target` (default: only the latest).
    Down {
        #[arg(long)]
        target: Option<i64>,
    },
    /// List every known migration and whether it is applied.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let pool = create_pool(&require_env("DATABASE_URL")?, 1).await?;

    match cli.command {
        Commands::Up => {
            MIGRATOR
                .run(&pool)
                .await
                .context("Failed to apply migrations")?;
            info!("Migrations applied");
        }
        Commands::Down { target } => {
            let applied = applied_versions(&pool).await?;
            let target = match target {
                Some(version) => version,
                None => match revert_target(&applied) {
                    Some(version) => version,
                    None => bail!("no applied migrations to revert"),
                },
            };
            MIGRATOR
                .undo(&pool, target)
                .await
                .with_context(|| format!("Failed to revert migrations down to {target}"))?;
            info!("Reverted migrations newer than version {target}");
        }
        Commands::Status => {
            let applied = applied_versions(&pool).await?;
            for migration in MIGRATOR.iter().filter(|m| m.migration_type.is_up_migration()) {
                let state = migration_state(&applied, migration.version);
                println!("{:>16}  {:<8} {}", migration.version, state, migration.description);
            }
        }
    }

    Ok(())
}

/// Versions recorded in the ledger, keyed to whether they completed successfully.
async fn applied_versions(pool: &PgPool) -> Result<HashMap<i64, bool>> {
    let exists: bool = sqlx::query_scalar("SELECT to_regclass('_sqlx_migrations') IS NOT NULL")
        .fetch_one(pool)
        .await?;
    if !exists {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, bool)> =
        sqlx::query_as("SELECT version, success FROM _sqlx_migrations ORDER BY version")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().collect())
}

/// A ledger row with `success = false` is a migration that started and did not finish.
fn migration_state(applied: &HashMap<i64, bool>, version: i64) -> &'static str {
    match applied.get(&version) {
        Some(true) => "applied",
        Some(false) => "failed",
        None => "pending",
    }
}

/// `undo` reverts everything newer than its target, so undoing only the latest
/// migration means targeting the one before it (0 when it is the only one).
fn revert_target(applied: &HashMap<i64, bool>) -> Option<i64> {
    let mut versions: Vec<i64> = applied.keys().copied().collect();
    versions.sort_unstable();
    versions.pop()?;
    Some(versions.last().copied().unwrap_or(0))
}
