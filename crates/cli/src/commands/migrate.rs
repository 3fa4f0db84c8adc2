//! Session-table migration command.
//!
//! Both binaries keep their only local state (sessions, which for the
//! storefront include the durable cart slots) in `PostgreSQL` via
//! `tower-sessions-sqlx-store`; this command creates the store's tables.

use clap::Subcommand;
use sqlx::postgres::PgPoolOptions;
use tower_sessions_sqlx_store::PostgresStore;

use super::{CliError, required_env};

/// Which database to migrate.
#[derive(Subcommand)]
pub enum MigrateTarget {
    /// Create the storefront sessions table (`STOREFRONT_DATABASE_URL`)
    Storefront,
    /// Create the admin sessions table (`ADMIN_DATABASE_URL`)
    Admin,
    /// Create both
    All,
}

/// Run the migration for the chosen target(s).
///
/// # Errors
///
/// Returns `CliError` if an environment variable is missing or the
/// database is unreachable.
pub async fn run(target: MigrateTarget) -> Result<(), CliError> {
    match target {
        MigrateTarget::Storefront => migrate_one("STOREFRONT_DATABASE_URL").await,
        MigrateTarget::Admin => migrate_one("ADMIN_DATABASE_URL").await,
        MigrateTarget::All => {
            migrate_one("STOREFRONT_DATABASE_URL").await?;
            migrate_one("ADMIN_DATABASE_URL").await
        }
    }
}

async fn migrate_one(env_key: &str) -> Result<(), CliError> {
    let database_url = required_env(env_key)?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&database_url)
        .await?;

    PostgresStore::new(pool).migrate().await?;
    tracing::info!(database = env_key, "sessions table ready");

    Ok(())
}
