//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `ak_storefront`
//!
//! The document store is the source of truth for menus and orders; the only
//! local table is `tower_sessions`' session storage, which also holds each
//! visitor's durable cart slot.
//!
//! The sessions table is created via:
//! ```bash
//! cargo run -p adas-kitchen-cli -- migrate storefront
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
