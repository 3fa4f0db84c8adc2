//! CLI command implementations.

pub mod migrate;
pub mod seed;

use thiserror::Error;

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Document-store operation failed.
    #[error("Document store error: {0}")]
    Docstore(#[from] adas_kitchen_backend::DocstoreError),
}

/// Get a required environment variable.
pub(crate) fn required_env(key: &str) -> Result<String, CliError> {
    std::env::var(key).map_err(|_| CliError::MissingEnvVar(key.to_owned()))
}
