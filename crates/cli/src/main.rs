//! Ada's Kitchen CLI - Session migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Create the storefront sessions table
//! ak-cli migrate storefront
//!
//! # Create the admin sessions table
//! ak-cli migrate admin
//!
//! # Create both
//! ak-cli migrate all
//!
//! # Seed a starter catalog into the document store (idempotent)
//! ak-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Create the `tower-sessions` tables
//! - `seed` - Seed categories and menu items into the document store

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::migrate::MigrateTarget;

#[derive(Parser)]
#[command(name = "ak-cli")]
#[command(author, version, about = "Ada's Kitchen CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the session-storage tables
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Seed a starter catalog into the document store
    Seed,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ak_cli=info,adas_kitchen_backend=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate { target } => commands::migrate::run(target).await,
        Commands::Seed => commands::seed::run().await,
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
