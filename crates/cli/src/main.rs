//! TestHive CLI - catalog inspection and scripted session replay.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog, optionally filtered
//! th-cli catalog --query javascript
//! th-cli catalog --category "Web Testing"
//!
//! # List category options
//! th-cli categories
//!
//! # Replay a script of intents against a fresh session
//! th-cli replay crates/cli/demos/checkout.yaml
//! th-cli replay --immediate crates/cli/demos/checkout.yaml
//! ```
//!
//! # Commands
//!
//! - `catalog` - List products matching a query and category
//! - `categories` - List category options in display order
//! - `replay` - Run a YAML script of intents and pauses

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "th-cli")]
#[command(author, version, about = "TestHive CLI tools")]
struct Cli {
    /// Catalog JSON to use instead of the bundled one
    #[arg(long, global = true, env = "STOREFRONT_CATALOG_PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Catalog {
        /// Case-insensitive text matched against name and description
        #[arg(short, long, default_value = "")]
        query: String,

        /// Category name ("All" for every category)
        #[arg(short, long, default_value = "All")]
        category: String,
    },
    /// List category options
    Categories,
    /// Replay a script of intents against a fresh session
    Replay {
        /// YAML file with a list of steps
        script: PathBuf,

        /// Credential list JSON to use instead of the bundled one
        #[arg(long, env = "STOREFRONT_USERS_PATH")]
        users: Option<PathBuf>,

        /// Apply splash, login, and debounce delays instantly
        #[arg(long)]
        immediate: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = commands::load_catalog(cli.catalog.as_deref())?;
    match cli.command {
        Commands::Catalog { query, category } => {
            commands::catalog::list(&catalog, &query, &category)?;
        }
        Commands::Categories => commands::catalog::categories(&catalog),
        Commands::Replay {
            script,
            users,
            immediate,
        } => {
            commands::replay::run(catalog, users.as_deref(), &script, immediate).await?;
        }
    }
    Ok(())
}
