//! Foodgram CLI - Database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! foodgram-cli migrate
//!
//! # Load the ingredient catalog
//! foodgram-cli seed ingredients data/ingredients.json
//!
//! # Load recipe tags
//! foodgram-cli seed tags data/tags.yaml
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed ingredients` - Insert ingredients from a JSON or YAML list
//! - `seed tags` - Insert tags from a JSON or YAML list

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "foodgram-cli")]
#[command(author, version, about = "Foodgram CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load reference data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert ingredients, skipping ones that already exist
    Ingredients {
        /// JSON or YAML file with `name` and `measurement_unit` entries
        file: PathBuf,
    },
    /// Insert tags, skipping ones that already exist
    Tags {
        /// JSON or YAML file with `name`, `color` and `slug` entries
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
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
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Ingredients { file } => commands::seed::ingredients(&file).await?,
            SeedTarget::Tags { file } => commands::seed::tags(&file).await?,
        },
    }
    Ok(())
}
