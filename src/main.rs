//! groundwork - Azure Provisioning Tool
//!
//! A command-line tool for provisioning Azure resource groups and storage
//! accounts, written in Rust for performance, safety, and reliability.

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use groundwork::cli::{Cli, Commands};
use groundwork::config;
use groundwork::error::{GroundworkError, Result};

#[tokio::main]
async fn main() {
    // Initialize logging
    init_logging();

    // Parse command-line arguments
    let cli = Cli::parse();

    // A shutdown signal abandons any in-flight polling; the remote creation,
    // once started, is not guaranteed cancelable and is left to finish.
    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => Err(GroundworkError::Cancelled),
    };

    if let Err(e) = result {
        error!("Error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting groundwork");

    // Load configuration differently based on command
    let config = match &cli.command {
        Commands::Config { .. } | Commands::Completions { .. } => {
            // For inspection commands, load without validation
            config::load_config_unvalidated().await?
        }
        _ => {
            // For provisioning, load with validation
            config::load_config().await?
        }
    };

    // Execute the command
    cli.execute(config).await?;

    Ok(())
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groundwork=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
