//! HealthChat - health advice chat in the terminal
//!
#![doc = "HealthChat - health advice chat in the terminal"]
#![doc = "Main entry point for the HealthChat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use healthchat::cli::{Cli, Commands};
use healthchat::commands;
use healthchat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    // Load configuration
    let config_path = Config::resolve_path(cli.config.as_deref());
    tracing::debug!("Using config file {}", config_path.display());
    let config = Config::load(&config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { profile, .. } => {
            if let Some(path) = &profile {
                tracing::debug!("Pre-filling profile from {}", path.display());
            }
            commands::chat::run_chat(config, profile).await?;
            Ok(())
        }
        Commands::Categories => {
            commands::categories::handle_categories();
            Ok(())
        }
    }
}

/// Initialize tracing; `RUST_LOG` wins over the verbosity flag
fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "healthchat=debug"
    } else {
        "healthchat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
