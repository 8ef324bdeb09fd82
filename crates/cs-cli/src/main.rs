use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cs_cli::commands::recent::RecentOptions;
use cs_cli::commands::{daily, members, recent, sessions, summary};
use cs_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match &cli.command {
        Some(Commands::Members { archive }) => {
            members::run(archive)?;
        }
        Some(Commands::Summary {
            source,
            gap_minutes,
            json,
        }) => {
            let gap = config.gap_threshold(*gap_minutes)?;
            summary::run(source, gap, *json)?;
        }
        Some(Commands::Daily { source, json }) => {
            daily::run(source, *json)?;
        }
        Some(Commands::Sessions {
            source,
            gap_minutes,
            limit,
            json,
        }) => {
            let gap = config.gap_threshold(*gap_minutes)?;
            sessions::run(source, gap, limit.unwrap_or(config.session_rows), *json)?;
        }
        Some(Commands::Recent {
            source,
            stream,
            limit,
            thumbnails,
            json,
        }) => {
            let options = RecentOptions {
                stream: *stream,
                limit: limit.unwrap_or(config.recent_limit),
                thumbnails: *thumbnails,
                json: *json,
            };
            recent::run(source, &config, options)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
