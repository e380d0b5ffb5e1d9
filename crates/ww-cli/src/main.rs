use anyhow::{Context, Result};
use clap::Parser;
use ww_cli::commands::{events, watch};
use ww_cli::logging::{self, RotatingFile};
use ww_cli::{Cli, Commands, Config};
use ww_store::EventLog;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_from(cli.config.as_deref(), &cli.overrides())
        .context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => {
            let log_file = RotatingFile::open(&config.log_file, config.log_max_bytes)
                .with_context(|| {
                    format!("failed to open log file {}", config.log_file.display())
                })?;
            logging::init(cli.verbose, Some(log_file));
            tracing::debug!(?config, "loaded configuration");
            watch::run(&config).await?;
        }
        Commands::Events { after } => {
            logging::init(cli.verbose, None);
            events::run(&EventLog::new(&config.datafile), after)?;
        }
    }

    Ok(())
}
