//! stockpipe CLI application.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use stockpipe_monitor::setup_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level {
        cli::LogLevel::Trace => "trace",
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    };
    setup_logging(log_level, cli.json_logs);

    // Execute command
    match cli.command {
        Commands::Sync(args) => cli::commands::sync::run(args, &cli.config).await,
        Commands::Clean(args) => cli::commands::clean::run(args, &cli.config).await,
        Commands::News(args) => cli::commands::news::run(args, &cli.config).await,
        Commands::Label(args) => cli::commands::label::run(args, &cli.config).await,
        Commands::Order(args) => cli::commands::order::run(args, &cli.config).await,
        Commands::Forecast(args) => cli::commands::forecast::run(args, &cli.config).await,
        Commands::Watch(args) => cli::commands::watch::run(args, &cli.config).await,
        Commands::Summary => cli::commands::summary::run(&cli.config).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config).await,
    }
}
