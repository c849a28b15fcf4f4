//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "stockpipe")]
#[command(author, version, about = "Incremental market data sync and feature engineering pipeline")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Bring stored bars up to date for the universe or given symbols
    Sync(SyncArgs),
    /// Clean stored bars and persist engineered features
    Clean(CleanArgs),
    /// Import news headlines from a CSV export
    News(NewsArgs),
    /// Build forward-return labels and report class balance
    Label(LabelArgs),
    /// Select an ARIMA order by stationarity test and AIC grid search
    Order(OrderArgs),
    /// Fit the chosen order and persist a price forecast
    Forecast(ForecastArgs),
    /// Run continuous sync batches on an interval
    Watch(WatchArgs),
    /// Show per-symbol data coverage
    Summary,
    /// Validate configuration
    ValidateConfig,
}

#[derive(clap::Args)]
pub struct SyncArgs {
    /// Symbols to sync (comma-separated); defaults to the configured universe
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Re-fetch even if the store is current
    #[arg(long)]
    pub force: bool,

    /// Read bars from a directory of CSV files instead of the HTTP feed
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub output: String,
}

#[derive(clap::Args)]
pub struct CleanArgs {
    /// Symbols to process (comma-separated); defaults to the configured universe
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Re-process even if clean data already exists
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct NewsArgs {
    /// CSV file of exported headlines
    #[arg(long)]
    pub file: PathBuf,

    /// Symbols to import (comma-separated); defaults to the configured universe
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,
}

#[derive(clap::Args)]
pub struct LabelArgs {
    /// Symbols to label (comma-separated); defaults to the configured universe
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Forward horizon in days (overrides configuration)
    #[arg(long)]
    pub horizon: Option<usize>,

    /// Positive-class threshold in percent (overrides configuration)
    #[arg(long)]
    pub threshold: Option<f64>,
}

#[derive(clap::Args)]
pub struct OrderArgs {
    /// Symbols to analyze (comma-separated); defaults to the configured universe
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,
}

#[derive(clap::Args)]
pub struct ForecastArgs {
    /// Symbols to forecast (comma-separated); defaults to the configured universe
    #[arg(short = 'S', long, value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Days to forecast (overrides configuration)
    #[arg(long)]
    pub days: Option<usize>,

    /// Grid-search the order instead of using the configured default
    #[arg(long)]
    pub auto_order: bool,
}

#[derive(clap::Args)]
pub struct WatchArgs {
    /// Hours between batches (overrides configuration)
    #[arg(long)]
    pub interval: Option<u64>,
}
