//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, ArimaSettings, LoggingConfig, StoreSettings, SyncSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from a TOML file and `STOCKPIPE__`-prefixed
/// environment variables. A missing file falls back to defaults so the
/// binary runs without any setup.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("STOCKPIPE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}
