//! Configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use stockpipe_core::ArimaOrder;
use stockpipe_features::FeatureConfig;
use stockpipe_model::LabelConfig;
use stockpipe_sync::{SyncConfig, SyncWindowConfig};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub store: StoreSettings,
    /// Symbol universe for batch runs.
    #[serde(default = "default_universe")]
    pub universe: Vec<String>,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub features: FeatureConfig,
    #[serde(default)]
    pub labels: LabelConfig,
    #[serde(default)]
    pub arima: ArimaSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings::default(),
            logging: LoggingConfig::default(),
            store: StoreSettings::default(),
            universe: default_universe(),
            sync: SyncSettings::default(),
            features: FeatureConfig::default(),
            labels: LabelConfig::default(),
            arima: ArimaSettings::default(),
        }
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "stockpipe".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    pub url: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://data/stockpipe.db".to_string(),
        }
    }
}

/// Sync controller settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    pub max_lookback_days: i64,
    pub buffer_days: i64,
    pub update_interval_hours: u64,
    pub symbol_delay_ms: u64,
    pub max_retries: u32,
    pub news_limit: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_lookback_days: 365,
            buffer_days: 2,
            update_interval_hours: 6,
            symbol_delay_ms: 500,
            max_retries: 3,
            news_limit: 50,
        }
    }
}

impl SyncSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_hours * 3600)
    }

    pub fn to_sync_config(&self) -> SyncConfig {
        let mut config = SyncConfig {
            window: SyncWindowConfig {
                max_lookback_days: self.max_lookback_days,
                buffer_days: self.buffer_days,
            },
            symbol_delay: Duration::from_millis(self.symbol_delay_ms),
            news_limit: self.news_limit,
            ..SyncConfig::default()
        };
        config.retry.max_retries = self.max_retries;
        config
    }
}

/// Order selection and forecasting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArimaSettings {
    pub default_order: ArimaOrder,
    pub max_p: usize,
    pub max_d: usize,
    pub max_q: usize,
    pub forecast_days: usize,
}

impl Default for ArimaSettings {
    fn default() -> Self {
        Self {
            default_order: ArimaOrder::new(1, 1, 1),
            max_p: 3,
            max_d: 2,
            max_q: 3,
            forecast_days: 30,
        }
    }
}

fn default_universe() -> Vec<String> {
    [
        "AAPL", "MSFT", "GOOGL", "AMZN", "NVDA", "META", "TSLA", "UNH", "JPM", "V",
        "XOM", "LLY", "AVGO", "JNJ", "WMT", "MA", "PG", "CVX", "MRK", "HD",
        "COST", "ABBV", "ADBE", "PEP", "BAC", "KO", "PFE", "NFLX", "TMO", "DIS",
        "ABT", "CSCO", "MCD", "CRM", "ACN", "DHR", "LIN", "VZ", "WFC", "INTC",
        "TXN", "NEE", "PM", "BMY", "UNP", "HON", "ORCL", "AMGN", "IBM",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
