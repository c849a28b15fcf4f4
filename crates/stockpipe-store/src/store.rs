//! The SQLite-backed bar store.

use std::str::FromStr;

use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use stockpipe_core::{CleanBar, ModelMetrics, NewsItem, Prediction, PriceBar, StoreError};
use tracing::debug;

use stockpipe_core::{DailySentiment, SymbolCoverage};

use crate::rows::{BarRow, CloseRow, CoverageRow, SentimentRow};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS stocks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    date TEXT NOT NULL,
    open REAL NOT NULL,
    high REAL NOT NULL,
    low REAL NOT NULL,
    close REAL NOT NULL,
    volume INTEGER NOT NULL,
    UNIQUE(symbol, date)
);

CREATE TABLE IF NOT EXISTS stocks_clean (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    date TEXT NOT NULL,
    open REAL NOT NULL,
    high REAL NOT NULL,
    low REAL NOT NULL,
    close REAL NOT NULL,
    volume INTEGER NOT NULL,
    ma_5 REAL,
    ma_10 REAL,
    ma_20 REAL,
    daily_return REAL,
    UNIQUE(symbol, date)
);

CREATE TABLE IF NOT EXISTS news (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    date TEXT NOT NULL,
    headline TEXT NOT NULL,
    link TEXT NOT NULL,
    source TEXT NOT NULL,
    sentiment_score REAL,
    UNIQUE(symbol, date, headline)
);

CREATE TABLE IF NOT EXISTS predictions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    date TEXT NOT NULL,
    predicted_price REAL NOT NULL,
    confidence_lower REAL,
    confidence_upper REAL,
    model_type TEXT NOT NULL,
    UNIQUE(symbol, date, model_type)
);

CREATE TABLE IF NOT EXISTS model_metrics (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    model_type TEXT NOT NULL,
    accuracy REAL NOT NULL,
    precision REAL NOT NULL,
    recall REAL NOT NULL,
    f1_score REAL NOT NULL,
    created_at TEXT NOT NULL
);
"#;

/// Handle to the pipeline database. Constructed explicitly at process start
/// and passed to every stage that needs persistence.
pub struct BarStore {
    pool: SqlitePool,
}

impl BarStore {
    /// Open (and create if missing) a database at the given SQLite URL.
    pub async fn open(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| StoreError::Connection(e.to_string()))?
            .create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    /// Open an in-memory database (for tests).
    ///
    /// Pinned to a single connection: each SQLite `:memory:` connection is
    /// its own database.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Self::init_schema(&pool).await?;
        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(pool)
            .await
            .map_err(|e| StoreError::Schema(e.to_string()))?;
        Ok(())
    }

    /// Upsert raw bars keyed by (symbol, date) in one transaction.
    /// Re-running with the same rows leaves the table unchanged.
    pub async fn upsert_bars(&self, bars: &[PriceBar]) -> Result<usize, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        for bar in bars {
            sqlx::query(
                r#"
                INSERT INTO stocks (symbol, date, open, high, low, close, volume)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(symbol, date) DO UPDATE SET
                    open = excluded.open,
                    high = excluded.high,
                    low = excluded.low,
                    close = excluded.close,
                    volume = excluded.volume
                "#,
            )
            .bind(&bar.symbol)
            .bind(bar.date)
            .bind(bar.open)
            .bind(bar.high)
            .bind(bar.low)
            .bind(bar.close)
            .bind(bar.volume)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        debug!(rows = bars.len(), "upserted raw bars");
        Ok(bars.len())
    }

    /// Latest stored bar date for a symbol, if any. This is the sync
    /// controller's per-symbol state; it is derived here, never persisted
    /// separately.
    pub async fn latest_bar_date(&self, symbol: &str) -> Result<Option<NaiveDate>, StoreError> {
        sqlx::query_scalar::<_, Option<NaiveDate>>(
            "SELECT MAX(date) FROM stocks WHERE symbol = ?",
        )
        .bind(symbol)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))
    }

    /// Load all raw bars for a symbol, oldest first.
    pub async fn load_bars(&self, symbol: &str) -> Result<Vec<PriceBar>, StoreError> {
        let rows = sqlx::query_as::<_, BarRow>(
            r#"
            SELECT symbol, date, open, high, low, close, volume
            FROM stocks
            WHERE symbol = ?
            ORDER BY date ASC
            "#,
        )
        .bind(symbol)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(PriceBar::from).collect())
    }

    /// Upsert feature-engineered bars. Only the columns of the persisted
    /// schema are stored; the remaining features are recomputed on demand.
    pub async fn upsert_clean_bars(&self, bars: &[CleanBar]) -> Result<usize, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        for clean in bars {
            sqlx::query(
                r#"
                INSERT INTO stocks_clean
                    (symbol, date, open, high, low, close, volume,
                     ma_5, ma_10, ma_20, daily_return)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(symbol, date) DO UPDATE SET
                    open = excluded.open,
                    high = excluded.high,
                    low = excluded.low,
                    close = excluded.close,
                    volume = excluded.volume,
                    ma_5 = excluded.ma_5,
                    ma_10 = excluded.ma_10,
                    ma_20 = excluded.ma_20,
                    daily_return = excluded.daily_return
                "#,
            )
            .bind(&clean.bar.symbol)
            .bind(clean.bar.date)
            .bind(clean.bar.open)
            .bind(clean.bar.high)
            .bind(clean.bar.low)
            .bind(clean.bar.close)
            .bind(clean.bar.volume)
            .bind(clean.ma_5)
            .bind(clean.ma_10)
            .bind(clean.ma_20)
            .bind(clean.daily_return)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(bars.len())
    }

    /// Whether feature-engineered data already exists for a symbol.
    pub async fn has_clean_data(&self, symbol: &str) -> Result<bool, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM stocks_clean WHERE symbol = ?")
                .bind(symbol)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(count > 0)
    }

    /// Closing-price series from the clean table, oldest first.
    pub async fn load_close_series(
        &self,
        symbol: &str,
    ) -> Result<Vec<(NaiveDate, f64)>, StoreError> {
        let rows = sqlx::query_as::<_, CloseRow>(
            "SELECT date, close FROM stocks_clean WHERE symbol = ? ORDER BY date ASC",
        )
        .bind(symbol)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(|r| (r.date, r.close)).collect())
    }

    /// Upsert headlines keyed by (symbol, date, headline). An existing
    /// sentiment score is preserved unless the incoming row carries one.
    pub async fn upsert_news(&self, items: &[NewsItem]) -> Result<usize, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO news (symbol, date, headline, link, source, sentiment_score)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(symbol, date, headline) DO UPDATE SET
                    link = excluded.link,
                    source = excluded.source,
                    sentiment_score = COALESCE(excluded.sentiment_score, news.sentiment_score)
                "#,
            )
            .bind(&item.symbol)
            .bind(item.date)
            .bind(&item.headline)
            .bind(&item.link)
            .bind(&item.source)
            .bind(item.sentiment_score)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(items.len())
    }

    /// Per-day sentiment aggregates over scored headlines.
    pub async fn daily_sentiment(
        &self,
        symbol: &str,
    ) -> Result<Vec<DailySentiment>, StoreError> {
        let rows = sqlx::query_as::<_, SentimentRow>(
            r#"
            SELECT date,
                   AVG(sentiment_score) AS avg_sentiment,
                   COUNT(*) AS news_count,
                   SUM(CASE WHEN sentiment_score > 0.1 THEN 1 ELSE 0 END) AS positive_count,
                   SUM(CASE WHEN sentiment_score < -0.1 THEN 1 ELSE 0 END) AS negative_count
            FROM news
            WHERE symbol = ? AND sentiment_score IS NOT NULL
            GROUP BY date
            ORDER BY date ASC
            "#,
        )
        .bind(symbol)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(DailySentiment::from).collect())
    }

    /// Upsert forecasts keyed by (symbol, date, model_type) so that
    /// re-forecasting replaces earlier rows instead of duplicating them.
    pub async fn upsert_predictions(&self, predictions: &[Prediction]) -> Result<usize, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        for p in predictions {
            sqlx::query(
                r#"
                INSERT INTO predictions
                    (symbol, date, predicted_price, confidence_lower, confidence_upper, model_type)
                VALUES (?, ?, ?, ?, ?, ?)
                ON CONFLICT(symbol, date, model_type) DO UPDATE SET
                    predicted_price = excluded.predicted_price,
                    confidence_lower = excluded.confidence_lower,
                    confidence_upper = excluded.confidence_upper
                "#,
            )
            .bind(&p.symbol)
            .bind(p.date)
            .bind(p.predicted_price)
            .bind(p.confidence_lower)
            .bind(p.confidence_upper)
            .bind(&p.model_type)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(predictions.len())
    }

    /// Append a model evaluation record.
    pub async fn insert_metrics(&self, metrics: &ModelMetrics) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO model_metrics
                (symbol, model_type, accuracy, precision, recall, f1_score, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&metrics.symbol)
        .bind(&metrics.model_type)
        .bind(metrics.accuracy)
        .bind(metrics.precision)
        .bind(metrics.recall)
        .bind(metrics.f1_score)
        .bind(metrics.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }

    /// Availability summary of the raw bar table, one row per symbol.
    pub async fn data_summary(&self) -> Result<Vec<SymbolCoverage>, StoreError> {
        let rows = sqlx::query_as::<_, CoverageRow>(
            r#"
            SELECT symbol,
                   MIN(date) AS earliest,
                   MAX(date) AS latest,
                   COUNT(*) AS row_count
            FROM stocks
            GROUP BY symbol
            ORDER BY symbol ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows.into_iter().map(SymbolCoverage::from).collect())
    }

    /// Total row count of the raw bar table for a symbol.
    pub async fn bar_count(&self, symbol: &str) -> Result<i64, StoreError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM stocks WHERE symbol = ?")
            .bind(symbol)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn bar(date_str: &str, close: f64) -> PriceBar {
        PriceBar::new(
            "AAPL",
            date(date_str),
            close,
            close + 1.0,
            close - 1.0,
            close,
            1000,
        )
    }

    #[tokio::test]
    async fn test_upsert_bars_is_idempotent() {
        let store = BarStore::open_in_memory().await.unwrap();
        let bars = vec![bar("2024-01-02", 100.0), bar("2024-01-03", 101.0)];

        store.upsert_bars(&bars).await.unwrap();
        store.upsert_bars(&bars).await.unwrap();

        assert_eq!(store.bar_count("AAPL").await.unwrap(), 2);
        let loaded = store.load_bars("AAPL").await.unwrap();
        assert_eq!(loaded, bars);
    }

    #[tokio::test]
    async fn test_upsert_replaces_whole_row() {
        let store = BarStore::open_in_memory().await.unwrap();
        store.upsert_bars(&[bar("2024-01-02", 100.0)]).await.unwrap();

        let refreshed = bar("2024-01-02", 105.0);
        store.upsert_bars(std::slice::from_ref(&refreshed)).await.unwrap();

        let loaded = store.load_bars("AAPL").await.unwrap();
        assert_eq!(loaded, vec![refreshed]);
    }

    #[tokio::test]
    async fn test_latest_bar_date() {
        let store = BarStore::open_in_memory().await.unwrap();
        assert_eq!(store.latest_bar_date("AAPL").await.unwrap(), None);

        store
            .upsert_bars(&[bar("2024-01-02", 100.0), bar("2024-01-05", 102.0)])
            .await
            .unwrap();

        assert_eq!(
            store.latest_bar_date("AAPL").await.unwrap(),
            Some(date("2024-01-05"))
        );
        assert_eq!(store.latest_bar_date("MSFT").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clean_bars_roundtrip() {
        let store = BarStore::open_in_memory().await.unwrap();
        let clean = CleanBar {
            bar: bar("2024-01-02", 100.0),
            ma_5: Some(99.5),
            ma_10: None,
            ma_20: None,
            daily_return: Some(1.25),
            price_range: 2.0,
            price_range_pct: 2.0,
            volume_ma_5: Some(1000.0),
            volatility_5: None,
            volatility_10: None,
            rsi: None,
        };

        store.upsert_clean_bars(std::slice::from_ref(&clean)).await.unwrap();
        store.upsert_clean_bars(std::slice::from_ref(&clean)).await.unwrap();

        assert!(store.has_clean_data("AAPL").await.unwrap());
        let series = store.load_close_series("AAPL").await.unwrap();
        assert_eq!(series, vec![(date("2024-01-02"), 100.0)]);
    }

    #[tokio::test]
    async fn test_news_dedupe_and_sentiment_preserved() {
        let store = BarStore::open_in_memory().await.unwrap();

        let mut item = NewsItem {
            symbol: "AAPL".to_string(),
            date: date("2024-01-02"),
            headline: "Apple beats estimates".to_string(),
            link: "https://example.com/a".to_string(),
            source: "Example".to_string(),
            sentiment_score: Some(0.6),
        };
        store.upsert_news(std::slice::from_ref(&item)).await.unwrap();

        // Same identity, no score: the stored score must survive.
        item.sentiment_score = None;
        store.upsert_news(std::slice::from_ref(&item)).await.unwrap();

        let days = store.daily_sentiment("AAPL").await.unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].news_count, 1);
        assert!((days[0].avg_sentiment - 0.6).abs() < 1e-10);
        assert_eq!(days[0].positive_count, 1);
        assert_eq!(days[0].negative_count, 0);
    }

    #[tokio::test]
    async fn test_predictions_upsert_by_model() {
        let store = BarStore::open_in_memory().await.unwrap();

        let mut p = Prediction {
            symbol: "AAPL".to_string(),
            date: date("2024-02-01"),
            predicted_price: 190.0,
            confidence_lower: Some(180.0),
            confidence_upper: Some(200.0),
            model_type: "ARIMA".to_string(),
        };
        store.upsert_predictions(std::slice::from_ref(&p)).await.unwrap();

        p.predicted_price = 191.5;
        store.upsert_predictions(std::slice::from_ref(&p)).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM predictions")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_data_summary() {
        let store = BarStore::open_in_memory().await.unwrap();
        store
            .upsert_bars(&[
                bar("2024-01-02", 100.0),
                bar("2024-01-05", 102.0),
                PriceBar::new("MSFT", date("2024-01-03"), 400.0, 405.0, 398.0, 402.0, 500),
            ])
            .await
            .unwrap();

        let summary = store.data_summary().await.unwrap();
        assert_eq!(summary.len(), 2);

        let aapl = &summary[0];
        assert_eq!(aapl.symbol, "AAPL");
        assert_eq!(aapl.earliest, date("2024-01-02"));
        assert_eq!(aapl.latest, date("2024-01-05"));
        assert_eq!(aapl.row_count, 2);
        assert_eq!(aapl.days_stale(date("2024-01-08")), 3);
    }

    #[tokio::test]
    async fn test_insert_metrics() {
        let store = BarStore::open_in_memory().await.unwrap();
        let metrics = ModelMetrics {
            symbol: "AAPL".to_string(),
            model_type: "RandomForest".to_string(),
            accuracy: 0.61,
            precision: 0.58,
            recall: 0.64,
            f1_score: 0.61,
            created_at: date("2024-01-08"),
        };

        store.insert_metrics(&metrics).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM model_metrics")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
