//! Error types for the pipeline.

use thiserror::Error;

/// Top-level pipeline error.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Label error: {0}")]
    Label(#[from] LabelError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors from price and news feed providers.
#[derive(Error, Debug, Clone)]
pub enum FeedError {
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Feed error: {0}")]
    Internal(String),
}

impl FeedError {
    /// Whether the failure is transient and worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, FeedError::Connection(_) | FeedError::RateLimited(_))
    }
}

/// Store access errors. Fatal for the current operation; batch runs treat
/// them as a per-symbol failure and continue.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Schema error: {0}")]
    Schema(String),
}

/// Label construction errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LabelError {
    #[error("No bars to label")]
    EmptyInput,

    #[error("Horizon of {horizon} days leaves no labelable rows out of {available}")]
    HorizonTooLong { horizon: usize, available: usize },

    #[error("Label set has a single class ({class}) across {count} rows; stratified split is infeasible")]
    SingleClass { class: u8, count: usize },
}

/// Errors from a single ARIMA candidate fit. Candidates that fail are
/// skipped by the order selector, never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("Series too short: need {required} observations, have {available}")]
    TooShort { required: usize, available: usize },

    #[error("Regression matrix is singular")]
    Singular,

    #[error("Fit produced a non-finite {0}")]
    NonFinite(&'static str),
}

/// Model-stage errors outside a single candidate fit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Series too short for the ADF test: need {required} observations, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Fit error: {0}")]
    Fit(#[from] FitError),
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
