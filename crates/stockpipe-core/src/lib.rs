//! Core types and traits for the stockpipe data pipeline.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (RawBar, PriceBar, CleanBar, LabeledBar)
//! - News and model output types
//! - Traits for price and news feeds
//! - The error taxonomy shared by all pipeline stages

pub mod error;
pub mod traits;
pub mod types;

pub use error::*;
pub use traits::*;
pub use types::*;
