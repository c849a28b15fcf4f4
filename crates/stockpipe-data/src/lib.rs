//! Data acquisition and cleaning.
//!
//! Contains the validation/cleaning stage that turns raw provider rows into
//! invariant-complete bar sequences, plus the concrete feed implementations
//! (CSV files for local data, Stooq's daily CSV endpoint over HTTP).

pub mod cleaning;
pub mod csv_feed;
pub mod csv_news;
pub mod stooq;

pub use cleaning::{clean_bars, CleanReport};
pub use csv_feed::CsvPriceFeed;
pub use csv_news::CsvNewsFeed;
pub use stooq::StooqFeed;
