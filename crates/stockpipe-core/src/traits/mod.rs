//! Trait definitions for external data providers.

mod feed;

pub use feed::{NewsFeed, PriceFeed};
