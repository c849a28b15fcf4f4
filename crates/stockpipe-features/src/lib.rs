//! Feature engineering for clean daily bar sequences.
//!
//! All computations are positional: output vectors are index-aligned with
//! the input sequence, and positions without enough trailing history hold
//! `None` rather than a filler value.

pub mod engine;
pub mod rolling;

pub use engine::{FeatureConfig, FeatureEngine};
pub use rolling::{rolling_mean, rolling_std};
