//! Label analysis.
//!
//! Normalization of raw verdict labels and the frequency table that
//! feeds the distribution chart.

pub mod aggregator;

pub use aggregator::*;
