//! Analysis modules.
//!
//! Aggregation of scored countries into continent totals.

pub mod aggregator;

pub use aggregator::*;
