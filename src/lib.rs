//! Country Hits
//!
//! Scores every country of a catalog against the raw bytes of a song,
//! aggregates the scores per continent and reads or writes the
//! `@Country: <Name> Predicted Hits: <Hits>` report format.

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod scoring;

pub use catalog::CountryCatalog;
pub use error::{HitsError, Result};
pub use models::{ContinentSummary, Country, ScoredReport};
