//! Error types for scoring, catalog loading and report handling.

use thiserror::Error;

/// Failure kinds surfaced by the core components.
#[derive(Debug, Error)]
pub enum HitsError {
    /// The country catalog could not be read or parsed.
    #[error("Country catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// A country name was empty, so there is no pattern to match against.
    #[error("Country name must not be empty")]
    InvalidCountryName,

    /// The byte source failed while scoring a country.
    #[error("Failed to score {country}: {source}")]
    ScoringFailure {
        country: String,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be written.
    #[error("Unable to create the output file '{path}': {reason}")]
    SerializationFailure { path: String, reason: String },

    /// No usable report lines were found.
    #[error("Empty or malformed input: no country records found")]
    EmptyOrMalformedInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HitsError>;
