//! Data models for country scoring.
//!
//! This module contains the core data structures shared by the scorer,
//! the aggregator and the report codec.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Continent label for countries that are not in the catalog.
pub const UNKNOWN_CONTINENT: &str = "Unknown";

/// Placeholder name for report lines whose name span could not be extracted.
pub const WRONG_INPUT_FORMAT: &str = "Wrong Input Format";

/// A country with its preference score for the current song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Country name as it appears in the catalog or report.
    #[serde(rename = "Name")]
    pub name: String,
    /// Number of hits found in the song's byte stream.
    #[serde(rename = "Hits")]
    pub hits: u64,
    /// Owning continent, or [`UNKNOWN_CONTINENT`].
    #[serde(rename = "Continent")]
    pub continent: String,
}

impl Country {
    /// Creates a country with the given score.
    pub fn new(name: impl Into<String>, hits: u64, continent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hits,
            continent: continent.into(),
        }
    }

    /// Creates a country that is not present in the catalog.
    pub fn unknown(name: impl Into<String>, hits: u64) -> Self {
        Self::new(name, hits, UNKNOWN_CONTINENT)
    }

    /// Returns true if the continent is the "not in catalog" sentinel.
    pub fn is_unknown(&self) -> bool {
        self.continent == UNKNOWN_CONTINENT
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@Country: {} Predicted Hits: {}",
            self.name,
            format_thousands(self.hits)
        )
    }
}

/// Total hits of one continent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinentSummary {
    #[serde(rename = "Continent")]
    pub continent: String,
    #[serde(rename = "TotalHits")]
    pub total_hits: u64,
}

/// One entry of the `Results` array in `output.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Hits")]
    pub hits: u64,
    /// Only written when continents are requested in the output.
    #[serde(rename = "Continent", default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
}

impl ResultEntry {
    /// Builds an entry from a country, keeping the continent only if asked to.
    pub fn from_country(country: &Country, include_continent: bool) -> Self {
        Self {
            name: country.name.clone(),
            hits: country.hits,
            continent: include_continent.then(|| country.continent.clone()),
        }
    }
}

/// The serialized result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredReport {
    /// Countries ordered by descending hits, ties in input order.
    #[serde(rename = "Results")]
    pub results: Vec<ResultEntry>,
    /// Every continent tied at the maximum total.
    #[serde(rename = "MostSuccessfulContinent")]
    pub most_successful_continent: Vec<ContinentSummary>,
}

/// Formats a number with `,` between groups of three digits.
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
        assert_eq!(format_thousands(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_country_display() {
        let country = Country::new("France", 1234, "Europe");
        assert_eq!(country.to_string(), "@Country: France Predicted Hits: 1,234");
    }

    #[test]
    fn test_unknown_country() {
        let country = Country::unknown("Atlantis", 7);
        assert!(country.is_unknown());
        assert_eq!(country.continent, "Unknown");
    }

    #[test]
    fn test_result_entry_omits_continent() {
        let country = Country::new("Japan", 15, "Asia");

        let hidden = serde_json::to_string(&ResultEntry::from_country(&country, false)).unwrap();
        assert_eq!(hidden, r#"{"Name":"Japan","Hits":15}"#);

        let shown = serde_json::to_string(&ResultEntry::from_country(&country, true)).unwrap();
        assert_eq!(shown, r#"{"Name":"Japan","Hits":15,"Continent":"Asia"}"#);
    }
}
