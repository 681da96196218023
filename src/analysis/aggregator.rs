//! Continent aggregation and ranking.
//!
//! This module groups scored countries by continent, finds the continents
//! tied for the highest total, and ranks countries by hits.

use crate::models::{ContinentSummary, Country};
use std::collections::HashMap;

/// Per-continent totals and the continents tied at the maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Every continent present, in order of first appearance.
    pub totals: Vec<ContinentSummary>,
    /// Continents whose total equals the maximum. Never empty.
    pub most_successful: Vec<ContinentSummary>,
}

impl Summary {
    /// Highest continent total.
    pub fn max_total(&self) -> u64 {
        self.most_successful
            .first()
            .map(|s| s.total_hits)
            .unwrap_or_default()
    }
}

/// Sum hits per continent, keeping continents in order of first appearance.
pub fn continent_totals(countries: &[Country]) -> Vec<ContinentSummary> {
    let mut totals: Vec<ContinentSummary> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for country in countries {
        let slot = *positions
            .entry(country.continent.as_str())
            .or_insert_with(|| {
                totals.push(ContinentSummary {
                    continent: country.continent.clone(),
                    total_hits: 0,
                });
                totals.len() - 1
            });

        totals[slot].total_hits += country.hits;
    }

    totals
}

/// Continents whose total is at least the maximum total.
pub fn most_successful(totals: &[ContinentSummary]) -> Vec<ContinentSummary> {
    let Some(max) = totals.iter().map(|s| s.total_hits).max() else {
        return Vec::new();
    };

    totals
        .iter()
        .filter(|s| s.total_hits >= max)
        .cloned()
        .collect()
}

/// Summarize countries by continent. Returns `None` when there are no countries.
pub fn summarize(countries: &[Country]) -> Option<Summary> {
    let totals = continent_totals(countries);
    if totals.is_empty() {
        return None;
    }

    let most_successful = most_successful(&totals);
    Some(Summary {
        totals,
        most_successful,
    })
}

/// Sort countries by descending hits. Equal hits keep their relative order.
pub fn rank_countries(countries: &mut [Country]) {
    countries.sort_by(|a, b| b.hits.cmp(&a.hits));
}

/// Ranked copy of the countries.
pub fn ranked(countries: &[Country]) -> Vec<Country> {
    let mut sorted = countries.to_vec();
    rank_countries(&mut sorted);
    sorted
}

/// Sum of hits over all countries.
pub fn total_hits(countries: &[Country]) -> u64 {
    countries.iter().map(|c| c.hits).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_countries() -> Vec<Country> {
        vec![
            Country::new("France", 10, "Europe"),
            Country::new("Spain", 5, "Europe"),
            Country::new("Japan", 15, "Asia"),
        ]
    }

    #[test]
    fn test_two_way_tie() {
        let summary = summarize(&sample_countries()).unwrap();

        assert_eq!(
            summary.totals,
            vec![
                ContinentSummary {
                    continent: "Europe".to_string(),
                    total_hits: 15
                },
                ContinentSummary {
                    continent: "Asia".to_string(),
                    total_hits: 15
                },
            ]
        );
        assert_eq!(summary.most_successful.len(), 2);
        assert_eq!(summary.max_total(), 15);
    }

    #[test]
    fn test_single_winner() {
        let mut countries = sample_countries();
        countries.push(Country::new("Italy", 1, "Europe"));

        let summary = summarize(&countries).unwrap();
        assert_eq!(summary.most_successful.len(), 1);
        assert_eq!(summary.most_successful[0].continent, "Europe");
        assert_eq!(summary.most_successful[0].total_hits, 16);
    }

    #[test]
    fn test_all_zero_hits_tie_everywhere() {
        let countries = vec![
            Country::new("Peru", 0, "South America"),
            Country::new("Fiji", 0, "Oceania"),
            Country::unknown("Atlantis", 0),
        ];

        let summary = summarize(&countries).unwrap();
        assert_eq!(summary.most_successful.len(), 3);
    }

    #[test]
    fn test_unknown_is_a_continent_group() {
        let countries = vec![
            Country::unknown("Atlantis", 7),
            Country::new("Chad", 3, "Africa"),
            Country::unknown("Lemuria", 2),
        ];

        let totals = continent_totals(&countries);
        assert_eq!(totals[0].continent, "Unknown");
        assert_eq!(totals[0].total_hits, 9);
    }

    #[test]
    fn test_empty_input_has_no_summary() {
        assert!(summarize(&[]).is_none());
        assert!(most_successful(&[]).is_empty());
    }

    #[test]
    fn test_aggregation_is_lossless() {
        let countries = vec![
            Country::new("Kenya", 123, "Africa"),
            Country::new("Chile", 77, "South America"),
            Country::new("Ghana", 1, "Africa"),
            Country::unknown("Atlantis", 40),
            Country::new("Peru", 0, "South America"),
        ];

        let totals = continent_totals(&countries);
        let continent_sum: u64 = totals.iter().map(|s| s.total_hits).sum();
        assert_eq!(continent_sum, total_hits(&countries));
    }

    #[test]
    fn test_rank_is_stable_descending() {
        let countries = vec![
            Country::new("Chad", 5, "Africa"),
            Country::new("Iran", 9, "Asia"),
            Country::new("Peru", 5, "South America"),
            Country::new("Cuba", 9, "North America"),
            Country::new("Fiji", 1, "Oceania"),
        ];

        let names: Vec<_> = ranked(&countries).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Iran", "Cuba", "Chad", "Peru", "Fiji"]);
    }
}
