//! Country catalog.
//!
//! Maps continent names to their ordered country lists. The catalog is loaded
//! once per run and never mutated afterwards.

use crate::error::{HitsError, Result};
use crate::models::Country;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Catalog bundled with the binary.
const EMBEDDED_CATALOG: &str = include_str!("../../assets/countries_at_regions.json");

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub continent: String,
}

/// Read-only continent -> countries mapping.
#[derive(Debug, Clone, Default)]
pub struct CountryCatalog {
    /// Continents in document order, each with its countries in document order.
    continents: Vec<(String, Vec<String>)>,
    /// ASCII-lowercased name -> (continent index, country index).
    index: HashMap<String, (usize, usize)>,
}

impl CountryCatalog {
    /// An empty catalog. Used when the real one is unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse the catalog bundled with the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading country catalog from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            HitsError::CatalogUnavailable(format!("{}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse a catalog document of the form `{"Continent": ["Country", ...], ...}`.
    ///
    /// `null` and empty country lists are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: Map<String, Value> = serde_json::from_str(json)
            .map_err(|e| HitsError::CatalogUnavailable(e.to_string()))?;

        let mut continents = Vec::with_capacity(document.len());

        for (continent, value) in document {
            let countries: Option<Vec<String>> = serde_json::from_value(value).map_err(|e| {
                HitsError::CatalogUnavailable(format!("continent '{}': {}", continent, e))
            })?;

            match countries {
                Some(list) if !list.is_empty() => continents.push((continent, list)),
                _ => debug!("Skipping continent without countries: {}", continent),
            }
        }

        Ok(Self::from_continents(continents))
    }

    /// Build a catalog from already parsed continent lists.
    pub fn from_continents(continents: Vec<(String, Vec<String>)>) -> Self {
        let mut index = HashMap::new();

        for (ci, (_, countries)) in continents.iter().enumerate() {
            for (ni, name) in countries.iter().enumerate() {
                // First occurrence wins for duplicate names
                index.entry(name.to_ascii_lowercase()).or_insert((ci, ni));
            }
        }

        Self { continents, index }
    }

    /// Create one zero-hit [`Country`] per catalog entry, in catalog order.
    pub fn build(&self) -> Vec<Country> {
        self.continents
            .iter()
            .flat_map(|(continent, countries)| {
                countries
                    .iter()
                    .map(move |name| Country::new(name.clone(), 0, continent.clone()))
            })
            .collect()
    }

    /// Look up a country by its full name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<CatalogEntry> {
        let &(ci, ni) = self.index.get(&name.to_ascii_lowercase())?;
        let (continent, countries) = &self.continents[ci];

        Some(CatalogEntry {
            name: countries[ni].clone(),
            continent: continent.clone(),
        })
    }

    /// Continent of a country, ignoring ASCII case.
    pub fn find_continent(&self, name: &str) -> Option<&str> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&(ci, _)| self.continents[ci].0.as_str())
    }

    /// Continent names in catalog order.
    pub fn continent_names(&self) -> impl Iterator<Item = &str> {
        self.continents.iter().map(|(name, _)| name.as_str())
    }

    /// Total number of country entries.
    pub fn country_count(&self) -> usize {
        self.continents.iter().map(|(_, c)| c.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.continents.is_empty()
    }
}
