//! Report line parsing.
//!
//! Rebuilds countries from `@Country: <Name> Predicted Hits: <Hits>` lines,
//! taking continents from the catalog.

use crate::catalog::CountryCatalog;
use crate::error::{HitsError, Result};
use crate::models::{Country, WRONG_INPUT_FORMAT};
use tracing::debug;

const COUNTRY_MARKER: &str = "@Country: ";
const HITS_MARKER: &str = "Hits: ";
const NAME_END_MARKER: &str = " Predicted";

/// Parse a hits value, allowing `,` group separators. Anything unparsable is 0.
pub fn parse_hits(value: &str) -> u64 {
    let digits: String = value.trim().chars().filter(|&c| c != ',').collect();
    digits.parse().unwrap_or(0)
}

/// Extract the name between `@Country: ` and ` Predicted`.
fn extract_name(line: &str) -> &str {
    let Some(start) = line.find(COUNTRY_MARKER).map(|i| i + COUNTRY_MARKER.len()) else {
        return WRONG_INPUT_FORMAT;
    };

    match line[start..].find(NAME_END_MARKER) {
        Some(len) if len > 0 => &line[start..start + len],
        _ => WRONG_INPUT_FORMAT,
    }
}

/// Parse a single line. Returns `None` for lines that are not report lines.
pub fn parse_line(line: &str, catalog: &CountryCatalog) -> Option<Country> {
    if line.trim().is_empty() || !line.contains(COUNTRY_MARKER) || !line.contains(HITS_MARKER) {
        return None;
    }

    let name = extract_name(line);
    let hits = line
        .rfind(HITS_MARKER)
        .map(|i| parse_hits(&line[i + HITS_MARKER.len()..]))
        .unwrap_or_default();

    let country = match catalog.find(name) {
        Some(entry) => Country::new(entry.name, hits, entry.continent),
        None => Country::unknown(name, hits),
    };

    Some(country)
}

/// Parse a sequence of report lines.
///
/// Lines without both markers are skipped. Fails with
/// [`HitsError::EmptyOrMalformedInput`] if no line produced a country.
pub fn parse_lines<I, S>(lines: I, catalog: &CountryCatalog) -> Result<Vec<Country>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut countries = Vec::new();
    let mut skipped = 0usize;

    for (number, line) in lines.into_iter().enumerate() {
        match parse_line(line.as_ref(), catalog) {
            Some(country) => {
                debug!(
                    "Line {}: {} -> {} hits ({})",
                    number + 1,
                    country.name,
                    country.hits,
                    country.continent
                );
                countries.push(country);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} non-report lines", skipped);
    }

    if countries.is_empty() {
        return Err(HitsError::EmptyOrMalformedInput);
    }

    Ok(countries)
}

/// Parse a whole report text.
pub fn parse_report(text: &str, catalog: &CountryCatalog) -> Result<Vec<Country>> {
    parse_lines(text.lines(), catalog)
}
