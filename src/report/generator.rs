//! Report generation.
//!
//! This module turns ranked countries and the continent summary into the
//! `output.json` record and the `@Country:` text lines.

use crate::analysis::Summary;
use crate::error::{HitsError, Result};
use crate::models::{format_thousands, Country, ResultEntry, ScoredReport};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

/// Build the serializable report from countries already ranked by hits.
pub fn build_report(
    ranked: &[Country],
    summary: Option<&Summary>,
    include_continent: bool,
) -> ScoredReport {
    ScoredReport {
        results: ranked
            .iter()
            .map(|c| ResultEntry::from_country(c, include_continent))
            .collect(),
        most_successful_continent: summary
            .map(|s| s.most_successful.clone())
            .unwrap_or_default(),
    }
}

/// One `@Country: <Name> Predicted Hits: <Hits>` line per country.
pub fn report_lines(countries: &[Country]) -> Vec<String> {
    countries.iter().map(ToString::to_string).collect()
}

/// Generate the text report, one line per country.
pub fn generate_text_report(countries: &[Country]) -> String {
    let mut output = String::new();

    for line in report_lines(countries) {
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Generate the JSON report.
pub fn generate_json_report(report: &ScoredReport, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}

/// Write the JSON report to a file.
pub fn write_json_report(report: &ScoredReport, path: &Path, pretty: bool) -> Result<()> {
    let failure = |reason: String| HitsError::SerializationFailure {
        path: path.display().to_string(),
        reason,
    };

    let content = generate_json_report(report, pretty).map_err(|e| failure(e.to_string()))?;

    let mut file = std::fs::File::create(path).map_err(|e| failure(e.to_string()))?;
    file.write_all(content.as_bytes())
        .map_err(|e| failure(e.to_string()))?;

    info!("Wrote {} results to {}", report.results.len(), path.display());
    Ok(())
}

/// Write the text report to a file so it can be read back later.
pub fn write_text_report(countries: &[Country], path: &Path) -> Result<()> {
    std::fs::write(path, generate_text_report(countries)).map_err(|e| {
        HitsError::SerializationFailure {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
    })?;

    debug!("Wrote {} report lines to {}", countries.len(), path.display());
    Ok(())
}

/// Human-readable description of the winning continent(s).
pub fn generate_summary_text(summary: &Summary) -> String {
    let winners: Vec<String> = summary
        .most_successful
        .iter()
        .map(|s| format!("{} ({} hits)", s.continent, format_thousands(s.total_hits)))
        .collect();

    let label = if winners.len() > 1 {
        "Most successful continents (tied)"
    } else {
        "Most successful continent"
    };

    format!("{}: {}", label, winners.join(", "))
}
