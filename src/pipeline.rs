//! End-to-end runs.
//!
//! Scoring a song: catalog -> scorer -> aggregator -> report.
//! Rebuilding from text: catalog -> parser -> aggregator -> report.

use crate::analysis::{self, Summary};
use crate::catalog::CountryCatalog;
use crate::error::{HitsError, Result};
use crate::models::{Country, ScoredReport};
use crate::report;
use crate::scoring::{ByteSource, ScoreEngine};
use tracing::{info, warn};

/// Everything a run produces.
#[derive(Debug)]
pub struct RunOutput {
    /// Countries ranked by descending hits.
    pub ranked: Vec<Country>,
    /// Continent totals, `None` when there were no countries.
    pub summary: Option<Summary>,
    /// The record written to `output.json`.
    pub report: ScoredReport,
    /// Countries that could not be scored.
    pub failures: Vec<HitsError>,
}

fn finish(countries: Vec<Country>, include_continent: bool, failures: Vec<HitsError>) -> RunOutput {
    let summary = analysis::summarize(&countries);
    let ranked = analysis::ranked(&countries);
    let report = report::build_report(&ranked, summary.as_ref(), include_continent);

    if let Some(ref s) = summary {
        info!(
            "{} continents, maximum total {}",
            s.totals.len(),
            s.max_total()
        );
    }

    RunOutput {
        ranked,
        summary,
        report,
        failures,
    }
}

/// Score every catalog country against a byte source.
pub fn score_song<S: ByteSource + ?Sized>(
    catalog: &CountryCatalog,
    source: &mut S,
    engine: &ScoreEngine,
    include_continent: bool,
    show_progress: bool,
) -> RunOutput {
    let mut countries = catalog.build();
    if countries.is_empty() {
        warn!("No countries available to score");
    }

    let outcome = engine.score_all(&mut countries, source, show_progress);
    if outcome.has_failures() {
        warn!("{} countries failed to score", outcome.failures.len());
    }

    finish(countries, include_continent, outcome.failures)
}

/// Rebuild results from previously printed report lines.
pub fn rebuild_from_lines<I, S>(
    lines: I,
    catalog: &CountryCatalog,
    include_continent: bool,
) -> Result<RunOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let countries = report::parse_lines(lines, catalog)?;
    info!("Rebuilt {} countries from report lines", countries.len());

    let unknown = countries.iter().filter(|c| c.is_unknown()).count();
    if unknown > 0 {
        warn!("{} countries are not in the catalog", unknown);
    }

    Ok(finish(countries, include_continent, Vec::new()))
}
