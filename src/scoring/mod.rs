//! Country scoring against a song's byte stream.
//!
//! Each country name is turned into a single-byte pattern that repeats over
//! the whole stream. Every stream byte equal to the pattern byte at the same
//! absolute position is a hit.

pub mod source;

pub use source::{ByteSource, MemorySource, WavSource};

use crate::error::{HitsError, Result};
use crate::models::Country;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

/// Chunk size used when the source gives no hint.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Encode a name as single-byte ASCII units. Each non-ASCII character becomes one `?`.
pub fn encode_name(name: &str) -> Vec<u8> {
    name.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .collect()
}

/// Result of scoring a batch of countries.
#[derive(Debug, Default)]
pub struct ScoringOutcome {
    /// Countries scored successfully.
    pub scored: usize,
    /// Per-country failures. The matching countries have zero hits.
    pub failures: Vec<HitsError>,
}

impl ScoringOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Computes hit counts for countries.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    default_chunk_size: usize,
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE)
    }
}

impl ScoreEngine {
    pub fn new(default_chunk_size: usize) -> Self {
        Self {
            default_chunk_size: default_chunk_size.max(1),
        }
    }

    /// Chunk size for a source: its bytes-per-second hint, or the default.
    pub fn chunk_size<S: ByteSource + ?Sized>(&self, source: &S) -> usize {
        match source.chunk_hint() {
            0 => self.default_chunk_size,
            hint => hint as usize,
        }
    }

    /// Read buffer length: the chunk size, never more than the stream holds.
    pub fn buffer_len<S: ByteSource + ?Sized>(&self, source: &S) -> usize {
        let len = usize::try_from(source.len()).unwrap_or(usize::MAX);
        self.chunk_size(source).min(len).max(1)
    }

    /// Count the hits of `name` over the full stream, starting from position zero.
    pub fn score<S: ByteSource + ?Sized>(&self, name: &str, source: &mut S) -> Result<u64> {
        let pattern = encode_name(name);
        if pattern.is_empty() {
            return Err(HitsError::InvalidCountryName);
        }

        let failure = |e: std::io::Error| HitsError::ScoringFailure {
            country: name.to_string(),
            source: e,
        };

        source.rewind().map_err(failure)?;

        let mut buffer = vec![0u8; self.buffer_len(source)];
        let mut offset: u64 = 0;
        let mut hits: u64 = 0;
        let period = pattern.len() as u64;

        while offset < source.len() {
            let read = source.read_chunk(&mut buffer).map_err(failure)?;
            if read == 0 {
                debug!("Stream ended early at {} of {} bytes", offset, source.len());
                break;
            }

            for (i, &byte) in buffer[..read].iter().enumerate() {
                let position = offset + i as u64;
                if byte == pattern[(position % period) as usize] {
                    hits += 1;
                }
            }

            offset += read as u64;
        }

        Ok(hits)
    }

    /// Score one country in place. On failure its hits are reset to zero.
    pub fn score_country<S: ByteSource + ?Sized>(
        &self,
        country: &mut Country,
        source: &mut S,
    ) -> Result<()> {
        match self.score(&country.name, source) {
            Ok(hits) => {
                country.hits = hits;
                Ok(())
            }
            Err(e) => {
                country.hits = 0;
                Err(e)
            }
        }
    }

    /// Score every country in sequence. Failures are collected, never fatal.
    pub fn score_all<S: ByteSource + ?Sized>(
        &self,
        countries: &mut [Country],
        source: &mut S,
        show_progress: bool,
    ) -> ScoringOutcome {
        info!(
            "Scoring {} countries over {} bytes (chunk size {})",
            countries.len(),
            source.len(),
            self.chunk_size(source)
        );

        let progress_bar = if show_progress {
            let pb = ProgressBar::new(countries.len() as u64);
            if let Ok(style) = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            {
                pb.set_style(style.progress_chars("#>-"));
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        let mut outcome = ScoringOutcome::default();

        for country in countries.iter_mut() {
            progress_bar.set_message(format!("Working on {}...", country.name));

            match self.score_country(country, source) {
                Ok(()) => {
                    debug!("{}: {} hits", country.name, country.hits);
                    outcome.scored += 1;
                }
                Err(e) => {
                    warn!("Scoring failed for {}: {}", country.name, e);
                    outcome.failures.push(e);
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Scoring complete");
        outcome
    }
}
