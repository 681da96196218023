//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

/// Country Hits - score every country against a song
///
/// Scans the raw bytes of a .wav file against each country's name, ranks
/// the countries and reports the most successful continent. A previously
/// printed report can be read back instead of a song.
///
/// Examples:
///   country-hits --wav song.wav
///   country-hits --wav song.wav --lines song.txt --include-continent
///   country-hits --report song.txt --output rebuilt.json
///   country-hits --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(group(
    ArgGroup::new("input")
        .args(["wav", "report"])
        .multiple(false)
))]
pub struct Args {
    /// Song to score (.wav)
    #[arg(short, long, value_name = "FILE")]
    pub wav: Option<PathBuf>,

    /// Text report to rebuild results from ("-" for stdin)
    ///
    /// One "@Country: <Name> Predicted Hits: <Hits>" record per line.
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Output JSON file path [default: output.json]
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Country catalog JSON file
    ///
    /// If not specified, the bundled catalog is used.
    #[arg(long, value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Also write the report lines to this file
    #[arg(long, value_name = "FILE")]
    pub lines: Option<PathBuf>,

    /// Include each country's continent in the JSON results
    #[arg(long)]
    pub include_continent: bool,

    /// Path to configuration file
    ///
    /// If not specified, looks for .countryhits.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .countryhits.toml configuration file
    #[arg(long, exclusive = true)]
    pub init_config: bool,
}

/// Where the countries of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// Score a song.
    Wav(PathBuf),
    /// Rebuild from report lines. `None` means stdin.
    Report(Option<PathBuf>),
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The selected input. Validation guarantees one is present.
    pub fn input_mode(&self) -> Option<InputMode> {
        if let Some(ref wav) = self.wav {
            return Some(InputMode::Wav(wav.clone()));
        }

        self.report.as_ref().map(|path| {
            if path.as_os_str() == "-" {
                InputMode::Report(None)
            } else {
                InputMode::Report(Some(path.clone()))
            }
        })
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        match self.input_mode() {
            Some(InputMode::Wav(path)) => {
                if !path.is_file() {
                    return Err(format!(
                        "File doesn't exist in the given path: {}",
                        path.display()
                    ));
                }
                let is_wav = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
                if !is_wav {
                    return Err(format!("Song has to be a .wav file: {}", path.display()));
                }
            }
            Some(InputMode::Report(Some(path))) => {
                if !path.is_file() {
                    return Err(format!("Report file not found: {}", path.display()));
                }
            }
            Some(InputMode::Report(None)) => {}
            None => return Err("Either --wav or --report is required".to_string()),
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
