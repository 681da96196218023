//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.countryhits.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = ".countryhits.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Scoring settings.
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output JSON file path.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

fn default_output() -> String {
    "output.json".to_string()
}

/// Country catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file. The bundled catalog is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Scoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Chunk size for sources without a bytes-per-second hint.
    #[serde(default = "default_chunk_size")]
    pub default_chunk_size: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_chunk_size: default_chunk_size(),
        }
    }
}

fn default_chunk_size() -> usize {
    crate::scoring::DEFAULT_CHUNK_SIZE
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Pretty-print the JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Write each country's continent into `Results`.
    #[serde(default)]
    pub include_continent: bool,

    /// Also write the `@Country:` lines to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lines_output: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            include_continent: false,
            lines_output: None,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(ref catalog) = args.catalog {
            self.catalog.path = Some(catalog.clone());
        }

        if let Some(ref lines) = args.lines {
            self.report.lines_output = Some(lines.clone());
        }

        // Flags always override
        if args.include_continent {
            self.report.include_continent = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
