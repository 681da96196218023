//! Country Hits - score countries against a song
//!
//! A CLI tool that scans the raw bytes of a song against every country's
//! name, ranks the countries and reports the most successful continent.
//! It can also rebuild the same results from a previously printed report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, unreadable song or config, etc.)
//!   2 - Report input contained no country records

use anyhow::{Context, Result};
use country_hits::cli::{Args, InputMode};
use country_hits::config::{self, Config};
use country_hits::pipeline::{self, RunOutput};
use country_hits::report;
use country_hits::scoring::{ScoreEngine, WavSource};
use country_hits::{CountryCatalog, HitsError};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Country Hits v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .countryhits.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run one scoring or rebuild pass. Returns the exit code.
fn run(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let catalog = load_catalog(&config);
    let include_continent = config.report.include_continent;

    let output = match args.input_mode() {
        Some(InputMode::Wav(path)) => {
            println!("🎵 Scoring {} countries against {}", catalog.country_count(), path.display());

            let mut source = WavSource::open(&path)
                .with_context(|| format!("Unable to open the file {}", path.display()))?;
            let engine = ScoreEngine::new(config.scoring.default_chunk_size);

            pipeline::score_song(&catalog, &mut source, &engine, include_continent, !args.quiet)
        }
        Some(InputMode::Report(path)) => {
            let lines = read_report_lines(path.as_deref())?;

            match pipeline::rebuild_from_lines(&lines, &catalog, include_continent) {
                Ok(output) => output,
                Err(HitsError::EmptyOrMalformedInput) => {
                    eprintln!("\n⛔ Empty or malformed input: no report was written.");
                    return Ok(2);
                }
                Err(e) => return Err(e.into()),
            }
        }
        None => anyhow::bail!("Either --wav or --report is required"),
    };

    write_outputs(&output, &config);
    print_results(&output, start_time.elapsed().as_secs_f64());

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}

/// Load the configured catalog, or an empty one if it is unavailable.
fn load_catalog(config: &Config) -> CountryCatalog {
    let loaded = match config.catalog.path {
        Some(ref path) => CountryCatalog::load(path),
        None => CountryCatalog::embedded(),
    };

    match loaded {
        Ok(catalog) => {
            debug!("Catalog holds {} countries", catalog.country_count());
            catalog
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            CountryCatalog::empty()
        }
    }
}

/// Read report lines from a file, or stdin when no path is given.
fn read_report_lines(path: Option<&Path>) -> Result<Vec<String>> {
    match path {
        Some(path) => {
            info!("Reading report from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read report file: {}", path.display()))?;
            Ok(content.lines().map(String::from).collect())
        }
        None => {
            info!("Reading report from stdin");
            std::io::stdin()
                .lock()
                .lines()
                .collect::<std::io::Result<Vec<_>>>()
                .context("Failed to read report from stdin")
        }
    }
}

/// Write the JSON report and optional text report. Failures are reported, not fatal.
fn write_outputs(output: &RunOutput, config: &Config) {
    let json_path = PathBuf::from(&config.general.output);
    if let Err(e) = report::write_json_report(&output.report, &json_path, config.report.pretty) {
        error!("{}", e);
        eprintln!("Error: {}", e);
    }

    if let Some(ref lines_path) = config.report.lines_output {
        if let Err(e) = report::write_text_report(&output.ranked, lines_path) {
            error!("{}", e);
            eprintln!("Error: {}", e);
        }
    }
}

/// Print the report lines and a short summary.
fn print_results(output: &RunOutput, duration: f64) {
    println!();
    for line in report::report_lines(&output.ranked) {
        println!("{}", line);
    }

    println!("\n📊 Summary:");
    match output.summary {
        Some(ref summary) => println!("   {}", report::generate_summary_text(summary)),
        None => println!("   No countries to summarize."),
    }
    if !output.failures.is_empty() {
        println!("   Failed countries: {}", output.failures.len());
    }
    println!("   Duration: {:.1}s", duration);
}
