//! CLI entry point for the AQI rater.
//!
//! Provides subcommands for rating a single concentration, assessing a set
//! of readings, batch-rating a readings file, and dumping the breakpoint and
//! color tables.

use anyhow::{Context, Result, bail};
use aqi_rater::index::{CATEGORIES, Standard, StandardDefinition, StandardKind, category};
use aqi_rater::output::print_json;
use aqi_rater::rater::rate_file;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "aqi_rater")]
#[command(about = "Convert pollutant concentrations into an Air Quality Index", long_about = None)]
struct Cli {
    /// Standard to rate against: epa or mep (default from AQI_STANDARD, else epa)
    #[arg(short, long, global = true)]
    standard: Option<StandardKind>,

    /// JSON file with custom breakpoint tables, replacing the built-in standard
    #[arg(long, global = true, value_name = "FILE")]
    tables: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate a single pollutant concentration
    SubIndex {
        /// Pollutant id, e.g. pm25_24h
        pollutant: String,

        /// Measured concentration
        concentration: f64,
    },
    /// Compute the overall index for a set of readings
    Assess {
        /// Readings as POLLUTANT=VALUE pairs
        #[arg(value_name = "POLLUTANT=VALUE", value_parser = parse_reading, required = true)]
        readings: Vec<(String, f64)>,
    },
    /// Rate every station of a CSV or JSON readings file
    Rate {
        /// Readings file (.csv or .json)
        #[arg(value_name = "FILE")]
        input: String,

        /// CSV file to append reports to
        #[arg(short, long, default_value = "aqi_reports.csv")]
        output: String,
    },
    /// Print the breakpoint tables of the selected standard
    Tables,
    /// Print the index color categories
    Colors,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/aqi_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("aqi_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let standard = load_standard(cli.standard, cli.tables.as_deref())?;

    match cli.command {
        Commands::SubIndex {
            pollutant,
            concentration,
        } => match standard.sub_index(&pollutant, concentration) {
            Ok(value) => {
                info!(
                    standard = %standard.name(),
                    pollutant = %pollutant,
                    concentration,
                    sub_index = value,
                    category = category(value).map(|c| c.name),
                    "Sub-index"
                );
            }
            Err(e) => {
                warn!(
                    standard = %standard.name(),
                    pollutant = %pollutant,
                    concentration,
                    sub_index = e.sentinel(),
                    error = %e,
                    "Sub-index not available"
                );
            }
        },
        Commands::Assess { readings } => {
            let assessment = standard.assess(readings.iter().map(|(p, c)| (p.as_str(), *c)));
            let skipped = readings.len() - assessment.sub_indices.len();
            if skipped > 0 {
                warn!(skipped, "Readings for unknown pollutants were ignored");
            }
            print_json(&assessment)?;
        }
        Commands::Rate { input, output } => {
            let summary = rate_file(&standard, &input, &output)?;
            print_json(&summary)?;
        }
        Commands::Tables => {
            print_json(&standard)?;
        }
        Commands::Colors => {
            for c in &CATEGORIES {
                info!(
                    name = c.name,
                    low = c.low,
                    high = c.high,
                    hex = %c.color.rgb_hex(),
                    "Category"
                );
            }
        }
    }

    Ok(())
}

/// Resolves the standard from `--tables`, `--standard`, or `AQI_STANDARD`.
fn load_standard(kind: Option<StandardKind>, tables: Option<&str>) -> Result<Standard> {
    if let Some(path) = tables {
        let standard = StandardDefinition::load(path)?.build()?;
        info!(path, standard = %standard.name(), "Loaded custom tables");
        return Ok(standard);
    }

    let kind = match kind {
        Some(kind) => kind,
        None => match std::env::var("AQI_STANDARD") {
            Ok(value) => value
                .parse::<StandardKind>()
                .context("AQI_STANDARD is not a known standard")?,
            Err(_) => StandardKind::Epa,
        },
    };
    Ok(Standard::builtin(kind).clone())
}

/// Parses a `POLLUTANT=VALUE` argument.
fn parse_reading(s: &str) -> Result<(String, f64)> {
    let Some((pollutant, value)) = s.split_once('=') else {
        bail!("expected POLLUTANT=VALUE, got '{s}'");
    };
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("'{value}' is not a number"))?;
    Ok((pollutant.trim().to_string(), value))
}
