//! Batch rating: readings file in, one CSV report row per station out.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::index::Standard;
use crate::output::{append_record, append_records};
use crate::parser::parse_readings;
use crate::report::AqiReport;

/// Summary entry for one rated station.
#[derive(Debug, Serialize)]
pub struct StationSummary {
    pub station: String,
    pub aqi: i32,
    pub category: Option<String>,
    pub responsible: Vec<String>,
}

/// Top-level result of rating a readings file.
#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub generated_at: DateTime<Utc>,
    pub standard: String,
    pub stations: Vec<StationSummary>,
    pub errors: usize,
}

/// Rates every station in `input` and appends one report per station to
/// the CSV at `output`.
///
/// An unreadable or unparsable input is recorded as a single error row
/// instead of aborting; only failures to write `output` are returned.
#[tracing::instrument(skip(standard), fields(standard = %standard.name()))]
pub fn rate_file(standard: &Standard, input: &str, output: &str) -> Result<RatingSummary> {
    let mut summary = RatingSummary {
        generated_at: Utc::now(),
        standard: standard.name().to_string(),
        stations: Vec::new(),
        errors: 0,
    };

    let rows = match std::fs::read(input)
        .with_context(|| format!("failed to read '{input}'"))
        .and_then(|bytes| parse_readings(input, &bytes))
    {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Readings could not be loaded");
            let report = AqiReport::from_error("parse_error", &format!("{e:#}"))
                .with_station(input);
            append_record(output, &report)?;
            summary.errors += 1;
            return Ok(summary);
        }
    };

    info!(stations = rows.len(), "Readings loaded");

    let mut reports = Vec::with_capacity(rows.len());
    for readings in &rows {
        let assessment = standard.assess(readings.pairs());
        if assessment.sub_indices.is_empty() {
            warn!(station = %readings.station, "No pollutant known to this standard");
        }

        let report = AqiReport::from_assessment(standard, &readings.station, &assessment);
        summary.stations.push(StationSummary {
            station: readings.station.clone(),
            aqi: assessment.overall,
            category: report.category.clone(),
            responsible: assessment
                .responsible
                .iter()
                .map(|p| p.to_string())
                .collect(),
        });
        reports.push(report);
    }
    append_records(output, &reports)?;

    info!(rated = summary.stations.len(), output, "Rating complete");
    Ok(summary)
}
