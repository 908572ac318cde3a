//! Station readings parsers for CSV and JSON input.

use anyhow::{Context, Result, bail};
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Concentrations measured at one station, keyed by pollutant id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationReadings {
    pub station: String,
    #[serde(default)]
    pub concentrations: BTreeMap<String, f64>,
}

impl StationReadings {
    /// Borrowed `(pollutant, concentration)` pairs for the aggregator.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, f64)> {
        self.concentrations.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Decodes CSV readings: one station per row, one pollutant per column.
///
/// A `station` column is optional; rows without one are named `row-N`.
/// Empty cells are treated as not measured.
///
/// # Errors
///
/// Returns an error if the CSV is malformed or a cell is not a number.
pub fn parse_readings_csv(bytes: &[u8]) -> Result<Vec<StationReadings>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);
    let headers = rdr.headers()?.clone();
    let station_col = headers.iter().position(|h| h == "station");

    let mut rows = Vec::new();
    for (n, record) in rdr.records().enumerate() {
        let record = record?;
        let row = n + 1;

        let station = station_col
            .and_then(|i| record.get(i))
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("row-{row}"));

        let mut concentrations = BTreeMap::new();
        for (i, (header, cell)) in headers.iter().zip(record.iter()).enumerate() {
            if Some(i) == station_col || cell.is_empty() {
                continue;
            }
            let value: f64 = cell
                .parse()
                .with_context(|| format!("row {row}: '{header}' is not a number: '{cell}'"))?;
            concentrations.insert(header.to_string(), value);
        }

        rows.push(StationReadings {
            station,
            concentrations,
        });
    }

    Ok(rows)
}

/// Decodes a JSON array of [`StationReadings`].
pub fn parse_readings_json(bytes: &[u8]) -> Result<Vec<StationReadings>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Picks the decoder from the file extension (`.json`, otherwise CSV).
pub fn parse_readings(path: &str, bytes: &[u8]) -> Result<Vec<StationReadings>> {
    match std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
    {
        Some("json") => parse_readings_json(bytes),
        Some("csv") | Some("txt") | None => parse_readings_csv(bytes),
        Some(other) => bail!("unsupported readings format '.{other}'"),
    }
}
