//! Report sinks: JSON to the log, CSV rows to disk.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::report::AqiReport;
use csv::WriterBuilder;
use std::fs::{self, OpenOptions};

/// Logs any serializable value (assessment, summary, tables) as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends one report row to the CSV at `path`.
pub fn append_record(path: &str, report: &AqiReport) -> Result<()> {
    append_records(path, std::slice::from_ref(report)).map(|_| ())
}

/// Appends a batch of report rows to the CSV at `path` through a single
/// writer and returns how many were written.
///
/// The header row is written only when the file is missing or empty, so
/// repeated runs against the same file keep one header.
pub fn append_records<'a, I>(path: &str, reports: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a AqiReport>,
{
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("failed to open report file '{path}'"))?;
    let mut writer = WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);

    let mut written = 0;
    for report in reports {
        writer.serialize(report)?;
        written += 1;
    }
    writer.flush()?;

    debug!(path, written, needs_header, "Reports appended");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::Standard;
    use crate::parser::StationReadings;
    use std::collections::BTreeMap;
    use std::env;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn station(name: &str, values: &[(&str, f64)]) -> StationReadings {
        StationReadings {
            station: name.to_string(),
            concentrations: values
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn read_rows(path: &str) -> Vec<BTreeMap<String, String>> {
        csv::Reader::from_path(path)
            .unwrap()
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_report_columns_round_trip_through_csv() {
        let path = temp_path("aqi_rater_test_columns.csv");
        let _ = fs::remove_file(&path);

        let downtown = station(
            "Downtown",
            &[("co_8h", 8.4), ("o3_8h", 0.08742), ("pm25_24h", 40.9)],
        );
        let report = AqiReport::from_readings(&Standard::epa(), &downtown);
        append_record(&path, &report).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["station"], "Downtown");
        assert_eq!(rows[0]["aqi"], "129");
        assert_eq!(rows[0]["category"], "ORANGE");
        assert_eq!(rows[0]["responsible"], "o3_8h");
        assert_eq!(rows[0]["non_attainment"], "o3_8h;pm25_24h");
        assert_eq!(rows[0]["sub_indices"], "co_8h=90;o3_8h=129;pm25_24h=102");
        assert_eq!(rows[0]["error_type"], "");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_second_run_appends_without_header() {
        let path = temp_path("aqi_rater_test_append.csv");
        let _ = fs::remove_file(&path);
        let mep = Standard::mep();

        let first = [
            AqiReport::from_readings(&mep, &station("Haidian", &[("pm25_24h", 64.0)])),
            AqiReport::from_readings(&mep, &station("Miyun", &[("pm10_24h", 29.0)])),
        ];
        assert_eq!(append_records(&path, &first).unwrap(), 2);

        let failed = AqiReport::from_error("parse_error", "bad cell").with_station("late.csv");
        append_record(&path, &failed).unwrap();

        let rows = read_rows(&path);
        let stations: Vec<_> = rows.iter().map(|r| r["station"].as_str()).collect();
        assert_eq!(stations, ["Haidian", "Miyun", "late.csv"]);
        assert_eq!(rows[0]["aqi"], "87");
        assert_eq!(rows[1]["responsible"], "");
        assert_eq!(rows[2]["aqi"], "");
        assert_eq!(rows[2]["error_type"], "parse_error");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_empty_existing_file_gets_header() {
        let path = temp_path("aqi_rater_test_empty.csv");
        fs::write(&path, "").unwrap();

        let report = AqiReport::from_readings(&Standard::epa(), &station("Park", &[]));
        append_record(&path, &report).unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["aqi"], "-911");
        assert_eq!(rows[0]["pollutants"], "0");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_print_json_assessment() {
        let assessment = Standard::mep().assess([("pm25_24h", 64.0)]);
        print_json(&assessment).unwrap();
    }
}
