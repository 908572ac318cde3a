use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::index::{Assessment, Standard, category};
use crate::parser::StationReadings;

/// One flat, CSV-friendly AQI record per station reading.
#[derive(Debug, Default, Serialize)]
pub struct AqiReport {
    pub timestamp: DateTime<Utc>,
    pub station: Option<String>,
    pub standard: Option<String>,

    // rated pollutants, unknown ids excluded
    pub pollutants: usize,
    pub aqi: Option<i32>,
    pub category: Option<String>,
    pub color: Option<String>,

    // `;`-joined pollutant ids, and `id=value` pairs
    pub responsible: String,
    pub non_attainment: String,
    pub sub_indices: String,

    // error tracking
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl AqiReport {
    pub fn from_readings(standard: &Standard, readings: &StationReadings) -> Self {
        let assessment = standard.assess(readings.pairs());
        Self::from_assessment(standard, &readings.station, &assessment)
    }

    /// Flattens an already computed assessment for `station`.
    pub fn from_assessment(standard: &Standard, station: &str, assessment: &Assessment) -> Self {
        let bracket = category(assessment.overall);

        AqiReport {
            timestamp: Utc::now(),
            station: Some(station.to_string()),
            standard: Some(standard.name().to_string()),
            pollutants: assessment.sub_indices.len(),
            aqi: Some(assessment.overall),
            category: bracket.map(|c| c.name.to_string()),
            color: bracket.map(|c| c.color.rgb_hex()),
            responsible: join(assessment.responsible.iter()),
            non_attainment: join(assessment.non_attainment.iter()),
            sub_indices: join(
                assessment
                    .sub_indices
                    .iter()
                    .map(|(pollutant, value)| format!("{pollutant}={value}")),
            ),
            error_type: None,
            error_message: None,
        }
    }

    /// Create an error record with timestamp and error information
    pub fn from_error(error_type: &str, error_message: &str) -> Self {
        AqiReport {
            timestamp: Utc::now(),
            error_type: Some(error_type.to_string()),
            error_message: Some(error_message.to_string()),
            ..Default::default()
        }
    }

    pub fn with_station(mut self, station: &str) -> Self {
        self.station = Some(station.to_string());
        self
    }
}

fn join<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: ToString,
{
    items
        .into_iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn readings(station: &str, values: &[(&str, f64)]) -> StationReadings {
        StationReadings {
            station: station.to_string(),
            concentrations: values
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    #[test]
    fn test_from_readings_epa() {
        let r = readings(
            "Downtown",
            &[("co_8h", 8.4), ("o3_8h", 0.08742), ("pm25_24h", 40.9), ("dust", 3.0)],
        );
        let report = AqiReport::from_readings(&Standard::epa(), &r);

        assert_eq!(report.station.as_deref(), Some("Downtown"));
        assert_eq!(report.standard.as_deref(), Some("epa"));
        assert_eq!(report.pollutants, 3);
        assert_eq!(report.aqi, Some(129));
        assert_eq!(report.category.as_deref(), Some("ORANGE"));
        assert_eq!(report.color.as_deref(), Some("#FF7E00"));
        assert_eq!(report.responsible, "o3_8h");
        assert_eq!(report.non_attainment, "o3_8h;pm25_24h");
        assert_eq!(report.sub_indices, "co_8h=90;o3_8h=129;pm25_24h=102");
        assert!(report.error_type.is_none());
    }

    #[test]
    fn test_from_readings_empty() {
        let report = AqiReport::from_readings(&Standard::mep(), &readings("Idle", &[]));
        assert_eq!(report.pollutants, 0);
        assert_eq!(report.aqi, Some(-1));
        assert!(report.category.is_none());
        assert_eq!(report.responsible, "");
    }

    #[test]
    fn test_from_assessment_matches_from_readings() {
        let mep = Standard::mep();
        let r = readings("Chaoyang", &[("pm25_24h", 82.0), ("pm10_24h", 120.0)]);
        let assessment = mep.assess(r.pairs());

        let report = AqiReport::from_assessment(&mep, "Chaoyang", &assessment);
        let direct = AqiReport::from_readings(&mep, &r);

        assert_eq!(report.aqi, Some(assessment.overall));
        assert_eq!(report.aqi, direct.aqi);
        assert_eq!(report.sub_indices, direct.sub_indices);
        assert_eq!(report.non_attainment, "pm25_24h");
    }

    #[test]
    fn test_from_error() {
        let report = AqiReport::from_error("parse_error", "bad cell").with_station("X");
        assert_eq!(report.station.as_deref(), Some("X"));
        assert_eq!(report.error_type.as_deref(), Some("parse_error"));
        assert!(report.aqi.is_none());
    }
}
