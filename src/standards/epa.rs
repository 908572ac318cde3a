//! US EPA breakpoints.
//!
//! Concentrations are truncated to each pollutant's reporting precision
//! before lookup, non-positive values rate 0, and only `o3_8h` treats an
//! overflow as an error.

use serde::{Deserialize, Serialize};

use crate::index::{Rounding, Standard, StandardKind, SubIndexError, ZeroRule};
use crate::standards::readings::{Field, PollutantReadings};

const SCALE: [(f64, f64); 7] = [
    (0.0, 50.0),
    (51.0, 100.0),
    (101.0, 150.0),
    (151.0, 200.0),
    (201.0, 300.0),
    (301.0, 400.0),
    (401.0, 500.0),
];

/// `(pollutant, truncation digits, segments)`.
static TABLES: &[(&str, usize, &[(f64, f64)])] = &[
    (
        "o3_8h",
        3,
        &[
            (0.000, 0.059),
            (0.060, 0.075),
            (0.076, 0.095),
            (0.096, 0.115),
            (0.116, 0.374),
        ],
    ),
    // The first two 1-hour ozone brackets are undefined; 8-hour values cover them.
    (
        "o3_1h",
        3,
        &[
            (0.0, 0.0),
            (0.0, 0.0),
            (0.125, 0.164),
            (0.165, 0.204),
            (0.205, 0.404),
            (0.405, 0.504),
            (0.505, 0.604),
        ],
    ),
    (
        "pm10_24h",
        0,
        &[
            (0.0, 54.0),
            (55.0, 154.0),
            (155.0, 254.0),
            (255.0, 354.0),
            (355.0, 424.0),
            (425.0, 504.0),
            (505.0, 604.0),
        ],
    ),
    (
        "pm25_24h",
        1,
        &[
            (0.0, 15.4),
            (15.5, 40.4),
            (40.5, 65.4),
            (65.5, 150.4),
            (150.5, 250.4),
            (250.5, 350.4),
            (350.4, 500.4),
        ],
    ),
    (
        "co_8h",
        1,
        &[
            (0.0, 4.4),
            (4.5, 9.4),
            (9.5, 12.4),
            (12.5, 15.4),
            (15.5, 30.4),
            (30.5, 40.4),
            (40.5, 50.4),
        ],
    ),
    (
        "so2_1h",
        0,
        &[
            (0.0, 35.0),
            (36.0, 75.0),
            (76.0, 185.0),
            (186.0, 304.0),
            (305.0, 604.0),
            (605.0, 804.0),
            (805.0, 1004.0),
        ],
    ),
    (
        "no2_1h",
        0,
        &[
            (0.0, 53.0),
            (54.0, 100.0),
            (101.0, 360.0),
            (361.0, 649.0),
            (650.0, 1249.0),
            (1250.0, 1649.0),
            (1650.0, 2049.0),
        ],
    ),
];

/// Builds the EPA tables.
pub fn standard() -> Standard {
    let mut builder = Standard::builder(StandardKind::Epa.to_string()).scale(&SCALE);
    for (id, digits, segments) in TABLES {
        builder = builder.pollutant(id, segments).truncate(id, *digits);
    }
    builder
        .hard_cap("o3_8h")
        .zero_rule(ZeroRule::NonPositive)
        .rounding(Rounding::Nearest)
        .primary_threshold(None)
        .empty_overall(-911)
        .build()
        .expect("built-in EPA tables are valid")
}

/// EPA readings. Units: ppb for SO2/NO2, ppm for CO/O3, µg/m³ for PM.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpaReadings {
    pub so2_1h: Option<f64>,
    pub no2_1h: Option<f64>,
    pub co_8h: Option<f64>,
    pub o3_1h: Option<f64>,
    pub o3_8h: Option<f64>,
    pub pm10_24h: Option<f64>,
    pub pm25_24h: Option<f64>,
}

static FIELDS: [Field<EpaReadings>; 7] = [
    ("so2_1h", |r| r.so2_1h),
    ("no2_1h", |r| r.no2_1h),
    ("co_8h", |r| r.co_8h),
    ("o3_1h", |r| r.o3_1h),
    ("o3_8h", |r| r.o3_8h),
    ("pm10_24h", |r| r.pm10_24h),
    ("pm25_24h", |r| r.pm25_24h),
];

impl PollutantReadings for EpaReadings {
    fn standard() -> &'static Standard {
        Standard::builtin(StandardKind::Epa)
    }

    fn fields() -> &'static [Field<Self>] {
        &FIELDS
    }
}

pub fn sub_index(pollutant: &str, concentration: f64) -> Result<i32, SubIndexError> {
    Standard::builtin(StandardKind::Epa).sub_index(pollutant, concentration)
}

pub fn pm25_sub_index(concentration: f64) -> Result<i32, SubIndexError> {
    sub_index("pm25_24h", concentration)
}

pub fn pm10_sub_index(concentration: f64) -> Result<i32, SubIndexError> {
    sub_index("pm10_24h", concentration)
}
