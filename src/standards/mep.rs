//! China MEP (HJ 633-2012) breakpoints.
//!
//! No truncation is applied, so values falling between integer-bounded
//! segments (e.g. `pm25_24h` 35.5) have no interpolable segment. Only an
//! exact zero short-circuits. `so2_1h` and `o3_8h` are hard-capped.

use serde::{Deserialize, Serialize};

use crate::index::{
    PRIMARY_POLLUTANT_THRESHOLD, Rounding, Standard, StandardKind, SubIndexError, ZeroRule,
};
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

static TABLES: &[(&str, &[(f64, f64)])] = &[
    (
        "so2_24h",
        &[
            (0.0, 50.0),
            (51.0, 150.0),
            (151.0, 475.0),
            (476.0, 800.0),
            (801.0, 1600.0),
            (1601.0, 2100.0),
            (2101.0, 2620.0),
        ],
    ),
    // Above 800 the 24-hour average must be used instead.
    (
        "so2_1h",
        &[
            (0.0, 50.0),
            (51.0, 150.0),
            (151.0, 500.0),
            (501.0, 650.0),
            (651.0, 800.0),
        ],
    ),
    (
        "no2_24h",
        &[
            (0.0, 40.0),
            (41.0, 80.0),
            (81.0, 180.0),
            (181.0, 280.0),
            (281.0, 565.0),
            (566.0, 750.0),
            (751.0, 940.0),
        ],
    ),
    (
        "no2_1h",
        &[
            (0.0, 100.0),
            (101.0, 200.0),
            (201.0, 700.0),
            (701.0, 1200.0),
            (1201.0, 2340.0),
            (2341.0, 3090.0),
            (3091.0, 3840.0),
        ],
    ),
    (
        "co_24h",
        &[
            (0.0, 2.0),
            (3.0, 4.0),
            (5.0, 14.0),
            (15.0, 24.0),
            (25.0, 36.0),
            (37.0, 48.0),
            (49.0, 60.0),
        ],
    ),
    (
        "co_1h",
        &[
            (0.0, 5.0),
            (6.0, 10.0),
            (11.0, 35.0),
            (36.0, 60.0),
            (61.0, 90.0),
            (91.0, 120.0),
            (121.0, 150.0),
        ],
    ),
    (
        "o3_1h",
        &[
            (0.0, 160.0),
            (161.0, 200.0),
            (201.0, 300.0),
            (301.0, 400.0),
            (401.0, 800.0),
            (801.0, 1000.0),
            (1001.0, 1200.0),
        ],
    ),
    // Above 800 the 1-hour average must be used instead.
    (
        "o3_8h",
        &[
            (0.0, 100.0),
            (101.0, 160.0),
            (161.0, 215.0),
            (216.0, 265.0),
            (266.0, 800.0),
        ],
    ),
    (
        "pm10_24h",
        &[
            (0.0, 50.0),
            (51.0, 150.0),
            (151.0, 250.0),
            (251.0, 350.0),
            (351.0, 420.0),
            (421.0, 500.0),
            (501.0, 600.0),
        ],
    ),
    (
        "pm25_24h",
        &[
            (0.0, 35.0),
            (36.0, 75.0),
            (76.0, 115.0),
            (116.0, 150.0),
            (151.0, 250.0),
            (251.0, 350.0),
            (351.0, 500.0),
        ],
    ),
];

/// Builds the MEP tables.
pub fn standard() -> Standard {
    let mut builder = Standard::builder(StandardKind::Mep.to_string()).scale(&SCALE);
    for (id, segments) in TABLES {
        builder = builder.pollutant(id, segments);
    }
    builder
        .hard_cap("so2_1h")
        .hard_cap("o3_8h")
        .zero_rule(ZeroRule::ExactZero)
        .rounding(Rounding::CeilingTenths)
        .primary_threshold(Some(PRIMARY_POLLUTANT_THRESHOLD))
        .empty_overall(-1)
        .build()
        .expect("built-in MEP tables are valid")
}

/// MEP readings. CO in mg/m³, everything else in µg/m³.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MepReadings {
    pub so2_24h: Option<f64>,
    pub so2_1h: Option<f64>,
    pub no2_24h: Option<f64>,
    pub no2_1h: Option<f64>,
    pub co_24h: Option<f64>,
    pub co_1h: Option<f64>,
    pub o3_1h: Option<f64>,
    pub o3_8h: Option<f64>,
    pub pm10_24h: Option<f64>,
    pub pm25_24h: Option<f64>,
}

static FIELDS: [Field<MepReadings>; 10] = [
    ("so2_24h", |r| r.so2_24h),
    ("so2_1h", |r| r.so2_1h),
    ("no2_24h", |r| r.no2_24h),
    ("no2_1h", |r| r.no2_1h),
    ("co_24h", |r| r.co_24h),
    ("co_1h", |r| r.co_1h),
    ("o3_1h", |r| r.o3_1h),
    ("o3_8h", |r| r.o3_8h),
    ("pm10_24h", |r| r.pm10_24h),
    ("pm25_24h", |r| r.pm25_24h),
];

impl PollutantReadings for MepReadings {
    fn standard() -> &'static Standard {
        Standard::builtin(StandardKind::Mep)
    }

    fn fields() -> &'static [Field<Self>] {
        &FIELDS
    }
}

pub fn sub_index(pollutant: &str, concentration: f64) -> Result<i32, SubIndexError> {
    Standard::builtin(StandardKind::Mep).sub_index(pollutant, concentration)
}

pub fn pm25_sub_index(concentration: f64) -> Result<i32, SubIndexError> {
    sub_index("pm25_24h", concentration)
}

pub fn pm10_sub_index(concentration: f64) -> Result<i32, SubIndexError> {
    sub_index("pm10_24h", concentration)
}
