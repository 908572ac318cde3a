//! Data types shared by the calculator and the aggregator.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Sub-index reported when a concentration is above the table maximum of a
/// pollutant that saturates instead of failing.
pub const OVERFLOW_SUB_INDEX: i32 = 911;

/// A sub-index strictly above this marks a non-attainment pollutant.
pub const NON_ATTAINMENT_THRESHOLD: i32 = 100;

/// MEP only reports responsible pollutants when the overall index is above this.
pub const PRIMARY_POLLUTANT_THRESHOLD: i32 = 50;

/// An inclusive `[low, high]` range, used both for concentrations and for
/// index values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub low: f64,
    pub high: f64,
}

impl Segment {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }
}

impl From<(f64, f64)> for Segment {
    fn from((low, high): (f64, f64)) -> Self {
        Self { low, high }
    }
}

/// Breakpoints and lookup rules for a single pollutant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantTable {
    pub segments: Vec<Segment>,
    /// High bound of the last segment.
    pub max: f64,
    /// Decimal digits kept before lookup. `None` skips truncation.
    pub truncate_digits: Option<usize>,
    /// Overflow is an error rather than [`OVERFLOW_SUB_INDEX`].
    pub hard_capped: bool,
}

/// Why a sub-index could not be interpolated.
///
/// Every variant pairs with a fixed sentinel so callers that do not care
/// about the cause can still record a number.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubIndexError {
    #[error("invalid pollutant metric '{0}'")]
    UnknownPollutant(String),
    #[error("concentration {concentration} of {pollutant} is above the table maximum {max}")]
    OutOfRange {
        pollutant: String,
        concentration: f64,
        max: f64,
    },
    #[error("no interpolable breakpoint segment for {pollutant} at {concentration}")]
    DivisionByZero { pollutant: String, concentration: f64 },
}

impl SubIndexError {
    pub fn sentinel(&self) -> i32 {
        match self {
            SubIndexError::UnknownPollutant(_) => -1,
            SubIndexError::OutOfRange { .. } => -2,
            SubIndexError::DivisionByZero { .. } => -3,
        }
    }

    /// Short machine-readable name, used for report records.
    pub fn kind(&self) -> &'static str {
        match self {
            SubIndexError::UnknownPollutant(_) => "unknown_pollutant",
            SubIndexError::OutOfRange { .. } => "out_of_range",
            SubIndexError::DivisionByZero { .. } => "division_by_zero",
        }
    }
}

/// Rejected table definitions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("index scale has no segments")]
    EmptyScale,
    #[error("pollutant '{0}' has no breakpoint segments")]
    EmptySegments(String),
    #[error("pollutant '{pollutant}' has {segments} segments but the scale only has {scale}")]
    TooManySegments {
        pollutant: String,
        segments: usize,
        scale: usize,
    },
    #[error("segment {position} of '{pollutant}' is inverted or out of order")]
    Unordered { pollutant: String, position: usize },
    #[error("rule references unregistered pollutant '{0}'")]
    Unregistered(String),
}

/// Everything the aggregator derives from one set of readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment<'a> {
    pub sub_indices: BTreeMap<&'a str, i32>,
    pub overall: i32,
    pub responsible: BTreeSet<&'a str>,
    pub non_attainment: BTreeSet<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_bounds_are_inclusive() {
        let s = Segment::new(15.5, 40.4);
        assert!(s.contains(15.5));
        assert!(s.contains(40.4));
        assert!(!s.contains(15.4));
        assert!(!s.contains(40.5));
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(SubIndexError::UnknownPollutant("foo".into()).sentinel(), -1);
        let out = SubIndexError::OutOfRange {
            pollutant: "o3_8h".into(),
            concentration: 1.0,
            max: 0.374,
        };
        assert_eq!(out.sentinel(), -2);
        let div = SubIndexError::DivisionByZero {
            pollutant: "o3_1h".into(),
            concentration: 0.1,
        };
        assert_eq!(div.sentinel(), -3);
    }
}
