//! Sub-index interpolation and AQI aggregation.
//!
//! A [`Standard`] holds one scheme's breakpoint tables. The calculator turns
//! a single concentration into a sub-index; the aggregator reduces a set of
//! sub-indices into the overall index and the responsible and non-attainment
//! pollutant sets.

pub mod aggregate;
pub mod calculator;
pub mod category;
pub mod standard;
pub mod types;
pub mod utility;

pub use category::{CATEGORIES, Color, IndexCategory, category};
pub use standard::{
    PollutantDefinition, Rounding, Standard, StandardBuilder, StandardDefinition, StandardKind,
    UnknownStandard, ZeroRule,
};
pub use types::{
    Assessment, NON_ATTAINMENT_THRESHOLD, OVERFLOW_SUB_INDEX, PRIMARY_POLLUTANT_THRESHOLD,
    PollutantTable, Segment, SubIndexError, TableError,
};
pub use utility::{round_half_away_from_zero, truncate};
