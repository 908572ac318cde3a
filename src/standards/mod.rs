//! Built-in national standards and their typed readings.
//!
//! Each standard registers its pollutants explicitly: a breakpoint table per
//! pollutant id, and a `(pollutant id, accessor)` table for its readings
//! struct.

pub mod epa;
pub mod mep;
pub mod readings;

pub use epa::EpaReadings;
pub use mep::MepReadings;
pub use readings::{Accessor, Field, PollutantReadings};

use crate::index::{Standard, StandardKind};

/// Shared EPA tables.
pub fn epa() -> &'static Standard {
    Standard::builtin(StandardKind::Epa)
}

/// Shared MEP tables.
pub fn mep() -> &'static Standard {
    Standard::builtin(StandardKind::Mep)
}
