//! Breakpoint interpolation of a single concentration.

use tracing::warn;

use crate::index::standard::Standard;
use crate::index::types::{OVERFLOW_SUB_INDEX, SubIndexError};
use crate::index::utility::truncate;

impl Standard {
    /// Converts one concentration into its sub-index.
    ///
    /// | Situation                                  | Result                  |
    /// |--------------------------------------------|-------------------------|
    /// | concentration hits the zero rule           | `Ok(0)`                 |
    /// | pollutant not registered                   | `UnknownPollutant` (-1) |
    /// | above maximum, hard-capped pollutant       | `OutOfRange` (-2)       |
    /// | above maximum, any other pollutant         | `Ok(911)`               |
    /// | no usable segment (gap or `low == high`)   | `DivisionByZero` (-3)   |
    ///
    /// # Errors
    ///
    /// See the table above. Use [`SubIndexError::sentinel`] to fold an error
    /// back into a number.
    pub fn sub_index(&self, pollutant: &str, concentration: f64) -> Result<i32, SubIndexError> {
        if self.zero_rule.short_circuits(concentration) {
            return Ok(0);
        }

        let table = self
            .table(pollutant)
            .ok_or_else(|| SubIndexError::UnknownPollutant(pollutant.to_string()))?;

        let concentration = match table.truncate_digits {
            Some(digits) => truncate(concentration, digits),
            None => concentration,
        };

        if concentration > table.max {
            if table.hard_capped {
                return Err(SubIndexError::OutOfRange {
                    pollutant: pollutant.to_string(),
                    concentration,
                    max: table.max,
                });
            }
            return Ok(OVERFLOW_SUB_INDEX);
        }

        let found = table
            .segments
            .iter()
            .zip(&self.scale)
            .find(|(bp, _)| bp.contains(concentration));

        let (bp, scale) = match found {
            Some((bp, scale)) if bp.span() != 0.0 => (bp, scale),
            _ => {
                warn!(
                    standard = %self.name,
                    pollutant,
                    concentration,
                    "No interpolable breakpoint segment, table is malformed"
                );
                return Err(SubIndexError::DivisionByZero {
                    pollutant: pollutant.to_string(),
                    concentration,
                });
            }
        };

        let value = scale.span() / bp.span() * (concentration - bp.low) + scale.low;
        Ok(self.rounding.apply(value))
    }

    /// [`Standard::sub_index`] with errors replaced by their sentinel.
    pub fn sub_index_or_sentinel(&self, pollutant: &str, concentration: f64) -> i32 {
        self.sub_index(pollutant, concentration)
            .unwrap_or_else(|e| e.sentinel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::standard::{Rounding, ZeroRule};

    fn toy() -> Standard {
        Standard::builder("toy")
            .scale(&[(0.0, 50.0), (51.0, 100.0), (101.0, 150.0)])
            .pollutant("a", &[(0.0, 10.0), (11.0, 20.0), (21.0, 30.0)])
            .pollutant("flat", &[(0.0, 10.0), (11.0, 11.0), (12.0, 30.0)])
            .pollutant("capped", &[(0.0, 10.0)])
            .hard_cap("capped")
            .zero_rule(ZeroRule::ExactZero)
            .rounding(Rounding::Nearest)
            .build()
            .unwrap()
    }

    #[test]
    fn test_interpolates_within_segment() {
        let s = toy();
        assert_eq!(s.sub_index("a", 5.0), Ok(25));
        assert_eq!(s.sub_index("a", 10.0), Ok(50));
        assert_eq!(s.sub_index("a", 11.0), Ok(51));
        assert_eq!(s.sub_index("a", 30.0), Ok(150));
    }

    #[test]
    fn test_overflow_and_hard_cap() {
        let s = toy();
        assert_eq!(s.sub_index("a", 30.5), Ok(OVERFLOW_SUB_INDEX));
        let err = s.sub_index("capped", 10.5).unwrap_err();
        assert_eq!(err.sentinel(), -2);
        assert_eq!(s.sub_index_or_sentinel("capped", 10.5), -2);
    }

    #[test]
    fn test_degenerate_segment_is_division_by_zero() {
        let s = toy();
        let err = s.sub_index("flat", 11.0).unwrap_err();
        assert!(matches!(err, SubIndexError::DivisionByZero { .. }));
        assert_eq!(err.sentinel(), -3);
    }

    #[test]
    fn test_gap_between_segments_is_division_by_zero() {
        let s = toy();
        assert_eq!(s.sub_index_or_sentinel("a", 10.5), -3);
    }

    #[test]
    fn test_exact_zero_rule_lets_negatives_through() {
        let s = toy();
        assert_eq!(s.sub_index("nope", 0.0), Ok(0));
        assert_eq!(s.sub_index_or_sentinel("nope", -1.0), -1);
        assert_eq!(s.sub_index_or_sentinel("a", -1.0), -3);
    }
}
