/// Formats `value` with `digits` decimals and parses it back.
///
/// The formatter rounds at the cutoff digit, so this is decimal rounding
/// rather than a floor. `digits` may be 0.
pub fn truncate(value: f64, digits: usize) -> f64 {
    format!("{:.*}", digits, value).parse().unwrap_or(value)
}

/// Rounds to `precision` decimals, moving ties away from zero.
pub fn round_half_away_from_zero(value: f64, precision: i32) -> f64 {
    let pow = 10f64.powi(precision);
    let scaled = value * pow;
    let nudged = if scaled < 0.0 {
        scaled - 0.5
    } else {
        scaled + 0.5
    };
    nudged.trunc() / pow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_thirds() {
        let f = 10.0 / 3.0;
        let expected = [3.0, 3.3, 3.33, 3.333, 3.3333];
        for (digits, want) in expected.iter().enumerate() {
            assert_eq!(truncate(f, digits), *want);
        }
    }

    #[test]
    fn test_truncate_rounds_at_cutoff() {
        assert_eq!(truncate(54.6, 0), 55.0);
        assert_eq!(truncate(0.08742, 3), 0.087);
        assert_eq!(truncate(40.96, 1), 41.0);
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_half_away_from_zero(2.5, 0), 3.0);
        assert_eq!(round_half_away_from_zero(-2.5, 0), -3.0);
        assert_eq!(round_half_away_from_zero(2.49, 0), 2.0);
        assert_eq!(round_half_away_from_zero(86.179, 1), 86.2);
        assert_eq!(round_half_away_from_zero(-1.25, 1), -1.3);
    }
}
