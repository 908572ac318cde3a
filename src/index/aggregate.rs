use crate::index::standard::Standard;
use crate::index::types::Assessment;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

impl Standard {
    /// Rates every pollutant this standard knows about.
    ///
    /// Pollutants without a table are skipped. Calculator errors never abort
    /// the batch: the error's sentinel is recorded in place of a value.
    pub fn all_sub_indices<'a, I>(&self, concentrations: I) -> BTreeMap<&'a str, i32>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        concentrations
            .into_iter()
            .filter(|(pollutant, _)| self.is_computable(pollutant))
            .map(|(pollutant, concentration)| {
                let value = match self.sub_index(pollutant, concentration) {
                    Ok(v) => v,
                    Err(e) => {
                        debug!(standard = %self.name, error = %e, "Sub-index error suppressed");
                        e.sentinel()
                    }
                };
                (pollutant, value)
            })
            .collect()
    }

    /// Highest sub-index, or this standard's empty sentinel when nothing was rated.
    pub fn overall_index<'a, I>(&self, concentrations: I) -> i32
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        self.overall_of(&self.all_sub_indices(concentrations))
    }

    /// Pollutants whose sub-index equals the overall index.
    pub fn responsible_pollutants<'a, I>(&self, concentrations: I) -> BTreeSet<&'a str>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        self.responsible_of(&self.all_sub_indices(concentrations))
    }

    /// Pollutants above the non-attainment threshold.
    pub fn non_attainment_pollutants<'a, I>(&self, concentrations: I) -> BTreeSet<&'a str>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        self.non_attainment_of(&self.all_sub_indices(concentrations))
    }

    /// Rates once and derives every aggregate from the same sub-indices.
    pub fn assess<'a, I>(&self, concentrations: I) -> Assessment<'a>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let sub_indices = self.all_sub_indices(concentrations);
        Assessment {
            overall: self.overall_of(&sub_indices),
            responsible: self.responsible_of(&sub_indices),
            non_attainment: self.non_attainment_of(&sub_indices),
            sub_indices,
        }
    }

    pub fn overall_of(&self, sub_indices: &BTreeMap<&str, i32>) -> i32 {
        sub_indices
            .values()
            .copied()
            .max()
            .unwrap_or(self.empty_overall)
    }

    pub fn responsible_of<'a>(&self, sub_indices: &BTreeMap<&'a str, i32>) -> BTreeSet<&'a str> {
        let Some(max) = sub_indices.values().copied().max() else {
            return BTreeSet::new();
        };
        // Only error sentinels are negative.
        if max < 0 {
            return BTreeSet::new();
        }
        if self.primary_threshold.is_some_and(|threshold| max <= threshold) {
            return BTreeSet::new();
        }
        sub_indices
            .iter()
            .filter(|&(_, &v)| v == max)
            .map(|(&pollutant, _)| pollutant)
            .collect()
    }

    pub fn non_attainment_of<'a>(&self, sub_indices: &BTreeMap<&'a str, i32>) -> BTreeSet<&'a str> {
        sub_indices
            .iter()
            .filter(|&(_, &v)| v > self.non_attainment_threshold)
            .map(|(&pollutant, _)| pollutant)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy(primary_threshold: Option<i32>) -> Standard {
        Standard::builder("toy")
            .scale(&[(0.0, 50.0), (51.0, 100.0), (101.0, 150.0)])
            .pollutant("a", &[(0.0, 10.0), (11.0, 20.0), (21.0, 30.0)])
            .pollutant("b", &[(0.0, 10.0), (11.0, 20.0), (21.0, 30.0)])
            .pollutant("capped", &[(0.0, 10.0)])
            .hard_cap("capped")
            .primary_threshold(primary_threshold)
            .empty_overall(-911)
            .build()
            .unwrap()
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let s = toy(None);
        let all = s.all_sub_indices([("a", 5.0), ("zzz", 5.0)]);
        assert_eq!(all.len(), 1);
        assert_eq!(all["a"], 25);
    }

    #[test]
    fn test_errors_are_recorded_as_sentinels() {
        let s = toy(None);
        let all = s.all_sub_indices([("capped", 99.0), ("a", 10.5)]);
        assert_eq!(all["capped"], -2);
        assert_eq!(all["a"], -3);
        assert!(s.responsible_of(&all).is_empty());
    }

    #[test]
    fn test_empty_readings_use_sentinel() {
        let s = toy(None);
        assert_eq!(s.overall_index(Vec::<(&str, f64)>::new()), -911);
        assert!(s.responsible_pollutants(Vec::<(&str, f64)>::new()).is_empty());
    }

    #[test]
    fn test_ties_are_all_responsible() {
        let s = toy(None);
        let responsible = s.responsible_pollutants([("a", 5.0), ("b", 5.0), ("capped", 1.0)]);
        assert_eq!(responsible, BTreeSet::from(["a", "b"]));
    }

    #[test]
    fn test_primary_threshold_gates_responsible() {
        let gated = toy(Some(50));
        assert!(gated.responsible_pollutants([("a", 10.0)]).is_empty());
        assert_eq!(
            gated.responsible_pollutants([("a", 11.0)]),
            BTreeSet::from(["a"])
        );
        let open = toy(None);
        assert_eq!(open.responsible_pollutants([("a", 10.0)]), BTreeSet::from(["a"]));
    }

    #[test]
    fn test_non_attainment_is_strictly_above_threshold() {
        let s = toy(None);
        // 20.0 rates exactly 100.
        let result = s.non_attainment_pollutants([("a", 20.0), ("b", 21.0), ("capped", 5.0)]);
        assert_eq!(result, BTreeSet::from(["b"]));
    }

    #[test]
    fn test_assess_is_consistent() {
        let s = toy(None);
        let assessment = s.assess([("a", 25.0), ("b", 5.0)]);
        assert_eq!(assessment.overall, assessment.sub_indices["a"]);
        assert_eq!(assessment.responsible, BTreeSet::from(["a"]));
        assert_eq!(assessment.non_attainment, BTreeSet::from(["a"]));
    }
}
