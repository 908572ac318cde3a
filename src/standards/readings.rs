use std::collections::{BTreeMap, BTreeSet};

use crate::index::{Assessment, Standard};

/// Reads one pollutant's concentration out of a typed readings struct.
pub type Accessor<R> = fn(&R) -> Option<f64>;

/// A `(pollutant id, accessor)` registration entry.
pub type Field<R> = (&'static str, Accessor<R>);

/// A typed set of readings bound to one built-in standard.
///
/// Implementors only declare their standard and their field registration
/// table; every aggregate comes from the defaults.
pub trait PollutantReadings: Sized + 'static {
    fn standard() -> &'static Standard;

    fn fields() -> &'static [Field<Self>];

    /// Present concentrations in registration order.
    fn concentrations(&self) -> Vec<(&'static str, f64)> {
        Self::fields()
            .iter()
            .filter_map(|(id, get)| get(self).map(|c| (*id, c)))
            .collect()
    }

    fn all_sub_indices(&self) -> BTreeMap<&'static str, i32> {
        Self::standard().all_sub_indices(self.concentrations())
    }

    fn aqi(&self) -> i32 {
        Self::standard().overall_index(self.concentrations())
    }

    fn responsible_pollutants(&self) -> BTreeSet<&'static str> {
        Self::standard().responsible_pollutants(self.concentrations())
    }

    fn non_attainment_pollutants(&self) -> BTreeSet<&'static str> {
        Self::standard().non_attainment_pollutants(self.concentrations())
    }

    fn assess(&self) -> Assessment<'static> {
        Self::standard().assess(self.concentrations())
    }
}
