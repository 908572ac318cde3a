//! The generic AQI standard: breakpoint tables plus the rules that differ
//! between national schemes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::index::types::{NON_ATTAINMENT_THRESHOLD, PollutantTable, Segment, TableError};
use crate::index::utility::round_half_away_from_zero;
use crate::standards;

/// The built-in schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandardKind {
    /// US EPA.
    Epa,
    /// China MEP.
    Mep,
}

impl fmt::Display for StandardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardKind::Epa => f.write_str("epa"),
            StandardKind::Mep => f.write_str("mep"),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown standard '{0}', expected 'epa' or 'mep'")]
pub struct UnknownStandard(String);

impl FromStr for StandardKind {
    type Err = UnknownStandard;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "epa" | "us" => Ok(StandardKind::Epa),
            "mep" | "cn" | "china" => Ok(StandardKind::Mep),
            _ => Err(UnknownStandard(s.to_string())),
        }
    }
}

/// Which concentrations skip the table lookup and rate as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroRule {
    NonPositive,
    ExactZero,
}

impl ZeroRule {
    pub fn short_circuits(self, concentration: f64) -> bool {
        match self {
            ZeroRule::NonPositive => concentration <= 0.0,
            ZeroRule::ExactZero => concentration == 0.0,
        }
    }
}

/// How an interpolated value becomes an integer sub-index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Nearest integer, ties away from zero.
    Nearest,
    /// Round to tenths, then any non-zero tenth bumps to the next integer.
    CeilingTenths,
}

impl Rounding {
    pub fn apply(self, value: f64) -> i32 {
        match self {
            Rounding::Nearest => round_half_away_from_zero(value, 0) as i32,
            Rounding::CeilingTenths => {
                let tenths = round_half_away_from_zero(value * 10.0, 0) as i64;
                (tenths + 9).div_euclid(10) as i32
            }
        }
    }
}

/// Immutable tables and rules for one AQI scheme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standard {
    pub(crate) name: String,
    pub(crate) scale: Vec<Segment>,
    pub(crate) pollutants: BTreeMap<String, PollutantTable>,
    pub(crate) zero_rule: ZeroRule,
    pub(crate) rounding: Rounding,
    pub(crate) primary_threshold: Option<i32>,
    pub(crate) non_attainment_threshold: i32,
    pub(crate) empty_overall: i32,
}

static EPA: OnceLock<Standard> = OnceLock::new();
static MEP: OnceLock<Standard> = OnceLock::new();

impl Standard {
    pub fn builder(name: impl Into<String>) -> StandardBuilder {
        StandardBuilder::new(name)
    }

    /// Freshly built EPA tables.
    pub fn epa() -> Standard {
        standards::epa::standard()
    }

    /// Freshly built MEP tables.
    pub fn mep() -> Standard {
        standards::mep::standard()
    }

    /// Shared built-in tables, constructed on first use.
    pub fn builtin(kind: StandardKind) -> &'static Standard {
        match kind {
            StandardKind::Epa => EPA.get_or_init(Standard::epa),
            StandardKind::Mep => MEP.get_or_init(Standard::mep),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scale(&self) -> &[Segment] {
        &self.scale
    }

    /// Table for `pollutant`, if it is registered with a positive maximum.
    pub fn table(&self, pollutant: &str) -> Option<&PollutantTable> {
        self.pollutants.get(pollutant).filter(|t| t.max > 0.0)
    }

    pub fn is_computable(&self, pollutant: &str) -> bool {
        self.table(pollutant).is_some()
    }

    /// Registered pollutant ids in sorted order.
    pub fn pollutant_ids(&self) -> impl Iterator<Item = &str> {
        self.pollutants.keys().map(String::as_str)
    }

    /// Pollutant id to table maximum.
    pub fn computable_maxima(&self) -> BTreeMap<&str, f64> {
        self.pollutants
            .iter()
            .map(|(id, t)| (id.as_str(), t.max))
            .collect()
    }

    /// Pollutant id to truncation digits, for pollutants that truncate.
    pub fn truncation_rules(&self) -> BTreeMap<&str, usize> {
        self.pollutants
            .iter()
            .filter_map(|(id, t)| t.truncate_digits.map(|d| (id.as_str(), d)))
            .collect()
    }

    pub fn empty_overall(&self) -> i32 {
        self.empty_overall
    }
}

/// Assembles and validates a [`Standard`].
#[derive(Debug, Clone)]
pub struct StandardBuilder {
    name: String,
    scale: Vec<Segment>,
    segments: BTreeMap<String, Vec<Segment>>,
    truncation: BTreeMap<String, usize>,
    hard_caps: BTreeSet<String>,
    zero_rule: ZeroRule,
    rounding: Rounding,
    primary_threshold: Option<i32>,
    non_attainment_threshold: i32,
    empty_overall: i32,
}

impl StandardBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: Vec::new(),
            segments: BTreeMap::new(),
            truncation: BTreeMap::new(),
            hard_caps: BTreeSet::new(),
            zero_rule: ZeroRule::NonPositive,
            rounding: Rounding::Nearest,
            primary_threshold: None,
            non_attainment_threshold: NON_ATTAINMENT_THRESHOLD,
            empty_overall: -1,
        }
    }

    pub fn scale(mut self, segments: &[(f64, f64)]) -> Self {
        self.scale = segments.iter().copied().map(Segment::from).collect();
        self
    }

    pub fn pollutant(mut self, id: &str, segments: &[(f64, f64)]) -> Self {
        self.segments.insert(
            id.to_string(),
            segments.iter().copied().map(Segment::from).collect(),
        );
        self
    }

    pub fn truncate(mut self, id: &str, digits: usize) -> Self {
        self.truncation.insert(id.to_string(), digits);
        self
    }

    pub fn hard_cap(mut self, id: &str) -> Self {
        self.hard_caps.insert(id.to_string());
        self
    }

    pub fn zero_rule(mut self, rule: ZeroRule) -> Self {
        self.zero_rule = rule;
        self
    }

    pub fn rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn primary_threshold(mut self, threshold: Option<i32>) -> Self {
        self.primary_threshold = threshold;
        self
    }

    pub fn non_attainment_threshold(mut self, threshold: i32) -> Self {
        self.non_attainment_threshold = threshold;
        self
    }

    pub fn empty_overall(mut self, sentinel: i32) -> Self {
        self.empty_overall = sentinel;
        self
    }

    pub fn build(self) -> Result<Standard, TableError> {
        if self.scale.is_empty() {
            return Err(TableError::EmptyScale);
        }
        for id in self.truncation.keys().chain(self.hard_caps.iter()) {
            if !self.segments.contains_key(id) {
                return Err(TableError::Unregistered(id.clone()));
            }
        }

        let mut pollutants = BTreeMap::new();
        for (id, segments) in self.segments {
            let Some(last) = segments.last() else {
                return Err(TableError::EmptySegments(id));
            };
            if segments.len() > self.scale.len() {
                return Err(TableError::TooManySegments {
                    pollutant: id,
                    segments: segments.len(),
                    scale: self.scale.len(),
                });
            }
            let mut previous_low = f64::NEG_INFINITY;
            for (position, segment) in segments.iter().enumerate() {
                if segment.low > segment.high || segment.low < previous_low {
                    return Err(TableError::Unordered {
                        pollutant: id,
                        position,
                    });
                }
                previous_low = segment.low;
            }

            let table = PollutantTable {
                max: last.high,
                truncate_digits: self.truncation.get(&id).copied(),
                hard_capped: self.hard_caps.contains(&id),
                segments,
            };
            pollutants.insert(id, table);
        }

        Ok(Standard {
            name: self.name,
            scale: self.scale,
            pollutants,
            zero_rule: self.zero_rule,
            rounding: self.rounding,
            primary_threshold: self.primary_threshold,
            non_attainment_threshold: self.non_attainment_threshold,
            empty_overall: self.empty_overall,
        })
    }
}

/// On-disk description of a custom standard.
///
/// ```json
/// {
///   "name": "local",
///   "scale": [[0, 50], [51, 100]],
///   "pollutants": {
///     "pm25_24h": { "segments": [[0, 35], [36, 75]], "truncate": 1, "hard_capped": false }
///   },
///   "zero_rule": "exact_zero",
///   "rounding": "ceiling_tenths",
///   "primary_threshold": 50
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StandardDefinition {
    pub name: String,
    pub scale: Vec<(f64, f64)>,
    pub pollutants: BTreeMap<String, PollutantDefinition>,
    #[serde(default = "default_zero_rule")]
    pub zero_rule: ZeroRule,
    #[serde(default = "default_rounding")]
    pub rounding: Rounding,
    #[serde(default)]
    pub primary_threshold: Option<i32>,
    #[serde(default = "default_non_attainment")]
    pub non_attainment_threshold: i32,
    #[serde(default = "default_empty_overall")]
    pub empty_overall: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollutantDefinition {
    pub segments: Vec<(f64, f64)>,
    #[serde(default)]
    pub truncate: Option<usize>,
    #[serde(default)]
    pub hard_capped: bool,
}

fn default_zero_rule() -> ZeroRule {
    ZeroRule::NonPositive
}

fn default_rounding() -> Rounding {
    Rounding::Nearest
}

fn default_non_attainment() -> i32 {
    NON_ATTAINMENT_THRESHOLD
}

fn default_empty_overall() -> i32 {
    -1
}

impl StandardDefinition {
    /// Loads a definition from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read standard definition '{path}'"))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn build(&self) -> Result<Standard> {
        let mut builder = Standard::builder(&self.name)
            .scale(&self.scale)
            .zero_rule(self.zero_rule)
            .rounding(self.rounding)
            .primary_threshold(self.primary_threshold)
            .non_attainment_threshold(self.non_attainment_threshold)
            .empty_overall(self.empty_overall);
        for (id, p) in &self.pollutants {
            builder = builder.pollutant(id, &p.segments);
            if let Some(digits) = p.truncate {
                builder = builder.truncate(id, digits);
            }
            if p.hard_capped {
                builder = builder.hard_cap(id);
            }
        }
        builder
            .build()
            .with_context(|| format!("invalid tables for standard '{}'", self.name))
    }
}
