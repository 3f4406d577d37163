//! # Reinforcing Bar Catalog
//!
//! Physical properties of reinforcing bars keyed by bar size designator.
//! The catalog is loaded once per run and is read-only afterwards.
//!
//! ## JSON Format
//!
//! ```json
//! {
//!   "#3": { "unit_weight": 0.560, "lap_extension": 30.0 },
//!   "#4": { "unit_weight": 0.994, "lap_extension": 40.0 }
//! }
//! ```
//!
//! Legacy sheets use `單位重量` (unit weight, kg/m) and `樑板牆搭接長`
//! (lap length for beams, slabs and walls, cm); both are accepted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::{TakeoffError, TakeoffResult};
use crate::units::{Centimeters, KgPerM};

/// Bar size designator (e.g. `#4`).
///
/// Deserializes from either a string (`"#4"`) or a bare integer (`4`).
/// Purely numeric designators are normalized to the `#n` form so both
/// spellings address the same catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBarSize", into = "String")]
pub struct BarSize(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBarSize {
    Number(u32),
    Text(String),
}

impl TryFrom<RawBarSize> for BarSize {
    type Error = String;

    fn try_from(raw: RawBarSize) -> Result<Self, Self::Error> {
        match raw {
            RawBarSize::Number(n) => Ok(BarSize(format!("#{}", n))),
            RawBarSize::Text(s) => BarSize::parse(&s),
        }
    }
}

impl From<BarSize> for String {
    fn from(bar: BarSize) -> Self {
        bar.0
    }
}

impl BarSize {
    /// Parse and normalize a designator.
    ///
    /// ```rust
    /// use takeoff_core::materials::BarSize;
    ///
    /// assert_eq!(BarSize::parse("4").unwrap().as_str(), "#4");
    /// assert_eq!(BarSize::parse(" #5 ").unwrap().as_str(), "#5");
    /// assert_eq!(BarSize::parse("D13").unwrap().as_str(), "D13");
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("bar size designator is empty".to_string());
        }
        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            Ok(BarSize(format!("#{}", trimmed)))
        } else {
            Ok(BarSize(trimmed.to_string()))
        }
    }

    /// The normalized designator
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BarSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Physical properties of one bar size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RebarProperties {
    /// Mass per meter of bar (kg/m)
    #[serde(alias = "單位重量")]
    pub unit_weight: KgPerM,

    /// Extra length added at each splice or anchorage (cm)
    #[serde(alias = "樑板牆搭接長")]
    pub lap_extension: Centimeters,
}

impl RebarProperties {
    /// Create a property record
    pub fn new(unit_weight_kg_per_m: f64, lap_extension_cm: f64) -> Self {
        RebarProperties {
            unit_weight: KgPerM(unit_weight_kg_per_m),
            lap_extension: Centimeters(lap_extension_cm),
        }
    }
}

/// Catalog of bar sizes available to a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteelCatalog {
    bars: BTreeMap<BarSize, RebarProperties>,
}

impl SteelCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_bar(mut self, bar: BarSize, props: RebarProperties) -> Self {
        self.bars.insert(bar, props);
        self
    }

    /// Insert or replace a bar size
    pub fn insert(&mut self, bar: BarSize, props: RebarProperties) {
        self.bars.insert(bar, props);
    }

    pub fn get(&self, bar: &BarSize) -> Option<&RebarProperties> {
        self.bars.get(bar)
    }

    pub fn contains(&self, bar: &BarSize) -> bool {
        self.bars.contains_key(bar)
    }

    /// Look up a bar size, naming the referencing element on failure.
    pub fn lookup(&self, bar: &BarSize, referenced_by: &str) -> TakeoffResult<&RebarProperties> {
        self.bars
            .get(bar)
            .ok_or_else(|| TakeoffError::unknown_bar_size(bar.as_str(), referenced_by))
    }

    /// Lap/anchorage extension for a bar size
    pub fn lap_extension(&self, bar: &BarSize, referenced_by: &str) -> TakeoffResult<Centimeters> {
        self.lookup(bar, referenced_by).map(|p| p.lap_extension)
    }

    /// Linear weight for a bar size
    pub fn unit_weight(&self, bar: &BarSize, referenced_by: &str) -> TakeoffResult<KgPerM> {
        self.lookup(bar, referenced_by).map(|p| p.unit_weight)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Iterate in designator order
    pub fn iter(&self) -> impl Iterator<Item = (&BarSize, &RebarProperties)> {
        self.bars.iter()
    }

    /// Check unit weights are positive and lap extensions non-negative.
    pub fn validate(&self) -> TakeoffResult<()> {
        for (bar, props) in &self.bars {
            if props.unit_weight.0 <= 0.0 {
                return Err(TakeoffError::invalid_input(
                    format!("steel[{}].unit_weight", bar),
                    props.unit_weight.0.to_string(),
                    "Unit weight must be positive",
                ));
            }
            if props.lap_extension.0 < 0.0 {
                return Err(TakeoffError::invalid_input(
                    format!("steel[{}].lap_extension", bar),
                    props.lap_extension.0.to_string(),
                    "Lap extension must not be negative",
                ));
            }
        }
        Ok(())
    }
}
