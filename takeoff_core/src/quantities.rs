//! # Bar Length Tallies
//!
//! [`LengthTally`] accumulates bar length per bar size. Keys that have not
//! been added read as zero, and [`LengthTally::merge`] is a per-key additive
//! union, so combining tallies is commutative and associative.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

use crate::materials::BarSize;
use crate::units::Centimeters;

/// Accumulated bar length (cm) per bar size, iterated in designator order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LengthTally {
    lengths: BTreeMap<BarSize, Centimeters>,
}

impl LengthTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add length to a bar size, creating the entry at zero if absent.
    pub fn add(&mut self, bar: &BarSize, length: Centimeters) {
        *self.lengths.entry(bar.clone()).or_default() += length;
    }

    /// Length recorded for a bar size, zero when absent
    pub fn get(&self, bar: &BarSize) -> Centimeters {
        self.lengths.get(bar).copied().unwrap_or_default()
    }

    /// Add every entry of `other` into `self`.
    pub fn merge(&mut self, other: &LengthTally) {
        for (bar, length) in &other.lengths {
            trace!(bar = %bar, length_cm = length.0, "merging bar length");
            self.add(bar, *length);
        }
    }

    /// Additive union of two tallies
    pub fn merged(a: &LengthTally, b: &LengthTally) -> LengthTally {
        let mut out = a.clone();
        out.merge(b);
        out
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BarSize, Centimeters)> {
        self.lengths.iter().map(|(bar, len)| (bar, *len))
    }

    /// Sum over all bar sizes
    pub fn total(&self) -> Centimeters {
        self.lengths.values().copied().sum()
    }
}

impl FromIterator<(BarSize, Centimeters)> for LengthTally {
    fn from_iter<I: IntoIterator<Item = (BarSize, Centimeters)>>(iter: I) -> Self {
        let mut tally = LengthTally::new();
        for (bar, length) in iter {
            tally.add(&bar, length);
        }
        tally
    }
}
