//! # Beam Count Manifest
//!
//! Where each beam type is placed and at what length. Groups are free-form
//! (typically a floor or a drawing sheet); each entry in a length list is one
//! physically placed beam.
//!
//! ```json
//! {
//!   "1F": { "B1": [400, 400, 615.5], "G2": [820] },
//!   "2F": { "B1": [400] }
//! }
//! ```
//!
//! Groups and beam types iterate in key order; lengths keep their input
//! order. The traversal is therefore identical for identical input,
//! regardless of how the JSON object keys were arranged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::beams::BeamCatalog;
use crate::errors::{TakeoffError, TakeoffResult};
use crate::units::Centimeters;

/// One placed beam
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManifestEntry<'a> {
    pub group: &'a str,
    pub beam_type: &'a str,
    pub length: Centimeters,
}

/// Group → beam type → instance lengths (cm).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeamCountManifest {
    groups: BTreeMap<String, BTreeMap<String, Vec<Centimeters>>>,
}

impl BeamCountManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append placed lengths for a beam type within a group.
    pub fn add(&mut self, group: impl Into<String>, beam_type: impl Into<String>, lengths: &[f64]) {
        self.groups
            .entry(group.into())
            .or_default()
            .entry(beam_type.into())
            .or_default()
            .extend(lengths.iter().copied().map(Centimeters));
    }

    /// Builder-style [`add`](Self::add)
    pub fn with(mut self, group: impl Into<String>, beam_type: impl Into<String>, lengths: &[f64]) -> Self {
        self.add(group, beam_type, lengths);
        self
    }

    /// Every placed beam, in stable order.
    pub fn entries(&self) -> impl Iterator<Item = ManifestEntry<'_>> {
        self.groups.iter().flat_map(|(group, types)| {
            types.iter().flat_map(move |(beam_type, lengths)| {
                lengths.iter().map(move |length| ManifestEntry {
                    group: group.as_str(),
                    beam_type: beam_type.as_str(),
                    length: *length,
                })
            })
        })
    }

    /// Number of placed beams
    pub fn instance_count(&self) -> usize {
        self.groups
            .values()
            .flat_map(|types| types.values())
            .map(Vec::len)
            .sum()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instance_count() == 0
    }

    /// Check every instance length is positive.
    pub fn validate(&self) -> TakeoffResult<()> {
        for entry in self.entries() {
            if entry.length.0 <= 0.0 {
                return Err(TakeoffError::invalid_input(
                    format!("counts[{}][{}]", entry.group, entry.beam_type),
                    entry.length.0.to_string(),
                    "Beam length must be positive",
                ));
            }
        }
        Ok(())
    }

    /// Check every referenced beam type has a spec.
    pub fn check_beam_types(&self, beams: &BeamCatalog) -> TakeoffResult<()> {
        for (group, types) in &self.groups {
            for beam_type in types.keys() {
                beams.lookup(beam_type, group)?;
            }
        }
        Ok(())
    }
}
