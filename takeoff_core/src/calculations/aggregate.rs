//! # Project Aggregation
//!
//! Walks the beam count manifest, computes each placed beam's quantities,
//! and sums them into one run-scoped accumulator. Unit conversion happens
//! here, once, after every beam has been added:
//!
//! | Quantity | Accumulated | Reported | Factor |
//! |----------|-------------|----------|--------|
//! | Bar length | cm | m | 0.01 |
//! | Bar weight | | kg | unit weight (kg/m) × m |
//! | Concrete | cm³ | m³ | 1e-6 |
//! | Formwork | cm² | m² | 1e-4 |
//!
//! A failed lookup aborts the whole run; no beam is skipped.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::beams::{BeamCatalog, BeamSpec};
//! use takeoff_core::calculations::aggregate::calculate;
//! use takeoff_core::manifest::BeamCountManifest;
//! use takeoff_core::materials::SteelCatalog;
//! use takeoff_core::project::TakeoffProject;
//!
//! let project = TakeoffProject::from_inputs(
//!     SteelCatalog::new(),
//!     BeamCatalog::new().with_beam("B1", BeamSpec::plain(30.0, 50.0)),
//!     BeamCountManifest::new().with("1F", "B1", &[400.0]),
//! );
//!
//! let totals = calculate(&project).unwrap();
//! assert!((totals.concrete_volume.0 - 0.6).abs() < 1e-12);
//! assert!((totals.formwork_area.0 - 4.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use super::beam::{BeamInstance, BeamQuantities};
use crate::beams::BeamCatalog;
use crate::errors::TakeoffResult;
use crate::manifest::BeamCountManifest;
use crate::materials::{BarSize, SteelCatalog};
use crate::project::{GlobalSettings, TakeoffProject};
use crate::quantities::LengthTally;
use crate::units::{CubicCentimeters, CubicMeters, Kilograms, Meters, SqCm, SqM};

/// Unconverted run accumulator.
///
/// `merge` is associative and commutative, so a manifest may be split into
/// shards, accumulated separately, and merged before [`QuantityAggregator::finish`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTotals {
    pub bar_lengths: LengthTally,
    pub concrete_volume: CubicCentimeters,
    pub formwork_area: SqCm,
    pub instance_count: usize,
}

impl RawTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one beam's contributions
    pub fn add_beam(&mut self, beam: &BeamQuantities) {
        self.bar_lengths.merge(&beam.bar_lengths);
        self.concrete_volume += beam.concrete_volume;
        self.formwork_area += beam.formwork_area;
        self.instance_count += 1;
    }

    /// Add another accumulator
    pub fn merge(&mut self, other: &RawTotals) {
        self.bar_lengths.merge(&other.bar_lengths);
        self.concrete_volume += other.concrete_volume;
        self.formwork_area += other.formwork_area;
        self.instance_count += other.instance_count;
    }
}

/// Project totals in billable units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuantityTotals {
    /// Bar weight per bar size (kg)
    pub rebar_weights: BTreeMap<BarSize, Kilograms>,

    /// Bar length per bar size (m)
    pub rebar_lengths: BTreeMap<BarSize, Meters>,

    pub concrete_volume: CubicMeters,

    pub formwork_area: SqM,

    /// Number of placed beams summed
    pub instance_count: usize,
}

impl QuantityTotals {
    /// Weight of all bar sizes together
    pub fn total_rebar_weight(&self) -> Kilograms {
        self.rebar_weights.values().copied().sum()
    }
}

/// Sums quantities over a manifest with fixed inputs and settings.
#[derive(Debug, Clone, Copy)]
pub struct QuantityAggregator<'a> {
    steel: &'a SteelCatalog,
    beams: &'a BeamCatalog,
    settings: &'a GlobalSettings,
}

impl<'a> QuantityAggregator<'a> {
    pub fn new(steel: &'a SteelCatalog, beams: &'a BeamCatalog, settings: &'a GlobalSettings) -> Self {
        QuantityAggregator {
            steel,
            beams,
            settings,
        }
    }

    /// Aggregator over a project's catalogs and settings
    pub fn for_project(project: &'a TakeoffProject) -> Self {
        QuantityAggregator::new(&project.steel, &project.beams, &project.settings)
    }

    /// Sum raw (cm-based) quantities of every placed beam.
    pub fn accumulate(&self, manifest: &BeamCountManifest) -> TakeoffResult<RawTotals> {
        let mut raw = RawTotals::new();

        for entry in manifest.entries() {
            debug!(
                group = entry.group,
                beam_type = entry.beam_type,
                length_cm = entry.length.0,
                "computing beam quantities"
            );
            let spec = self.beams.lookup(entry.beam_type, entry.group)?;
            let beam = BeamInstance::new(entry.beam_type, entry.length, spec)?
                .with_policy(self.settings.cutback_policy);
            raw.add_beam(&beam.quantities(self.steel)?);
        }

        Ok(raw)
    }

    /// Convert raw totals to billable units.
    pub fn finish(&self, raw: RawTotals) -> TakeoffResult<QuantityTotals> {
        let mut rebar_weights = BTreeMap::new();
        let mut rebar_lengths = BTreeMap::new();

        for (bar, length_cm) in raw.bar_lengths.iter() {
            let length: Meters = length_cm.into();
            let unit_weight = self.steel.unit_weight(bar, "weight conversion")?;
            rebar_weights.insert(bar.clone(), unit_weight * length);
            rebar_lengths.insert(bar.clone(), length);
        }

        Ok(QuantityTotals {
            rebar_weights,
            rebar_lengths,
            concrete_volume: raw.concrete_volume.into(),
            formwork_area: raw.formwork_area.into(),
            instance_count: raw.instance_count,
        })
    }

    /// Accumulate and convert in one step.
    #[instrument(skip_all, fields(instances = manifest.instance_count()))]
    pub fn run(&self, manifest: &BeamCountManifest) -> TakeoffResult<QuantityTotals> {
        let raw = self.accumulate(manifest)?;
        let totals = self.finish(raw)?;
        info!(
            instances = totals.instance_count,
            bar_sizes = totals.rebar_weights.len(),
            concrete_m3 = totals.concrete_volume.0,
            formwork_m2 = totals.formwork_area.0,
            "takeoff complete"
        );
        Ok(totals)
    }
}

/// Validate a project and compute its totals.
pub fn calculate(project: &TakeoffProject) -> TakeoffResult<QuantityTotals> {
    project.validate()?;
    QuantityAggregator::for_project(project).run(&project.counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beams::{BeamSpec, CenterBarGroup, CenterStirrupGroup, SideBarGroup, SideStirrupGroup};
    use crate::errors::TakeoffError;
    use crate::materials::RebarProperties;
    use crate::units::Centimeters;

    const TOL: f64 = 1e-9;

    fn bar(s: &str) -> BarSize {
        BarSize::parse(s).unwrap()
    }

    fn steel() -> SteelCatalog {
        SteelCatalog::new()
            .with_bar(bar("#3"), RebarProperties::new(0.560, 30.0))
            .with_bar(bar("#4"), RebarProperties::new(0.994, 20.0))
            .with_bar(bar("#5"), RebarProperties::new(1.560, 50.0))
    }

    fn reinforced_spec() -> BeamSpec {
        let mut spec = BeamSpec::plain(30.0, 60.0);
        spec.main_reinforcement.top_center.push(CenterBarGroup {
            bar_size: bar("#5"),
            count: 2,
            spans_full_length: false,
        });
        spec.main_reinforcement.top_side.push(SideBarGroup {
            bar_size: bar("#5"),
            count: 2,
            length: Centimeters(100.0),
            single_sided: false,
        });
        spec.main_reinforcement.bottom_center.push(CenterBarGroup {
            bar_size: bar("#4"),
            count: 3,
            spans_full_length: true,
        });
        spec.stirrups.side.push(SideStirrupGroup {
            bar_size: bar("#3"),
            count: 6,
            spacing: Centimeters(10.0),
        });
        spec.stirrups.center.push(CenterStirrupGroup {
            bar_size: bar("#3"),
            spacing: Centimeters(15.0),
            count: None,
        });
        spec
    }

    #[test]
    fn test_plain_beam_end_to_end() {
        let beams = BeamCatalog::new().with_beam("B1", BeamSpec::plain(30.0, 50.0));
        let manifest = BeamCountManifest::new().with("1F", "B1", &[400.0]);
        let settings = GlobalSettings::default();

        let totals = QuantityAggregator::new(&steel(), &beams, &settings)
            .run(&manifest)
            .unwrap();

        assert!((totals.concrete_volume.0 - 0.6).abs() < TOL);
        assert!((totals.formwork_area.0 - 4.0).abs() < TOL);
        assert!(totals.rebar_weights.is_empty());
        assert_eq!(totals.instance_count, 1);
    }

    #[test]
    fn test_full_length_bar_weight() {
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.main_reinforcement.top_center.push(CenterBarGroup {
            bar_size: bar("#4"),
            count: 2,
            spans_full_length: true,
        });
        let beams = BeamCatalog::new().with_beam("B1", spec);
        let manifest = BeamCountManifest::new().with("1F", "B1", &[600.0]);
        let settings = GlobalSettings::default();

        let totals = QuantityAggregator::new(&steel(), &beams, &settings)
            .run(&manifest)
            .unwrap();

        // 1280 cm → 12.8 m × 0.994 kg/m
        let weight = totals.rebar_weights[&bar("#4")].0;
        assert!((weight - 1280.0 * 0.01 * 0.994).abs() < TOL);
        assert!((totals.rebar_lengths[&bar("#4")].0 - 12.8).abs() < TOL);
    }

    #[test]
    fn test_bar_weight_conversion() {
        // 100 cm at 2 kg/m → 2 kg
        let catalog = SteelCatalog::new().with_bar(bar("#6"), RebarProperties::new(2.0, 0.0));
        let beams = BeamCatalog::new();
        let settings = GlobalSettings::default();
        let raw = RawTotals {
            bar_lengths: [(bar("#6"), Centimeters(100.0))].into_iter().collect(),
            ..RawTotals::default()
        };

        let totals = QuantityAggregator::new(&catalog, &beams, &settings)
            .finish(raw)
            .unwrap();
        assert!((totals.rebar_weights[&bar("#6")].0 - 2.0).abs() < TOL);
    }

    #[test]
    fn test_repeated_lengths_accumulate() {
        let beams = BeamCatalog::new().with_beam("B1", reinforced_spec());
        let settings = GlobalSettings::default();
        let steel = steel();
        let aggregator = QuantityAggregator::new(&steel, &beams, &settings);

        let once = aggregator
            .accumulate(&BeamCountManifest::new().with("1F", "B1", &[500.0]))
            .unwrap();
        let thrice = aggregator
            .accumulate(&BeamCountManifest::new().with("1F", "B1", &[500.0, 500.0, 500.0]))
            .unwrap();

        for (size, len) in once.bar_lengths.iter() {
            assert!((thrice.bar_lengths.get(size).0 - 3.0 * len.0).abs() < 1e-6);
        }
        assert_eq!(thrice.instance_count, 3);
    }

    #[test]
    fn test_shards_merge_to_same_totals() {
        let beams = BeamCatalog::new()
            .with_beam("B1", reinforced_spec())
            .with_beam("B2", BeamSpec::plain(25.0, 40.0));
        let settings = GlobalSettings::default();
        let steel = steel();
        let aggregator = QuantityAggregator::new(&steel, &beams, &settings);

        let whole = BeamCountManifest::new()
            .with("1F", "B1", &[500.0, 620.0])
            .with("2F", "B2", &[300.0])
            .with("2F", "B1", &[480.0]);
        let shard_a = BeamCountManifest::new().with("2F", "B1", &[480.0]).with("2F", "B2", &[300.0]);
        let shard_b = BeamCountManifest::new().with("1F", "B1", &[620.0, 500.0]);

        let all = aggregator.accumulate(&whole).unwrap();
        let mut ab = aggregator.accumulate(&shard_a).unwrap();
        ab.merge(&aggregator.accumulate(&shard_b).unwrap());
        let mut ba = aggregator.accumulate(&shard_b).unwrap();
        ba.merge(&aggregator.accumulate(&shard_a).unwrap());

        for raw in [&ab, &ba] {
            assert_eq!(raw.instance_count, all.instance_count);
            assert!((raw.concrete_volume.0 - all.concrete_volume.0).abs() < 1e-6);
            assert!((raw.formwork_area.0 - all.formwork_area.0).abs() < 1e-6);
            for (size, len) in all.bar_lengths.iter() {
                assert!((raw.bar_lengths.get(size).0 - len.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_unknown_beam_type_is_fatal() {
        let beams = BeamCatalog::new().with_beam("B1", BeamSpec::plain(30.0, 50.0));
        let manifest = BeamCountManifest::new()
            .with("1F", "B1", &[400.0])
            .with("1F", "X9", &[400.0]);
        let settings = GlobalSettings::default();

        let err = QuantityAggregator::new(&steel(), &beams, &settings)
            .run(&manifest)
            .unwrap_err();
        assert_eq!(err, TakeoffError::unknown_beam_type("X9", "1F"));
    }

    #[test]
    fn test_unknown_stirrup_bar_is_fatal_at_conversion() {
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.stirrups.center.push(CenterStirrupGroup {
            bar_size: bar("#2"),
            spacing: Centimeters(20.0),
            count: None,
        });
        let beams = BeamCatalog::new().with_beam("B1", spec);
        let manifest = BeamCountManifest::new().with("1F", "B1", &[400.0]);
        let settings = GlobalSettings::default();

        let err = QuantityAggregator::new(&steel(), &beams, &settings)
            .run(&manifest)
            .unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_BAR_SIZE");
    }

    #[test]
    fn test_calculate_validates_first() {
        let mut project = TakeoffProject::from_inputs(
            steel(),
            BeamCatalog::new().with_beam("B1", BeamSpec::plain(30.0, 50.0)),
            BeamCountManifest::new().with("1F", "B1", &[-400.0]),
        );
        assert_eq!(calculate(&project).unwrap_err().error_code(), "INVALID_INPUT");

        project.counts = BeamCountManifest::new().with("1F", "B1", &[400.0, 200.0]);
        let totals = calculate(&project).unwrap();
        assert!((totals.concrete_volume.0 - 0.9).abs() < TOL);
        assert!((totals.total_rebar_weight().0).abs() < TOL);
    }
}
