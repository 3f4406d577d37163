//! # Single Beam Quantities
//!
//! Material quantities of one placed beam: bar length per bar size, concrete
//! volume, and formwork area. Everything here stays in centimeter-based
//! units; conversion to billable units happens in
//! [`aggregate`](super::aggregate).
//!
//! ## Rules
//!
//! - **Center main bars**: a full-length group runs `L + 2·lap` per bar. A
//!   group that stops short of the side bars is cut back by the longest side
//!   group on that face, once if any side group is single-sided and twice
//!   otherwise: `L − cutback + 2·lap`.
//! - **Side main bars**: `length + 2·lap` per bar, doubled when mirrored at
//!   both ends.
//! - **Stirrups**: perimeter `P = 2(b + h)`. Side groups contribute
//!   `2·count·P` (both ends). Center groups fill `L − 2·max(count·spacing)`
//!   at their spacing, with a real-valued (unrounded) stirrup count.
//! - **Waist bars**: `L + 2·lap` per bar.
//! - **Concrete**: `b·h·L`. **Formwork**: `2·h·L` (two vertical faces).
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::beams::BeamSpec;
//! use takeoff_core::calculations::beam::BeamInstance;
//! use takeoff_core::units::Centimeters;
//!
//! let spec = BeamSpec::plain(30.0, 50.0);
//! let beam = BeamInstance::new("B1", Centimeters(400.0), &spec).unwrap();
//!
//! assert_eq!(beam.concrete_volume().0, 600_000.0);
//! assert_eq!(beam.formwork_area().0, 40_000.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::beams::{BeamSpec, Face, SideBarGroup};
use crate::errors::{TakeoffError, TakeoffResult};
use crate::materials::SteelCatalog;
use crate::project::CutbackPolicy;
use crate::quantities::LengthTally;
use crate::units::{Centimeters, CubicCentimeters, SqCm};

/// One placed beam of a given type and length.
///
/// Constructed per manifest entry, used to compute its contributions, then
/// dropped.
#[derive(Debug, Clone, Copy)]
pub struct BeamInstance<'a> {
    beam_type: &'a str,
    length: Centimeters,
    spec: &'a BeamSpec,
    policy: CutbackPolicy,
}

/// Everything one beam contributes to the project totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeamQuantities {
    /// Main, side, waist and stirrup bar length per bar size (cm)
    pub bar_lengths: LengthTally,
    pub concrete_volume: CubicCentimeters,
    pub formwork_area: SqCm,
}

impl<'a> BeamInstance<'a> {
    /// Create an instance, rejecting non-positive lengths.
    pub fn new(beam_type: &'a str, length: Centimeters, spec: &'a BeamSpec) -> TakeoffResult<Self> {
        if length.0 <= 0.0 {
            return Err(TakeoffError::invalid_input(
                format!("length of beam type '{}'", beam_type),
                length.0.to_string(),
                "Beam length must be positive",
            ));
        }
        Ok(BeamInstance {
            beam_type,
            length,
            spec,
            policy: CutbackPolicy::default(),
        })
    }

    /// Set the negative-span policy
    pub fn with_policy(mut self, policy: CutbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn length(&self) -> Centimeters {
        self.length
    }

    pub fn beam_type(&self) -> &str {
        self.beam_type
    }

    fn referenced_by(&self, location: &str) -> String {
        format!("beam type '{}' {}", self.beam_type, location)
    }

    /// Apply the cutback policy to a remaining span.
    fn remaining_span(&self, span: Centimeters, what: &str) -> TakeoffResult<Centimeters> {
        if span.0 >= 0.0 {
            return Ok(span);
        }
        match self.policy {
            CutbackPolicy::Clamp => Ok(Centimeters(0.0)),
            CutbackPolicy::Reject => Err(TakeoffError::invalid_input(
                format!("{} of beam type '{}'", what, self.beam_type),
                span.0.to_string(),
                format!(
                    "End zones exceed the beam length of {} cm",
                    self.length.0
                ),
            )),
        }
    }

    /// Main bars running along the span, top and bottom.
    pub fn center_bar_lengths(&self, steel: &SteelCatalog) -> TakeoffResult<LengthTally> {
        let mut tally = LengthTally::new();
        let main = &self.spec.main_reinforcement;

        for face in Face::ALL {
            let location = format!("{} center bars", face.name());
            for group in main.center(face) {
                let lap = steel.lap_extension(&group.bar_size, &self.referenced_by(&location))?;
                let run = if group.spans_full_length {
                    self.length
                } else {
                    let cutback = side_cutback(main.side(face));
                    self.remaining_span(self.length - cutback, &location)?
                };
                tally.add(&group.bar_size, (run + lap * 2.0) * f64::from(group.count));
            }
        }

        Ok(tally)
    }

    /// Main bars near the beam ends, top and bottom.
    pub fn side_bar_lengths(&self, steel: &SteelCatalog) -> TakeoffResult<LengthTally> {
        let mut tally = LengthTally::new();

        for face in Face::ALL {
            let location = format!("{} side bars", face.name());
            for group in self.spec.main_reinforcement.side(face) {
                let lap = steel.lap_extension(&group.bar_size, &self.referenced_by(&location))?;
                let ends = if group.single_sided { 1.0 } else { 2.0 };
                tally.add(
                    &group.bar_size,
                    (group.length + lap * 2.0) * f64::from(group.count) * ends,
                );
            }
        }

        Ok(tally)
    }

    /// Center plus side main bars
    pub fn reinforcement_lengths(&self, steel: &SteelCatalog) -> TakeoffResult<LengthTally> {
        let mut tally = self.center_bar_lengths(steel)?;
        tally.merge(&self.side_bar_lengths(steel)?);
        Ok(tally)
    }

    /// Closed stirrups, end zones and center zone.
    ///
    /// Needs no catalog lookup; stirrup lengths carry no lap extension.
    pub fn stirrup_lengths(&self) -> TakeoffResult<LengthTally> {
        let mut tally = LengthTally::new();
        let perimeter = self.spec.cross_section.perimeter();
        let stirrups = &self.spec.stirrups;

        let mut max_side_space = Centimeters(0.0);
        for group in &stirrups.side {
            let count = f64::from(group.count);
            tally.add(&group.bar_size, perimeter * (count * 2.0));
            let side_space = group.spacing * count;
            if side_space > max_side_space {
                max_side_space = side_space;
            }
        }

        if stirrups.center.is_empty() {
            return Ok(tally);
        }

        let center_span =
            self.remaining_span(self.length - max_side_space * 2.0, "center stirrup span")?;
        for group in &stirrups.center {
            let count = center_span.0 / group.spacing.0;
            tally.add(&group.bar_size, perimeter * count);
        }

        Ok(tally)
    }

    /// Longitudinal side-face bars.
    pub fn waist_bar_lengths(&self, steel: &SteelCatalog) -> TakeoffResult<LengthTally> {
        let mut tally = LengthTally::new();
        for group in &self.spec.waist_bars {
            let lap = steel.lap_extension(&group.bar_size, &self.referenced_by("waist bars"))?;
            tally.add(&group.bar_size, (self.length + lap * 2.0) * f64::from(group.count));
        }
        Ok(tally)
    }

    /// Concrete volume b·h·L (cm³)
    pub fn concrete_volume(&self) -> CubicCentimeters {
        let section = &self.spec.cross_section;
        CubicCentimeters(section.width.0 * section.height.0 * self.length.0)
    }

    /// Formwork area of the two vertical faces, 2·h·L (cm²)
    pub fn formwork_area(&self) -> SqCm {
        SqCm(self.spec.cross_section.height.0 * self.length.0 * 2.0)
    }

    /// All contributions of this beam.
    pub fn quantities(&self, steel: &SteelCatalog) -> TakeoffResult<BeamQuantities> {
        let mut bar_lengths = self.reinforcement_lengths(steel)?;
        bar_lengths.merge(&self.waist_bar_lengths(steel)?);
        bar_lengths.merge(&self.stirrup_lengths()?);

        Ok(BeamQuantities {
            bar_lengths,
            concrete_volume: self.concrete_volume(),
            formwork_area: self.formwork_area(),
        })
    }
}

/// Length a non-full center bar is cut back by on one face.
///
/// The longest side group governs. A single-sided group anywhere on the face
/// means only one end is covered.
fn side_cutback(side_groups: &[SideBarGroup]) -> Centimeters {
    let max_side_length = side_groups
        .iter()
        .map(|g| g.length)
        .fold(Centimeters(0.0), |acc, len| if len > acc { len } else { acc });
    let single_sided = side_groups.iter().any(|g| g.single_sided);

    if single_sided {
        max_side_length
    } else {
        max_side_length * 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::beams::{CenterBarGroup, CenterStirrupGroup, SideStirrupGroup, WaistBarGroup};
    use crate::materials::{BarSize, RebarProperties};

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

    fn center(size: &str, count: u32, full: bool) -> CenterBarGroup {
        CenterBarGroup {
            bar_size: bar(size),
            count,
            spans_full_length: full,
        }
    }

    fn side(size: &str, count: u32, length: f64, single: bool) -> SideBarGroup {
        SideBarGroup {
            bar_size: bar(size),
            count,
            length: Centimeters(length),
            single_sided: single,
        }
    }

    #[test]
    fn test_full_length_center_bars() {
        // 2 × (600 + 2 × 20) = 1280
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.main_reinforcement.top_center.push(center("#4", 2, true));

        let beam = BeamInstance::new("B1", Centimeters(600.0), &spec).unwrap();
        let tally = beam.center_bar_lengths(&steel()).unwrap();
        assert!((tally.get(&bar("#4")).0 - 1280.0).abs() < TOL);
    }

    #[test]
    fn test_full_length_ignores_side_bars() {
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.main_reinforcement.bottom_center.push(center("#4", 3, true));
        spec.main_reinforcement.bottom_side.push(side("#5", 2, 150.0, false));

        let beam = BeamInstance::new("B1", Centimeters(500.0), &spec).unwrap();
        let tally = beam.center_bar_lengths(&steel()).unwrap();
        assert!((tally.get(&bar("#4")).0 - 3.0 * 540.0).abs() < TOL);
    }

    #[test]
    fn test_cut_center_bars_mirrored_sides() {
        // Longest side group 150, mirrored: 2 × (600 − 300 + 40) = 680
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.main_reinforcement.top_center.push(center("#4", 2, false));
        spec.main_reinforcement.top_side.push(side("#5", 2, 100.0, false));
        spec.main_reinforcement.top_side.push(side("#5", 1, 150.0, false));

        let beam = BeamInstance::new("B1", Centimeters(600.0), &spec).unwrap();
        let tally = beam.center_bar_lengths(&steel()).unwrap();
        assert!((tally.get(&bar("#4")).0 - 680.0).abs() < TOL);
    }

    #[test]
    fn test_cut_center_bars_single_sided() {
        // Any single-sided group: cut back once, 2 × (600 − 150 + 40) = 980
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.main_reinforcement.top_center.push(center("#4", 2, false));
        spec.main_reinforcement.top_side.push(side("#5", 2, 150.0, false));
        spec.main_reinforcement.top_side.push(side("#5", 1, 80.0, true));

        let beam = BeamInstance::new("B1", Centimeters(600.0), &spec).unwrap();
        let tally = beam.center_bar_lengths(&steel()).unwrap();
        assert!((tally.get(&bar("#4")).0 - 980.0).abs() < TOL);
    }

    #[test]
    fn test_cut_center_bars_use_own_face_only() {
        // Bottom side bars do not shorten top center bars
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.main_reinforcement.top_center.push(center("#4", 1, false));
        spec.main_reinforcement.bottom_side.push(side("#5", 2, 150.0, false));

        let beam = BeamInstance::new("B1", Centimeters(600.0), &spec).unwrap();
        let tally = beam.center_bar_lengths(&steel()).unwrap();
        assert!((tally.get(&bar("#4")).0 - 640.0).abs() < TOL);
    }

    #[test]
    fn test_side_bars_single_is_half_of_mirrored() {
        let mut mirrored = BeamSpec::plain(30.0, 50.0);
        mirrored.main_reinforcement.top_side.push(side("#5", 3, 120.0, false));
        let mut single = BeamSpec::plain(30.0, 50.0);
        single.main_reinforcement.top_side.push(side("#5", 3, 120.0, true));

        let a = BeamInstance::new("B1", Centimeters(600.0), &mirrored)
            .unwrap()
            .side_bar_lengths(&steel())
            .unwrap();
        let b = BeamInstance::new("B2", Centimeters(600.0), &single)
            .unwrap()
            .side_bar_lengths(&steel())
            .unwrap();

        // 3 × (120 + 100) × 2 = 1320
        assert!((a.get(&bar("#5")).0 - 1320.0).abs() < TOL);
        assert!((b.get(&bar("#5")).0 * 2.0 - a.get(&bar("#5")).0).abs() < TOL);
    }

    #[test]
    fn test_reinforcement_combines_center_and_side() {
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.main_reinforcement.top_center.push(center("#5", 2, true));
        spec.main_reinforcement.top_side.push(side("#5", 1, 100.0, true));

        let beam = BeamInstance::new("B1", Centimeters(400.0), &spec).unwrap();
        let tally = beam.reinforcement_lengths(&steel()).unwrap();
        // 2 × 500 + 1 × 200
        assert!((tally.get(&bar("#5")).0 - 1200.0).abs() < TOL);
    }

    #[test]
    fn test_stirrups_without_side_zone_use_full_length() {
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.stirrups.center.push(CenterStirrupGroup {
            bar_size: bar("#3"),
            spacing: Centimeters(15.0),
            count: None,
        });

        let beam = BeamInstance::new("B1", Centimeters(400.0), &spec).unwrap();
        let tally = beam.stirrup_lengths().unwrap();
        // 400 / 15 stirrups of 160 cm, unrounded
        assert!((tally.get(&bar("#3")).0 - 400.0 / 15.0 * 160.0).abs() < TOL);
    }

    #[test]
    fn test_stirrups_with_side_zones() {
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.stirrups.side.push(SideStirrupGroup {
            bar_size: bar("#3"),
            count: 5,
            spacing: Centimeters(10.0),
        });
        spec.stirrups.side.push(SideStirrupGroup {
            bar_size: bar("#4"),
            count: 2,
            spacing: Centimeters(20.0),
        });
        spec.stirrups.center.push(CenterStirrupGroup {
            bar_size: bar("#3"),
            spacing: Centimeters(20.0),
            count: Some(99),
        });

        let beam = BeamInstance::new("B1", Centimeters(500.0), &spec).unwrap();
        let tally = beam.stirrup_lengths().unwrap();

        // Side: #3 5×2×160 = 1600, #4 2×2×160 = 640
        // Max side space max(50, 40) = 50, center span 400, 20 stirrups → 3200
        assert!((tally.get(&bar("#3")).0 - (1600.0 + 3200.0)).abs() < TOL);
        assert!((tally.get(&bar("#4")).0 - 640.0).abs() < TOL);
    }

    #[test]
    fn test_waist_bars() {
        let mut spec = BeamSpec::plain(30.0, 80.0);
        spec.waist_bars.push(WaistBarGroup {
            bar_size: bar("#4"),
            count: 4,
        });

        let beam = BeamInstance::new("B1", Centimeters(300.0), &spec).unwrap();
        let tally = beam.waist_bar_lengths(&steel()).unwrap();
        assert!((tally.get(&bar("#4")).0 - 4.0 * 340.0).abs() < TOL);
    }

    #[test]
    fn test_concrete_and_formwork() {
        let spec = BeamSpec::plain(30.0, 50.0);
        let beam = BeamInstance::new("B1", Centimeters(400.0), &spec).unwrap();
        assert_eq!(beam.concrete_volume().0, 30.0 * 50.0 * 400.0);
        assert_eq!(beam.formwork_area().0, 50.0 * 400.0 * 2.0);
    }

    #[test]
    fn test_unknown_bar_size_propagates() {
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.waist_bars.push(WaistBarGroup {
            bar_size: bar("#9"),
            count: 2,
        });

        let beam = BeamInstance::new("B1", Centimeters(400.0), &spec).unwrap();
        let err = beam.quantities(&steel()).unwrap_err();
        assert_eq!(err, TakeoffError::unknown_bar_size("#9", "beam type 'B1' waist bars"));
    }

    #[test]
    fn test_non_positive_length_rejected() {
        let spec = BeamSpec::plain(30.0, 50.0);
        assert!(BeamInstance::new("B1", Centimeters(0.0), &spec).is_err());
        assert!(BeamInstance::new("B1", Centimeters(-10.0), &spec).is_err());
    }

    #[test]
    fn test_negative_center_span_policy() {
        // Mirrored 200 cm side bars on a 300 cm beam leave −100 cm
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.main_reinforcement.top_center.push(center("#4", 2, false));
        spec.main_reinforcement.top_side.push(side("#5", 2, 200.0, false));

        let beam = BeamInstance::new("B1", Centimeters(300.0), &spec).unwrap();
        let err = beam.center_bar_lengths(&steel()).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let clamped = beam.with_policy(CutbackPolicy::Clamp);
        let tally = clamped.center_bar_lengths(&steel()).unwrap();
        // Only the lap extensions remain: 2 × 40
        assert!((tally.get(&bar("#4")).0 - 80.0).abs() < TOL);
    }

    #[test]
    fn test_negative_stirrup_span_policy() {
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.stirrups.side.push(SideStirrupGroup {
            bar_size: bar("#3"),
            count: 20,
            spacing: Centimeters(10.0),
        });
        spec.stirrups.center.push(CenterStirrupGroup {
            bar_size: bar("#3"),
            spacing: Centimeters(15.0),
            count: None,
        });

        let beam = BeamInstance::new("B1", Centimeters(300.0), &spec).unwrap();
        assert!(beam.stirrup_lengths().is_err());

        let tally = beam.with_policy(CutbackPolicy::Clamp).stirrup_lengths().unwrap();
        // Side zones only: 20 × 2 × 160
        assert!((tally.get(&bar("#3")).0 - 6400.0).abs() < TOL);
    }

    #[test]
    fn test_quantities_merge_everything() {
        let mut spec = BeamSpec::plain(30.0, 50.0);
        spec.main_reinforcement.top_center.push(center("#4", 2, true));
        spec.waist_bars.push(WaistBarGroup {
            bar_size: bar("#4"),
            count: 1,
        });
        spec.stirrups.center.push(CenterStirrupGroup {
            bar_size: bar("#3"),
            spacing: Centimeters(20.0),
            count: None,
        });

        let beam = BeamInstance::new("B1", Centimeters(600.0), &spec).unwrap();
        let q = beam.quantities(&steel()).unwrap();
        assert!((q.bar_lengths.get(&bar("#4")).0 - (1280.0 + 640.0)).abs() < TOL);
        assert!((q.bar_lengths.get(&bar("#3")).0 - 30.0 * 160.0).abs() < TOL);
        assert_eq!(q.concrete_volume.0, 900_000.0);
    }
}
