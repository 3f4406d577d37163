//! # Beam Specifications
//!
//! Static geometry and reinforcement layout for each beam type in a project.
//! A [`BeamSpec`] says nothing about length; the same type is placed many
//! times at different lengths through the
//! [`BeamCountManifest`](crate::manifest::BeamCountManifest).
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "B1": {
//!     "cross_section": [30, 50],
//!     "main_reinforcement": {
//!       "top_center":    [{ "bar_size": "#5", "count": 2, "spans_full_length": true }],
//!       "bottom_center": [{ "bar_size": "#5", "count": 3, "spans_full_length": false }],
//!       "top_side":      [{ "bar_size": "#5", "count": 2, "length": 120, "single_sided": false }],
//!       "bottom_side":   []
//!     },
//!     "stirrups": {
//!       "side":   [{ "bar_size": "#3", "count": 8, "spacing": 10 }],
//!       "center": [{ "bar_size": "#3", "spacing": 15 }]
//!     },
//!     "waist_bars": [{ "bar_size": "#4", "count": 2 }]
//!   }
//! }
//! ```
//!
//! Every field also accepts the legacy Chinese key used by older takeoff
//! sheets (`截面`, `主筋`, `上中`, `號數`, ...). Unknown fields are rejected,
//! and every group list must be present; write `[]` for none.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{TakeoffError, TakeoffResult};
use crate::materials::{BarSize, SteelCatalog};
use crate::units::Centimeters;

/// Rectangular cross-section, serialized as `[width, height]` in cm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct CrossSection {
    pub width: Centimeters,
    pub height: Centimeters,
}

impl From<(f64, f64)> for CrossSection {
    fn from((width, height): (f64, f64)) -> Self {
        CrossSection::new(width, height)
    }
}

impl From<CrossSection> for (f64, f64) {
    fn from(section: CrossSection) -> Self {
        (section.width.0, section.height.0)
    }
}

impl CrossSection {
    pub fn new(width_cm: f64, height_cm: f64) -> Self {
        CrossSection {
            width: Centimeters(width_cm),
            height: Centimeters(height_cm),
        }
    }

    /// Closed stirrup length, 2(b + h)
    pub fn perimeter(&self) -> Centimeters {
        (self.width + self.height) * 2.0
    }
}

/// Top or bottom face of a beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Top,
    Bottom,
}

impl Face {
    pub const ALL: [Face; 2] = [Face::Top, Face::Bottom];

    pub fn name(&self) -> &'static str {
        match self {
            Face::Top => "top",
            Face::Bottom => "bottom",
        }
    }
}

/// Main bars running along the span of a face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CenterBarGroup {
    #[serde(alias = "號數")]
    pub bar_size: BarSize,

    #[serde(alias = "數目")]
    pub count: u32,

    /// Runs the full beam length; otherwise stops short of the side bars
    #[serde(alias = "同樑長")]
    pub spans_full_length: bool,
}

/// Main bars concentrated near the beam ends (negative-moment regions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideBarGroup {
    #[serde(alias = "號數")]
    pub bar_size: BarSize,

    #[serde(alias = "數目")]
    pub count: u32,

    /// Bar length at one end (cm), excluding lap extensions
    #[serde(alias = "長度")]
    pub length: Centimeters,

    /// Present at one end only; otherwise mirrored at both ends
    #[serde(alias = "單邊")]
    pub single_sided: bool,
}

/// Top/bottom × center/side main reinforcement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MainReinforcement {
    #[serde(alias = "上中")]
    pub top_center: Vec<CenterBarGroup>,

    #[serde(alias = "下中")]
    pub bottom_center: Vec<CenterBarGroup>,

    #[serde(alias = "上左右")]
    pub top_side: Vec<SideBarGroup>,

    #[serde(alias = "下左右")]
    pub bottom_side: Vec<SideBarGroup>,
}

impl MainReinforcement {
    pub fn center(&self, face: Face) -> &[CenterBarGroup] {
        match face {
            Face::Top => &self.top_center,
            Face::Bottom => &self.bottom_center,
        }
    }

    pub fn side(&self, face: Face) -> &[SideBarGroup] {
        match face {
            Face::Top => &self.top_side,
            Face::Bottom => &self.bottom_side,
        }
    }
}

/// Stirrups packed near the beam ends at a tighter spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideStirrupGroup {
    #[serde(alias = "號數")]
    pub bar_size: BarSize,

    /// Stirrups at each end
    #[serde(alias = "數目")]
    pub count: u32,

    #[serde(alias = "間距")]
    pub spacing: Centimeters,
}

/// Stirrups filling the span between the end zones.
///
/// The number of stirrups is derived from the remaining span and `spacing`;
/// a `count` given in the input is kept for reference only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CenterStirrupGroup {
    #[serde(alias = "號數")]
    pub bar_size: BarSize,

    #[serde(alias = "間距")]
    pub spacing: Centimeters,

    #[serde(default, alias = "數目", skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StirrupLayout {
    #[serde(alias = "左右")]
    pub side: Vec<SideStirrupGroup>,

    #[serde(alias = "中")]
    pub center: Vec<CenterStirrupGroup>,
}

/// Longitudinal side-face bars of a deep beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaistBarGroup {
    #[serde(alias = "號數")]
    pub bar_size: BarSize,

    #[serde(alias = "數目")]
    pub count: u32,
}

/// Geometry and reinforcement layout of one beam type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BeamSpec {
    #[serde(alias = "截面")]
    pub cross_section: CrossSection,

    #[serde(alias = "主筋")]
    pub main_reinforcement: MainReinforcement,

    #[serde(alias = "箍筋")]
    pub stirrups: StirrupLayout,

    #[serde(alias = "腰筋")]
    pub waist_bars: Vec<WaistBarGroup>,
}

impl BeamSpec {
    /// A plain concrete beam with no reinforcement
    pub fn plain(width_cm: f64, height_cm: f64) -> Self {
        BeamSpec {
            cross_section: CrossSection::new(width_cm, height_cm),
            main_reinforcement: MainReinforcement::default(),
            stirrups: StirrupLayout::default(),
            waist_bars: Vec::new(),
        }
    }

    /// Every bar size the beam spec references, with a description of where.
    pub fn bar_references(&self) -> Vec<(&BarSize, String)> {
        let mut refs = Vec::new();
        for face in Face::ALL {
            for g in self.main_reinforcement.center(face) {
                refs.push((&g.bar_size, format!("{} center bars", face.name())));
            }
            for g in self.main_reinforcement.side(face) {
                refs.push((&g.bar_size, format!("{} side bars", face.name())));
            }
        }
        for g in &self.stirrups.side {
            refs.push((&g.bar_size, "side stirrups".to_string()));
        }
        for g in &self.stirrups.center {
            refs.push((&g.bar_size, "center stirrups".to_string()));
        }
        for g in &self.waist_bars {
            refs.push((&g.bar_size, "waist bars".to_string()));
        }
        refs
    }

    /// Validate geometric invariants.
    pub fn validate(&self, beam_type: &str) -> TakeoffResult<()> {
        let section = &self.cross_section;
        positive(beam_type, "cross_section.width", section.width)?;
        positive(beam_type, "cross_section.height", section.height)?;

        for face in Face::ALL {
            for (i, g) in self.main_reinforcement.side(face).iter().enumerate() {
                positive(beam_type, &format!("{}_side[{}].length", face.name(), i), g.length)?;
            }
        }
        for (i, g) in self.stirrups.side.iter().enumerate() {
            positive(beam_type, &format!("stirrups.side[{}].spacing", i), g.spacing)?;
        }
        for (i, g) in self.stirrups.center.iter().enumerate() {
            positive(beam_type, &format!("stirrups.center[{}].spacing", i), g.spacing)?;
        }
        Ok(())
    }

    /// Check that every referenced bar size exists in the catalog.
    pub fn check_bar_sizes(&self, beam_type: &str, steel: &SteelCatalog) -> TakeoffResult<()> {
        for (bar, location) in self.bar_references() {
            if !steel.contains(bar) {
                return Err(TakeoffError::unknown_bar_size(
                    bar.as_str(),
                    format!("beam type '{}' {}", beam_type, location),
                ));
            }
        }
        Ok(())
    }
}

fn positive(beam_type: &str, field: &str, value: Centimeters) -> TakeoffResult<()> {
    if value.0 <= 0.0 {
        return Err(TakeoffError::invalid_input(
            format!("beams[{}].{}", beam_type, field),
            value.0.to_string(),
            "Must be positive",
        ));
    }
    Ok(())
}

/// All beam types of a project, keyed by designator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeamCatalog {
    specs: BTreeMap<String, BeamSpec>,
}

impl BeamCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_beam(mut self, beam_type: impl Into<String>, spec: BeamSpec) -> Self {
        self.specs.insert(beam_type.into(), spec);
        self
    }

    pub fn insert(&mut self, beam_type: impl Into<String>, spec: BeamSpec) {
        self.specs.insert(beam_type.into(), spec);
    }

    pub fn get(&self, beam_type: &str) -> Option<&BeamSpec> {
        self.specs.get(beam_type)
    }

    /// Look up a beam type referenced from a manifest group.
    pub fn lookup(&self, beam_type: &str, group: &str) -> TakeoffResult<&BeamSpec> {
        self.specs
            .get(beam_type)
            .ok_or_else(|| TakeoffError::unknown_beam_type(beam_type, group))
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BeamSpec)> {
        self.specs.iter()
    }

    /// Validate the geometry of every beam type
    pub fn validate(&self) -> TakeoffResult<()> {
        for (beam_type, spec) in &self.specs {
            spec.validate(beam_type)?;
        }
        Ok(())
    }

    /// Check every beam type's bar sizes against the steel catalog
    pub fn check_bar_sizes(&self, steel: &SteelCatalog) -> TakeoffResult<()> {
        for (beam_type, spec) in &self.specs {
            spec.check_bar_sizes(beam_type, steel)?;
        }
        Ok(())
    }
}
