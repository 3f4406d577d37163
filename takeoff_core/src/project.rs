//! # Project Data Structures
//!
//! The `TakeoffProject` struct bundles everything one takeoff run needs: the
//! steel catalog, the beam specs, the beam count manifest, and the settings
//! that shape the computation. Projects serialize to `.tko.json` files so a
//! job can be archived and re-run exactly.
//!
//! ## Structure
//!
//! ```text
//! TakeoffProject
//! ├── meta: ProjectMetadata (version, estimator, job info, timestamps)
//! ├── settings: GlobalSettings (cutback policy, labels, extra rows)
//! ├── steel: SteelCatalog (bar size → unit weight, lap extension)
//! ├── beams: BeamCatalog (beam type → geometry, reinforcement)
//! └── counts: BeamCountManifest (group → beam type → lengths)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::beams::{BeamCatalog, BeamSpec};
//! use takeoff_core::manifest::BeamCountManifest;
//! use takeoff_core::project::TakeoffProject;
//!
//! let mut project = TakeoffProject::new("Jane Estimator", "25-042", "ACME Corp");
//! project.beams = BeamCatalog::new().with_beam("B1", BeamSpec::plain(30.0, 50.0));
//! project.counts = BeamCountManifest::new().with("1F", "B1", &[400.0]);
//!
//! assert!(project.validate().is_ok());
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("25-042"));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::beams::BeamCatalog;
use crate::errors::TakeoffResult;
use crate::manifest::BeamCountManifest;
use crate::materials::SteelCatalog;

/// Current schema version for .tko.json files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeoffProject {
    /// Project metadata (version, estimator, job info)
    pub meta: ProjectMetadata,

    /// Run configuration
    #[serde(default)]
    pub settings: GlobalSettings,

    /// Bar size properties
    pub steel: SteelCatalog,

    /// Beam type specifications
    pub beams: BeamCatalog,

    /// Placed beams
    pub counts: BeamCountManifest,
}

impl TakeoffProject {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `estimator` - Name of the person responsible for the takeoff
    /// * `job_id` - Job/project number (e.g., "25-001")
    /// * `client` - Client name
    pub fn new(estimator: impl Into<String>, job_id: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        TakeoffProject {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                estimator: estimator.into(),
                job_id: job_id.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            steel: SteelCatalog::new(),
            beams: BeamCatalog::new(),
            counts: BeamCountManifest::new(),
        }
    }

    /// Build a project from separately loaded input documents.
    pub fn from_inputs(steel: SteelCatalog, beams: BeamCatalog, counts: BeamCountManifest) -> Self {
        TakeoffProject {
            steel,
            beams,
            counts,
            ..TakeoffProject::default()
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Validate all inputs and their cross references.
    ///
    /// Runs before any computation so that a bad reference aborts the run
    /// instead of producing a partial estimate.
    pub fn validate(&self) -> TakeoffResult<()> {
        self.steel.validate()?;
        self.beams.validate()?;
        self.beams.check_bar_sizes(&self.steel)?;
        self.counts.validate()?;
        self.counts.check_beam_types(&self.beams)?;
        Ok(())
    }
}

impl Default for TakeoffProject {
    fn default() -> Self {
        TakeoffProject::new("", "", "")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Name of the responsible estimator
    pub estimator: String,

    /// Job/project number
    pub job_id: String,

    /// Client name
    pub client: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Settings passed to the aggregator and the result table at call time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// What to do when end zones leave a negative center span
    pub cutback_policy: CutbackPolicy,

    /// Language of result table labels
    pub label_language: LabelLanguage,

    /// Add one total-length row per bar size
    pub include_lengths: bool,
}

/// Handling of end zones longer than the beam itself.
///
/// A non-full center bar is cut back by the side bar length (once or twice),
/// and the center stirrup zone is what remains after both end stirrup zones.
/// Either can go negative on inconsistent input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutbackPolicy {
    /// Fail the run with an invalid-input error
    #[default]
    Reject,
    /// Treat the remaining span as zero
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelLanguage {
    #[default]
    English,
    /// Headings used by legacy takeoff spreadsheets
    Chinese,
}
