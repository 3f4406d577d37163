//! # takeoff_core - Beam Quantity Takeoff Engine
//!
//! `takeoff_core` computes billable material quantities for reinforced
//! concrete beams: reinforcing bar weight per bar size, concrete volume, and
//! formwork area. Inputs are a steel catalog, per-type beam specifications,
//! and a manifest of how many beams of each type are placed at which length.
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: One batch computation over validated inputs; the same
//!   inputs always give the same table
//! - **JSON-First**: All inputs and results implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, and no partial results
//! - **Units at the edge**: Geometry stays in cm until aggregation converts it
//!
//! ## Quick Start
//!
//! ```rust
//! use takeoff_core::beams::{BeamCatalog, BeamSpec};
//! use takeoff_core::calculations::calculate;
//! use takeoff_core::manifest::BeamCountManifest;
//! use takeoff_core::materials::SteelCatalog;
//! use takeoff_core::project::TakeoffProject;
//! use takeoff_core::report::ResultTable;
//!
//! let project = TakeoffProject::from_inputs(
//!     SteelCatalog::new(),
//!     BeamCatalog::new().with_beam("B1", BeamSpec::plain(30.0, 50.0)),
//!     BeamCountManifest::new().with("1F", "B1", &[400.0]),
//! );
//!
//! let totals = calculate(&project).unwrap();
//! let table = ResultTable::from_totals(&totals, &project.settings);
//! println!("{}", table);
//! ```
//!
//! ## Modules
//!
//! - [`materials`] - Steel catalog (bar sizes, unit weights, lap extensions)
//! - [`beams`] - Beam type specifications
//! - [`manifest`] - Beam count manifest
//! - [`calculations`] - Per-beam quantities and project aggregation
//! - [`quantities`] - Bar length tallies with additive merge
//! - [`report`] - Sorted, labeled result table
//! - [`project`] - Project bundle and run settings
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Input loading and atomic result writing

pub mod beams;
pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod manifest;
pub mod materials;
pub mod project;
pub mod quantities;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, QuantityAggregator, QuantityTotals};
pub use errors::{TakeoffError, TakeoffResult};
pub use file_io::{load_inputs, load_project, save_project, InputPaths};
pub use project::{GlobalSettings, TakeoffProject};
pub use report::{ResultTable, TakeoffReport};
