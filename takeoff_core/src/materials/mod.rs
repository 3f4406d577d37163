//! # Materials Database
//!
//! Material definitions used by the takeoff engine. Concrete and formwork are
//! measured geometrically and need no catalog; reinforcing bars are priced by
//! weight, so every bar size referenced by a beam must appear in the
//! [`SteelCatalog`].
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::materials::{BarSize, RebarProperties, SteelCatalog};
//!
//! let catalog = SteelCatalog::new()
//!     .with_bar(BarSize::parse("#4").unwrap(), RebarProperties::new(0.994, 40.0));
//!
//! let lap = catalog.lap_extension(&BarSize::parse("4").unwrap(), "example").unwrap();
//! assert_eq!(lap.0, 40.0);
//! ```

pub mod rebar;

pub use rebar::{BarSize, RebarProperties, SteelCatalog};
