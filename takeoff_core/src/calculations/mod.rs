//! # Quantity Calculations
//!
//! - [`beam`] - Quantities of one placed beam (cm-based, unconverted)
//! - [`aggregate`] - Project totals over the beam count manifest, converted
//!   to billable units
//!
//! Both follow the crate pattern of pure functions over JSON-serializable
//! inputs returning `TakeoffResult`.

pub mod aggregate;
pub mod beam;

// Re-export commonly used types
pub use aggregate::{calculate, QuantityAggregator, QuantityTotals, RawTotals};
pub use beam::{BeamInstance, BeamQuantities};
