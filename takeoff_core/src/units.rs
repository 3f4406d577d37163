//! # Unit Types
//!
//! Type-safe wrappers for the units a quantity takeoff moves through. Inputs
//! are metric construction units (centimeters for geometry, kg/m for bar
//! linear weight); outputs are billable units (m, m², m³, kg).
//!
//! Per-beam geometry stays in centimeter-based units. Conversion to output
//! units happens once, at the aggregation boundary, through the `From`
//! impls below.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{Centimeters, CubicCentimeters, CubicMeters, Meters};
//!
//! let bar: Meters = Centimeters(250.0).into();
//! assert_eq!(bar.0, 2.5);
//!
//! let volume: CubicMeters = CubicCentimeters(1_000_000.0).into();
//! assert!((volume.0 - 1.0).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub};

/// Centimeters to meters
pub const CM_TO_M: f64 = 0.01;
/// Square centimeters to square meters
pub const CM2_TO_M2: f64 = 1e-4;
/// Cubic centimeters to cubic meters
pub const CM3_TO_M3: f64 = 1e-6;

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 * CM_TO_M)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqCm(pub f64);

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SqM(pub f64);

impl From<SqCm> for SqM {
    fn from(sqcm: SqCm) -> Self {
        SqM(sqcm.0 * CM2_TO_M2)
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in cubic centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicCentimeters(pub f64);

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

impl From<CubicCentimeters> for CubicMeters {
    fn from(cc: CubicCentimeters) -> Self {
        CubicMeters(cc.0 * CM3_TO_M3)
    }
}

// ============================================================================
// Mass Units
// ============================================================================

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

/// Linear mass density in kilograms per meter
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KgPerM(pub f64);

impl Mul<Meters> for KgPerM {
    type Output = Kilograms;
    fn mul(self, rhs: Meters) -> Kilograms {
        Kilograms(self.0 * rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $type {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl Sum for $type {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                iter.fold(Self::default(), |acc, x| acc + x)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Centimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(SqCm);
impl_arithmetic!(SqM);
impl_arithmetic!(CubicCentimeters);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(Kilograms);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centimeters_to_meters() {
        let m: Meters = Centimeters(100.0).into();
        assert_eq!(m.0, 1.0);
    }

    #[test]
    fn test_area_and_volume_conversion() {
        let area: SqM = SqCm(10_000.0).into();
        assert!((area.0 - 1.0).abs() < 1e-12);

        let volume: CubicMeters = CubicCentimeters(1_000_000.0).into();
        assert!((volume.0 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weight_from_linear_density() {
        // 100 cm of bar at 2 kg/m
        let length: Meters = Centimeters(100.0).into();
        let weight = KgPerM(2.0) * length;
        assert!((weight.0 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Centimeters(10.0);
        let b = Centimeters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);

        let mut c = Centimeters(1.0);
        c += Centimeters(2.0);
        assert_eq!(c.0, 3.0);

        let total: Centimeters = [a, b, c].into_iter().sum();
        assert_eq!(total.0, 18.0);
    }

    #[test]
    fn test_serialization() {
        let cm = Centimeters(412.5);
        let json = serde_json::to_string(&cm).unwrap();
        assert_eq!(json, "412.5");

        let roundtrip: Centimeters = serde_json::from_str(&json).unwrap();
        assert_eq!(cm, roundtrip);
    }
}
