//! # Constants and type definitions for geoframe
//!
//! This module centralizes the **unit conversion factors**, **numerical thresholds** and
//! **type aliases** shared by the coordinate, frame and pierce-point modules.
//!
//! ## Overview
//!
//! - Unit conversions (degrees ↔ radians, milliarcseconds → radians, mm → m, ppb → unitless)
//! - Thresholds used to detect degenerate geometry
//! - Core type aliases used across the crate
//!
//! Ellipsoid parameters are deliberately **not** defined here: they live in
//! [`Ellipsoid`](crate::ellipsoid::Ellipsoid) presets so alternate reference surfaces can be
//! substituted without touching any global.

use nalgebra::Vector3;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for longitude wrapping
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Milliarcseconds → radians
pub const RADMAS: f64 = std::f64::consts::PI / 648_000_000.0;

/// Millimeters → meters
pub const MM_TO_M: f64 = 1e-3;

/// Parts per billion → unitless factor
pub const PPB: f64 = 1e-9;

// -------------------------------------------------------------------------------------------------
// Numerical thresholds
// -------------------------------------------------------------------------------------------------

/// Below this planar radius (meters) a point is considered to lie on the rotation axis.
pub const AXIS_RADIUS_EPS: f64 = 1e-10;

/// Below this magnitude (meters) the x component is treated as zero when resolving longitude.
pub const LONGITUDE_X_EPS: f64 = 1e-10;

/// Below this value `cos(latitude)` is treated as zero (pierce point on a pole).
pub const POLE_COS_EPS: f64 = 1e-12;

/// Default convergence threshold of the iterative latitude solve (radians).
pub const LATITUDE_TOLERANCE: f64 = 1e-10;

/// Default iteration cap of the iterative latitude solve.
pub const MAX_LATITUDE_ITERATIONS: usize = 50;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in meters
pub type Meter = f64;
/// Distance in millimeters
pub type Millimeter = f64;
/// Angle in milliarcseconds
pub type MilliArcSec = f64;
/// Scale in parts per billion
pub type PartsPerBillion = f64;
/// Epoch expressed as a decimal year (e.g. `2010.0`)
pub type DecimalYear = f64;

/// Geocentric Cartesian position (x, y, z) in meters.
pub type CartesianPoint = Vector3<Meter>;
