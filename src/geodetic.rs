//! # Cartesian ⇄ geodetic conversion
//!
//! This module converts geocentric Cartesian coordinates `(x, y, z)` into geodetic
//! coordinates `(B, L, H)` on a reference [`Ellipsoid`], and back.
//!
//! ## Conventions
//!
//! - Cartesian input/output: **meters**, geocentric, Earth-fixed ([`CartesianPoint`]).
//! - Geodetic latitude `B` and longitude `L`: **degrees**, `−90 ≤ B ≤ 90`, `−180 < L ≤ 180`.
//! - Ellipsoidal height `H`: **meters**.
//!
//! ## Algorithm
//!
//! The inverse problem (Cartesian → geodetic) starts from the closed-form reduced-latitude
//! estimate
//!
//! ```text
//! θ  = atan( a·z / (b·r) )                      r = √(x² + y²)
//! B₀ = atan( (z + e′²·b·sin³θ) / (r − e²·a·cos³θ) )
//! ```
//!
//! and refines it by fixed-point iteration
//!
//! ```text
//! Bₙ₊₁ = atan( (z + a·e²·sin Bₙ / √(1 − e²·sin²Bₙ)) / r )
//! ```
//!
//! until `|Bₙ₊₁ − Bₙ|` drops below the configured tolerance, then keeps refining while the
//! step still shrinks. The iteration count is capped; hitting the cap before the tolerance
//! is met is reported as [`GeoFrameError::ConvergenceFailure`].
//!
//! The direct problem (geodetic → Cartesian) is closed-form:
//!
//! ```text
//! x = (N + H)·cos B·cos L
//! y = (N + H)·cos B·sin L
//! z = (N·(1 − e²) + H)·sin B
//! ```
//!
//! ## Example
//!
//! ```rust
//! use geoframe::geodetic::{cartesian_to_geodetic, geodetic_to_cartesian};
//!
//! let blh = cartesian_to_geodetic(-2148744.3, 4426641.2, 4044655.9)?;
//! let xyz = geodetic_to_cartesian(blh.latitude(), blh.longitude(), blh.height())?;
//! assert!((xyz.x + 2148744.3).abs() < 1e-6);
//! # Ok::<(), geoframe::geoframe_errors::GeoFrameError>(())
//! ```

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use log::{debug, warn};

use crate::constants::{
    CartesianPoint, Degree, Meter, Radian, AXIS_RADIUS_EPS, DPI, LATITUDE_TOLERANCE,
    LONGITUDE_X_EPS, MAX_LATITUDE_ITERATIONS,
};
use crate::ellipsoid::Ellipsoid;
use crate::geoframe_errors::GeoFrameError;

/// Geodetic position on a reference ellipsoid.
///
/// Latitude and longitude are stored in **degrees**, height in **meters**. Instances are
/// either produced by [`EllipsoidalConverter::cartesian_to_geodetic`] or validated by
/// [`GeodeticPoint::new`], so the ranges `−90 ≤ B ≤ 90` and `−180 < L ≤ 180` always hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticPoint {
    latitude: Degree,
    longitude: Degree,
    height: Meter,
}

impl GeodeticPoint {
    /// Build a geodetic point, checking the latitude/longitude ranges.
    ///
    /// Errors
    /// ----------
    /// * [`GeoFrameError::InvalidInput`] if any component is not finite, if the latitude is
    ///   outside `[−90, 90]` or the longitude outside `(−180, 180]`.
    pub fn new(latitude: Degree, longitude: Degree, height: Meter) -> Result<Self, GeoFrameError> {
        GeoFrameError::ensure_finite("latitude", latitude)?;
        GeoFrameError::ensure_finite("longitude", longitude)?;
        GeoFrameError::ensure_finite("height", height)?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoFrameError::invalid(format!(
                "latitude must lie in [-90, 90] degrees, got {latitude}"
            )));
        }
        if longitude <= -180.0 || longitude > 180.0 {
            return Err(GeoFrameError::invalid(format!(
                "longitude must lie in (-180, 180] degrees, got {longitude}"
            )));
        }

        Ok(GeodeticPoint {
            latitude,
            longitude,
            height,
        })
    }

    /// Geodetic latitude `B`, in **degrees**.
    pub fn latitude(&self) -> Degree {
        self.latitude
    }

    /// Geodetic longitude `L`, in **degrees** (east positive).
    pub fn longitude(&self) -> Degree {
        self.longitude
    }

    /// Ellipsoidal height `H`, in **meters**.
    pub fn height(&self) -> Meter {
        self.height
    }

    /// Geodetic latitude in **radians**.
    pub fn latitude_rad(&self) -> Radian {
        self.latitude.to_radians()
    }

    /// Geodetic longitude in **radians**.
    pub fn longitude_rad(&self) -> Radian {
        self.longitude.to_radians()
    }
}

/// Space-separated `B L H`; a requested precision (`{:.12}`) applies to every field.
impl fmt::Display for GeodeticPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(
                f,
                "{:.p$} {:.p$} {:.p$}",
                self.latitude,
                self.longitude,
                self.height,
                p = p
            ),
            None => write!(f, "{} {} {}", self.latitude, self.longitude, self.height),
        }
    }
}

/// Bidirectional Cartesian ⇄ geodetic converter bound to one reference ellipsoid.
///
/// The converter owns every constant it needs (ellipsoid shape, latitude tolerance and
/// iteration cap), so several converters on different ellipsoids can coexist. It holds no
/// mutable state and can be shared freely across threads.
///
/// See also
/// ------------
/// * [`EllipsoidalConverter::builder`] – Validated construction with custom settings.
/// * [`cartesian_to_geodetic`], [`geodetic_to_cartesian`] – WGS84 shortcuts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsoidalConverter {
    ellipsoid: Ellipsoid,
    latitude_tolerance: Radian,
    max_iterations: usize,
}

impl Default for EllipsoidalConverter {
    fn default() -> Self {
        EllipsoidalConverter {
            ellipsoid: Ellipsoid::WGS84,
            latitude_tolerance: LATITUDE_TOLERANCE,
            max_iterations: MAX_LATITUDE_ITERATIONS,
        }
    }
}

impl EllipsoidalConverter {
    /// Converter on `ellipsoid` with the default tolerance (1e-10 rad) and iteration cap (50).
    ///
    /// Errors
    /// ----------
    /// * [`GeoFrameError::InvalidInput`] if the ellipsoid constants are invalid.
    pub fn new(ellipsoid: Ellipsoid) -> Result<Self, GeoFrameError> {
        Self::builder().ellipsoid(ellipsoid).build()
    }

    /// Create a new [`EllipsoidalConverterBuilder`] to configure custom parameters.
    ///
    /// ```rust
    /// use geoframe::ellipsoid::Ellipsoid;
    /// use geoframe::geodetic::EllipsoidalConverter;
    ///
    /// let converter = EllipsoidalConverter::builder()
    ///     .ellipsoid(Ellipsoid::CGCS2000)
    ///     .latitude_tolerance(1e-12)
    ///     .max_iterations(20)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(converter.max_iterations(), 20);
    /// ```
    pub fn builder() -> EllipsoidalConverterBuilder {
        EllipsoidalConverterBuilder::new()
    }

    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    pub fn latitude_tolerance(&self) -> Radian {
        self.latitude_tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Radius of curvature in the prime vertical at `latitude` (**radians**), in meters.
    pub fn prime_vertical_radius(&self, latitude: Radian) -> Meter {
        self.ellipsoid.prime_vertical_radius(latitude)
    }

    /// Convert a geocentric Cartesian position into geodetic coordinates.
    ///
    /// Arguments
    /// ---------
    /// * `point`: geocentric `(x, y, z)` in **meters**.
    ///
    /// Returns
    /// --------
    /// * The [`GeodeticPoint`] `(B, L, H)`, angles in **degrees**, height in **meters**.
    ///
    /// Within a few tens of kilometers of the Earth's center the geodetic latitude is not
    /// unique; the solve may settle in the opposite hemisphere, e.g. `(1000, 0, 10)` gives
    /// `B ≈ −88.66°`, which still maps back to the same point.
    ///
    /// Errors
    /// ----------
    /// * [`GeoFrameError::InvalidInput`] if a component is not finite or if the point lies on
    ///   the rotation axis (planar radius ≤ 1e-10 m), where longitude is undefined and the
    ///   latitude iteration would divide by zero.
    /// * [`GeoFrameError::ConvergenceFailure`] if the latitude does not settle within the
    ///   iteration cap.
    pub fn cartesian_to_geodetic(
        &self,
        point: &CartesianPoint,
    ) -> Result<GeodeticPoint, GeoFrameError> {
        let x = GeoFrameError::ensure_finite("x", point.x)?;
        let y = GeoFrameError::ensure_finite("y", point.y)?;
        let z = GeoFrameError::ensure_finite("z", point.z)?;

        let r = (x * x + y * y).sqrt();
        if r <= AXIS_RADIUS_EPS {
            return Err(GeoFrameError::invalid(format!(
                "point lies on the rotation axis (planar radius {r} m)"
            )));
        }

        let latitude = self.solve_latitude(r, z)?;
        let sin_b = latitude.sin();
        let n = self.ellipsoid.prime_vertical_radius(latitude);
        let height = r * latitude.cos() + z * sin_b
            - n * (1.0 - self.ellipsoid.eccentricity_squared * sin_b * sin_b);

        Ok(GeodeticPoint {
            latitude: latitude.to_degrees(),
            longitude: longitude_from_xy(x, y).to_degrees(),
            height,
        })
    }

    /// Convert geodetic coordinates into a geocentric Cartesian position (closed-form).
    pub fn geodetic_to_cartesian(&self, point: &GeodeticPoint) -> CartesianPoint {
        let (sin_b, cos_b) = point.latitude_rad().sin_cos();
        let (sin_l, cos_l) = point.longitude_rad().sin_cos();
        let n = self.ellipsoid.prime_vertical_radius(point.latitude_rad());
        let h = point.height;

        CartesianPoint::new(
            (n + h) * cos_b * cos_l,
            (n + h) * cos_b * sin_l,
            (n * (1.0 - self.ellipsoid.eccentricity_squared) + h) * sin_b,
        )
    }

    /// Fixed-point latitude solve seeded with the reduced-latitude estimate.
    ///
    /// Once a step falls below the tolerance the iteration keeps going while the step still
    /// shrinks, bounded by the same cap.
    fn solve_latitude(&self, r: Meter, z: Meter) -> Result<Radian, GeoFrameError> {
        let a = self.ellipsoid.semi_major_axis;
        let b = self.ellipsoid.semi_minor_axis();
        let e2 = self.ellipsoid.eccentricity_squared;
        let ep2 = self.ellipsoid.second_eccentricity_squared;

        let theta = (a * z / (b * r)).atan();
        let (sin_t, cos_t) = theta.sin_cos();
        let mut latitude =
            ((z + ep2 * b * sin_t.powi(3)) / (r - e2 * a * cos_t.powi(3))).atan();

        let mut last_step = f64::INFINITY;
        let mut converged = false;
        for iteration in 1..=self.max_iterations {
            let sin_b = latitude.sin();
            let w = (1.0 - e2 * sin_b * sin_b).sqrt();

            // z/r·(1 + a·e²·sinB/(z·w)) with z factored in, so z = 0 stays finite
            let next = ((z + a * e2 * sin_b / w) / r).atan();
            let step = (next - latitude).abs();

            // past the tolerance, keep refining only while the step still shrinks
            if converged && step >= last_step {
                break;
            }

            last_step = step;
            latitude = next;

            if !converged && step < self.latitude_tolerance {
                debug!("latitude converged after {iteration} iteration(s), last step {step:e} rad");
                converged = true;
            }
            if converged && step == 0.0 {
                break;
            }
        }

        if converged {
            return Ok(latitude);
        }

        warn!(
            "latitude did not converge within {} iterations (last step {last_step:e} rad)",
            self.max_iterations
        );
        Err(GeoFrameError::ConvergenceFailure {
            iterations: self.max_iterations,
            last_step,
        })
    }
}

/// Longitude in radians, normalized into `(−π, π]`.
///
/// An x component within 1e-10 m of zero yields exactly ±π/2 following the sign of `y`.
fn longitude_from_xy(x: Meter, y: Meter) -> Radian {
    if x.abs() <= LONGITUDE_X_EPS {
        return if y > 0.0 { FRAC_PI_2 } else { -FRAC_PI_2 };
    }

    let longitude = y.atan2(x);
    if longitude <= -PI {
        longitude + DPI
    } else {
        longitude
    }
}

/// Builder for [`EllipsoidalConverter`], with validation.
#[derive(Debug, Clone)]
pub struct EllipsoidalConverterBuilder {
    converter: EllipsoidalConverter,
}

impl Default for EllipsoidalConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EllipsoidalConverterBuilder {
    /// Start from the WGS84 defaults.
    pub fn new() -> Self {
        Self {
            converter: EllipsoidalConverter::default(),
        }
    }

    pub fn ellipsoid(mut self, v: Ellipsoid) -> Self {
        self.converter.ellipsoid = v;
        self
    }

    pub fn latitude_tolerance(mut self, v: Radian) -> Self {
        self.converter.latitude_tolerance = v;
        self
    }

    pub fn max_iterations(mut self, v: usize) -> Self {
        self.converter.max_iterations = v;
        self
    }

    /// Validate and return the converter.
    ///
    /// Errors
    /// ----------
    /// * [`GeoFrameError::InvalidInput`] if the ellipsoid is invalid, the tolerance is not a
    ///   finite positive number, or the iteration cap is zero.
    pub fn build(self) -> Result<EllipsoidalConverter, GeoFrameError> {
        let c = &self.converter;

        c.ellipsoid.validate()?;

        if !(c.latitude_tolerance.is_finite() && c.latitude_tolerance > 0.0) {
            return Err(GeoFrameError::invalid(
                "latitude_tolerance must be finite and > 0",
            ));
        }
        if c.max_iterations == 0 {
            return Err(GeoFrameError::invalid("max_iterations must be >= 1"));
        }

        Ok(self.converter)
    }
}

/// Convert `(x, y, z)` (meters) to geodetic `(B, L, H)` on WGS84.
///
/// Shortcut for [`EllipsoidalConverter::default`] followed by
/// [`EllipsoidalConverter::cartesian_to_geodetic`].
pub fn cartesian_to_geodetic(x: Meter, y: Meter, z: Meter) -> Result<GeodeticPoint, GeoFrameError> {
    EllipsoidalConverter::default().cartesian_to_geodetic(&CartesianPoint::new(x, y, z))
}

/// Convert geodetic `(B, L, H)` (degrees, degrees, meters) to `(x, y, z)` on WGS84.
///
/// Errors
/// ----------
/// * [`GeoFrameError::InvalidInput`] if the inputs violate the [`GeodeticPoint`] ranges.
pub fn geodetic_to_cartesian(
    latitude: Degree,
    longitude: Degree,
    height: Meter,
) -> Result<CartesianPoint, GeoFrameError> {
    let point = GeodeticPoint::new(latitude, longitude, height)?;
    Ok(EllipsoidalConverter::default().geodetic_to_cartesian(&point))
}
