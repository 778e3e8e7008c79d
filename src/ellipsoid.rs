//! # Reference ellipsoids
//!
//! An [`Ellipsoid`] bundles the three shape constants consumed by the Cartesian ⇄ geodetic
//! conversion:
//!
//! - `a`   – semi-major (equatorial) axis, in **meters**,
//! - `e²`  – first eccentricity squared,
//! - `e′²` – second eccentricity squared.
//!
//! The semi-minor axis `b = a·√(1 − e²)` and the prime-vertical radius of curvature `N(B)` are
//! derived on demand.
//!
//! ## Presets
//!
//! | Name       | a (m)     | e²              | e′²              |
//! |------------|-----------|-----------------|------------------|
//! | `WGS84`    | 6378137.0 | 0.0066943799013 | 0.00673949674227 |
//! | `CGCS2000` | 6378137.0 | 0.00669438002290| 0.00673949677548 |
//! | `GRS80`    | 6378137.0 | 0.00669438002290| 0.00673949677548 |
//!
//! Presets can be looked up by name:
//!
//! ```rust
//! use geoframe::ellipsoid::Ellipsoid;
//!
//! let wgs84: Ellipsoid = "wgs84".parse().unwrap();
//! assert_eq!(wgs84, Ellipsoid::WGS84);
//! ```
//!
//! Ellipsoids are `serde`-(de)serializable so that custom surfaces can be read from a
//! configuration file; call [`Ellipsoid::validate`] (or hand them to
//! [`EllipsoidalConverter::builder`](crate::geodetic::EllipsoidalConverter::builder), which
//! does) before use.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{Meter, Radian};
use crate::geoframe_errors::GeoFrameError;

/// Shape constants of a reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ellipsoid {
    /// Semi-major axis `a`, in **meters**.
    pub semi_major_axis: Meter,
    /// First eccentricity squared `e²`.
    pub eccentricity_squared: f64,
    /// Second eccentricity squared `e′²`.
    pub second_eccentricity_squared: f64,
}

impl Ellipsoid {
    /// World Geodetic System 1984.
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_378_137.0,
        eccentricity_squared: 0.0066943799013,
        second_eccentricity_squared: 0.00673949674227,
    };

    /// China Geodetic Coordinate System 2000.
    pub const CGCS2000: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_378_137.0,
        eccentricity_squared: 0.00669438002290,
        second_eccentricity_squared: 0.00673949677548,
    };

    /// Geodetic Reference System 1980.
    pub const GRS80: Ellipsoid = Ellipsoid {
        semi_major_axis: 6_378_137.0,
        eccentricity_squared: 0.00669438002290,
        second_eccentricity_squared: 0.00673949677548,
    };

    /// Build a user-defined ellipsoid from its semi-major axis and first eccentricity squared.
    ///
    /// The second eccentricity squared is derived as `e′² = e² / (1 − e²)`.
    ///
    /// Errors
    /// ----------
    /// * [`GeoFrameError::InvalidInput`] if `a` is not strictly positive and finite, or if
    ///   `e²` lies outside `[0, 1)`.
    pub fn new(semi_major_axis: Meter, eccentricity_squared: f64) -> Result<Self, GeoFrameError> {
        let ellipsoid = Ellipsoid {
            semi_major_axis,
            eccentricity_squared,
            second_eccentricity_squared: eccentricity_squared / (1.0 - eccentricity_squared),
        };
        ellipsoid.validate()?;
        Ok(ellipsoid)
    }

    /// Check the shape constants describe a real oblate ellipsoid.
    pub fn validate(&self) -> Result<(), GeoFrameError> {
        let a = GeoFrameError::ensure_finite("semi_major_axis", self.semi_major_axis)?;
        let e2 = GeoFrameError::ensure_finite("eccentricity_squared", self.eccentricity_squared)?;
        let ep2 = GeoFrameError::ensure_finite(
            "second_eccentricity_squared",
            self.second_eccentricity_squared,
        )?;

        if a <= 0.0 {
            return Err(GeoFrameError::invalid(format!(
                "semi_major_axis must be > 0, got {a}"
            )));
        }
        if !(0.0..1.0).contains(&e2) {
            return Err(GeoFrameError::invalid(format!(
                "eccentricity_squared must lie in [0, 1), got {e2}"
            )));
        }
        if ep2 < 0.0 {
            return Err(GeoFrameError::invalid(format!(
                "second_eccentricity_squared must be >= 0, got {ep2}"
            )));
        }
        Ok(())
    }

    /// Semi-minor (polar) axis `b = a·√(1 − e²)`, in **meters**.
    pub fn semi_minor_axis(&self) -> Meter {
        self.semi_major_axis * (1.0 - self.eccentricity_squared).sqrt()
    }

    /// Flattening `f = 1 − b/a`.
    pub fn flattening(&self) -> f64 {
        1.0 - (1.0 - self.eccentricity_squared).sqrt()
    }

    /// Radius of curvature in the prime vertical, `N = a / √(1 − e²·sin²B)`.
    ///
    /// Arguments
    /// ---------
    /// * `latitude`: geodetic latitude `B` in **radians**.
    ///
    /// Returns
    /// -------
    /// * `N` in **meters**.
    pub fn prime_vertical_radius(&self, latitude: Radian) -> Meter {
        let sin_b = latitude.sin();
        self.semi_major_axis / (1.0 - self.eccentricity_squared * sin_b * sin_b).sqrt()
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::WGS84
    }
}

impl FromStr for Ellipsoid {
    type Err = GeoFrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WGS84" | "WGS-84" => Ok(Ellipsoid::WGS84),
            "CGCS2000" => Ok(Ellipsoid::CGCS2000),
            "GRS80" | "GRS-80" => Ok(Ellipsoid::GRS80),
            _ => Err(GeoFrameError::invalid(format!("unknown ellipsoid: {s}"))),
        }
    }
}
