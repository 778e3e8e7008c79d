//! # Ionospheric pierce point
//!
//! Locate the point where a satellite-to-receiver signal crosses a thin ionospheric shell,
//! given the azimuth/elevation of the satellite seen from the station and the station's
//! geodetic latitude/longitude.
//!
//! ## Geometry
//!
//! ```text
//! zr  = π/2 − elevation                          zenith angle at the station
//! z   = asin( R·sin(zr) / (R + h) )              zenith angle at the shell
//! ψ   = zr − z                                   Earth-central angle station → pierce point
//! φp  = asin( cos ψ·sin φ + sin ψ·cos φ·cos A )
//! λp  = λ + asin( sin ψ·sin A / cos φp )         (near side)
//! λp  = λ + π − asin( sin ψ·sin A / cos φp )     (far side, past the pole)
//! ```
//!
//! The far-side branch is taken when the pierce point lies beyond ±70° latitude and the ray
//! crosses over the pole, as decided by
//!
//! ```text
//! D  =  tan ψ·cos A − tan(π/2 − φ)      (north: φp >  70° and D  > 0)
//! D1 = −tan ψ·cos A − tan(π/2 + φ)      (south: φp < −70° and D1 > 0)
//! ```
//!
//! The 70° threshold is an empirical guard, not a geometric derivation.
//!
//! The longitude is finally wrapped once into `(−π, π]`.
//!
//! ## Units
//!
//! All angles are **radians**; the shell radius and height are **meters**.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::{Meter, Radian, DPI, POLE_COS_EPS, RADEG};
use crate::geodetic::GeodeticPoint;
use crate::geoframe_errors::GeoFrameError;

/// Pierce-point latitude beyond which the far-side longitude branch may apply.
pub const POLAR_BRANCH_LATITUDE: Radian = 70.0 * RADEG;

/// Thin-shell ionosphere model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IonosphericShell {
    /// Mean Earth radius `R`, in **meters**.
    pub earth_radius: Meter,
    /// Shell height `h` above the Earth surface, in **meters**.
    pub height: Meter,
}

impl Default for IonosphericShell {
    fn default() -> Self {
        IonosphericShell {
            earth_radius: 6_371_000.0,
            height: 450_000.0,
        }
    }
}

impl IonosphericShell {
    /// Errors
    /// ----------
    /// * [`GeoFrameError::InvalidInput`] unless `earth_radius > 0` and `height ≥ 0`, both finite.
    pub fn new(earth_radius: Meter, height: Meter) -> Result<Self, GeoFrameError> {
        let shell = IonosphericShell {
            earth_radius,
            height,
        };
        shell.validate()?;
        Ok(shell)
    }

    pub fn validate(&self) -> Result<(), GeoFrameError> {
        let r = GeoFrameError::ensure_finite("earth_radius", self.earth_radius)?;
        let h = GeoFrameError::ensure_finite("shell height", self.height)?;
        if r <= 0.0 {
            return Err(GeoFrameError::invalid(format!(
                "earth_radius must be > 0, got {r}"
            )));
        }
        if h < 0.0 {
            return Err(GeoFrameError::invalid(format!(
                "shell height must be >= 0, got {h}"
            )));
        }
        Ok(())
    }
}

/// Station latitude/longitude in **radians**.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationGeodetic {
    latitude: Radian,
    longitude: Radian,
}

impl StationGeodetic {
    /// Errors
    /// ----------
    /// * [`GeoFrameError::InvalidInput`] if a value is not finite or the latitude is outside
    ///   `[−π/2, π/2]`.
    ///
    /// Any finite longitude is accepted and reduced into `(−π, π]`, so stations given in the
    /// `[0, 2π)` convention work unchanged.
    pub fn new(latitude: Radian, longitude: Radian) -> Result<Self, GeoFrameError> {
        GeoFrameError::ensure_finite("station latitude", latitude)?;
        GeoFrameError::ensure_finite("station longitude", longitude)?;

        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&latitude) {
            return Err(GeoFrameError::invalid(format!(
                "station latitude must lie in [-π/2, π/2], got {latitude}"
            )));
        }

        Ok(StationGeodetic {
            latitude,
            longitude: normalize_longitude(longitude.rem_euclid(DPI)),
        })
    }

    /// Station taken from a converted geodetic position (degrees → radians, height dropped).
    pub fn from_geodetic(point: &GeodeticPoint) -> Self {
        StationGeodetic {
            latitude: point.latitude_rad().clamp(-FRAC_PI_2, FRAC_PI_2),
            longitude: point.longitude_rad().clamp(-PI, PI),
        }
    }

    pub fn latitude(&self) -> Radian {
        self.latitude
    }

    pub fn longitude(&self) -> Radian {
        self.longitude
    }
}

/// Ionospheric pierce point, in **radians**; longitude in `(−π, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiercePoint {
    pub latitude: Radian,
    pub longitude: Radian,
}

/// Space-separated `lat lon`; a requested precision (`{:.12}`) applies to both fields.
impl fmt::Display for PiercePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.p$} {:.p$}", self.latitude, self.longitude, p = p),
            None => write!(f, "{} {}", self.latitude, self.longitude),
        }
    }
}

/// Pierce-point solver bound to one [`IonosphericShell`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PiercePointSolver {
    shell: IonosphericShell,
}

impl PiercePointSolver {
    pub fn new(shell: IonosphericShell) -> Result<Self, GeoFrameError> {
        shell.validate()?;
        Ok(PiercePointSolver { shell })
    }

    pub fn shell(&self) -> &IonosphericShell {
        &self.shell
    }

    /// Compute the pierce point of the ray leaving `station` towards `(azimuth, elevation)`.
    ///
    /// Arguments
    /// ---------
    /// * `azimuth`: azimuth of the satellite seen from the station, **radians**.
    /// * `elevation`: elevation of the satellite, **radians**, in `(0, π/2]`.
    /// * `station`: station geodetic latitude/longitude.
    ///
    /// Errors
    /// ----------
    /// * [`GeoFrameError::InvalidInput`] if the azimuth is not finite, if the elevation is
    ///   outside `(0, π/2]` (signal at or below the horizon), or if the pierce point falls on
    ///   a pole where the longitude is undefined.
    pub fn compute(
        &self,
        azimuth: Radian,
        elevation: Radian,
        station: &StationGeodetic,
    ) -> Result<PiercePoint, GeoFrameError> {
        GeoFrameError::ensure_finite("azimuth", azimuth)?;
        GeoFrameError::ensure_finite("elevation", elevation)?;
        if elevation <= 0.0 || elevation > FRAC_PI_2 {
            return Err(GeoFrameError::invalid(format!(
                "elevation must lie in (0, π/2], got {elevation}"
            )));
        }

        let r = self.shell.earth_radius;
        let h = self.shell.height;
        let lat_s = station.latitude;

        let zr = FRAC_PI_2 - elevation;
        let z = (r * zr.sin() / (r + h)).asin();
        let psi = zr - z;

        let latitude = (psi.cos() * lat_s.sin() + psi.sin() * lat_s.cos() * azimuth.cos())
            .clamp(-1.0, 1.0)
            .asin();

        let cos_lat = latitude.cos();
        if cos_lat.abs() < POLE_COS_EPS {
            return Err(GeoFrameError::invalid(format!(
                "pierce point lies on a pole (latitude {latitude} rad), longitude is undefined"
            )));
        }

        let d_north = psi.tan() * azimuth.cos() - (FRAC_PI_2 - lat_s).tan();
        let d_south = -psi.tan() * azimuth.cos() - (FRAC_PI_2 + lat_s).tan();
        let far_side = (latitude > POLAR_BRANCH_LATITUDE && d_north > 0.0)
            || (latitude < -POLAR_BRANCH_LATITUDE && d_south > 0.0);

        let delta = (psi.sin() * azimuth.sin() / cos_lat).clamp(-1.0, 1.0).asin();
        let longitude = if far_side {
            debug!("pierce point crosses the pole: far-side branch (lat {latitude} rad)");
            station.longitude + PI - delta
        } else {
            station.longitude + delta
        };

        Ok(PiercePoint {
            latitude,
            longitude: normalize_longitude(longitude),
        })
    }
}

/// Wrap a longitude into `(−π, π]` by adding or subtracting 2π once.
///
/// Inputs within `(−3π, 3π]` land in range; the pierce-point solver never produces
/// anything wider.
pub fn normalize_longitude(longitude: Radian) -> Radian {
    if longitude > PI {
        longitude - DPI
    } else if longitude <= -PI {
        longitude + DPI
    } else {
        longitude
    }
}

/// Pierce point on the default 450 km shell over a 6371 km sphere.
///
/// Shortcut for [`PiercePointSolver::default`] followed by [`PiercePointSolver::compute`].
pub fn compute_pierce_point(
    azimuth: Radian,
    elevation: Radian,
    station_latitude: Radian,
    station_longitude: Radian,
) -> Result<PiercePoint, GeoFrameError> {
    let station = StationGeodetic::new(station_latitude, station_longitude)?;
    PiercePointSolver::default().compute(azimuth, elevation, &station)
}
