//! # Terrestrial reference frame transforms
//!
//! Time-dependent 7-parameter similarity (Helmert) transform moving a geocentric Cartesian
//! point from one terrestrial reference frame into another at a given epoch.
//!
//! ## Two-stage design
//!
//! ```text
//! HelmertParams (mm, ppb, mas, per-year rates)  --prepare()-->  FrameTransform (m, unitless, rad)
//!                                                                  |
//!                                              transform(point, epoch)
//! ```
//!
//! [`HelmertParams`] carries the parameter set exactly as it is published (and as it would
//! appear in a configuration file). [`HelmertParams::prepare`] validates it and performs the
//! unit conversions once; the resulting [`FrameTransform`] only does the linear
//! extrapolation and the linearized similarity map on each call.
//!
//! ## Model
//!
//! With `Δt = epoch − reference_epoch` (decimal years, possibly negative), every parameter is
//! extrapolated linearly, `p(t) = p₀ + ṗ·Δt`, then
//!
//! ```text
//! xs = x + Tx + s·x − Rz·y + Ry·z
//! ys = y + Ty + Rz·x + s·y − Rx·z
//! zs = z + Tz − Ry·x + Rx·y − s·z
//! ```
//!
//! Accuracy degrades as `|Δt|` grows; no bound is enforced.
//!
//! ## Example
//!
//! ```rust
//! use geoframe::constants::CartesianPoint;
//! use geoframe::ref_frame::HelmertParams;
//!
//! let itrf14_to_cgcs2000 = HelmertParams::itrf2014_to_cgcs2000().prepare()?;
//! let station = CartesianPoint::new(-2148744.3, 4426641.2, 4044655.9);
//! let moved = itrf14_to_cgcs2000.transform(&station, 2020.5)?;
//! assert!((moved - station).norm() < 0.2);
//! # Ok::<(), geoframe::geoframe_errors::GeoFrameError>(())
//! ```

use hifitime::Epoch;
use log::debug;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::constants::{
    CartesianPoint, DecimalYear, Meter, MilliArcSec, Millimeter, PartsPerBillion, Radian, MM_TO_M,
    PPB, RADMAS,
};
use crate::geoframe_errors::GeoFrameError;

/// Published 7-parameter Helmert set with linear rates, in published units.
///
/// Units
/// -----
/// * `translation`, `translation_rate`: **millimeters**, **millimeters/year**.
/// * `scale`, `scale_rate`: **ppb**, **ppb/year**.
/// * `rotation`, `rotation_rate`: **milliarcseconds**, **milliarcseconds/year**.
/// * `reference_epoch`: decimal year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HelmertParams {
    pub translation: [Millimeter; 3],
    pub scale: PartsPerBillion,
    pub rotation: [MilliArcSec; 3],
    pub translation_rate: [Millimeter; 3],
    pub scale_rate: PartsPerBillion,
    pub rotation_rate: [MilliArcSec; 3],
    pub reference_epoch: DecimalYear,
}

impl HelmertParams {
    /// ITRF2014 → CGCS2000, reference epoch 2010.0.
    pub fn itrf2014_to_cgcs2000() -> Self {
        HelmertParams {
            translation: [7.4, -0.5, -62.8],
            scale: 3.80,
            rotation: [0.0, 0.0, 0.26],
            translation_rate: [0.1, -0.5, -3.3],
            scale_rate: 0.12,
            rotation_rate: [0.0, 0.0, 0.02],
            reference_epoch: 2010.0,
        }
    }

    /// All parameters and rates zero: the identity transform.
    pub fn zero(reference_epoch: DecimalYear) -> Self {
        HelmertParams {
            translation: [0.0; 3],
            scale: 0.0,
            rotation: [0.0; 3],
            translation_rate: [0.0; 3],
            scale_rate: 0.0,
            rotation_rate: [0.0; 3],
            reference_epoch,
        }
    }

    /// Validate the parameter set and convert it to SI units.
    ///
    /// Errors
    /// ----------
    /// * [`GeoFrameError::InvalidInput`] if any parameter, rate or the reference epoch is not
    ///   finite.
    pub fn prepare(&self) -> Result<FrameTransform, GeoFrameError> {
        let named = [
            ("translation.x", self.translation[0]),
            ("translation.y", self.translation[1]),
            ("translation.z", self.translation[2]),
            ("scale", self.scale),
            ("rotation.x", self.rotation[0]),
            ("rotation.y", self.rotation[1]),
            ("rotation.z", self.rotation[2]),
            ("translation_rate.x", self.translation_rate[0]),
            ("translation_rate.y", self.translation_rate[1]),
            ("translation_rate.z", self.translation_rate[2]),
            ("scale_rate", self.scale_rate),
            ("rotation_rate.x", self.rotation_rate[0]),
            ("rotation_rate.y", self.rotation_rate[1]),
            ("rotation_rate.z", self.rotation_rate[2]),
            ("reference_epoch", self.reference_epoch),
        ];
        for (name, value) in named {
            GeoFrameError::ensure_finite(name, value)?;
        }

        let transform = FrameTransform {
            translation: Vector3::from(self.translation) * MM_TO_M,
            scale: self.scale * PPB,
            rotation: Vector3::from(self.rotation) * RADMAS,
            translation_rate: Vector3::from(self.translation_rate) * MM_TO_M,
            scale_rate: self.scale_rate * PPB,
            rotation_rate: Vector3::from(self.rotation_rate) * RADMAS,
            reference_epoch: self.reference_epoch,
        };
        debug!("prepared Helmert transform: {transform:?}");
        Ok(transform)
    }
}

impl Default for HelmertParams {
    fn default() -> Self {
        Self::itrf2014_to_cgcs2000()
    }
}

/// The seven Helmert parameters extrapolated to one epoch, in SI units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveParameters {
    /// `(Tx, Ty, Tz)` in **meters**.
    pub translation: Vector3<Meter>,
    /// `s`, unitless.
    pub scale: f64,
    /// `(Rx, Ry, Rz)` in **radians** (small angles).
    pub rotation: Vector3<Radian>,
}

impl EffectiveParameters {
    /// The linear block `M` such that `p' = p + T + M·p`.
    fn linear_part(&self) -> Matrix3<f64> {
        let (rx, ry, rz) = (self.rotation.x, self.rotation.y, self.rotation.z);
        let s = self.scale;
        Matrix3::new(
            s, -rz, ry, //
            rz, s, -rx, //
            -ry, rx, -s,
        )
    }
}

/// Validated Helmert transform with parameters already in SI units.
///
/// Build it with [`HelmertParams::prepare`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTransform {
    translation: Vector3<Meter>,
    scale: f64,
    rotation: Vector3<Radian>,
    translation_rate: Vector3<Meter>,
    scale_rate: f64,
    rotation_rate: Vector3<Radian>,
    reference_epoch: DecimalYear,
}

impl FrameTransform {
    pub fn reference_epoch(&self) -> DecimalYear {
        self.reference_epoch
    }

    /// Parameters extrapolated to `epoch` (decimal year).
    pub fn effective_parameters(&self, epoch: DecimalYear) -> EffectiveParameters {
        let dt = epoch - self.reference_epoch;
        EffectiveParameters {
            translation: self.translation + self.translation_rate * dt,
            scale: self.scale + self.scale_rate * dt,
            rotation: self.rotation + self.rotation_rate * dt,
        }
    }

    /// Move `point` into the target frame at `epoch`.
    ///
    /// Arguments
    /// ---------
    /// * `point`: geocentric position in the source frame, **meters**.
    /// * `epoch`: epoch of the coordinates, decimal year.
    ///
    /// Errors
    /// ----------
    /// * [`GeoFrameError::InvalidInput`] if the point or the epoch is not finite.
    pub fn transform(
        &self,
        point: &CartesianPoint,
        epoch: DecimalYear,
    ) -> Result<CartesianPoint, GeoFrameError> {
        GeoFrameError::ensure_finite("epoch", epoch)?;
        ensure_finite_point(point)?;

        let params = self.effective_parameters(epoch);
        Ok(point + params.translation + params.linear_part() * point)
    }

    /// Same as [`FrameTransform::transform`], taking the epoch as a [`hifitime::Epoch`].
    pub fn transform_at(
        &self,
        point: &CartesianPoint,
        epoch: &Epoch,
    ) -> Result<CartesianPoint, GeoFrameError> {
        self.transform(point, decimal_year(epoch))
    }

    /// Transform every point of `points` at the same epoch.
    ///
    /// The parameters are extrapolated once for the whole batch. The first invalid point
    /// aborts the batch.
    pub fn transform_batch(
        &self,
        points: &[CartesianPoint],
        epoch: DecimalYear,
    ) -> Result<Vec<CartesianPoint>, GeoFrameError> {
        GeoFrameError::ensure_finite("epoch", epoch)?;

        let params = self.effective_parameters(epoch);
        let linear = params.linear_part();
        points
            .iter()
            .map(|p| {
                ensure_finite_point(p)?;
                Ok(p + params.translation + linear * p)
            })
            .collect()
    }
}

fn ensure_finite_point(point: &CartesianPoint) -> Result<(), GeoFrameError> {
    GeoFrameError::ensure_finite("x", point.x)?;
    GeoFrameError::ensure_finite("y", point.y)?;
    GeoFrameError::ensure_finite("z", point.z)?;
    Ok(())
}

/// Decimal year of `epoch` on the UTC calendar, e.g. 2020-07-02T00:00:00 UTC → `2020.5`.
///
/// The fraction is the elapsed part of the calendar year containing `epoch`, so leap years
/// and leap seconds are accounted for by the year length.
pub fn decimal_year(epoch: &Epoch) -> DecimalYear {
    let (year, _, _, _, _, _, _) = epoch.to_gregorian_utc();
    let start = Epoch::from_gregorian_utc_at_midnight(year, 1, 1);
    let end = Epoch::from_gregorian_utc_at_midnight(year + 1, 1, 1);

    year as f64 + (*epoch - start).to_seconds() / (end - start).to_seconds()
}

#[cfg(test)]
mod ref_frame_test {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn station() -> CartesianPoint {
        CartesianPoint::new(-2148744.3, 4426641.2, 4044655.9)
    }

    #[test]
    fn test_zero_parameters_are_identity() {
        let identity = HelmertParams::zero(2010.0).prepare().unwrap();
        let p = station();

        assert_eq!(identity.transform(&p, 2010.0).unwrap(), p);
        assert_eq!(identity.transform(&p, 2035.25).unwrap(), p);
    }

    #[test]
    fn test_reference_epoch_applies_base_parameters() {
        let params = HelmertParams::itrf2014_to_cgcs2000();
        let transform = params.prepare().unwrap();
        let p = station();

        let moved = transform.transform(&p, params.reference_epoch).unwrap();

        let tx = 7.4e-3;
        let ty = -0.5e-3;
        let tz = -62.8e-3;
        let s = 3.80e-9;
        let rz = 0.26 * std::f64::consts::PI / 648_000_000.0;

        assert_abs_diff_eq!(moved.x, p.x + tx + s * p.x - rz * p.y, epsilon = 1e-9);
        assert_abs_diff_eq!(moved.y, p.y + ty + rz * p.x + s * p.y, epsilon = 1e-9);
        assert_abs_diff_eq!(moved.z, p.z + tz - s * p.z, epsilon = 1e-9);
    }

    #[test]
    fn test_rates_extrapolate_linearly() {
        let transform = HelmertParams::itrf2014_to_cgcs2000().prepare().unwrap();

        let eff = transform.effective_parameters(2020.5);
        assert_abs_diff_eq!(eff.translation.x, 8.45e-3, epsilon = 1e-15);
        assert_abs_diff_eq!(eff.translation.y, -5.75e-3, epsilon = 1e-15);
        assert_abs_diff_eq!(eff.translation.z, -97.45e-3, epsilon = 1e-15);
        assert_abs_diff_eq!(eff.scale, 5.06e-9, epsilon = 1e-20);
        assert_abs_diff_eq!(
            eff.rotation.z,
            0.47 * std::f64::consts::PI / 648_000_000.0,
            epsilon = 1e-20
        );

        let moved = transform.transform(&station(), 2020.5).unwrap();
        assert_abs_diff_eq!(moved.x, -2148744.3125092983, epsilon = 1e-7);
        assert_abs_diff_eq!(moved.y, 4426641.211752624, epsilon = 1e-7);
        assert_abs_diff_eq!(moved.z, 4044655.7820840413, epsilon = 1e-7);
    }

    #[test]
    fn test_epoch_before_reference() {
        let transform = HelmertParams::itrf2014_to_cgcs2000().prepare().unwrap();
        let moved = transform.transform(&station(), 2000.0).unwrap();

        assert_abs_diff_eq!(moved.x, -2148744.3004743927, epsilon = 1e-7);
        assert_abs_diff_eq!(moved.y, 4426641.215384223, epsilon = 1e-7);
        assert_abs_diff_eq!(moved.z, 4044655.8596838946, epsilon = 1e-7);
    }

    #[test]
    fn test_invalid_inputs() {
        let mut params = HelmertParams::itrf2014_to_cgcs2000();
        params.rotation_rate[1] = f64::NAN;
        assert_eq!(
            params.prepare(),
            Err(GeoFrameError::InvalidInput(
                "rotation_rate.y must be finite, got NaN".to_string()
            ))
        );

        let transform = HelmertParams::default().prepare().unwrap();
        assert!(matches!(
            transform.transform(&station(), f64::INFINITY),
            Err(GeoFrameError::InvalidInput(_))
        ));
        assert!(matches!(
            transform.transform(&CartesianPoint::new(1.0, f64::NAN, 0.0), 2010.0),
            Err(GeoFrameError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_batch_matches_single() {
        let transform = HelmertParams::default().prepare().unwrap();
        let points = [
            station(),
            CartesianPoint::new(-953076.9, -6542517.5, 2453130.2),
        ];

        let batch = transform.transform_batch(&points, 2018.0).unwrap();
        for (p, q) in points.iter().zip(batch.iter()) {
            assert_eq!(transform.transform(p, 2018.0).unwrap(), *q);
        }

        let bad = [station(), CartesianPoint::new(f64::NAN, 0.0, 0.0)];
        assert!(transform.transform_batch(&bad, 2018.0).is_err());
    }

    #[test]
    fn test_decimal_year() {
        let start = Epoch::from_gregorian_utc_at_midnight(2010, 1, 1);
        assert_eq!(decimal_year(&start), 2010.0);

        // 2020 is a leap year: July 2nd 00:00 is day 183 of 366
        let mid = Epoch::from_gregorian_utc_at_midnight(2020, 7, 2);
        assert_abs_diff_eq!(decimal_year(&mid), 2020.5, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_at_epoch() {
        let transform = HelmertParams::default().prepare().unwrap();
        let epoch = Epoch::from_gregorian_utc_at_midnight(2020, 7, 2);

        let via_epoch = transform.transform_at(&station(), &epoch).unwrap();
        let via_year = transform.transform(&station(), 2020.5).unwrap();
        assert_abs_diff_eq!((via_epoch - via_year).norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_params_from_config() {
        let json = r#"{
            "translation": [0.0, 0.0, 0.0],
            "scale": 0.0,
            "rotation": [0.0, 0.0, 1000.0],
            "translation_rate": [0.0, 0.0, 0.0],
            "scale_rate": 0.0,
            "rotation_rate": [0.0, 0.0, 0.0],
            "reference_epoch": 2015.0
        }"#;
        let params: HelmertParams = serde_json::from_str(json).unwrap();
        let transform = params.prepare().unwrap();
        assert_eq!(transform.reference_epoch(), 2015.0);

        // 1 arcsecond about z applied to a point on the x axis
        let moved = transform
            .transform(&CartesianPoint::new(6_378_137.0, 0.0, 0.0), 2015.0)
            .unwrap();
        assert_abs_diff_eq!(moved.x, 6_378_137.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            moved.y,
            6_378_137.0 * std::f64::consts::PI / 648_000.0,
            epsilon = 1e-9
        );
    }
}
