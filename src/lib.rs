//! # geoframe
//!
//! Geometric and reference-frame transformations for satellite-geodesy workflows:
//!
//! - [`geodetic`] – Cartesian ⇄ geodetic conversion on a configurable [`ellipsoid`].
//! - [`ref_frame`] – epoch-dependent 7-parameter Helmert transform between terrestrial frames.
//! - [`pierce_point`] – ionospheric pierce point of a station-to-satellite ray.
//!
//! The three components are independent, stateless and free of I/O; every call works on
//! plain values and either returns a result or a [`geoframe_errors::GeoFrameError`].
//!
//! ```rust
//! use geoframe::geodetic::cartesian_to_geodetic;
//! use geoframe::pierce_point::{PiercePointSolver, StationGeodetic};
//!
//! let station = cartesian_to_geodetic(-2148744.3, 4426641.2, 4044655.9)?;
//! let ipp = PiercePointSolver::default().compute(
//!     0.8727,
//!     1.0472,
//!     &StationGeodetic::from_geodetic(&station),
//! )?;
//! println!("{ipp:.12}");
//! # Ok::<(), geoframe::geoframe_errors::GeoFrameError>(())
//! ```

pub mod constants;
pub mod ellipsoid;
pub mod geodetic;
pub mod geoframe_errors;
pub mod pierce_point;
pub mod ref_frame;
