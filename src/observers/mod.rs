//! # Observer & Site Geometry
//!
//! This module holds the ground station from which azimuth/elevation tracking logs are
//! recorded. An [`Observer`](crate::observers::Observer) stores the geodetic site
//! (latitude, longitude, altitude) and **precomputes** the quantities every observation of
//! a run needs:
//!
//! - the site position in the **Earth-fixed** frame (km, spherical Earth),
//! - the sines and cosines of latitude and longitude used by the ENU → Earth-fixed rotation.
//!
//! ## Frames & conventions
//!
//! - **Earth-fixed**: origin at the Earth center, `z` through the north pole, `x` through the
//!   Greenwich meridian, rotating with the Earth.
//! - Longitudes are **degrees**, east positive. Latitudes are **degrees**, north positive.
//! - Altitude is **km** above a sphere of radius [`EARTH_RADIUS_KM`].
//!
//! ```text
//! (lat, lon, alt)  --spherical-->  r_obs · (cosφ cosλ, cosφ sinλ, sinφ)
//! ```
//!
//! ## Errors
//!
//! [`Observer::new`] rejects non-finite coordinates and latitudes outside `[-90°, 90°]`
//! with [`TracefitError::InvalidParams`].

use nalgebra::Vector3;

use crate::constants::{
    Degree, Kilometer, DEFAULT_OBSERVER_ALT_KM, DEFAULT_OBSERVER_LAT, DEFAULT_OBSERVER_LON,
    EARTH_RADIUS_KM,
};
use crate::tracefit_errors::TracefitError;

/// Ground station site with precomputed Earth-fixed state.
///
/// Units
/// -----
/// * `latitude`, `longitude`: degrees.
/// * `altitude`: km above the spherical Earth.
/// * `earth_fixed_position`: km.
#[derive(Debug, Clone, PartialEq)]
pub struct Observer {
    /// Geodetic latitude in **degrees**.
    pub latitude: Degree,

    /// Geodetic longitude in **degrees** east of Greenwich.
    pub longitude: Degree,

    /// Height above the spherical Earth in **km**.
    pub altitude: Kilometer,

    /// Optional human-readable site name.
    pub name: Option<String>,

    /// Precomputed `(sin φ, cos φ, sin λ, cos λ)`.
    trig: (f64, f64, f64, f64),

    /// Precomputed **Earth-fixed** position of the site in **km**.
    earth_fixed_position: Vector3<f64>,
}

impl Observer {
    /// Create a new observer from geodetic coordinates.
    ///
    /// Arguments
    /// -----------------
    /// * `latitude`: Geodetic latitude in **degrees**, within `[-90, 90]`.
    /// * `longitude`: Geodetic longitude in **degrees** (east positive).
    /// * `altitude`: Height above the spherical Earth in **km**.
    /// * `name`: Optional site name.
    ///
    /// Return
    /// ----------
    /// * A constructed [`Observer`] with precomputed Earth-fixed position.
    ///
    /// Errors
    /// ----------
    /// * [`TracefitError::InvalidParams`] on NaN/infinite inputs or an out-of-range latitude.
    pub fn new(
        latitude: Degree,
        longitude: Degree,
        altitude: Kilometer,
        name: Option<String>,
    ) -> Result<Observer, TracefitError> {
        if !(latitude.is_finite() && longitude.is_finite() && altitude.is_finite()) {
            return Err(TracefitError::InvalidParams(format!(
                "observer coordinates must be finite (lat={latitude}, lon={longitude}, alt={altitude})"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(TracefitError::InvalidParams(format!(
                "observer latitude {latitude} outside [-90, 90]"
            )));
        }

        Ok(Self::from_validated(latitude, longitude, altitude, name))
    }

    fn from_validated(
        latitude: Degree,
        longitude: Degree,
        altitude: Kilometer,
        name: Option<String>,
    ) -> Observer {
        let (sin_lat, cos_lat) = latitude.to_radians().sin_cos();
        let (sin_lon, cos_lon) = longitude.to_radians().sin_cos();
        let radius = EARTH_RADIUS_KM + altitude;

        Observer {
            latitude,
            longitude,
            altitude,
            name,
            trig: (sin_lat, cos_lat, sin_lon, cos_lon),
            earth_fixed_position: Vector3::new(
                radius * cos_lat * cos_lon,
                radius * cos_lat * sin_lon,
                radius * sin_lat,
            ),
        }
    }

    /// Geocentric distance of the site in km (`EARTH_RADIUS_KM + altitude`).
    pub fn radius_km(&self) -> Kilometer {
        EARTH_RADIUS_KM + self.altitude
    }

    /// Earth-fixed position of the site in km.
    pub fn earth_fixed_position(&self) -> &Vector3<f64> {
        &self.earth_fixed_position
    }

    /// `(sin φ, cos φ, sin λ, cos λ)` of the site latitude φ and longitude λ.
    pub fn trig(&self) -> (f64, f64, f64, f64) {
        self.trig
    }
}

impl Default for Observer {
    /// The Saalfeld ground station the tracking logs were originally recorded at.
    fn default() -> Self {
        Self::from_validated(
            DEFAULT_OBSERVER_LAT,
            DEFAULT_OBSERVER_LON,
            DEFAULT_OBSERVER_ALT_KM,
            Some("Saalfeld".to_string()),
        )
    }
}
