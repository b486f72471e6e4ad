pub mod csv_reader;

use nalgebra::Vector3;

use crate::{
    constants::{Degree, Kilometer, SatId, UnixTime},
    observers::Observer,
    ref_system::{
        earth_fixed_to_inertial, enu_from_az_el, enu_to_earth_fixed, intersect_sight_line,
    },
};

/// One tracking-log sample as decoded from the input CSV, before any geometry.
///
/// # Fields
///
/// * `timestamp` - unix seconds of the sample
/// * `sat_id` - receiver satellite id (`"G13"`)
/// * `azimuth` - degrees clockwise from north
/// * `elevation` - degrees above the horizon
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub timestamp: UnixTime,
    pub sat_id: SatId,
    pub azimuth: Degree,
    pub elevation: Degree,
}

/// A topocentric sample together with the inertial position it was mapped to.
///
/// # Fields
///
/// * `azimuth` - degrees clockwise from north, `[0, 360)`
/// * `elevation` - degrees above the horizon; only `> 0` counts as visible
/// * `timestamp` - unix seconds
/// * `position` - inertial-frame position in km
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    azimuth: Degree,
    elevation: Degree,
    timestamp: UnixTime,
    position: Vector3<f64>,
}

impl Observation {
    /// Map an azimuth/elevation sample to an inertial-frame 3D point.
    ///
    /// The chain is fully analytic:
    ///
    /// 1. site position in the Earth-fixed frame (precomputed by [`Observer`]),
    /// 2. azimuth/elevation → ENU unit vector ([`enu_from_az_el`]),
    /// 3. ENU → Earth-fixed direction ([`enu_to_earth_fixed`]),
    /// 4. far intersection of the sight line with the sphere of radius `sat_radius`
    ///    ([`intersect_sight_line`]),
    /// 5. removal of the Earth rotation at `timestamp` ([`earth_fixed_to_inertial`]).
    ///
    /// Arguments
    /// ---------
    /// * `observer`: the ground station
    /// * `timestamp`: unix seconds of the sample
    /// * `azimuth`, `elevation`: topocentric angles in degrees
    /// * `sat_radius`: assumed geocentric radius of the satellite in km
    ///
    /// Return
    /// ------
    /// * the observation with its inertial position in km
    pub fn from_topocentric(
        observer: &Observer,
        timestamp: UnixTime,
        azimuth: Degree,
        elevation: Degree,
        sat_radius: Kilometer,
    ) -> Self {
        let enu = enu_from_az_el(azimuth, elevation);
        let sight_line = enu_to_earth_fixed(&enu, observer);

        let earth_fixed = intersect_sight_line(
            observer.earth_fixed_position(),
            &sight_line,
            observer.radius_km(),
            sat_radius,
        );

        Observation {
            azimuth,
            elevation,
            timestamp,
            position: earth_fixed_to_inertial(&earth_fixed, timestamp),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_inertial(timestamp: UnixTime, elevation: Degree, position: Vector3<f64>) -> Self {
        Observation {
            azimuth: 0.0,
            elevation,
            timestamp,
            position,
        }
    }

    pub fn azimuth(&self) -> Degree {
        self.azimuth
    }

    pub fn elevation(&self) -> Degree {
        self.elevation
    }

    pub fn timestamp(&self) -> UnixTime {
        self.timestamp
    }

    /// Inertial-frame position in km.
    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    /// Above the local horizon.
    pub fn is_visible(&self) -> bool {
        self.elevation > 0.0
    }
}

#[cfg(test)]
mod observations_test {
    use super::*;
    use crate::{constellation::Constellation, time::earth_rotation_angle};
    use approx::assert_relative_eq;

    #[test]
    fn test_zenith_distance_is_sat_radius() {
        let observer = Observer::default();
        let r_sat = Constellation::Gps.orbit_radius_km();

        for (ts, az) in [
            (0, 0.0),
            (946_728_000, 45.0),
            (1_715_934_615, 180.0),
            (1_715_999_999, 359.9),
            (2_000_000_000, 271.3),
        ] {
            let obs = Observation::from_topocentric(&observer, ts, az, 90.0, r_sat);
            assert_relative_eq!(obs.position().norm(), r_sat, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_zenith_direction_follows_site() {
        // Straight up from (0°, 0°): Earth-fixed point on +x, then rotated by −θ
        let observer = Observer::new(0.0, 0.0, 0.0, None).unwrap();
        let ts = 1_715_934_615;
        let obs = Observation::from_topocentric(&observer, ts, 0.0, 90.0, 26_571.0);
        let theta = earth_rotation_angle(ts);

        assert_relative_eq!(
            *obs.position(),
            Vector3::new(26_571.0 * theta.cos(), -26_571.0 * theta.sin(), 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_low_elevation_on_sphere() {
        let observer = Observer::default();
        let r_sat = Constellation::Galileo.orbit_radius_km();
        let obs = Observation::from_topocentric(&observer, 1_700_000_000, 123.0, 5.0, r_sat);

        assert_relative_eq!(obs.position().norm(), r_sat, max_relative = 1e-12);
        assert!(obs.is_visible());
        assert_eq!(obs.timestamp(), 1_700_000_000);
        assert_eq!(obs.azimuth(), 123.0);
        assert_eq!(obs.elevation(), 5.0);
    }

    #[test]
    fn test_below_horizon_not_visible() {
        let observer = Observer::default();
        let obs = Observation::from_topocentric(&observer, 0, 10.0, 0.0, 26_571.0);
        assert!(!obs.is_visible());
        let obs = Observation::from_topocentric(&observer, 0, 10.0, -3.0, 26_571.0);
        assert!(!obs.is_visible());
    }
}
