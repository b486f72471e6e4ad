//! # Three-point orbital plane fit
//!
//! A GNSS orbit is close to circular, so the plane through the Earth's center containing
//! a single pass pins down the orbit up to its phase. Three samples of the pass are enough:
//! first, middle and last.
//!
//! ## Algorithm outline
//!
//! 1. Project the three inertial positions on the sphere of the visualization orbit radius
//!    `r_vis = visual_earth_radius · (R⊕ + h) / R⊕`, `h` being the nominal altitude of the
//!    constellation.
//! 2. `raw = (p_mid − p_first) × (p_last − p_first)`; a squared norm below
//!    `collinearity_eps` rejects the satellite.
//! 3. The unit normal is `raw / |raw|`, oriented with the direction of motion.
//! 4. The node line is the intersection of the orbital plane with the equator:
//!    `(−n_y, n_x, 0)`, or the `x` axis when that projection is too short (equatorial orbit).
//! 5. Rotating the node candidate forward by a small angle about the normal (Rodrigues,
//!    the candidate being orthogonal to the normal) tells the ascending node from the
//!    descending one: if the probe moves south the opposite node is taken.
//!
//! ## See also
//!
//! * [`ReconstructionParams`] – thresholds used by the fit
//! * [`longest_pass`] – selection of the pass
use log::debug;
use nalgebra::Vector3;

use crate::{
    constellation::Constellation,
    observations::Observation,
    orbit_plane::{orbit_record::OrbitRecord, ReconstructionParams},
    passes::{longest_pass, PassSegment},
    tracefit_errors::TracefitError,
    tracks::SatelliteTrack,
};

/// Fit the orbital plane and ascending node of `sat_id` from one pass.
///
/// Arguments
/// ---------
/// * `sat_id`: receiver satellite id, selects the nominal altitude and the color
/// * `observations`: time-sorted samples of the satellite
/// * `segment`: the pass to use, `segment.len >= 3` and within `observations`
/// * `params`: reconstruction thresholds
///
/// Return
/// ------
/// * the [`OrbitRecord`] of the satellite
///
/// Errors
/// ------
/// * [`TracefitError::DegeneratePlane`] if the three points are nearly collinear
/// * [`TracefitError::PassTooShort`] if the segment holds fewer than 3 samples or lies
///   outside `observations`
pub fn fit_orbit_plane(
    sat_id: &str,
    observations: &[Observation],
    segment: PassSegment,
    params: &ReconstructionParams,
) -> Result<OrbitRecord, TracefitError> {
    if segment.len < 3 || segment.end() > observations.len() {
        return Err(TracefitError::PassTooShort {
            sat_id: sat_id.to_string(),
            len: segment.len,
            min: 3,
        });
    }

    let constellation = Constellation::from_sat_id(sat_id);
    let visual_radius = constellation.visual_orbit_radius(params.visual_earth_radius);

    let on_sphere = |obs: &Observation| obs.position().normalize() * visual_radius;
    let first = &observations[segment.start];
    let p_first = on_sphere(first);
    let p_mid = on_sphere(&observations[segment.middle()]);
    let p_last = on_sphere(&observations[segment.last()]);

    let raw = (p_mid - p_first).cross(&(p_last - p_first));
    let cross_norm_sq = raw.norm_squared();
    if cross_norm_sq < params.collinearity_eps {
        return Err(TracefitError::DegeneratePlane {
            sat_id: sat_id.to_string(),
            cross_norm_sq,
        });
    }
    let normal = raw / cross_norm_sq.sqrt();

    let equatorial = Vector3::new(-normal.y, normal.x, 0.0);
    let node_direction = if equatorial.norm_squared() < params.polar_node_eps {
        Vector3::x()
    } else {
        equatorial.normalize()
    };
    let node = node_direction * visual_radius;

    let (sin_a, cos_a) = params.node_probe_angle.sin_cos();
    let probe = node * cos_a + normal.cross(&node) * sin_a;
    let ascending_node = if probe.z < 0.0 { -node } else { node };

    debug!(
        "{sat_id}: pass [{}, {}) fitted, |raw|² = {cross_norm_sq:.6}",
        segment.start,
        segment.end()
    );

    Ok(OrbitRecord::new(
        sat_id.to_string(),
        normal,
        ascending_node,
        visual_radius,
        first.timestamp(),
        constellation.color(),
    ))
}

/// Reduce one satellite track to its orbit record.
///
/// The track is sorted by time in place, its longest pass is selected and checked against
/// `params.min_pass_length`, then fitted with [`fit_orbit_plane`].
///
/// Errors
/// ------
/// * [`TracefitError::NoVisiblePass`] if no sample of the track is visible
/// * [`TracefitError::PassTooShort`] if the longest pass is shorter than `min_pass_length`
/// * [`TracefitError::DegeneratePlane`] from the fit
pub fn reconstruct_track(
    track: &mut SatelliteTrack,
    params: &ReconstructionParams,
) -> Result<OrbitRecord, TracefitError> {
    track.sort_by_time();

    let segment = longest_pass(track.observations(), params.max_pass_gap_seconds)
        .ok_or_else(|| TracefitError::NoVisiblePass(track.sat_id().to_string()))?;

    if segment.len < params.min_pass_length {
        return Err(TracefitError::PassTooShort {
            sat_id: track.sat_id().to_string(),
            len: segment.len,
            min: params.min_pass_length,
        });
    }

    fit_orbit_plane(track.sat_id(), track.observations(), segment, params)
}

#[cfg(test)]
mod three_point_test {
    use super::*;
    use crate::observers::Observer;
    use approx::assert_relative_eq;

    const GPS_RADIUS: f64 = 26_571.0;

    /// Point at argument of latitude `u` on a circular orbit (i, Ω) of radius `r`.
    fn on_orbit(r: f64, inc: f64, raan: f64, u: f64) -> Vector3<f64> {
        let (su, cu) = u.sin_cos();
        let (si, ci) = inc.sin_cos();
        let (so, co) = raan.sin_cos();
        r * Vector3::new(co * cu - so * su * ci, so * cu + co * su * ci, su * si)
    }

    fn pass_on_orbit(inc: f64, raan: f64, args: &[f64]) -> Vec<Observation> {
        args.iter()
            .enumerate()
            .map(|(i, &u)| {
                Observation::from_inertial(60 * i as i64, 30.0, on_orbit(GPS_RADIUS, inc, raan, u))
            })
            .collect()
    }

    fn whole(obs: &[Observation]) -> PassSegment {
        PassSegment {
            start: 0,
            len: obs.len(),
        }
    }

    #[test]
    fn test_inclined_prograde_pass() {
        let (inc, raan) = (55f64.to_radians(), 30f64.to_radians());
        let obs = pass_on_orbit(inc, raan, &[0.2, 0.3, 0.4, 0.5, 0.6]);
        let params = ReconstructionParams::default();

        let record = fit_orbit_plane("G07", &obs, whole(&obs), &params).unwrap();

        let r_vis = Constellation::Gps.visual_orbit_radius(params.visual_earth_radius);
        let expected_normal = Vector3::new(inc.sin() * raan.sin(), -inc.sin() * raan.cos(), inc.cos());
        let expected_node = r_vis * Vector3::new(raan.cos(), raan.sin(), 0.0);

        assert_relative_eq!(record.normal().norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(*record.normal(), expected_normal, epsilon = 1e-9);
        assert_relative_eq!(*record.ascending_node(), expected_node, epsilon = 1e-9);
        assert_relative_eq!(record.radius(), r_vis, epsilon = 1e-12);
        assert_relative_eq!(record.inclination_deg(), 55.0, epsilon = 1e-8);
        assert_eq!(record.start_time(), 0);
        assert_eq!(record.color(), 0x00ff00);
        assert_eq!(record.angular_velocity(), 0.0);
    }

    #[test]
    fn test_reversed_motion_flips_normal_and_node() {
        let (inc, raan) = (55f64.to_radians(), 30f64.to_radians());
        let obs = pass_on_orbit(inc, raan, &[0.6, 0.5, 0.4]);
        let params = ReconstructionParams::default();

        let record = fit_orbit_plane("G07", &obs, whole(&obs), &params).unwrap();

        let r_vis = record.radius();
        assert!(record.normal().z < 0.0);
        assert_relative_eq!(
            *record.ascending_node(),
            -r_vis * Vector3::new(raan.cos(), raan.sin(), 0.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_node_properties_on_many_planes() {
        let params = ReconstructionParams::default();
        for k in 0..24 {
            let inc = (5.0 + 7.0 * k as f64).to_radians();
            let raan = (15.0 * k as f64).to_radians();
            let start = -1.5 + 0.25 * k as f64;
            let obs = pass_on_orbit(inc, raan, &[start, start + 0.1, start + 0.2, start + 0.3]);

            let record = fit_orbit_plane("E03", &obs, whole(&obs), &params).unwrap();
            let node = record.ascending_node();

            assert_relative_eq!(node.norm(), record.radius(), epsilon = 1e-9);
            assert_relative_eq!(node.dot(record.normal()), 0.0, epsilon = 1e-9);
            assert_eq!(node.z, 0.0);

            // moving forward from the ascending node goes north
            let ahead = record.normal().cross(node);
            assert!(ahead.z >= 0.0);
        }
    }

    #[test]
    fn test_equatorial_orbit_uses_x_axis() {
        let obs = pass_on_orbit(0.0, 0.0, &[1.0, 1.2, 1.4]);
        let params = ReconstructionParams::default();

        let record = fit_orbit_plane("C21", &obs, whole(&obs), &params).unwrap();
        assert_relative_eq!(*record.normal(), Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(
            *record.ascending_node(),
            Vector3::x() * record.radius(),
            epsilon = 1e-12
        );
        assert_eq!(record.color(), 0x0000ff);
    }

    #[test]
    fn test_collinear_points_are_degenerate() {
        let observer = Observer::default();
        let obs: Vec<Observation> = (0..3)
            .map(|_| Observation::from_topocentric(&observer, 1_715_934_615, 120.0, 40.0, GPS_RADIUS))
            .collect();

        let err = fit_orbit_plane("G01", &obs, whole(&obs), &ReconstructionParams::default())
            .unwrap_err();
        assert!(matches!(err, TracefitError::DegeneratePlane { ref sat_id, .. } if sat_id == "G01"));
        assert!(err.is_satellite_skip());
    }

    #[test]
    fn test_segment_must_hold_three_points() {
        let obs = pass_on_orbit(1.0, 1.0, &[0.1, 0.2, 0.3]);
        let params = ReconstructionParams::default();
        let short = PassSegment { start: 1, len: 2 };
        let outside = PassSegment { start: 1, len: 3 };

        assert!(matches!(
            fit_orbit_plane("G01", &obs, short, &params),
            Err(TracefitError::PassTooShort { len: 2, .. })
        ));
        assert!(matches!(
            fit_orbit_plane("G01", &obs, outside, &params),
            Err(TracefitError::PassTooShort { .. })
        ));
    }

    fn gps_track(len: usize) -> SatelliteTrack {
        let mut track = SatelliteTrack::new("G19");
        let (inc, raan) = (55f64.to_radians(), 100f64.to_radians());
        // pushed in reverse time order: the track gets sorted before segmentation
        for i in (0..len).rev() {
            let u = 0.05 * i as f64;
            track.push(Observation::from_inertial(
                1_000 + 30 * i as i64,
                25.0,
                on_orbit(GPS_RADIUS, inc, raan, u),
            ));
        }
        track
    }

    #[test]
    fn test_reconstruct_track_sorts_and_fits() {
        let mut track = gps_track(12);
        let record = reconstruct_track(&mut track, &ReconstructionParams::default()).unwrap();

        assert_eq!(record.sat_id(), "G19");
        assert_eq!(record.start_time(), 1_000);
        assert!(record.normal().z > 0.0);
        assert_eq!(track.observations()[0].timestamp(), 1_000);
    }

    #[test]
    fn test_reconstruct_track_no_visible_pass() {
        let mut track = SatelliteTrack::new("R04");
        track.push(Observation::from_inertial(0, -3.0, Vector3::x() * GPS_RADIUS));
        track.push(Observation::from_inertial(60, 0.0, Vector3::y() * GPS_RADIUS));

        assert_eq!(
            reconstruct_track(&mut track, &ReconstructionParams::default()),
            Err(TracefitError::NoVisiblePass("R04".into()))
        );
    }

    #[test]
    fn test_min_pass_length_threshold() {
        for len in [3usize, 7, 10, 15] {
            for min in 3..=16 {
                let params = ReconstructionParams::builder()
                    .min_pass_length(min)
                    .build()
                    .unwrap();
                let result = reconstruct_track(&mut gps_track(len), &params);
                if len >= min {
                    assert!(result.is_ok(), "len {len}, min {min}");
                } else {
                    assert_eq!(
                        result,
                        Err(TracefitError::PassTooShort {
                            sat_id: "G19".into(),
                            len,
                            min
                        })
                    );
                }
            }
        }
    }
}
