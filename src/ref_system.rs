//! # Reference frames
//!
//! Elementary frame changes of the transform chain, leaves first:
//!
//! ```text
//! (Az, El) --enu_from_az_el--> ENU --enu_to_earth_fixed--> Earth-fixed direction
//!          --intersect_sight_line--> Earth-fixed point --earth_fixed_to_inertial--> inertial point
//! ```
//!
//! The inertial frame shares its `z` axis with the Earth-fixed frame; the two differ by the
//! Earth rotation angle (GMST) about that axis.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{Degree, Kilometer, Radian, UnixTime};
use crate::observers::Observer;
use crate::time::earth_rotation_angle;

/// Unit sight-line vector in the observer's East-North-Up frame.
///
/// Arguments
/// ---------
/// * `azimuth`: degrees, clockwise from north
/// * `elevation`: degrees above the horizon
///
/// Return
/// ------
/// * `(east, north, up) = (cos el · sin az, cos el · cos az, sin el)`
pub fn enu_from_az_el(azimuth: Degree, elevation: Degree) -> Vector3<f64> {
    let (sin_az, cos_az) = azimuth.to_radians().sin_cos();
    let (sin_el, cos_el) = elevation.to_radians().sin_cos();
    Vector3::new(cos_el * sin_az, cos_el * cos_az, sin_el)
}

/// Rotate an ENU vector of `observer` into the Earth-fixed frame.
///
/// Standard ENU → ECEF rotation written out term by term, with φ the latitude and
/// λ the longitude of the site:
///
/// ```text
/// x = −sinλ·e − sinφ·cosλ·n + cosφ·cosλ·u
/// y =  cosλ·e − sinφ·sinλ·n + cosφ·sinλ·u
/// z =            cosφ·n     + sinφ·u
/// ```
pub fn enu_to_earth_fixed(enu: &Vector3<f64>, observer: &Observer) -> Vector3<f64> {
    let (sin_lat, cos_lat, sin_lon, cos_lon) = observer.trig();
    let (e, n, u) = (enu.x, enu.y, enu.z);

    Vector3::new(
        -sin_lon * e - sin_lat * cos_lon * n + cos_lat * cos_lon * u,
        cos_lon * e - sin_lat * sin_lon * n + cos_lat * sin_lon * u,
        cos_lat * n + sin_lat * u,
    )
}

/// Intersect a sight line with the sphere of radius `target_radius` centred on the Earth.
///
/// Solves `|origin + t·d|² = target_radius²` for the unit direction `d`, i.e.
/// `t² + b·t + c = 0` with `b = 2·(origin·d)` and `c = |origin|² − target_radius²`, and keeps
/// the far root `t = (−b + √Δ)/2`.
///
/// When the discriminant is negative, which cannot happen for a ray leaving an observer
/// inside the sphere, the point `origin + (target_radius − origin_radius)·d` is returned
/// instead of failing.
///
/// Arguments
/// ---------
/// * `origin`: start of the ray (km)
/// * `direction`: ray direction, normalized internally
/// * `origin_radius`: geocentric distance assumed for the origin (km)
/// * `target_radius`: radius of the sphere to hit (km)
pub fn intersect_sight_line(
    origin: &Vector3<f64>,
    direction: &Vector3<f64>,
    origin_radius: Kilometer,
    target_radius: Kilometer,
) -> Vector3<f64> {
    let d = direction.normalize();

    let b = 2.0 * origin.dot(&d);
    let c = origin.norm_squared() - target_radius * target_radius;
    let discriminant = b * b - 4.0 * c;

    if discriminant >= 0.0 {
        let t = (-b + discriminant.sqrt()) / 2.0;
        origin + d * t
    } else {
        origin + d * (target_radius - origin_radius)
    }
}

/// Coordinate axis of a frame rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Rotation matrix of angle `alpha` about `axis`.
pub fn rotmt(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };

    Rotation3::from_axis_angle(&axis, alpha).into_inner()
}

/// Remove the Earth rotation from an Earth-fixed position observed at `timestamp`.
///
/// The position is rotated about the polar axis by **minus** the Earth rotation angle
/// ([`earth_rotation_angle`]), yielding the inertial-frame position.
pub fn earth_fixed_to_inertial(position: &Vector3<f64>, timestamp: UnixTime) -> Vector3<f64> {
    rotmt(-earth_rotation_angle(timestamp), Axis::Z) * position
}
