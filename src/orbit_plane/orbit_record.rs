//! # Reconstructed orbit record
//!
//! [`OrbitRecord`] is the per-satellite output of the engine: a circular orbit described by
//! its plane normal, its ascending node and its radius, all in **visualization units** of the
//! inertial equatorial frame (`z` = polar axis).
//!
//! The serialized form is the contract consumed by the 3D viewer:
//!
//! ```text
//! { "sat_id": "G13", "radius": 20.85, "color": 65280,
//!   "startPoint": {"x": .., "y": .., "z": ..},
//!   "normal": {"x": .., "y": .., "z": ..},
//!   "angular_velocity": 0.0, "start_time": 1715934615 }
//! ```
//!
//! `angular_velocity` is always `0.0`: the viewer derives it from an assumed circular period.
use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::constants::{SatId, UnixTime};

/// Serde adapter writing a `Vector3<f64>` as `{"x": .., "y": .., "z": ..}`.
pub(crate) mod xyz {
    use nalgebra::Vector3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Xyz {
        x: f64,
        y: f64,
        z: f64,
    }

    pub fn serialize<S: Serializer>(v: &Vector3<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        Xyz {
            x: v.x,
            y: v.y,
            z: v.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vector3<f64>, D::Error> {
        let Xyz { x, y, z } = Xyz::deserialize(deserializer)?;
        Ok(Vector3::new(x, y, z))
    }
}

/// Circular orbit reconstructed from the longest pass of one satellite.
///
/// Invariants
/// ----------
/// * `normal` has unit norm,
/// * `ascending_node · normal ≈ 0` and `|ascending_node| = radius`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitRecord {
    sat_id: SatId,
    radius: f64,
    color: u32,
    #[serde(rename = "startPoint", with = "xyz")]
    ascending_node: Vector3<f64>,
    #[serde(with = "xyz")]
    normal: Vector3<f64>,
    angular_velocity: f64,
    start_time: UnixTime,
}

impl OrbitRecord {
    pub(crate) fn new(
        sat_id: SatId,
        normal: Vector3<f64>,
        ascending_node: Vector3<f64>,
        radius: f64,
        start_time: UnixTime,
        color: u32,
    ) -> Self {
        OrbitRecord {
            sat_id,
            radius,
            color,
            ascending_node,
            normal,
            angular_velocity: 0.0,
            start_time,
        }
    }

    pub fn sat_id(&self) -> &str {
        &self.sat_id
    }

    /// Unit normal of the orbital plane (right-handed with the pass direction).
    pub fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    /// Ascending-node point: equatorial crossing from south to north, at `radius`.
    pub fn ascending_node(&self) -> &Vector3<f64> {
        &self.ascending_node
    }

    /// Orbit radius in visualization units.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }

    /// Unix time of the first sample of the pass used for the fit.
    pub fn start_time(&self) -> UnixTime {
        self.start_time
    }

    /// Display color as `0xRRGGBB`.
    pub fn color(&self) -> u32 {
        self.color
    }

    /// Inclination of the plane with respect to the equator, in degrees.
    pub fn inclination_deg(&self) -> f64 {
        self.normal.z.clamp(-1.0, 1.0).acos().to_degrees()
    }
}

impl fmt::Display for OrbitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: r = {:.4}, i = {:.2}°, n = ({:.4}, {:.4}, {:.4}), node = ({:.4}, {:.4}, {:.4}), t0 = {}",
            self.sat_id,
            self.radius,
            self.inclination_deg(),
            self.normal.x,
            self.normal.y,
            self.normal.z,
            self.ascending_node.x,
            self.ascending_node.y,
            self.ascending_node.z,
            self.start_time
        )
    }
}
