//! # Orbital plane reconstruction parameters
//!
//! This module defines the [`ReconstructionParams`](crate::orbit_plane::ReconstructionParams)
//! configuration struct and its builder, which control how a satellite track is reduced to
//! an [`OrbitRecord`](crate::orbit_plane::orbit_record::OrbitRecord).
//!
//! ## Pipeline overview
//!
//! 1. **Aggregation**
//!    At most `max_unique_satellites` distinct ids are tracked during a run.
//!
//! 2. **Pass segmentation**
//!    The time-sorted track is split into passes at non-visible samples and at gaps larger
//!    than `max_pass_gap_seconds`; the longest pass must hold at least `min_pass_length`
//!    samples.
//!
//! 3. **Three-point fit**
//!    First, middle and last sample of the pass are projected on the sphere of the
//!    visualization orbit radius (Earth radius = `visual_earth_radius`). The plane normal is
//!    rejected when the squared cross product falls below `collinearity_eps`; the node
//!    direction falls back to the `x` axis when its squared equatorial projection falls below
//!    `polar_node_eps`. The ascending node is told from the descending one by rotating the
//!    candidate `node_probe_angle` radians along the orbit.
//!
//! ## Example
//!
//! ```rust
//! use tracefit::orbit_plane::ReconstructionParams;
//!
//! let params = ReconstructionParams::builder()
//!     .min_pass_length(20)
//!     .max_pass_gap_seconds(120)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.min_pass_length, 20);
//! ```
//!
//! ## See also
//!
//! * [`fit_orbit_plane`](crate::orbit_plane::three_point::fit_orbit_plane) – three-point plane and node fit
//! * [`reconstruct_track`](crate::orbit_plane::three_point::reconstruct_track) – sort, segment and fit one track
//! * [`longest_pass`](crate::passes::longest_pass) – pass segmentation
use std::fmt;

use crate::constants::{
    UnixTime, MAX_PASS_GAP_SECONDS, MAX_UNIQUE_SATELLITES, MIN_PASS_LENGTH, VISUAL_EARTH_RADIUS,
};
use crate::tracefit_errors::TracefitError;

pub mod orbit_record;
pub mod three_point;

/// Configuration of the orbit reconstruction engine.
///
/// Fields
/// -----------------
/// **Aggregation / segmentation**
/// * `max_unique_satellites` – capacity of the per-run track set.
/// * `max_pass_gap_seconds` – largest gap between two visible samples inside one pass.
/// * `min_pass_length` – minimum sample count of the longest pass (at least 3, the fit needs
///   three distinct samples).
///
/// **Geometry**
/// * `visual_earth_radius` – Earth radius in visualization units; all emitted distances are
///   scaled accordingly.
/// * `collinearity_eps` – threshold on the squared norm of the raw cross product (visual
///   units²) below which the three points are considered collinear.
/// * `polar_node_eps` – threshold on the squared norm of the node direction's equatorial
///   projection below which the fixed `x` axis is used.
/// * `node_probe_angle` – rotation (radians) applied to the node candidate to test the
///   direction of motion.
///
/// Defaults
/// -----------------
/// * `max_unique_satellites`: 500
/// * `max_pass_gap_seconds`: 300
/// * `min_pass_length`: 10
/// * `visual_earth_radius`: 5.0
/// * `collinearity_eps`: 1e-4
/// * `polar_node_eps`: 1e-4
/// * `node_probe_angle`: 0.017 (≈ 1°)
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructionParams {
    pub max_unique_satellites: usize,
    pub max_pass_gap_seconds: UnixTime,
    pub min_pass_length: usize,

    pub visual_earth_radius: f64,
    pub collinearity_eps: f64,
    pub polar_node_eps: f64,
    pub node_probe_angle: f64,
}

impl ReconstructionParams {
    /// Construct a new [`ReconstructionParams`] with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new [`ReconstructionParamsBuilder`] starting from the defaults.
    pub fn builder() -> ReconstructionParamsBuilder {
        ReconstructionParamsBuilder::new()
    }
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        ReconstructionParams {
            max_unique_satellites: MAX_UNIQUE_SATELLITES,
            max_pass_gap_seconds: MAX_PASS_GAP_SECONDS,
            min_pass_length: MIN_PASS_LENGTH,

            visual_earth_radius: VISUAL_EARTH_RADIUS,
            collinearity_eps: 1e-4,
            polar_node_eps: 1e-4,
            node_probe_angle: 0.017,
        }
    }
}

impl fmt::Display for ReconstructionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reconstruction parameters:")?;
        writeln!(f, "  max_unique_satellites : {}", self.max_unique_satellites)?;
        writeln!(f, "  max_pass_gap_seconds  : {}", self.max_pass_gap_seconds)?;
        writeln!(f, "  min_pass_length       : {}", self.min_pass_length)?;
        writeln!(f, "  visual_earth_radius   : {}", self.visual_earth_radius)?;
        writeln!(f, "  collinearity_eps      : {:e}", self.collinearity_eps)?;
        writeln!(f, "  polar_node_eps        : {:e}", self.polar_node_eps)?;
        write!(f, "  node_probe_angle      : {} rad", self.node_probe_angle)
    }
}

/// Builder for [`ReconstructionParams`], with validation.
#[derive(Debug, Clone)]
pub struct ReconstructionParamsBuilder {
    params: ReconstructionParams,
}

impl Default for ReconstructionParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconstructionParamsBuilder {
    /// Create a new builder initialized with default values.
    pub fn new() -> Self {
        Self {
            params: ReconstructionParams::default(),
        }
    }

    pub fn max_unique_satellites(mut self, v: usize) -> Self {
        self.params.max_unique_satellites = v;
        self
    }
    pub fn max_pass_gap_seconds(mut self, v: UnixTime) -> Self {
        self.params.max_pass_gap_seconds = v;
        self
    }
    pub fn min_pass_length(mut self, v: usize) -> Self {
        self.params.min_pass_length = v;
        self
    }
    pub fn visual_earth_radius(mut self, v: f64) -> Self {
        self.params.visual_earth_radius = v;
        self
    }
    pub fn collinearity_eps(mut self, v: f64) -> Self {
        self.params.collinearity_eps = v;
        self
    }
    pub fn polar_node_eps(mut self, v: f64) -> Self {
        self.params.polar_node_eps = v;
        self
    }
    pub fn node_probe_angle(mut self, v: f64) -> Self {
        self.params.node_probe_angle = v;
        self
    }

    /// Return true iff x > 0.0 and finite (NaN rejected).
    #[inline]
    fn gt0(x: f64) -> bool {
        x.is_finite() && x > 0.0
    }

    /// Validate and build the parameters.
    ///
    /// Errors
    /// ----------
    /// * [`TracefitError::InvalidParams`] naming the first offending field.
    pub fn build(self) -> Result<ReconstructionParams, TracefitError> {
        let p = &self.params;

        if p.max_unique_satellites == 0 {
            return Err(TracefitError::InvalidParams(
                "max_unique_satellites must be >= 1".into(),
            ));
        }
        if p.max_pass_gap_seconds < 0 {
            return Err(TracefitError::InvalidParams(
                "max_pass_gap_seconds must be >= 0".into(),
            ));
        }
        if p.min_pass_length < 3 {
            return Err(TracefitError::InvalidParams(
                "min_pass_length must be >= 3".into(),
            ));
        }
        if !Self::gt0(p.visual_earth_radius) {
            return Err(TracefitError::InvalidParams(
                "visual_earth_radius must be > 0".into(),
            ));
        }
        if !Self::gt0(p.collinearity_eps) {
            return Err(TracefitError::InvalidParams(
                "collinearity_eps must be > 0".into(),
            ));
        }
        if !Self::gt0(p.polar_node_eps) {
            return Err(TracefitError::InvalidParams(
                "polar_node_eps must be > 0".into(),
            ));
        }
        if !(Self::gt0(p.node_probe_angle) && p.node_probe_angle < std::f64::consts::FRAC_PI_2) {
            return Err(TracefitError::InvalidParams(
                "node_probe_angle must be in (0, π/2)".into(),
            ));
        }

        Ok(self.params)
    }
}
