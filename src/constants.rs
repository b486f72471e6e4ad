//! # Constants and type definitions for tracefit
//!
//! This module centralizes the **physical constants**, **run-wide defaults**, and **common type
//! aliases** used throughout the `tracefit` library.
//!
//! ## Overview
//!
//! - Geophysical constants (spherical Earth radius, gravitational parameter)
//! - Unit conversions (degrees ↔ radians, days ↔ seconds, unix time ↔ Julian date)
//! - Default pass-segmentation and aggregation limits
//! - Default observer site (Saalfeld ground station)
//!
//! The spherical Earth approximation is used everywhere: there is no flattening constant.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Number of seconds in a day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian date of the unix epoch (1970-01-01 00:00:00 UTC)
pub const JD_UNIX_EPOCH: f64 = 2_440_587.5;

/// Julian date of J2000.0 (2000-01-01 12:00:00)
pub const JD_J2000: f64 = 2_451_545.0;

/// Mean Earth radius in kilometers (spherical model)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Earth gravitational parameter μ in km³/s²
pub const EARTH_GM_KM3_S2: f64 = 398_600.4418;

/// Earth radius expressed in visualization units
pub const VISUAL_EARTH_RADIUS: f64 = 5.0;

// -------------------------------------------------------------------------------------------------
// Run-wide defaults
// -------------------------------------------------------------------------------------------------

/// Largest timestamp gap (seconds) between two visible samples still counted as one pass
pub const MAX_PASS_GAP_SECONDS: i64 = 300;

/// Minimum number of samples in the longest pass for an orbit to be reconstructed
pub const MIN_PASS_LENGTH: usize = 10;

/// Maximum number of distinct satellite ids tracked in one run
pub const MAX_UNIQUE_SATELLITES: usize = 500;

/// Observation buffer reserved for a newly seen satellite
pub const INITIAL_TRACK_CAPACITY: usize = 256;

/// Default observer geodetic latitude (degrees)
pub const DEFAULT_OBSERVER_LAT: f64 = 50.648_935_50;

/// Default observer geodetic longitude (degrees, east positive)
pub const DEFAULT_OBSERVER_LON: f64 = 11.363_869_83;

/// Default observer altitude above the spherical Earth (km)
pub const DEFAULT_OBSERVER_ALT_KM: f64 = 0.3;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Seconds since the unix epoch
pub type UnixTime = i64;
/// Satellite identifier as reported by the receiver (e.g. `"G13"`)
pub type SatId = String;
