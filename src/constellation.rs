//! # GNSS constellation classification
//!
//! Receivers report satellites with a one-letter system prefix followed by the
//! satellite number (`G13`, `R07`, `E12`, `C30`). The prefix decides the nominal
//! orbital altitude used to place observations on a sphere, the display color of
//! the reconstructed orbit, and how the satellite is looked up in an orbital element
//! catalog during radius refinement.
//!
//! | prefix | constellation | nominal altitude (km) | color      |
//! |--------|---------------|-----------------------|------------|
//! | `G`    | GPS           | 20 200                | `0x00ff00` |
//! | `R`    | GLONASS       | 19 100                | `0xff0000` |
//! | `E`    | Galileo       | 23 222                | `0xffff00` |
//! | `C`    | BeiDou        | 21 528                | `0x0000ff` |
//! | other  | unknown       | 20 200                | `0xffffff` |

use std::fmt;

use crate::constants::{Kilometer, EARTH_RADIUS_KM};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constellation {
    Gps,
    Glonass,
    Galileo,
    Beidou,
    Unknown,
}

impl Constellation {
    /// Classify a satellite id by its first character.
    ///
    /// Arguments
    /// ---------
    /// * `sat_id`: receiver satellite id such as `"G13"`
    ///
    /// Return
    /// ------
    /// * the constellation, [`Constellation::Unknown`] for empty or unrecognized ids
    pub fn from_sat_id(sat_id: &str) -> Self {
        match sat_id.chars().next() {
            Some('G') => Constellation::Gps,
            Some('R') => Constellation::Glonass,
            Some('E') => Constellation::Galileo,
            Some('C') => Constellation::Beidou,
            _ => Constellation::Unknown,
        }
    }

    /// Assumed orbital altitude above the spherical Earth, in km.
    pub fn nominal_altitude_km(&self) -> Kilometer {
        match self {
            Constellation::Gps => 20_200.0,
            Constellation::Glonass => 19_100.0,
            Constellation::Galileo => 23_222.0,
            Constellation::Beidou => 21_528.0,
            Constellation::Unknown => 20_200.0,
        }
    }

    /// Assumed geocentric orbit radius in km (Earth radius + nominal altitude).
    pub fn orbit_radius_km(&self) -> Kilometer {
        EARTH_RADIUS_KM + self.nominal_altitude_km()
    }

    /// Orbit radius scaled so that the Earth has radius `visual_earth_radius`.
    pub fn visual_orbit_radius(&self, visual_earth_radius: f64) -> f64 {
        visual_earth_radius * (self.orbit_radius_km() / EARTH_RADIUS_KM)
    }

    /// Display color as a packed `0xRRGGBB` integer.
    pub fn color(&self) -> u32 {
        match self {
            Constellation::Gps => 0x00ff00,
            Constellation::Glonass => 0xff0000,
            Constellation::Galileo => 0xffff00,
            Constellation::Beidou => 0x0000ff,
            Constellation::Unknown => 0xffffff,
        }
    }

    /// Fragment of a catalog `OBJECT_NAME` identifying satellite `number` of this constellation.
    ///
    /// GPS entries read `"GPS BIIR-2 (PRN 13)"`, Galileo `"GSAT0210 (GALILEO 12)"`,
    /// BeiDou `"BEIDOU-3 M1 (PRN C19)"`. GLONASS catalog names carry COSMOS numbers that
    /// cannot be derived from the receiver slot, so no reference exists.
    ///
    /// Return
    /// ------
    /// * `Some(fragment)` to search for, `None` when the constellation cannot be matched
    pub fn catalog_reference(&self, number: u32) -> Option<String> {
        match self {
            Constellation::Gps => Some(format!("PRN {number})")),
            Constellation::Galileo => Some(format!("GALILEO {number})")),
            Constellation::Beidou => Some(format!("PRN C{number})")),
            Constellation::Glonass | Constellation::Unknown => None,
        }
    }

    /// Constellation-wide semi-major axis used when no catalog match is possible.
    pub fn default_semi_major_axis_km(&self) -> Option<Kilometer> {
        match self {
            Constellation::Glonass => Some(25_508.0),
            _ => None,
        }
    }
}

impl fmt::Display for Constellation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Constellation::Gps => "GPS",
            Constellation::Glonass => "GLONASS",
            Constellation::Galileo => "Galileo",
            Constellation::Beidou => "BeiDou",
            Constellation::Unknown => "unknown",
        };
        write!(f, "{name}")
    }
}
