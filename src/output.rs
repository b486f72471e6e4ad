//! # Orbits document
//!
//! Top-level JSON object handed to the viewer:
//!
//! ```text
//! { "available_sats": ["G13", "R05", ...],
//!   "orbits": [ { "sat_id": "G13", ... }, ... ] }
//! ```
//!
//! `available_sats` lists every tracked satellite in first-seen order, including the ones
//! that produced no orbit; `orbits` holds one [`OrbitRecord`] per reconstructed satellite,
//! in the same order.
use std::{
    fs::File,
    io::{BufWriter, Write},
};

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::{constants::SatId, orbit_plane::orbit_record::OrbitRecord, tracefit_errors::TracefitError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitsDocument {
    pub available_sats: Vec<SatId>,
    pub orbits: Vec<OrbitRecord>,
}

impl OrbitsDocument {
    pub fn new(available_sats: Vec<SatId>, orbits: Vec<OrbitRecord>) -> Self {
        OrbitsDocument {
            available_sats,
            orbits,
        }
    }

    /// Find the record of `sat_id`, if it was reconstructed.
    pub fn orbit(&self, sat_id: &str) -> Option<&OrbitRecord> {
        self.orbits.iter().find(|o| o.sat_id() == sat_id)
    }

    /// Write the document as pretty-printed JSON.
    pub fn write_pretty<W: Write>(&self, writer: W) -> Result<(), TracefitError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Create (or truncate) `path` and write the document into it.
    pub fn to_path(&self, path: &Utf8Path) -> Result<(), TracefitError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_pretty(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
