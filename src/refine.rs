//! # Radius refinement from an orbital-element catalog
//!
//! The reconstruction assumes one nominal altitude per constellation. When an orbital-element
//! catalog (CelesTrak GP JSON, one object per satellite) is at hand, the actual semi-major
//! axis of each satellite can replace that assumption.
//!
//! ## Matching
//!
//! The numeric part of the receiver id (`G13` → 13) is turned into a fragment of the catalog
//! `OBJECT_NAME` by [`Constellation::catalog_reference`]; the first catalog entry whose name
//! contains the fragment wins. GLONASS receiver slots cannot be matched and get the
//! constellation-wide default semi-major axis instead.
//!
//! ## Radius
//!
//! ```text
//! n  = MEAN_MOTION · 2π / 86400          [rad/s]
//! a  = ∛(μ⊕ / n²)                        [km]
//! r  = visual_earth_radius · a / R⊕      [visual units]
//! ```
//!
//! Only the `radius` member of the matched orbits is rewritten; every other member of the
//! document is left untouched.
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
};

use camino::Utf8Path;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    constants::{Kilometer, DPI, EARTH_GM_KM3_S2, EARTH_RADIUS_KM, SECONDS_PER_DAY},
    constellation::Constellation,
    tracefit_errors::TracefitError,
};

/// Receiver id layout: constellation letter followed by the satellite number.
const SAT_NUMBER_PATTERN: &str = r"^[A-Z](\d+)";

/// The subset of a catalog entry used for matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "OBJECT_NAME")]
    pub object_name: String,
    /// Revolutions per day.
    #[serde(rename = "MEAN_MOTION", default)]
    pub mean_motion: Option<f64>,
}

/// What happened to the orbits of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefineSummary {
    /// Radius taken from a catalog entry.
    pub matched: usize,
    /// Radius taken from the constellation default.
    pub defaulted: usize,
    /// Radius left as it was.
    pub unchanged: usize,
}

/// Semi-major axis (km) of a circular orbit with the given mean motion (rev/day).
///
/// Return
/// ------
/// * `None` for a non-positive or non-finite mean motion
pub fn semi_major_axis_km(mean_motion: f64) -> Option<Kilometer> {
    if !(mean_motion.is_finite() && mean_motion > 0.0) {
        return None;
    }
    let n = mean_motion * DPI / SECONDS_PER_DAY;
    Some((EARTH_GM_KM3_S2 / (n * n)).cbrt())
}

/// First catalog entry matching `sat_id`, if any.
///
/// Arguments
/// ---------
/// * `sat_id`: receiver satellite id
/// * `catalog`: catalog entries in file order
/// * `number_re`: compiled [`SAT_NUMBER_PATTERN`]
fn find_entry<'a>(
    sat_id: &str,
    catalog: &'a [CatalogEntry],
    number_re: &Regex,
) -> Option<&'a CatalogEntry> {
    let number: u32 = number_re.captures(sat_id)?.get(1)?.as_str().parse().ok()?;
    let reference = Constellation::from_sat_id(sat_id).catalog_reference(number)?;
    catalog.iter().find(|e| e.object_name.contains(&reference))
}

/// Rewrite the `radius` of every orbit of `document` that can be refined.
///
/// Arguments
/// ---------
/// * `document`: an orbits document (`{"available_sats": [...], "orbits": [...]}`)
/// * `catalog`: catalog entries
/// * `visual_earth_radius`: Earth radius in visualization units of the document
///
/// Return
/// ------
/// * the [`RefineSummary`] of the document
///
/// Errors
/// ------
/// * [`TracefitError::MalformedDocument`] if `document` has no `orbits` array
pub fn refine_document(
    document: &mut Value,
    catalog: &[CatalogEntry],
    visual_earth_radius: f64,
) -> Result<RefineSummary, TracefitError> {
    let number_re = Regex::new(SAT_NUMBER_PATTERN)?;
    let orbits = document
        .get_mut("orbits")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| TracefitError::MalformedDocument("missing \"orbits\" array".into()))?;

    let mut summary = RefineSummary::default();
    for orbit in orbits.iter_mut() {
        let Some(sat_id) = orbit.get("sat_id").and_then(Value::as_str).map(str::to_owned) else {
            summary.unchanged += 1;
            continue;
        };

        let catalog_axis = find_entry(&sat_id, catalog, &number_re)
            .and_then(|e| e.mean_motion)
            .and_then(semi_major_axis_km);
        let (axis, from_catalog) = match catalog_axis {
            Some(a) => (Some(a), true),
            None => (
                Constellation::from_sat_id(&sat_id).default_semi_major_axis_km(),
                false,
            ),
        };

        match (axis, orbit.get_mut("radius")) {
            (Some(a), Some(radius)) => {
                let refined = visual_earth_radius * a / EARTH_RADIUS_KM;
                debug!("{sat_id}: radius {radius} -> {refined:.6} (a = {a:.0} km)");
                *radius = Value::from(refined);
                if from_catalog {
                    summary.matched += 1;
                } else {
                    summary.defaulted += 1;
                }
            }
            _ => summary.unchanged += 1,
        }
    }

    Ok(summary)
}

/// Read `orbits` and `catalog`, refine and write the result to `output`.
///
/// Errors
/// ------
/// * [`TracefitError::IoError`] / [`TracefitError::JsonError`] on unreadable inputs
/// * errors of [`refine_document`]
pub fn refine_files(
    orbits: &Utf8Path,
    catalog: &Utf8Path,
    output: &Utf8Path,
    visual_earth_radius: f64,
) -> Result<RefineSummary, TracefitError> {
    let mut document: Value = serde_json::from_reader(BufReader::new(File::open(orbits)?))?;
    let entries: Vec<CatalogEntry> = serde_json::from_reader(BufReader::new(File::open(catalog)?))?;
    info!("Loaded {} catalog entries from {catalog}", entries.len());

    let summary = refine_document(&mut document, &entries, visual_earth_radius)?;

    let mut writer = BufWriter::new(File::create(output)?);
    serde_json::to_writer_pretty(&mut writer, &document)?;
    writer.flush()?;

    info!(
        "Refined {orbits} into {output}: {} matched, {} defaulted, {} unchanged",
        summary.matched, summary.defaulted, summary.unchanged
    );
    Ok(summary)
}
