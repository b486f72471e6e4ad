//! # Tracefit: two-pass orbit reconstruction pipeline
//!
//! This module defines the [`Tracefit`](crate::tracefit::Tracefit) struct, the façade that
//! wires together:
//!
//! 1. **Site** ([`Observer`]) – the ground station of the tracking log,
//! 2. **Parameters** ([`ReconstructionParams`]) – segmentation and fit thresholds,
//! 3. **Ingestion** – CSV decoding, topocentric → inertial mapping, aggregation in a
//!    caller-owned [`TrackSet`],
//! 4. **Reconstruction** – per-satellite sort, pass selection and plane fit.
//!
//! ## Passes
//!
//! * **Pass 1** ([`Tracefit::ingest_reader`]): every decodable line is mapped to an inertial
//!   point and appended to the track of its satellite. Undecodable lines are skipped without
//!   any side effect. Once the track set is full, unseen satellites are dropped.
//! * **Pass 2** ([`Tracefit::reconstruct`]): each track is processed independently. A
//!   satellite whose pass is missing, too short or degenerate is reported with `warn!` and the
//!   run continues.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use tracefit::{observers::Observer, orbit_plane::ReconstructionParams, tracefit::Tracefit};
//! use camino::Utf8Path;
//!
//! let pipeline = Tracefit::new(Observer::default(), ReconstructionParams::default());
//! let document = pipeline.run_file(Utf8Path::new("satellite_tracks.csv")).unwrap();
//! document.to_path(Utf8Path::new("orbits.json")).unwrap();
//! ```
use std::{fmt, fs::File, io::Read};

use camino::Utf8Path;
use chrono::{Local, TimeZone};
use itertools::Itertools;
use log::{debug, info, warn};

use crate::{
    constellation::Constellation,
    observations::{
        csv_reader::{LogRecord, TrackingLogReader},
        Observation,
    },
    observers::Observer,
    orbit_plane::{orbit_record::OrbitRecord, three_point::reconstruct_track, ReconstructionParams},
    output::OrbitsDocument,
    tracefit_errors::TracefitError,
    tracks::{Admission, TrackSet},
};

/// Lines between two progress messages during ingestion.
pub const PROGRESS_INTERVAL: u64 = 500_000;

/// Counters of one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Lines read from the input.
    pub lines: u64,
    /// Observations appended to a track.
    pub accepted: u64,
    /// Lines that could not be decoded.
    pub skipped: u64,
    /// Decoded observations discarded because their satellite is not tracked.
    pub dropped: u64,
}

impl fmt::Display for IngestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} lines, {} observations accepted, {} skipped, {} dropped",
            self.lines, self.accepted, self.skipped, self.dropped
        )
    }
}

#[derive(Debug, Clone)]
pub struct Tracefit {
    observer: Observer,
    params: ReconstructionParams,
}

impl Tracefit {
    pub fn new(observer: Observer, params: ReconstructionParams) -> Self {
        Tracefit { observer, params }
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    pub fn params(&self) -> &ReconstructionParams {
        &self.params
    }

    /// Empty track set sized after `max_unique_satellites`.
    pub fn new_track_set(&self) -> TrackSet {
        TrackSet::with_capacity(self.params.max_unique_satellites)
    }

    /// Pass 1: read a tracking log and append its observations to `tracks`.
    ///
    /// Arguments
    /// ---------
    /// * `reader`: CSV source, see [`csv_reader`](crate::observations::csv_reader)
    /// * `tz`: time zone of the wall-clock timestamps
    /// * `tracks`: aggregation map, possibly already holding tracks from a previous log
    ///
    /// Return
    /// ------
    /// * the [`IngestSummary`] of this log
    ///
    /// Errors
    /// ------
    /// * [`TracefitError::IoError`] on I/O failure of `reader`
    pub fn ingest_reader<R: Read, Tz: TimeZone>(
        &self,
        reader: R,
        tz: &Tz,
        tracks: &mut TrackSet,
    ) -> Result<IngestSummary, TracefitError> {
        let mut log_reader = TrackingLogReader::new(reader);
        let mut summary = IngestSummary::default();

        while let Some(record) = log_reader.next_record(tz)? {
            summary.lines += 1;
            if summary.lines % PROGRESS_INTERVAL == 0 {
                info!("{} lines read, {} satellites tracked", summary.lines, tracks.len());
            }

            let raw = match record {
                LogRecord::Observation(raw) => raw,
                LogRecord::Skipped => {
                    summary.skipped += 1;
                    continue;
                }
            };

            if let Admission::Dropped { .. } = tracks.admit(&raw.sat_id) {
                summary.dropped += 1;
                continue;
            }

            let sat_radius = Constellation::from_sat_id(&raw.sat_id).orbit_radius_km();
            let observation = Observation::from_topocentric(
                &self.observer,
                raw.timestamp,
                raw.azimuth,
                raw.elevation,
                sat_radius,
            );
            if let Some(track) = tracks.get_mut(&raw.sat_id) {
                track.push(observation);
                summary.accepted += 1;
            }
        }

        info!("Ingestion done: {summary}, {} satellites tracked", tracks.len());
        Ok(summary)
    }

    /// Pass 2: reconstruct one orbit per track.
    ///
    /// Tracks are processed in first-seen order; skipped satellites are logged and left out
    /// of the result.
    ///
    /// Errors
    /// ------
    /// * any error of [`reconstruct_track`] that is not a per-satellite skip
    pub fn reconstruct(&self, tracks: &mut TrackSet) -> Result<Vec<OrbitRecord>, TracefitError> {
        let mut orbits = Vec::with_capacity(tracks.len());

        for track in tracks.tracks_mut() {
            match reconstruct_track(track, &self.params) {
                Ok(record) => {
                    debug!("{record}");
                    orbits.push(record);
                }
                Err(err) if err.is_satellite_skip() => {
                    warn!("Skipping satellite {}: {err}", track.sat_id());
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            "Reconstruction done: {} orbits out of {} satellites",
            orbits.len(),
            tracks.len()
        );
        Ok(orbits)
    }

    /// Both passes over one tracking log, timestamps read in the time zone `tz`.
    pub fn run_reader<R: Read, Tz: TimeZone>(
        &self,
        reader: R,
        tz: &Tz,
    ) -> Result<OrbitsDocument, TracefitError> {
        let mut tracks = self.new_track_set();
        self.ingest_reader(reader, tz, &mut tracks)?;
        let orbits = self.reconstruct(&mut tracks)?;

        let available_sats = tracks.ids();
        info!("Available satellites: {}", available_sats.iter().join(", "));

        Ok(OrbitsDocument::new(available_sats, orbits))
    }

    /// Both passes over the tracking log at `path`, timestamps read in the local time zone.
    ///
    /// Errors
    /// ------
    /// * [`TracefitError::IoError`] if the file cannot be opened
    /// * errors of [`Tracefit::run_reader`]
    pub fn run_file(&self, path: &Utf8Path) -> Result<OrbitsDocument, TracefitError> {
        info!("Reading tracking log {path}");
        let file = File::open(path)?;
        self.run_reader(file, &Local)
    }
}
