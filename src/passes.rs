//! # Pass segmentation
//!
//! A **pass** is a maximal run of consecutive visible samples (elevation `> 0`) of one
//! satellite in which no two neighbouring samples are more than `max_gap_seconds` apart.
//! Receivers drop out now and then; a gap above the limit therefore splits a pass even
//! when the satellite stays above the horizon on both sides.
//!
//! [`longest_pass`] scans a time-sorted track once and returns the longest pass, the
//! earliest one on ties.
use crate::{constants::UnixTime, observations::Observation};

/// Index range of a pass inside a time-sorted observation slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassSegment {
    pub start: usize,
    pub len: usize,
}

impl PassSegment {
    /// One past the last index.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Index of the middle sample, `start + len / 2`.
    pub fn middle(&self) -> usize {
        self.start + self.len / 2
    }

    /// Index of the last sample.
    pub fn last(&self) -> usize {
        self.end() - 1
    }
}

/// Find the longest pass of a time-sorted observation sequence.
///
/// Single scan keeping the current run and the best run seen so far:
///
/// * a non-visible sample closes the current run,
/// * a visible sample more than `max_gap_seconds` after the previous visible sample closes
///   the current run and opens a new one,
/// * the trailing run is closed after the scan.
///
/// The best run is only replaced by a strictly longer one.
///
/// Arguments
/// ---------
/// * `observations`: samples sorted by ascending timestamp
/// * `max_gap_seconds`: largest admissible gap inside a pass
///
/// Return
/// ------
/// * the longest pass, `None` if no sample is visible
pub fn longest_pass(observations: &[Observation], max_gap_seconds: UnixTime) -> Option<PassSegment> {
    let mut best: Option<PassSegment> = None;
    let mut current: Option<PassSegment> = None;
    let mut last_visible: UnixTime = 0;

    let close = |best: &mut Option<PassSegment>, run: Option<PassSegment>| {
        if let Some(run) = run {
            if best.map_or(true, |b| run.len > b.len) {
                *best = Some(run);
            }
        }
    };

    for (i, obs) in observations.iter().enumerate() {
        if !obs.is_visible() {
            close(&mut best, current.take());
            continue;
        }

        current = match current {
            Some(run) if obs.timestamp() - last_visible <= max_gap_seconds => Some(PassSegment {
                start: run.start,
                len: run.len + 1,
            }),
            run => {
                close(&mut best, run);
                Some(PassSegment { start: i, len: 1 })
            }
        };
        last_visible = obs.timestamp();
    }
    close(&mut best, current);

    best
}
