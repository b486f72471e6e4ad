//! # Per-satellite track aggregation
//!
//! [`TrackSet`] is the caller-owned aggregation map of one run: satellite id →
//! [`SatelliteTrack`], iterated in **first-seen order** and bounded by an explicit capacity.
//!
//! ## Capacity
//!
//! The first `capacity` distinct ids are tracked. A further unseen id is **dropped**: it is
//! never merged into an existing track and its observations are discarded. A single
//! `warn!` is emitted the moment the capacity is first exceeded; later drops are silent.
//! Satellites already tracked keep accepting observations.
//!
//! ```rust
//! use tracefit::tracks::{Admission, TrackSet};
//!
//! let mut set = TrackSet::with_capacity(1);
//! assert_eq!(set.admit("G01"), Admission::Created);
//! assert_eq!(set.admit("G01"), Admission::Existing);
//! assert_eq!(set.admit("E07"), Admission::Dropped { first: true });
//! assert_eq!(set.admit("C11"), Admission::Dropped { first: false });
//! ```
use ahash::AHashMap;
use log::warn;

use crate::{
    constants::{SatId, INITIAL_TRACK_CAPACITY, MAX_UNIQUE_SATELLITES},
    constellation::Constellation,
    observations::Observation,
};

/// All observations of one satellite during a run.
#[derive(Debug, Clone)]
pub struct SatelliteTrack {
    sat_id: SatId,
    observations: Vec<Observation>,
}

impl SatelliteTrack {
    pub fn new(sat_id: &str) -> Self {
        SatelliteTrack {
            sat_id: sat_id.to_string(),
            observations: Vec::with_capacity(INITIAL_TRACK_CAPACITY),
        }
    }

    pub fn sat_id(&self) -> &str {
        &self.sat_id
    }

    pub fn constellation(&self) -> Constellation {
        Constellation::from_sat_id(&self.sat_id)
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn push(&mut self, observation: Observation) {
        self.observations.push(observation);
    }

    /// Sort the observations by ascending timestamp.
    ///
    /// The sort is stable: samples sharing a timestamp keep their ingest order.
    pub fn sort_by_time(&mut self) {
        self.observations.sort_by_key(Observation::timestamp);
    }
}

/// Result of presenting a satellite id to a [`TrackSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The id already has a track.
    Existing,
    /// A new track was created for the id.
    Created,
    /// The set is full and the id is not tracked; `first` is `true` for the drop that
    /// crossed the capacity.
    Dropped { first: bool },
}

impl Admission {
    pub fn is_tracked(&self) -> bool {
        !matches!(self, Admission::Dropped { .. })
    }
}

/// Ordered, capacity-bounded mapping satellite id → track.
#[derive(Debug, Clone)]
pub struct TrackSet {
    capacity: usize,
    tracks: Vec<SatelliteTrack>,
    index: AHashMap<SatId, usize>,
    dropped: u64,
    capacity_warning_emitted: bool,
}

impl Default for TrackSet {
    fn default() -> Self {
        Self::with_capacity(MAX_UNIQUE_SATELLITES)
    }
}

impl TrackSet {
    /// Create an empty set tracking at most `capacity` distinct ids.
    pub fn with_capacity(capacity: usize) -> Self {
        TrackSet {
            capacity,
            tracks: Vec::with_capacity(capacity.min(MAX_UNIQUE_SATELLITES)),
            index: AHashMap::new(),
            dropped: 0,
            capacity_warning_emitted: false,
        }
    }

    /// Look up `sat_id`, creating its track if there is room.
    ///
    /// Return
    /// ------
    /// * [`Admission::Existing`] / [`Admission::Created`] when the id is tracked,
    ///   [`Admission::Dropped`] when the capacity is exhausted
    pub fn admit(&mut self, sat_id: &str) -> Admission {
        if self.index.contains_key(sat_id) {
            return Admission::Existing;
        }

        if self.tracks.len() < self.capacity {
            self.index.insert(sat_id.to_string(), self.tracks.len());
            self.tracks.push(SatelliteTrack::new(sat_id));
            return Admission::Created;
        }

        self.dropped += 1;
        if self.capacity_warning_emitted {
            Admission::Dropped { first: false }
        } else {
            self.capacity_warning_emitted = true;
            warn!(
                "Satellite capacity ({}) reached, ignoring new satellite {} and any further ones",
                self.capacity, sat_id
            );
            Admission::Dropped { first: true }
        }
    }

    /// Append an observation to the track of `sat_id`.
    ///
    /// The id is admitted first; the observation is discarded if the id is dropped.
    ///
    /// Return
    /// ------
    /// * the [`Admission`] of `sat_id`
    pub fn push(&mut self, sat_id: &str, observation: Observation) -> Admission {
        let admission = self.admit(sat_id);
        if admission.is_tracked() {
            if let Some(track) = self.get_mut(sat_id) {
                track.push(observation);
            }
        }
        admission
    }

    pub fn get(&self, sat_id: &str) -> Option<&SatelliteTrack> {
        self.index.get(sat_id).map(|&i| &self.tracks[i])
    }

    pub fn get_mut(&mut self, sat_id: &str) -> Option<&mut SatelliteTrack> {
        match self.index.get(sat_id) {
            Some(&i) => self.tracks.get_mut(i),
            None => None,
        }
    }

    /// Tracks in first-seen order.
    pub fn tracks(&self) -> &[SatelliteTrack] {
        &self.tracks
    }

    pub fn tracks_mut(&mut self) -> &mut [SatelliteTrack] {
        &mut self.tracks
    }

    /// Tracked ids in first-seen order.
    pub fn ids(&self) -> Vec<SatId> {
        self.tracks.iter().map(|t| t.sat_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of admissions refused because the set was full, one per rejected sighting.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn capacity_warning_emitted(&self) -> bool {
        self.capacity_warning_emitted
    }
}

#[cfg(test)]
mod tracks_test {
    use super::*;
    use crate::observers::Observer;

    fn obs(ts: i64) -> Observation {
        Observation::from_topocentric(&Observer::default(), ts, 10.0, 20.0, 26_571.0)
    }

    #[test]
    fn test_first_seen_order() {
        let mut set = TrackSet::default();
        for id in ["R05", "G01", "R05", "E11", "G01"] {
            set.push(id, obs(0));
        }
        assert_eq!(set.ids(), vec!["R05", "G01", "E11"]);
        assert_eq!(set.get("R05").unwrap().len(), 2);
        assert_eq!(set.get("E11").unwrap().len(), 1);
        assert_eq!(set.get("E11").unwrap().constellation(), Constellation::Galileo);
    }

    #[test]
    fn test_capacity_single_warning() {
        let mut set = TrackSet::with_capacity(2);
        assert_eq!(set.push("G01", obs(0)), Admission::Created);
        assert_eq!(set.push("G02", obs(0)), Admission::Created);
        assert!(!set.capacity_warning_emitted());

        let drops: Vec<Admission> = ["G03", "G04", "G03", "G05"]
            .iter()
            .map(|id| set.push(id, obs(1)))
            .collect();
        let first_drops = drops
            .iter()
            .filter(|a| **a == Admission::Dropped { first: true })
            .count();
        assert_eq!(first_drops, 1);
        assert_eq!(drops[0], Admission::Dropped { first: true });
        assert!(set.capacity_warning_emitted());
        assert_eq!(set.dropped(), 4);

        // tracked satellites continue to accept observations
        assert_eq!(set.push("G01", obs(2)), Admission::Existing);
        assert_eq!(set.get("G01").unwrap().len(), 2);
        assert_eq!(set.len(), 2);
        assert!(set.get("G03").is_none());
    }

    #[test]
    fn test_sort_by_time_is_stable() {
        let mut track = SatelliteTrack::new("G01");
        let observer = Observer::default();
        track.push(Observation::from_topocentric(&observer, 30, 1.0, 5.0, 26_571.0));
        track.push(Observation::from_topocentric(&observer, 10, 2.0, 5.0, 26_571.0));
        track.push(Observation::from_topocentric(&observer, 30, 3.0, 5.0, 26_571.0));
        track.push(Observation::from_topocentric(&observer, 20, 4.0, 5.0, 26_571.0));
        track.sort_by_time();

        let order: Vec<(i64, f64)> = track
            .observations()
            .iter()
            .map(|o| (o.timestamp(), o.azimuth()))
            .collect();
        assert_eq!(order, vec![(10, 2.0), (20, 4.0), (30, 1.0), (30, 3.0)]);
    }

    #[test]
    fn test_refused_admissions_keep_no_state() {
        let mut set = TrackSet::with_capacity(1);
        set.push("G01", obs(0));
        for i in 0..10_000 {
            set.push(&format!("X{i}"), obs(i));
        }
        assert_eq!(set.dropped(), 10_000);
        assert_eq!(set.len(), 1);
        assert_eq!(set.index.len(), 1);
    }

    #[test]
    fn test_track_preallocation_is_bounded() {
        let track = SatelliteTrack::new("G01");
        assert!(track.observations.capacity() >= INITIAL_TRACK_CAPACITY);

        // reserved up front by a full set, before any observation is stored
        let reserved = INITIAL_TRACK_CAPACITY
            * std::mem::size_of::<Observation>()
            * MAX_UNIQUE_SATELLITES;
        assert!(reserved <= 8 * 1024 * 1024, "{reserved} bytes reserved");
    }
}
