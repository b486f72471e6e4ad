//! # tracefit
//!
//! Reconstruction of GNSS orbital planes from the azimuth/elevation tracking log of a single
//! ground station.
//!
//! Each visible satellite is reduced to a circular orbit (unit normal, ascending node and
//! radius, in visualization units of an inertial equatorial frame) fitted on three samples
//! of its longest visible pass.
//!
//! ## Modules
//!
//! * [`observations`] – CSV decoding and the topocentric → inertial mapping
//! * [`tracks`] – capacity-bounded aggregation per satellite
//! * [`passes`] – pass segmentation
//! * [`orbit_plane`] – three-point plane and node fit
//! * [`output`] – the orbits document written for the viewer
//! * [`refine`] – radius refinement from an orbital-element catalog
//! * [`tracefit`] – the two-pass pipeline tying everything together
pub mod constants;
pub mod constellation;
pub mod observations;
pub mod observers;
pub mod orbit_plane;
pub mod output;
pub mod passes;
pub mod ref_system;
pub mod refine;
pub mod time;
pub mod tracefit;
pub mod tracefit_errors;
pub mod tracks;

pub use observations::Observation;
pub use observers::Observer;
pub use orbit_plane::{orbit_record::OrbitRecord, ReconstructionParams};
pub use output::OrbitsDocument;
pub use tracefit::Tracefit;
pub use tracefit_errors::TracefitError;
pub use tracks::TrackSet;
