#![allow(dead_code)]

use approx::assert_relative_eq;
use tracefit::OrbitRecord;

pub const SAMPLE_LOG: &str = "tests/data/satellite_tracks_sample.csv";
pub const SAMPLE_CATALOG: &str = "tests/data/gnss_catalog.json";

/// One quoted tracking-log line, trailing fields included.
pub fn log_line(id: u32, timestamp: &str, sat_id: &str, azimuth: f64, elevation: f64) -> String {
    format!("\"{id}\",\"{timestamp}\",\"{sat_id}\",\"{azimuth}\",\"{elevation}\",\"40\",\"50.6489\",\"11.3638\"\n")
}

/// Lines of a rising then setting pass sampled every minute from 08:00:00.
pub fn pass_lines(sat_id: &str, samples: usize, first_id: u32) -> String {
    (0..samples)
        .map(|i| {
            let minute = i as u32;
            let timestamp = format!("2024-05-17 08:{minute:02}:00");
            let azimuth = 30.0 + 9.0 * i as f64;
            let elevation = 5.0 + 60.0 * (std::f64::consts::PI * (i as f64 + 0.5) / samples as f64).sin();
            log_line(first_id + minute, &timestamp, sat_id, azimuth, elevation)
        })
        .collect()
}

pub fn assert_orbit_invariants(record: &OrbitRecord, expected_radius: f64, epsilon: f64) {
    assert_relative_eq!(record.normal().norm(), 1.0, epsilon = epsilon);
    assert_relative_eq!(record.ascending_node().norm(), expected_radius, epsilon = epsilon);
    assert_relative_eq!(record.radius(), expected_radius, epsilon = epsilon);
    assert_relative_eq!(
        record.ascending_node().dot(record.normal()),
        0.0,
        epsilon = epsilon
    );
    assert_eq!(record.ascending_node().z, 0.0);
}

/// Unique scratch path under the system temp directory.
pub fn scratch_path(name: &str) -> camino::Utf8PathBuf {
    let dir = std::env::temp_dir().join(format!("tracefit-{}-{name}", std::process::id()));
    camino::Utf8PathBuf::from_path_buf(dir).expect("temp dir is not UTF-8")
}
