//! # Tracking-log CSV reader
//!
//! The upstream receiver-log parser writes one record per line, every field double-quoted:
//!
//! ```text
//! "id","timestamp","sat_id","azimuth","elevation","snr","lat","lon"
//! "81723","2025-03-14 21:07:55","G13","211","37","41","50.6489","11.3638"
//! ```
//!
//! Only positions 1 to 4 are consumed; the leading row id and any trailing field are
//! ignored. A record is **skipped** (no side effect at all) when one of the four fields is
//! missing, empty or unparsable, which includes header rows and malformed timestamps.
//! Only I/O failures of the underlying reader are reported as errors.

use std::io::{BufRead, BufReader, Read};

use chrono::TimeZone;
use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    observations::RawObservation, time::parse_timestamp, tracefit_errors::TracefitError,
};

const TIMESTAMP_FIELD: usize = 1;
const SAT_ID_FIELD: usize = 2;
const AZIMUTH_FIELD: usize = 3;
const ELEVATION_FIELD: usize = 4;

/// Outcome of reading one line of the tracking log.
#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    Observation(RawObservation),
    Skipped,
}

/// Decode the consumed fields of a tracking-log record.
///
/// Arguments
/// ---------
/// * `record`: one CSV record
/// * `tz`: time zone of the wall-clock timestamps
///
/// Return
/// ------
/// * `Some(RawObservation)` when timestamp, satellite id, azimuth and elevation all parse,
///   `None` otherwise
pub fn decode_record<Tz: TimeZone>(record: &StringRecord, tz: &Tz) -> Option<RawObservation> {
    let timestamp = parse_timestamp(record.get(TIMESTAMP_FIELD)?, tz).ok()?;

    let sat_id = record.get(SAT_ID_FIELD)?;
    if sat_id.is_empty() {
        return None;
    }

    let azimuth: f64 = record.get(AZIMUTH_FIELD)?.parse().ok()?;
    let elevation: f64 = record.get(ELEVATION_FIELD)?.parse().ok()?;
    if !(azimuth.is_finite() && elevation.is_finite()) {
        return None;
    }

    Some(RawObservation {
        timestamp,
        sat_id: sat_id.to_string(),
        azimuth,
        elevation,
    })
}

/// Streaming reader of a tracking log.
///
/// Lines are split on `\n` before any CSV parsing, so an unterminated quote never spills
/// into the following line.
pub struct TrackingLogReader<R: Read> {
    source: BufReader<R>,
    builder: ReaderBuilder,
    buffer: Vec<u8>,
    record: StringRecord,
    line: u64,
}

impl<R: Read> TrackingLogReader<R> {
    pub fn new(source: R) -> Self {
        let mut builder = ReaderBuilder::new();
        builder.has_headers(false).flexible(true).trim(Trim::All);

        TrackingLogReader {
            source: BufReader::new(source),
            builder,
            buffer: Vec::new(),
            record: StringRecord::new(),
            line: 0,
        }
    }

    /// Read the next non-blank line of the log.
    ///
    /// Return
    /// ------
    /// * `Ok(None)` at end of input
    /// * `Ok(Some(LogRecord::Skipped))` for a line that cannot be decoded
    /// * `Ok(Some(LogRecord::Observation(_)))` otherwise
    ///
    /// Errors
    /// ------
    /// * [`TracefitError::IoError`] if the underlying reader fails
    pub fn next_record<Tz: TimeZone>(
        &mut self,
        tz: &Tz,
    ) -> Result<Option<LogRecord>, TracefitError> {
        loop {
            self.buffer.clear();
            if self.source.read_until(b'\n', &mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            if self.buffer.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            return Ok(Some(self.decode_line(tz)));
        }
    }

    fn decode_line<Tz: TimeZone>(&mut self, tz: &Tz) -> LogRecord {
        let mut line_reader = self.builder.from_reader(self.buffer.as_slice());
        match line_reader.read_record(&mut self.record) {
            Ok(true) => {
                decode_record(&self.record, tz).map_or(LogRecord::Skipped, LogRecord::Observation)
            }
            // invalid UTF-8 and the like: the line is unusable, the stream is not
            Ok(false) | Err(_) => LogRecord::Skipped,
        }
    }

    /// Line number of the last line read (1-based), `0` before the first read.
    pub fn line(&self) -> u64 {
        self.line
    }
}
