use chrono::{LocalResult, NaiveDateTime, TimeDelta, TimeZone};
use hifitime::Epoch;

use crate::constants::{Radian, UnixTime, DPI, JD_J2000, RADEG};
use crate::tracefit_errors::TracefitError;

/// Textual layout of the timestamps written by the receiver log parser.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `YYYY-MM-DD HH:MM:SS` wall-clock timestamp expressed in the time zone `tz`.
///
/// Daylight-saving transitions are resolved the way `mktime` does with an unknown DST flag:
///
/// * ambiguous wall-clock times (the repeated hour in autumn) map to the **earliest** instant,
/// * non-existent wall-clock times (the skipped hour in spring) are shifted forward by one hour.
///
/// Arguments
/// ---------
/// * `text`: the timestamp string, surrounding whitespace is ignored
/// * `tz`: the time zone the wall-clock time refers to (`chrono::Local` in production)
///
/// Return
/// ------
/// * the instant in seconds since the unix epoch
///
/// Errors
/// ------
/// * [`TracefitError::InvalidTimestamp`] if the string does not follow the layout or names an
///   impossible calendar date (e.g. `2024-02-30`)
pub fn parse_timestamp<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<UnixTime, TracefitError> {
    let naive = NaiveDateTime::parse_from_str(text.trim(), TIMESTAMP_FORMAT)
        .map_err(|e| TracefitError::InvalidTimestamp(format!("{text:?}: {e}")))?;

    let resolved = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => naive
            .checked_add_signed(TimeDelta::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest()),
    };

    resolved
        .map(|dt| dt.timestamp())
        .ok_or_else(|| TracefitError::InvalidTimestamp(format!("{text:?}: no such local time")))
}

/// Julian date (UTC days) of a unix timestamp.
///
/// Equivalent to `timestamp / 86400 + 2440587.5`.
pub fn unix_to_jd(timestamp: UnixTime) -> f64 {
    Epoch::from_unix_seconds(timestamp as f64).to_jde_utc_days()
}

/// Greenwich mean sidereal time, in hours within `[0, 24)`.
///
/// Linear approximation with a small quadratic term, counted from J2000.0:
///
/// ```text
/// d    = JD − 2451545.0
/// GMST = 18.697374558 + 24.0611018903·d + 0.000021·d²   (mod 24)
/// ```
pub fn gmst_hours(timestamp: UnixTime) -> f64 {
    let d = unix_to_jd(timestamp) - JD_J2000;
    let gmst = 18.697374558 + 24.0611018903 * d + 0.000021 * d * d;
    gmst.rem_euclid(24.0)
}

/// Rotation angle of the Earth-fixed frame with respect to the inertial frame.
///
/// Return
/// ------
/// * GMST converted to radians (15° per sidereal hour), in `[0, 2π)`
pub fn earth_rotation_angle(timestamp: UnixTime) -> Radian {
    (gmst_hours(timestamp) * 15.0 * RADEG).rem_euclid(DPI)
}

#[cfg(test)]
mod time_test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{FixedOffset, Utc};
    use chrono_tz::Europe::Berlin;

    /// Unix time of J2000.0 (2000-01-01 12:00:00 UTC)
    const J2000_UNIX: UnixTime = 946_728_000;

    #[test]
    fn test_parse_timestamp_utc() {
        assert_eq!(parse_timestamp("1970-01-01 00:00:00", &Utc), Ok(0));
        assert_eq!(
            parse_timestamp("2000-01-01 12:00:00", &Utc),
            Ok(J2000_UNIX)
        );
        assert_eq!(
            parse_timestamp("  2024-05-17 08:30:15 ", &Utc),
            Ok(1_715_934_615)
        );
    }

    #[test]
    fn test_parse_timestamp_offset() {
        let cest = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            parse_timestamp("2024-05-17 10:30:15", &cest),
            Ok(1_715_934_615)
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_malformed() {
        assert!(matches!(
            parse_timestamp("2024-02-30 10:00:00", &Utc),
            Err(TracefitError::InvalidTimestamp(_))
        ));
        assert!(parse_timestamp("17.05.2024 10:00", &Utc).is_err());
        assert!(parse_timestamp("", &Utc).is_err());
        assert!(parse_timestamp("2024-05-17T10:00:00", &Utc).is_err());
    }

    #[test]
    fn test_unix_to_jd() {
        assert_abs_diff_eq!(unix_to_jd(0), 2_440_587.5, epsilon = 1e-8);
        assert_abs_diff_eq!(unix_to_jd(J2000_UNIX), JD_J2000, epsilon = 1e-8);
        assert_abs_diff_eq!(
            unix_to_jd(1_715_934_615),
            1_715_934_615.0 / 86_400.0 + 2_440_587.5,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_gmst_at_j2000() {
        assert_abs_diff_eq!(gmst_hours(J2000_UNIX), 18.697374558, epsilon = 1e-6);
        assert_abs_diff_eq!(
            earth_rotation_angle(J2000_UNIX),
            280.46061837 * RADEG,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_gmst_range() {
        for ts in [-86_400 * 365, 0, J2000_UNIX, 1_715_934_615, 2_000_000_000] {
            let h = gmst_hours(ts);
            assert!((0.0..24.0).contains(&h), "gmst {h} out of range");
            let a = earth_rotation_angle(ts);
            assert!((0.0..DPI).contains(&a));
        }
    }

    #[test]
    fn test_sidereal_day() {
        // 24 GMST hours elapse after 86400·24/24.0611018903 ≈ 86180.6 s
        let period = (86_400.0 * 24.0 / 24.0611018903_f64).round() as UnixTime;
        let h0 = gmst_hours(J2000_UNIX);
        let h1 = gmst_hours(J2000_UNIX + period);
        let diff = (h1 - h0 + 12.0).rem_euclid(24.0) - 12.0;
        assert!(diff.abs() < 1e-3, "diff = {diff}");
    }

    #[test]
    fn test_gmst_daily_advance() {
        // d = 0 → 1: linear rate beyond 24 h plus the quadratic term
        let advance = (gmst_hours(J2000_UNIX + 86_400) - gmst_hours(J2000_UNIX)).rem_euclid(24.0);
        assert_abs_diff_eq!(advance, 0.0611018903 + 0.000021, epsilon = 1e-6);
    }

    #[test]
    fn test_parse_timestamp_dst_fall_back_takes_earliest() {
        // 02:30 occurs twice in Berlin on 2024-10-27, first in CEST
        assert_eq!(
            parse_timestamp("2024-10-27 02:30:00", &Berlin),
            parse_timestamp("2024-10-27 00:30:00", &Utc)
        );
    }

    #[test]
    fn test_parse_timestamp_dst_spring_forward_shifts_one_hour() {
        // 02:30 does not exist in Berlin on 2024-03-31 and becomes 03:30 CEST
        assert_eq!(
            parse_timestamp("2024-03-31 02:30:00", &Berlin),
            parse_timestamp("2024-03-31 01:30:00", &Utc)
        );
        assert_eq!(
            parse_timestamp("2024-03-31 02:30:00", &Berlin),
            parse_timestamp("2024-03-31 03:30:00", &Berlin)
        );
    }
}
