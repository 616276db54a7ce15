//! Timezone conversion between wall-clock strings, civil dates, and instants
//!
//! Every resource lives in a fixed IANA zone; viewers may be anywhere. All
//! functions here are pure and total over well-formed input: malformed input
//! or an unrecognized zone yields an explicit `Conversion` error from the
//! strict variants, while the `*_or_empty` wrappers recover locally by
//! logging and returning an empty sentinel so presentation code never sees
//! an error.

use bookdesk_domain::constants::WALL_CLOCK_FORMAT;
use bookdesk_domain::{BookdeskError, Result};
use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Primary/secondary rendering of a booking range in one or two zones.
///
/// The two strings are computed independently and never assumed to agree;
/// `secondary` is present only when a viewer zone was requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeDisplay {
    pub primary: String,
    pub secondary: Option<String>,
}

/// Parse an IANA zone name.
pub(crate) fn parse_zone(zone: &str) -> Result<Tz> {
    zone.parse::<Tz>()
        .map_err(|_| BookdeskError::Conversion(format!("unrecognized IANA zone '{zone}'")))
}

/// Map a zone-local civil datetime to an instant, resolving DST ambiguity
/// to the earliest mapping.
pub(crate) fn resolve_local(tz: &Tz, local: chrono::NaiveDateTime) -> Result<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => {
            debug!(%local, zone = %tz, "ambiguous local time, using earliest mapping");
            Ok(earliest.with_timezone(&Utc))
        }
        LocalResult::None => Err(BookdeskError::Conversion(format!(
            "local time {local} does not exist in zone '{tz}'"
        ))),
    }
}

/// Format an instant's time-of-day in the given zone.
pub fn to_zone_time(instant: DateTime<Utc>, zone: &str, fmt: &str) -> Result<String> {
    let tz = parse_zone(zone)?;
    Ok(instant.with_timezone(&tz).format(fmt).to_string())
}

/// Format an instant's civil date in the given zone.
pub fn to_zone_date(instant: DateTime<Utc>, zone: &str, fmt: &str) -> Result<String> {
    let tz = parse_zone(zone)?;
    Ok(instant.with_timezone(&tz).date_naive().format(fmt).to_string())
}

/// Convert a wall-clock time string (`"HH:MM"`) on a civil date in a zone to
/// an absolute instant.
///
/// DST-ambiguous local times resolve to the earliest mapping; local times
/// skipped by a spring-forward transition are a `Conversion` error.
pub fn civil_time_to_instant(time: &str, date: NaiveDate, zone: &str) -> Result<DateTime<Utc>> {
    let tz = parse_zone(zone)?;
    let wall = NaiveTime::parse_from_str(time, WALL_CLOCK_FORMAT).map_err(|e| {
        BookdeskError::Conversion(format!("malformed wall-clock time '{time}': {e}"))
    })?;

    resolve_local(&tz, date.and_time(wall))
}

/// Human-readable UTC offset of a zone at a given instant, e.g. `"GMT +8"`,
/// `"GMT +5:30"`, `"GMT -4"`.
pub fn offset_label(zone: &str, at: DateTime<Utc>) -> Result<String> {
    let tz = parse_zone(zone)?;
    let offset_seconds = tz.offset_from_utc_datetime(&at.naive_utc()).fix().local_minus_utc();

    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let total_minutes = (offset_seconds.abs()) / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    Ok(if minutes == 0 {
        format!("GMT {sign}{hours}")
    } else {
        format!("GMT {sign}{hours}:{minutes:02}")
    })
}

/// Whole minutes between two instants.
pub fn duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_minutes()
}

/// Render a booking's instant range in its resource zone, with an optional
/// independent rendering in the viewer's zone.
pub fn format_booking_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    resource_zone: &str,
    viewer_zone: Option<&str>,
) -> Result<RangeDisplay> {
    let primary = format_range_in_zone(start, end, resource_zone)?;
    let secondary = match viewer_zone {
        Some(zone) => Some(format_range_in_zone(start, end, zone)?),
        None => None,
    };
    Ok(RangeDisplay { primary, secondary })
}

fn format_range_in_zone(start: DateTime<Utc>, end: DateTime<Utc>, zone: &str) -> Result<String> {
    let tz = parse_zone(zone)?;
    let local_start = start.with_timezone(&tz);
    let local_end = end.with_timezone(&tz);

    // Repeat the date on the end side only when the range crosses midnight.
    if local_start.date_naive() == local_end.date_naive() {
        Ok(format!(
            "{} - {}",
            local_start.format("%Y-%m-%d %H:%M"),
            local_end.format(WALL_CLOCK_FORMAT)
        ))
    } else {
        Ok(format!(
            "{} - {}",
            local_start.format("%Y-%m-%d %H:%M"),
            local_end.format("%Y-%m-%d %H:%M")
        ))
    }
}

/// Lossy variant of [`to_zone_time`]: logs the failure and returns an empty
/// string so callers can render a blank cell instead of an error.
pub fn to_zone_time_or_empty(instant: DateTime<Utc>, zone: &str, fmt: &str) -> String {
    to_zone_time(instant, zone, fmt).unwrap_or_else(|e| {
        warn!(%instant, zone, error = %e, "time conversion failed, returning empty sentinel");
        String::new()
    })
}

/// Lossy variant of [`to_zone_date`].
pub fn to_zone_date_or_empty(instant: DateTime<Utc>, zone: &str, fmt: &str) -> String {
    to_zone_date(instant, zone, fmt).unwrap_or_else(|e| {
        warn!(%instant, zone, error = %e, "date conversion failed, returning empty sentinel");
        String::new()
    })
}

/// Lossy variant of [`offset_label`].
pub fn offset_label_or_empty(zone: &str, at: DateTime<Utc>) -> String {
    offset_label(zone, at).unwrap_or_else(|e| {
        warn!(zone, error = %e, "offset lookup failed, returning empty sentinel");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn round_trip_whole_hour_offset() {
        let day = date(2026, 3, 2);
        let instant = civil_time_to_instant("09:00", day, "Asia/Hong_Kong").unwrap();
        // HK is UTC+8 year round.
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 3, 2, 1, 0, 0).unwrap());
        let back = to_zone_time(instant, "Asia/Hong_Kong", WALL_CLOCK_FORMAT).unwrap();
        assert_eq!(back, "09:00");
    }

    #[test]
    fn round_trip_half_hour_offset() {
        let day = date(2026, 3, 2);
        let instant = civil_time_to_instant("09:15", day, "Asia/Kolkata").unwrap();
        let back = to_zone_time(instant, "Asia/Kolkata", WALL_CLOCK_FORMAT).unwrap();
        assert_eq!(back, "09:15");
        assert_eq!(to_zone_date(instant, "Asia/Kolkata", "%Y-%m-%d").unwrap(), "2026-03-02");
    }

    #[test]
    fn unrecognized_zone_is_conversion_error() {
        let err = to_zone_time(Utc::now(), "Mars/Olympus_Mons", "%H:%M").unwrap_err();
        assert!(matches!(err, BookdeskError::Conversion(_)));

        let err = civil_time_to_instant("09:00", date(2026, 3, 2), "Nowhere/Else").unwrap_err();
        assert!(matches!(err, BookdeskError::Conversion(_)));
    }

    #[test]
    fn malformed_time_is_conversion_error() {
        let err = civil_time_to_instant("9 o'clock", date(2026, 3, 2), "UTC").unwrap_err();
        assert!(matches!(err, BookdeskError::Conversion(_)));
    }

    #[test]
    fn spring_forward_gap_is_rejected() {
        // US Eastern jumps 02:00 -> 03:00 on 2026-03-08; 02:30 never exists.
        let err = civil_time_to_instant("02:30", date(2026, 3, 8), "America/New_York").unwrap_err();
        assert!(matches!(err, BookdeskError::Conversion(_)));
    }

    #[test]
    fn offset_labels() {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        assert_eq!(offset_label("Asia/Hong_Kong", at).unwrap(), "GMT +8");
        assert_eq!(offset_label("Asia/Kolkata", at).unwrap(), "GMT +5:30");
        assert_eq!(offset_label("America/New_York", at).unwrap(), "GMT -5");
        assert_eq!(offset_label("UTC", at).unwrap(), "GMT +0");
    }

    #[test]
    fn duration_minutes_is_exact() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 1, 0, 0).unwrap();
        assert_eq!(duration_minutes(start, start + Duration::minutes(90)), 90);
        assert_eq!(duration_minutes(start, start), 0);
    }

    #[test]
    fn dual_zone_rendering_is_independent() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 1, 0, 0).unwrap();
        let end = start + Duration::minutes(30);

        let display =
            format_booking_range(start, end, "Asia/Hong_Kong", Some("America/New_York")).unwrap();
        assert_eq!(display.primary, "2026-03-02 09:00 - 09:30");
        // Same instants, previous civil day for the viewer.
        assert_eq!(display.secondary.as_deref(), Some("2026-03-01 20:00 - 20:30"));

        let resource_only = format_booking_range(start, end, "Asia/Hong_Kong", None).unwrap();
        assert_eq!(resource_only.secondary, None);
    }

    #[test]
    fn midnight_crossing_repeats_the_date() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 15, 30, 0).unwrap();
        let end = start + Duration::hours(2);
        let display = format_booking_range(start, end, "Asia/Hong_Kong", None).unwrap();
        assert_eq!(display.primary, "2026-03-02 23:30 - 2026-03-03 01:30");
    }

    #[test]
    fn lossy_wrappers_return_empty_sentinel() {
        assert_eq!(to_zone_time_or_empty(Utc::now(), "Bad/Zone", "%H:%M"), "");
        assert_eq!(to_zone_date_or_empty(Utc::now(), "Bad/Zone", "%Y-%m-%d"), "");
        assert_eq!(offset_label_or_empty("Bad/Zone", Utc::now()), "");
    }
}
