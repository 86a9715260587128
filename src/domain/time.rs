//! Conversions between zone-naive local timestamps and canonical UTC instants.

use chrono::{DateTime, LocalResult, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::domain::validation::ValidationError;

/// Canonical, timezone-independent point in time with nanosecond precision.
pub type Instant = DateTime<Utc>;

/// Interpret `local` as a wall-clock time in `zone` and convert it to UTC.
///
/// An ambiguous local time (clocks turned back) resolves to the earlier of the
/// two instants. A local time skipped by a forward transition is rejected.
pub fn to_instant<Tz: TimeZone>(
    local: NaiveDateTime,
    zone: &Tz,
) -> Result<Instant, ValidationError> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(ValidationError::NonexistentLocalTime {
            local: local.to_string(),
        }),
    }
}

/// Same as [`to_instant`], using the system time zone.
pub fn to_instant_in_local_zone(local: NaiveDateTime) -> Result<Instant, ValidationError> {
    to_instant(local, &chrono::Local)
}

/// Resolve an IANA zone identifier such as `Asia/Seoul`.
pub fn parse_zone(id: &str) -> Result<chrono_tz::Tz, ValidationError> {
    id.parse::<chrono_tz::Tz>()
        .map_err(|_| ValidationError::UnknownTimeZone { id: id.to_owned() })
}

/// Render an instant as RFC 3339 in UTC (`Z` suffix), keeping every non-zero
/// sub-second digit group.
pub fn format_instant(instant: &Instant) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an RFC 3339 timestamp with any offset into a UTC instant.
pub fn parse_instant(input: &str) -> Result<Instant, ValidationError> {
    DateTime::parse_from_rfc3339(input.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidInstant {
            input: input.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::*;

    fn local(h: u32, m: u32, s: u32, nano: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_nano_opt(h, m, s, nano)
            .unwrap()
    }

    #[test]
    fn explicit_utc_zone_keeps_wall_clock() {
        let instant = to_instant(local(14, 30, 0, 0), &Utc).unwrap();
        assert_eq!(format_instant(&instant), "2024-06-15T14:30:00Z");
    }

    #[test]
    fn seoul_zone_shifts_by_nine_hours() {
        let seoul = parse_zone("Asia/Seoul").unwrap();
        let instant = to_instant(local(14, 30, 0, 0), &seoul).unwrap();
        assert_eq!(instant, parse_instant("2024-06-15T05:30:00Z").unwrap());
    }

    #[test]
    fn nanosecond_precision_is_preserved() {
        let instant = to_instant(local(14, 30, 0, 123_456_789), &Utc).unwrap();
        assert_eq!(instant.nanosecond(), 123_456_789);

        let text = format_instant(&instant);
        assert_eq!(text, "2024-06-15T14:30:00.123456789Z");
        assert_eq!(parse_instant(&text).unwrap(), instant);
    }

    #[test]
    fn millisecond_values_render_three_digits() {
        let instant = to_instant(local(9, 0, 0, 120_000_000), &Utc).unwrap();
        assert_eq!(format_instant(&instant), "2024-06-15T09:00:00.120Z");
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let instant = parse_instant("2024-06-15T14:30:00+09:00").unwrap();
        assert_eq!(format_instant(&instant), "2024-06-15T05:30:00Z");
    }

    #[test]
    fn ambiguous_local_time_picks_earlier_instant() {
        let new_york = parse_zone("America/New_York").unwrap();
        let fall_back = NaiveDate::from_ymd_opt(2024, 11, 3)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        let instant = to_instant(fall_back, &new_york).unwrap();
        assert_eq!(format_instant(&instant), "2024-11-03T05:30:00Z");
    }

    #[test]
    fn skipped_local_time_is_rejected() {
        let new_york = parse_zone("America/New_York").unwrap();
        let spring_forward = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();
        assert!(matches!(
            to_instant(spring_forward, &new_york),
            Err(ValidationError::NonexistentLocalTime { .. })
        ));
    }

    #[test]
    fn local_zone_conversion_matches_chrono_local() {
        let naive = local(14, 30, 0, 0);
        let expected = chrono::Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc));
        assert_eq!(to_instant_in_local_zone(naive).ok(), expected);
    }

    #[test]
    fn unknown_zone_and_bad_instant_are_rejected() {
        assert!(matches!(
            parse_zone("Mars/Olympus"),
            Err(ValidationError::UnknownTimeZone { .. })
        ));
        assert!(matches!(
            parse_instant("yesterday"),
            Err(ValidationError::InvalidInstant { .. })
        ));
    }
}
