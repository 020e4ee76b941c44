//! Timestamp formats the routing service validates strictly.
//!
//! Job windows carry millisecond resolution (`...T08:00:00.000Z`) while shift
//! boundaries use whole seconds (`...T06:00:00Z`). Both use a literal `Z`.

use chrono::{NaiveDate, NaiveTime};

const JOB_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const SHIFT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse an `HH:MM:SS` (or `HH:MM`) time of day.
pub(crate) fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .ok()
}

/// `date` at `time` with millisecond resolution.
pub(crate) fn job_timestamp(date: NaiveDate, time: NaiveTime) -> String {
    date.and_time(time).format(JOB_FORMAT).to_string()
}

/// `date` at the top of `hour`, or `None` when the hour is not in the day.
pub(crate) fn shift_timestamp(date: NaiveDate, hour: u8) -> Option<String> {
    date.and_hms_opt(u32::from(hour), 0, 0)
        .map(|stamp| stamp.format(SHIFT_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date")
    }

    #[rstest]
    #[case("08:00:00", "2024-05-01T08:00:00.000Z")]
    #[case("8:30:15", "2024-05-01T08:30:15.000Z")]
    #[case("17:45", "2024-05-01T17:45:00.000Z")]
    #[case(" 09:00:00 ", "2024-05-01T09:00:00.000Z")]
    fn formats_job_timestamps(#[case] raw: &str, #[case] expected: &str) {
        let time = parse_time_of_day(raw).expect("time parses");
        assert_eq!(job_timestamp(date(), time), expected);
    }

    #[rstest]
    #[case("25:00:00")]
    #[case("noon")]
    #[case("")]
    fn rejects_malformed_times(#[case] raw: &str) {
        assert!(parse_time_of_day(raw).is_none());
    }

    #[rstest]
    #[case(0, "2024-05-01T00:00:00Z")]
    #[case(6, "2024-05-01T06:00:00Z")]
    #[case(23, "2024-05-01T23:00:00Z")]
    fn formats_shift_timestamps(#[case] hour: u8, #[case] expected: &str) {
        assert_eq!(shift_timestamp(date(), hour).as_deref(), Some(expected));
    }

    #[rstest]
    fn rejects_hours_past_midnight() {
        assert!(shift_timestamp(date(), 24).is_none());
    }
}
