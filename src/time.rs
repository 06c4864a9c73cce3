//! Date-time values of time columns.
//!
//! Time columns hold naive date-times (no time zone) and time delta columns
//! hold [`TimeDelta`] values, both from [`chrono`].
//! When embedded in a chart, date-times are written as ISO 8601 strings and
//! time deltas as a number of milliseconds.

pub use chrono::{NaiveDate, NaiveDateTime as DateTime, TimeDelta};

/// Date-time formats tried in turn by [`parse_auto`]
pub const AUTO_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a date-time trying the formats of [`AUTO_FORMATS`], then a plain `%Y-%m-%d` date.
///
/// Returns the value and the format that matched, so that the following
/// values of a column can be parsed with the same format.
pub fn parse_auto(input: &str) -> Option<(DateTime, &'static str)> {
    for fmt in AUTO_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(input, fmt) {
            return Some((dt, fmt));
        }
    }
    parse_fmt(input, "%Y-%m-%d").map(|dt| (dt, "%Y-%m-%d"))
}

/// Parse a date-time with the given format.
/// Formats without time fields give midnight of the parsed date.
pub fn parse_fmt(input: &str, fmt: &str) -> Option<DateTime> {
    DateTime::parse_from_str(input, fmt).ok().or_else(|| {
        NaiveDate::parse_from_str(input, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    })
}

/// ISO 8601 representation with millisecond precision
pub fn to_iso(dt: &DateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_auto_formats() {
        let (dt, fmt) = parse_auto("2017-01-02").unwrap();
        assert_eq!(fmt, "%Y-%m-%d");
        assert_eq!(to_iso(&dt), "2017-01-02T00:00:00.000");

        let (dt, _) = parse_auto("2017-01-02 10:30:15").unwrap();
        assert_eq!(to_iso(&dt), "2017-01-02T10:30:15.000");

        let (dt, _) = parse_auto("2017-01-02T10:30").unwrap();
        assert_eq!(to_iso(&dt), "2017-01-02T10:30:00.000");

        assert!(parse_auto("not a date").is_none());
        assert!(parse_auto("12").is_none());
    }

    #[test]
    fn parse_with_format() {
        let dt = parse_fmt("02/01/2017", "%d/%m/%Y").unwrap();
        assert_eq!(to_iso(&dt), "2017-01-02T00:00:00.000");
    }
}
