//! Lenient timestamp parsing.
//!
//! Due times and note times typed by staff (or left behind by older versions
//! of the app) come in several shapes. A due time that cannot be read is
//! treated exactly like a job with no due time.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Accepted formats, tried in order before the lenient fallback.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M", "%d/%m/%Y %H:%M"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Fallback shapes: ISO with `T` or seconds, slashed ISO, dashed day-first.
const LENIENT_DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];
const LENIENT_DATE_FORMATS: [&str; 3] = ["%Y/%m/%d", "%d-%m-%Y", "%d %b %Y"];

/// Parse a free-form timestamp. Date-only inputs resolve to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // Strict formats, in the order the input forms offer them.
    let strict = [
        (DATETIME_FORMATS[0], true),
        (DATE_FORMATS[0], false),
        (DATETIME_FORMATS[1], true),
        (DATE_FORMATS[1], false),
    ];
    for (fmt, has_time) in strict {
        if let Some(dt) = parse_with(s, fmt, has_time) {
            return Some(dt);
        }
    }

    parse_lenient(s)
}

/// Parse a due time; `None` means the job has no due time.
pub fn parse_due_time(raw: &str) -> Option<NaiveDateTime> {
    parse_timestamp(raw)
}

/// Parse an optional due time; `None` and blank both mean "no due time".
pub fn parse_optional_due_time(raw: Option<&str>) -> Option<NaiveDateTime> {
    raw.and_then(parse_due_time)
}

fn parse_lenient(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    LENIENT_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| parse_with(s, fmt, true))
        .or_else(|| {
            LENIENT_DATE_FORMATS
                .iter()
                .find_map(|fmt| parse_with(s, fmt, false))
        })
}

fn parse_with(s: &str, fmt: &str, has_time: bool) -> Option<NaiveDateTime> {
    if has_time {
        NaiveDateTime::parse_from_str(s, fmt).ok()
    } else {
        NaiveDate::parse_from_str(s, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}
