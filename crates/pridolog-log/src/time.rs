//! Timestamp parsing and human-readable durations

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse the timestamp forms services write into `time`.
///
/// RFC 3339 with an offset is preferred; naive timestamps are taken as UTC.
pub fn parse_time(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

struct TimePart {
    ms: u64,
    singular: &'static str,
    plural: &'static str,
}

const TIME_PARTS: [TimePart; 4] = [
    TimePart {
        ms: 60 * 60 * 1000,
        singular: "hour",
        plural: "hours",
    },
    TimePart {
        ms: 60 * 1000,
        singular: "minute",
        plural: "minutes",
    },
    TimePart {
        ms: 1000,
        singular: "second",
        plural: "seconds",
    },
    TimePart {
        ms: 1,
        singular: "ms",
        plural: "ms",
    },
];

/// Format a duration using its largest non-zero unit and, if non-zero, the next one down.
///
/// `2003` becomes `"2 seconds 3 ms"`, four hours and two seconds becomes `"4 hours"`.
pub fn duration_format(duration_ms: u64) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut first_index: Option<usize> = None;

    for (i, part) in TIME_PARTS.iter().enumerate() {
        if first_index.is_some_and(|first| i > first + 1) {
            break;
        }

        let count = if i > 0 {
            (duration_ms % TIME_PARTS[i - 1].ms) / part.ms
        } else {
            duration_ms / part.ms
        };

        if count > 0 {
            let name = if count == 1 { part.singular } else { part.plural };
            parts.push(format!("{} {}", count, name));
            first_index.get_or_insert(i);
        }
    }

    parts.join(" ")
}
