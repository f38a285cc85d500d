use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::error::{Error, Result};

pub const LOCAL_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a window start given as RFC3339, Unix epoch seconds, or a local
/// `YYYY-MM-DD HH:MM:SS`, tried in that order.
pub fn parse_start_time(input: &str) -> Result<DateTime<Utc>> {
    let s = input.trim();

    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }

    if let Ok(secs) = s.parse::<i64>() {
        return DateTime::from_timestamp(secs, 0)
            .ok_or_else(|| Error::InvalidTimeFormat(format!("epoch seconds out of range: {}", s)));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, LOCAL_LAYOUT) {
        // Ambiguous wall-clock times (DST fall-back) resolve to the earlier instant.
        return Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|t| t.with_timezone(&Utc))
            .ok_or_else(|| Error::InvalidTimeFormat(format!("nonexistent local time: {}", s)));
    }

    Err(Error::InvalidTimeFormat(format!("cannot parse time: {}", s)))
}
