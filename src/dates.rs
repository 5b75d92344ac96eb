use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SubsecRound, Utc};

/// Parses the date strings clients send: RFC 3339, a zone-less date-time
/// (read as UTC), or a bare `YYYY-MM-DD` (midnight UTC).
///
/// Years outside `0000..=9999` are rejected. Stored timestamps are compared
/// as text, which only orders correctly for four-digit years.
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    parse_any(input.trim()).filter(|dt| (0..=9999).contains(&dt.year()))
}

fn parse_any(input: &str) -> Option<DateTime<Utc>> {

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Server clock, truncated to milliseconds so stored values compare and
/// round-trip cleanly.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
