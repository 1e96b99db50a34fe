use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// The upstream services emit a mix of RFC 3339 timestamps, `T`- and
/// space-separated datetimes, and bare dates. Offsets are dropped: wall
/// time as written is what the portal displays and compares.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let t = raw.trim();
    if t.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(t) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(t, fmt) {
            return Some(dt);
        }
    }
    None
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Some(dt) = parse_datetime(raw) {
        return Some(dt.date());
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw.trim(), fmt) {
            return Some(d);
        }
    }
    None
}

/// A due value with an explicit time is an exact instant; a bare date is
/// due at the end of that day.
pub fn parse_due(raw: &str) -> Option<NaiveDateTime> {
    if let Some(dt) = parse_datetime(raw) {
        return Some(dt);
    }
    parse_date(raw).map(end_of_day)
}

pub fn end_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN))
}

pub fn start_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_time(NaiveTime::MIN)
}

/// Numeric sort key: milliseconds on the shared epoch scale.
pub fn sort_key(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

/// Human label the dashboard renders, e.g. "3 Feb 2026".
pub fn format_label(d: NaiveDate) -> String {
    d.format("%-d %b %Y").to_string()
}
