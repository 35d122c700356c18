//! Time conversion and request helpers
//!
//! All conversions use UTC. Naive timestamps (no offset) are read as UTC.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::collections::HashMap;

/// Maximum number of conversation ids the activity log endpoint accepts
pub const MAX_IDS_PER_BATCH: usize = 10;

/// Convert epoch milliseconds to `YYYY-MM-DDTHH:MM:SSZ`.
///
/// The sub-second part is floored, so negative inputs round toward the past.
pub fn epoch_millis_to_iso(timestamp_ms: i64) -> Result<String> {
    let dt = epoch_millis_to_datetime(timestamp_ms.div_euclid(1000) * 1000)?;
    Ok(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Convert epoch milliseconds to a UTC datetime
pub fn epoch_millis_to_datetime(timestamp_ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .ok_or_else(|| Error::timestamp(timestamp_ms.to_string(), "out of range"))
}

/// Convert a datetime to epoch milliseconds, dropping sub-millisecond precision
pub fn datetime_to_epoch_millis(dt: DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

/// Parse an ISO-8601 string and return epoch milliseconds
pub fn iso_to_epoch_millis(value: &str) -> Result<i64> {
    parse_datetime(value).map(datetime_to_epoch_millis)
}

/// Render a timestamp as `YYYY-MM-DDTHH:MM:SSZ`
pub fn format_rfc3339(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Parse an ISO-8601 string and re-render it as `YYYY-MM-DDTHH:MM:SSZ`
pub fn to_rfc3339(value: &str) -> Result<String> {
    parse_datetime(value).map(format_rfc3339)
}

/// Render epoch milliseconds as an RFC 3339 string keeping milliseconds
pub fn epoch_millis_to_rfc3339_millis(timestamp_ms: i64) -> Result<String> {
    Ok(epoch_millis_to_datetime(timestamp_ms)?.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parse a datetime string into UTC
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in datetime_formats {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(nd) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(ndt) = nd.and_hms_opt(0, 0, 0) {
                return Ok(Utc.from_utc_datetime(&ndt));
            }
        }
    }

    Err(Error::timestamp(s, "unrecognised datetime format"))
}

/// Split `items` into consecutive chunks of at most `size` elements.
///
/// A `size` of zero is treated as one.
pub fn chunk<T>(items: &[T], size: usize) -> std::slice::Chunks<'_, T> {
    items.chunks(size.max(1))
}

/// Parse the query string of a URL or path into key/value pairs.
///
/// Returns an empty map when `url_part` is `None` or carries no query.
pub fn parse_next_page_key(url_part: Option<&str>) -> HashMap<String, String> {
    let Some(raw) = url_part else {
        return HashMap::new();
    };

    let Some((_, query)) = raw.split_once('?') else {
        return HashMap::new();
    };
    let query = query.split('#').next().unwrap_or_default();

    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Build the `csids` query parameter for a batch of conversation ids
pub fn csid_param<S: AsRef<str>>(ids: &[S]) -> (String, String) {
    let joined = ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
    ("csids".to_string(), joined)
}
