//! Time handling for file-level coverage attributes.

use chrono::{DateTime, NaiveDateTime};

use crate::error::{CommonError, CommonResult};

/// Parse a `time_coverage_start`/`time_coverage_end` style timestamp.
///
/// Returns a naive timestamp in UTC. Supports:
/// - `2000-01-02T03:04:05Z` (trailing designator dropped)
/// - `2000-01-02T03:04:05.123Z` (fractional seconds)
/// - `2000-01-02T03:04:05+02:00` (converted to UTC)
/// - `2000-01-02T03:04:05` and `2000-01-02 03:04:05`
pub fn parse_time_coverage(s: &str) -> CommonResult<NaiveDateTime> {
    let trimmed = s.trim();

    if let Some(naive) = trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        return parse_naive(naive).ok_or_else(|| CommonError::InvalidTime(s.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    parse_naive(trimmed).ok_or_else(|| CommonError::InvalidTime(s.to_string()))
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}
