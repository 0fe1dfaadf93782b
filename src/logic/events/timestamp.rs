use chrono::{DateTime, Utc};

use super::EventError;

/// Parse an ISO-8601 timestamp with explicit offset.
///
/// A bare trailing `Z` is rewritten to `+00:00` first.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, EventError> {
    let trimmed = raw.trim();
    let normalized = match trimmed.strip_suffix('Z') {
        Some(stem) => format!("{}+00:00", stem),
        None => trimmed.to_string(),
    };

    DateTime::parse_from_rfc3339(&normalized)
        .or_else(|_| DateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| EventError::Timestamp {
            raw: raw.to_string(),
            reason: e.to_string(),
        })
}
