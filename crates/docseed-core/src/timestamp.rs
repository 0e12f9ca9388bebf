//! Timestamp shape detection and rendering.

use chrono::{DateTime, SecondsFormat, Utc};

/// Returns `true` when `text` has the shape of an ISO-8601 UTC timestamp:
/// it ends with `Z` and contains a `T`.
///
/// This is a shape check, not a parse. Any text matching it is sent as a
/// `timestampValue`, including plain sentences such as `"Start T now Z"`.
/// Downstream readers depend on this loose behavior, so a strict validator
/// must not be swapped in silently.
pub fn looks_like_timestamp(text: &str) -> bool {
    text.ends_with('Z') && text.contains('T')
}

/// Renders an instant as RFC 3339 UTC with microsecond precision and a `Z`
/// suffix, e.g. `2025-09-17T09:00:00.000000Z`.
pub fn now_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}
