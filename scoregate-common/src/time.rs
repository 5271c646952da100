//! Timestamp utilities and the event-time skew guard
//!
//! Client clocks are untrusted: submissions arrive with missing, stale
//! (1970-epoch defaults) or far-future timestamps. The skew guard bounds how
//! far a client-supplied event time may drift from the server clock before it
//! is replaced with `now`, keeping time-ordered analytics queries sane while
//! still honoring reasonably-fresh client timestamps.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Utc};

/// Oldest client timestamp still honored: 24 hours
pub fn max_skew_past() -> Duration {
    Duration::hours(24)
}

/// Furthest-future client timestamp still honored: 10 minutes
pub fn max_skew_future() -> Duration {
    Duration::minutes(10)
}

/// IST is UTC+5h30m, a fixed offset with no DST
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse an ISO-8601 timestamp, assuming UTC when no zone offset is present.
///
/// Returns None for anything unparsable; the skew guard treats that the same
/// as an absent timestamp.
pub fn parse_iso_utc(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Offset-carrying forms first ("Z" included)
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    // Naive forms: assume UTC
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(naive.and_utc());
        }
    }

    None
}

/// Resolve the event timestamp to store, overriding bad or missing inputs.
///
/// Absent, blank or unparsable client timestamps resolve to `now`, as do
/// timestamps more than [`max_skew_past`] old or more than
/// [`max_skew_future`] ahead of the server clock.
pub fn resolve_event_time(client_ts: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let raw = match client_ts {
        Some(s) if !s.trim().is_empty() => s,
        _ => return now,
    };

    match parse_iso_utc(raw) {
        Some(parsed) => {
            if now - parsed > max_skew_past() || parsed - now > max_skew_future() {
                now
            } else {
                parsed
            }
        }
        None => now,
    }
}

/// Format a UTC instant to second precision with an explicit `Z` suffix
pub fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Format a UTC instant as IST local time with a fixed `+05:30` suffix
pub fn format_ist(dt: DateTime<Utc>) -> String {
    let ist = FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is in range");
    dt.with_timezone(&ist)
        .format("%Y-%m-%dT%H:%M:%S+05:30")
        .to_string()
}
