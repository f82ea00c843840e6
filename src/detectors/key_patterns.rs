/*!
 * Key Pattern Predicates
 * Independent format sniffers over key value snapshots
 *
 * Each predicate answers one question about one value; detectors compose
 * them over a group.
 */

use crate::core::limits::{
    CONCATENATED_MIN_SEGMENTS, EPOCH_SECONDS_MAX, EPOCH_SECONDS_MIN, KEY_DELIMITER,
};
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// Parse a plain decimal integer (optional sign, no padding spaces)
pub fn parse_integer(value: &str) -> Option<i64> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// ISO-8601 calendar date or date-time in extended format
///
/// Requires a `-` separator so bare integers such as `20240101` are left to
/// the integer and epoch predicates.
pub fn is_iso8601(value: &str) -> bool {
    if !value.contains('-') || value.len() < 10 {
        return false;
    }
    OffsetDateTime::parse(value, &Rfc3339).is_ok()
        || OffsetDateTime::parse(value, &Iso8601::DEFAULT).is_ok()
        || PrimitiveDateTime::parse(value, &Iso8601::DEFAULT).is_ok()
        || Date::parse(value, &Iso8601::DEFAULT).is_ok()
}

/// Integer that falls in 2000..2100 as epoch seconds or epoch milliseconds
pub fn is_epoch_like(value: &str) -> bool {
    let Some(n) = parse_integer(value) else {
        return false;
    };
    let seconds = EPOCH_SECONDS_MIN..EPOCH_SECONDS_MAX;
    let millis = EPOCH_SECONDS_MIN * 1000..EPOCH_SECONDS_MAX * 1000;
    seconds.contains(&n) || millis.contains(&n)
}

/// Segment after the last delimiter (the whole value if there is none)
pub fn last_segment(value: &str) -> &str {
    value
        .rsplit_once(KEY_DELIMITER)
        .map(|(_, tail)| tail)
        .unwrap_or(value)
}

/// Value or its last segment looks like a point in time
pub fn is_temporal(value: &str) -> bool {
    let tail = last_segment(value);
    is_iso8601(value) || is_iso8601(tail) || is_epoch_like(value) || is_epoch_like(tail)
}

/// Delimiter-separated segments
pub fn segments(value: &str) -> Vec<&str> {
    value.split(KEY_DELIMITER).collect()
}

/// `TOKEN#value#TOKEN...` shape: enough segments and none empty
pub fn is_concatenated(value: &str) -> bool {
    let parts = segments(value);
    parts.len() >= CONCATENATED_MIN_SEGMENTS && parts.iter().all(|p| !p.is_empty())
}
