/*!
 * Core Types
 * Common types used across the advisor
 */

/// Inline-optimized identifier (table, index, access pattern, detector names)
///
/// Most identifiers are ≤23 bytes and are stored without a heap allocation.
pub type Name = smartstring::alias::String;

/// Milliseconds since the UNIX epoch, as reported by the calling client
pub type TimestampMs = u64;

/// Current wall-clock time in milliseconds since the UNIX epoch
pub fn now_ms() -> TimestampMs {
    let nanos = time::OffsetDateTime::now_utc().unix_timestamp_nanos();
    (nanos / 1_000_000).max(0) as TimestampMs
}
