/*!
 * Grouping and Windowing
 * Shared helpers that isolate detection per logical query shape
 */

use crate::core::types::Name;
use crate::telemetry::{OperationKind, OperationRecord};
use std::collections::{BTreeMap, BTreeSet};

/// `table` or `table/index`
pub fn scope_key(record: &OperationRecord) -> Name {
    match &record.index_name {
        Some(index) => {
            let mut key = record.table_name.clone();
            key.push('/');
            key.push_str(index);
            key
        }
        None => record.table_name.clone(),
    }
}

/// Access pattern name if present, otherwise the table/index scope
pub fn group_key(record: &OperationRecord) -> Name {
    match &record.access_pattern_name {
        Some(pattern) => pattern.clone(),
        None => scope_key(record),
    }
}

/// Partition records by key, preserving arrival order inside each group
///
/// Groups iterate in key order so detector output is deterministic.
pub fn group_by<'a, K, I, F>(records: I, mut key: F) -> BTreeMap<K, Vec<&'a OperationRecord>>
where
    K: Ord,
    I: IntoIterator<Item = &'a OperationRecord>,
    F: FnMut(&OperationRecord) -> K,
{
    let mut groups: BTreeMap<K, Vec<&'a OperationRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record);
    }
    groups
}

/// Stable sort by timestamp; ties keep arrival order
pub fn sort_by_arrival(records: &mut [&OperationRecord]) {
    records.sort_by_key(|r| r.timestamp);
}

/// Split time-sorted records into runs whose consecutive gaps are ≤ `window_ms`
pub fn clusters_by_gap<'r, 'a>(
    sorted: &'r [&'a OperationRecord],
    window_ms: u64,
) -> Vec<&'r [&'a OperationRecord]> {
    let mut clusters = Vec::new();
    let mut start = 0;

    for i in 1..sorted.len() {
        let gap = sorted[i].timestamp.saturating_sub(sorted[i - 1].timestamp);
        if gap > window_ms {
            clusters.push(&sorted[start..i]);
            start = i;
        }
    }
    if start < sorted.len() {
        clusters.push(&sorted[start..]);
    }

    clusters
}

/// Distinct operation kinds in a record set
pub fn operation_kinds<'a, I>(records: I) -> BTreeSet<OperationKind>
where
    I: IntoIterator<Item = &'a OperationRecord>,
{
    records.into_iter().map(|r| r.operation).collect()
}

/// Format a fraction as a percentage with one decimal
pub fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Human-readable byte size (KB = 1024 bytes)
pub fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KB * KB {
        format!("{:.1} MB", b / (KB * KB))
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Monthly dollar amount
pub fn format_dollars(amount: f64) -> String {
    format!("${:.2}/month", amount)
}
