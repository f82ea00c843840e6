/*!
 * Read-Before-Write Detection
 *
 * A get followed by a put on the same partition+sort key within five seconds
 * is a client-side read-modify-write: two round trips, and a lost-update race
 * whenever two writers interleave.
 */

use super::context::DetectionContext;
use super::grouping::{group_by, sort_by_arrival};
use super::traits::{Detector, DetectorResult};
use crate::advisor::{Category, EstimatedImpact, Recommendation, Severity};
use crate::core::limits::{MIN_GROUP_SAMPLES, READ_BEFORE_WRITE_REDUCTION, READ_BEFORE_WRITE_WINDOW_MS};
use crate::core::types::{Name, TimestampMs};
use crate::telemetry::{OperationKind, OperationRecord};
use std::collections::{BTreeMap, VecDeque};

/// Count (get, put) pairs in one key's time-sorted history
///
/// Unpaired gets queue up in arrival order. A put first drops queued gets more
/// than `window_ms` older than itself, then pairs with the oldest one left.
pub fn count_pairs(sorted: &[&OperationRecord], window_ms: u64) -> u64 {
    let mut pending: VecDeque<TimestampMs> = VecDeque::new();
    let mut pairs = 0;

    for record in sorted {
        match record.operation {
            OperationKind::Get => pending.push_back(record.timestamp),
            OperationKind::Put => {
                while pending
                    .front()
                    .is_some_and(|read_at| record.timestamp.saturating_sub(*read_at) > window_ms)
                {
                    pending.pop_front();
                }
                if pending.pop_front().is_some() {
                    pairs += 1;
                }
            }
            _ => {}
        }
    }

    pairs
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReadBeforeWriteDetector;

impl Detector for ReadBeforeWriteDetector {
    fn name(&self) -> &'static str {
        "read-before-write"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let candidates = ctx.records.iter().filter(|r| {
            matches!(r.operation, OperationKind::Get | OperationKind::Put)
                && r.partition_key_value.is_some()
        });

        // (table, pk, sk) -> history
        let by_key = group_by(candidates, |r| {
            (
                r.table_name.clone(),
                r.partition_key_value.clone().unwrap_or_default(),
                r.sort_key_value.clone(),
            )
        });

        let mut per_table: BTreeMap<Name, Vec<(String, u64)>> = BTreeMap::new();
        for ((table, pk, sk), mut records) in by_key {
            sort_by_arrival(&mut records);
            let pairs = count_pairs(&records, READ_BEFORE_WRITE_WINDOW_MS);
            if pairs > 0 {
                let label = match sk {
                    Some(sk) => format!("{}/{}", pk, sk),
                    None => pk,
                };
                per_table.entry(table).or_default().push((label, pairs));
            }
        }

        let mut out = Vec::new();
        for (table, keys) in per_table {
            let total: u64 = keys.iter().map(|(_, n)| n).sum();
            if total < MIN_GROUP_SAMPLES as u64 {
                continue;
            }
            let Some((top_key, top_pairs)) = keys
                .iter()
                .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
            else {
                continue;
            };

            let operations = total * 2;
            let saved = (operations as f64 * READ_BEFORE_WRITE_REDUCTION).round() as u64;

            out.push(
                Recommendation::new(
                    Severity::Warning,
                    Category::ReadBeforeWrite,
                    format!("{} read-modify-write sequences detected on {}", total, table),
                    format!(
                        "A get was followed by a put on the same key within {}s {} times across {} key(s) \
                         (most frequent: '{}' with {}). Concurrent writers can silently overwrite each other.",
                        READ_BEFORE_WRITE_WINDOW_MS / 1000,
                        total,
                        keys.len(),
                        top_key,
                        top_pairs
                    ),
                )
                .with_action(
                    "Replace get-then-put with a single update using update expressions \
                     (SET/ADD/REMOVE) and a condition expression for the invariant you checked",
                )
                .with_operations([OperationKind::Get, OperationKind::Put])
                .with_impact(
                    EstimatedImpact::scored(saved as f64).with_performance(format!(
                        "~{:.0}% fewer operations ({} -> {})",
                        READ_BEFORE_WRITE_REDUCTION * 100.0,
                        operations,
                        operations - saved
                    )),
                )
                .with_scope(table)
                .with_occurrences(total),
            );
        }

        Ok(out)
    }
}
