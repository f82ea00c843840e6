/*!
 * Hot Partition Detection
 *
 * Flags partition key values that receive a disproportionate share of the
 * keyed traffic within one table/index scope.
 */

use super::context::DetectionContext;
use super::grouping::{group_by, percent, scope_key};
use super::traits::{Detector, DetectorResult};
use crate::advisor::{Category, EstimatedImpact, Recommendation, Severity};
use crate::core::limits::{
    HOT_PARTITION_ERROR_SHARE, HOT_PARTITION_MIN_OPERATIONS, HOT_PARTITION_SHARE,
};
use crate::telemetry::OperationKind;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default, Clone, Copy)]
pub struct HotPartitionDetector;

impl Detector for HotPartitionDetector {
    fn name(&self) -> &'static str {
        "hot-partition"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let keyed = ctx.records.iter().filter(|r| r.partition_key_value.is_some());
        let scopes = group_by(keyed, scope_key);

        let mut out = Vec::new();
        for (scope, records) in scopes {
            let total = records.len();
            if total < HOT_PARTITION_MIN_OPERATIONS {
                continue;
            }

            let mut per_key: BTreeMap<&str, (u64, BTreeSet<OperationKind>)> = BTreeMap::new();
            for record in &records {
                if let Some(pk) = record.partition_key_value.as_deref() {
                    let entry = per_key.entry(pk).or_default();
                    entry.0 += 1;
                    entry.1.insert(record.operation);
                }
            }

            let mut hot: Vec<(&str, u64, BTreeSet<OperationKind>)> = per_key
                .into_iter()
                .filter(|(_, (count, _))| *count as f64 / total as f64 > HOT_PARTITION_SHARE)
                .map(|(key, (count, ops))| (key, count, ops))
                .collect();
            // Hottest first, key order breaks ties
            hot.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

            for (key, count, ops) in hot {
                let share = count as f64 / total as f64;
                let severity = if share >= HOT_PARTITION_ERROR_SHARE {
                    Severity::Error
                } else {
                    Severity::Warning
                };

                out.push(
                    Recommendation::new(
                        severity,
                        Category::HotPartition,
                        format!(
                            "Partition key '{}' receives {} of traffic on {}",
                            key,
                            percent(share),
                            scope
                        ),
                        format!(
                            "{} of {} keyed operations in '{}' target this partition key. \
                             A single partition has a fixed throughput ceiling regardless of table capacity.",
                            count, total, scope
                        ),
                    )
                    .with_action(
                        "Spread the load with a write-sharding suffix on the partition key \
                         (random or hash-derived), or cache hot reads in front of the table",
                    )
                    .with_operations(ops)
                    .with_impact(
                        EstimatedImpact::scored(share * 100.0)
                            .with_performance(format!("{} of scope throughput on one partition", percent(share))),
                    )
                    .with_scope(scope.clone())
                    .with_occurrences(count),
                );
            }
        }

        Ok(out)
    }
}
