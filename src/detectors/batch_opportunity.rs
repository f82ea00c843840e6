/*!
 * Batch Opportunity Detection
 *
 * Sort-then-sweep over each group: single-item calls whose consecutive
 * timestamps are at most one second apart form a cluster. Clusters of three
 * or more could have been one or more batch requests.
 */

use super::context::DetectionContext;
use super::grouping::{clusters_by_gap, group_by, group_key, operation_kinds, sort_by_arrival};
use super::traits::{Detector, DetectorResult};
use crate::advisor::{Category, EstimatedImpact, Recommendation, Severity};
use crate::core::limits::{BATCH_GET_LIMIT, BATCH_MIN_CLUSTER, BATCH_WINDOW_MS, BATCH_WRITE_LIMIT};
use crate::telemetry::{OperationKind, OperationRecord};
use std::collections::BTreeSet;

/// Batch requests needed for `operations` single calls
#[inline]
pub fn batch_requests(operations: usize, limit: usize) -> usize {
    operations.div_ceil(limit)
}

/// Clustered calls in one group
struct ClusterSummary {
    operations: usize,
    batches: usize,
    largest: usize,
    clusters: usize,
    kinds: BTreeSet<OperationKind>,
}

fn summarize_clusters(mut records: Vec<&OperationRecord>, limit: usize) -> Option<ClusterSummary> {
    sort_by_arrival(&mut records);

    let mut summary = ClusterSummary {
        operations: 0,
        batches: 0,
        largest: 0,
        clusters: 0,
        kinds: BTreeSet::new(),
    };

    for cluster in clusters_by_gap(&records, BATCH_WINDOW_MS) {
        if cluster.len() < BATCH_MIN_CLUSTER {
            continue;
        }
        summary.operations += cluster.len();
        summary.batches += batch_requests(cluster.len(), limit);
        summary.largest = summary.largest.max(cluster.len());
        summary.clusters += 1;
        summary.kinds.extend(operation_kinds(cluster.iter().copied()));
    }

    (summary.clusters > 0).then_some(summary)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BatchOpportunityDetector;

impl BatchOpportunityDetector {
    fn recommend(group: &str, summary: ClusterSummary, limit: usize, reads: bool) -> Recommendation {
        let severity = if summary.largest >= limit {
            Severity::Warning
        } else {
            Severity::Info
        };
        let (noun, batch_name, action) = if reads {
            (
                "reads",
                "batch get",
                format!("Collect the keys and fetch them with batch get requests of up to {} keys", limit),
            )
        } else {
            (
                "writes",
                "batch write",
                format!(
                    "Buffer the puts/deletes and send them as batch write requests of up to {} items, \
                     retrying unprocessed items",
                    limit
                ),
            )
        };
        let saved = summary.operations.saturating_sub(summary.batches);

        Recommendation::new(
            severity,
            Category::BatchOpportunity,
            format!(
                "{} individual {} could become {} {} requests",
                summary.operations, noun, summary.batches, batch_name
            ),
            format!(
                "'{}' issued {} {} in {} burst(s) with at most {}ms between calls; the largest burst had {} calls.",
                group,
                summary.operations,
                noun,
                summary.clusters,
                BATCH_WINDOW_MS,
                summary.largest
            ),
        )
        .with_action(action)
        .with_operations(summary.kinds)
        .with_impact(
            EstimatedImpact::scored(saved as f64)
                .with_performance(format!("{} fewer round trips", saved)),
        )
        .with_scope(group)
        .with_occurrences(summary.operations as u64)
    }
}

impl Detector for BatchOpportunityDetector {
    fn name(&self) -> &'static str {
        "batch-opportunity"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let mut out = Vec::new();

        let writes = ctx.records.iter().filter(|r| r.operation.is_single_write());
        for (group, records) in group_by(writes, group_key) {
            if let Some(summary) = summarize_clusters(records, BATCH_WRITE_LIMIT) {
                out.push(Self::recommend(&group, summary, BATCH_WRITE_LIMIT, false));
            }
        }

        let reads = ctx
            .records
            .iter()
            .filter(|r| r.operation == OperationKind::Get);
        for (group, records) in group_by(reads, group_key) {
            if let Some(summary) = summarize_clusters(records, BATCH_GET_LIMIT) {
                out.push(Self::recommend(&group, summary, BATCH_GET_LIMIT, true));
            }
        }

        Ok(out)
    }
}
