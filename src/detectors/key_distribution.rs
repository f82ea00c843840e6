/*!
 * Partition Key Distribution
 *
 * Monotonic or time-derived partition keys concentrate writes on the newest
 * partition. Two independent passes over a group's keys in arrival order:
 *
 * - sequential: integer keys that mostly increase from one sample to the next
 * - temporal: keys (or their last `#` segment) that look like dates or epochs
 */

use super::context::DetectionContext;
use super::grouping::{group_by, group_key, operation_kinds, percent, sort_by_arrival};
use super::key_patterns::{is_temporal, parse_integer};
use super::traits::{Detector, DetectorResult};
use crate::advisor::{Category, EstimatedImpact, Recommendation, Severity};
use crate::core::limits::{KEY_PATTERN_MIN_SAMPLES, SEQUENTIAL_KEY_RATIO, TEMPORAL_KEY_RATIO};

/// Fraction of arrival-adjacent integer key pairs that increase
///
/// Only neighbours that both parse as integers are compared. `None` unless at
/// least half of the values parse and at least one such pair exists.
pub fn increasing_ratio(values: &[&str]) -> Option<f64> {
    let parsed: Vec<Option<i64>> = values.iter().map(|v| parse_integer(v)).collect();
    let ints = parsed.iter().flatten().count();
    if ints * 2 < values.len() {
        return None;
    }

    let (mut compared, mut increases) = (0usize, 0usize);
    for pair in parsed.windows(2) {
        if let [Some(prev), Some(next)] = pair {
            compared += 1;
            if next > prev {
                increases += 1;
            }
        }
    }
    if compared == 0 {
        return None;
    }
    Some(increases as f64 / compared as f64)
}

/// Fraction of values that look temporal
pub fn temporal_ratio(values: &[&str]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|v| is_temporal(v)).count() as f64 / values.len() as f64
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UniformPartitionKeyDetector;

impl Detector for UniformPartitionKeyDetector {
    fn name(&self) -> &'static str {
        "uniform-partition-key"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let keyed = ctx.records.iter().filter(|r| r.partition_key_value.is_some());

        let mut out = Vec::new();
        for (group, mut records) in group_by(keyed, group_key) {
            if records.len() < KEY_PATTERN_MIN_SAMPLES {
                continue;
            }
            sort_by_arrival(&mut records);
            let values: Vec<&str> = records
                .iter()
                .filter_map(|r| r.partition_key_value.as_deref())
                .collect();

            let sequential = increasing_ratio(&values).filter(|r| *r > SEQUENTIAL_KEY_RATIO);
            let temporal = Some(temporal_ratio(&values)).filter(|r| *r >= TEMPORAL_KEY_RATIO);

            let increasing = |s: f64| format!("{} of consecutive samples increase", percent(s));
            let dated = |t: f64| format!("{} of samples parse as dates or epoch timestamps", percent(t));
            let (pattern, ratio, finding) = match (sequential, temporal) {
                (Some(s), Some(t)) => (
                    "sequential and time-based",
                    s.max(t),
                    format!("{}; {}", increasing(s), dated(t)),
                ),
                (Some(s), None) => ("sequential", s, increasing(s)),
                (None, Some(t)) => ("time-based", t, dated(t)),
                (None, None) => continue,
            };

            out.push(
                Recommendation::new(
                    Severity::Warning,
                    Category::UniformPartitionKey,
                    format!("Partition keys for '{}' are {}", group, pattern),
                    format!(
                        "{} across {} samples (e.g. '{}' .. '{}'). New writes all land on the newest \
                         key range instead of spreading across partitions.",
                        finding,
                        values.len(),
                        values.first().copied().unwrap_or_default(),
                        values.last().copied().unwrap_or_default()
                    ),
                )
                .with_action(
                    "Use a randomized or hashed partition key component, or move the temporal element \
                     into the sort key behind a well-distributed partition key",
                )
                .with_operations(operation_kinds(records.iter().copied()))
                .with_impact(EstimatedImpact::scored(ratio * 100.0))
                .with_scope(group.clone())
                .with_occurrences(values.len() as u64),
            );
        }

        Ok(out)
    }
}
