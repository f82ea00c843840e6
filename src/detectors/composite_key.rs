/*!
 * Concatenated Key Migration
 *
 * Keys built as `TOKEN#value#TOKEN#value` encode several attributes in one
 * string. When two or more positions vary across samples the key is really a
 * composite, and the store's multi-attribute keys can index the parts directly.
 */

use super::context::DetectionContext;
use super::grouping::{group_by, group_key, operation_kinds};
use super::key_patterns::{is_concatenated, segments};
use super::traits::{Detector, DetectorResult};
use crate::advisor::{Category, EstimatedImpact, Recommendation, Severity};
use crate::core::limits::{CONCATENATED_MIN_VARYING, MIN_GROUP_SAMPLES};
use crate::telemetry::OperationRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Which key attribute a value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAttribute {
    Partition,
    Sort,
}

impl KeyAttribute {
    fn label(&self) -> &'static str {
        match self {
            KeyAttribute::Partition => "partition key",
            KeyAttribute::Sort => "sort key",
        }
    }

    fn value<'r>(&self, record: &'r OperationRecord) -> Option<&'r str> {
        match self {
            KeyAttribute::Partition => record.partition_key_value.as_deref(),
            KeyAttribute::Sort => record.sort_key_value.as_deref(),
        }
    }
}

/// Shape shared by the majority of concatenated values
#[derive(Debug, Clone, PartialEq)]
pub struct KeyShape<'v> {
    pub segment_count: usize,
    pub samples: Vec<&'v str>,
    /// Positions whose segment differs between samples
    pub varying_positions: Vec<usize>,
}

/// Find the dominant segment count and which positions vary under it
///
/// Ties between segment counts go to the longer shape.
pub fn dominant_shape<'v>(values: &[&'v str]) -> Option<KeyShape<'v>> {
    let mut by_count: BTreeMap<usize, Vec<&'v str>> = BTreeMap::new();
    for value in values.iter().copied().filter(|v| is_concatenated(v)) {
        by_count.entry(segments(value).len()).or_default().push(value);
    }

    let (segment_count, samples) = by_count
        .into_iter()
        .max_by(|a, b| a.1.len().cmp(&b.1.len()).then(a.0.cmp(&b.0)))?;

    let mut distinct: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); segment_count];
    for value in &samples {
        for (position, segment) in segments(value).into_iter().enumerate() {
            distinct[position].insert(segment);
        }
    }
    let varying_positions = distinct
        .iter()
        .enumerate()
        .filter(|(_, set)| set.len() > 1)
        .map(|(position, _)| position)
        .collect();

    Some(KeyShape {
        segment_count,
        samples,
        varying_positions,
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MultiAttributeKeyDetector;

impl Detector for MultiAttributeKeyDetector {
    fn name(&self) -> &'static str {
        "multi-attribute-key"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let mut out = Vec::new();

        for (group, records) in group_by(ctx.records, group_key) {
            for attribute in [KeyAttribute::Partition, KeyAttribute::Sort] {
                let values: Vec<&str> = records.iter().filter_map(|r| attribute.value(r)).collect();
                let Some(shape) = dominant_shape(&values) else {
                    continue;
                };
                if shape.samples.len() < MIN_GROUP_SAMPLES
                    || shape.varying_positions.len() < CONCATENATED_MIN_VARYING
                {
                    continue;
                }

                let example = shape.samples.first().copied().unwrap_or_default();
                let positions: Vec<String> = shape.varying_positions.iter().map(|p| p.to_string()).collect();
                let kinds = operation_kinds(
                    records
                        .iter()
                        .copied()
                        .filter(|r| attribute.value(r).is_some_and(is_concatenated)),
                );

                out.push(
                    Recommendation::new(
                        Severity::Info,
                        Category::MultiAttributeKey,
                        format!("'{}' builds its {} by concatenation", group, attribute.label()),
                        format!(
                            "{} samples share a {}-segment shape (e.g. '{}'); segments at positions {} vary \
                             independently.",
                            shape.samples.len(),
                            shape.segment_count,
                            example,
                            positions.join(", ")
                        ),
                    )
                    .with_action(format!(
                        "Store the varying segments as separate attributes and declare them as a \
                         multi-attribute {} instead of joining them into one string",
                        attribute.label()
                    ))
                    .with_operations(kinds)
                    .with_impact(
                        EstimatedImpact::scored(shape.varying_positions.len() as f64)
                            .with_performance("queries can match on leading attributes without string prefixes"),
                    )
                    .with_scope(group.clone())
                    .with_occurrences(shape.samples.len() as u64),
                );
            }
        }

        Ok(out)
    }
}
