/*!
 * Large Item Detection
 *
 * Items approaching the 400 KB per-item ceiling cost proportionally more
 * capacity per write and fail outright once they grow past it.
 */

use super::context::DetectionContext;
use super::grouping::{format_bytes, group_by, group_key, operation_kinds};
use super::traits::{Detector, DetectorResult};
use crate::advisor::{Category, EstimatedImpact, Recommendation, Severity};
use crate::core::limits::{KB, LARGE_ITEM_INFO_BYTES, LARGE_ITEM_WARNING_BYTES, MAX_ITEM_BYTES};

/// Severity for a single item size, `None` below the info band
pub fn classify_size(bytes: u64) -> Option<Severity> {
    if bytes > LARGE_ITEM_WARNING_BYTES {
        Some(Severity::Warning)
    } else if bytes > LARGE_ITEM_INFO_BYTES {
        Some(Severity::Info)
    } else {
        None
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LargeItemDetector;

impl Detector for LargeItemDetector {
    fn name(&self) -> &'static str {
        "large-item"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let sized = ctx
            .records
            .iter()
            .filter(|r| r.operation.writes_item_body() && r.item_size_bytes.is_some());

        let mut out = Vec::new();
        for (group, records) in group_by(sized, group_key) {
            let sizes: Vec<u64> = records.iter().filter_map(|r| r.item_size_bytes).collect();
            let max = sizes.iter().copied().max().unwrap_or(0);
            let Some(severity) = classify_size(max) else {
                continue;
            };

            let total = sizes.iter().fold(0u128, |acc, &b| acc + u128::from(b));
            let avg = (total / sizes.len().max(1) as u128) as u64;
            let large: Vec<_> = records
                .iter()
                .copied()
                .filter(|r| r.item_size_bytes.is_some_and(|b| classify_size(b).is_some()))
                .collect();
            let write_units = max.div_ceil(KB);

            out.push(
                Recommendation::new(
                    severity,
                    Category::LargeItem,
                    format!(
                        "Items written by '{}' reach {} (limit {})",
                        group,
                        format_bytes(max),
                        format_bytes(MAX_ITEM_BYTES)
                    ),
                    format!(
                        "{} of {} sized writes exceed {}; average size {}, maximum {}.",
                        large.len(),
                        sizes.len(),
                        format_bytes(LARGE_ITEM_INFO_BYTES),
                        format_bytes(avg),
                        format_bytes(max)
                    ),
                )
                .with_action(
                    "Move the large payload to blob storage and keep a reference (bucket key or URL) \
                     in the item, or compress/split rarely-read attributes into a separate item",
                )
                .with_operations(operation_kinds(large.iter().copied()))
                .with_impact(
                    EstimatedImpact::scored(max as f64 / MAX_ITEM_BYTES as f64 * 100.0)
                        .with_cost(format!("~{} write units per write of the largest item", write_units)),
                )
                .with_scope(group.clone())
                .with_occurrences(large.len() as u64),
            );
        }

        Ok(out)
    }
}
