/*!
 * Unused Secondary Index Detection
 *
 * Every secondary index is paid for on each write to its table. An index not
 * read for seven days relative to the reference time is a removal candidate.
 */

use super::context::DetectionContext;
use super::traits::{Detector, DetectorResult};
use crate::advisor::{Category, EstimatedImpact, IndexRef, Recommendation, Severity};
use crate::core::limits::{MS_PER_DAY, UNUSED_INDEX_MS};
use crate::core::types::TimestampMs;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy)]
pub struct UnusedIndexDetector;

impl UnusedIndexDetector {
    fn recommend(index: &IndexRef, details: String, idle_days: u64) -> Recommendation {
        Recommendation::new(
            Severity::Info,
            Category::UnusedIndex,
            format!(
                "Index '{}' on {} appears unused",
                index.index_name, index.table_name
            ),
            details,
        )
        .with_action(
            "Remove the index to save write and storage cost, after confirming no periodic job \
             depends on it",
        )
        .with_impact(
            EstimatedImpact::scored(idle_days as f64)
                .with_cost("every write to the table also writes this index"),
        )
        .with_scope(format!("{}/{}", index.table_name, index.index_name))
    }
}

impl Detector for UnusedIndexDetector {
    fn name(&self) -> &'static str {
        "unused-index"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let Some(earliest) = ctx.earliest_timestamp() else {
            return Ok(Vec::new());
        };
        let reference = ctx.reference_time();

        let mut last_seen: BTreeMap<IndexRef, (TimestampMs, u64)> = BTreeMap::new();
        for record in ctx.records {
            if let Some(index) = &record.index_name {
                let entry = last_seen
                    .entry(IndexRef::new(record.table_name.clone(), index.clone()))
                    .or_insert((record.timestamp, 0));
                entry.0 = entry.0.max(record.timestamp);
                entry.1 += 1;
            }
        }

        let mut out = Vec::new();
        for (index, (seen_at, uses)) in &last_seen {
            let idle = reference.saturating_sub(*seen_at);
            if idle > UNUSED_INDEX_MS {
                let idle_days = idle / MS_PER_DAY;
                out.push(
                    Self::recommend(
                        index,
                        format!(
                            "Last used {} day(s) before the reference time ({} operations observed in total).",
                            idle_days, uses
                        ),
                        idle_days,
                    )
                    .with_occurrences(*uses),
                );
            }
        }

        // Declared indexes never observed, once the window is long enough to tell
        let observed = reference.saturating_sub(earliest);
        if observed >= UNUSED_INDEX_MS {
            let observed_days = observed / MS_PER_DAY;
            for index in &ctx.config.known_indexes {
                if !last_seen.contains_key(index) {
                    out.push(Self::recommend(
                        index,
                        format!("No operation used this index in {} day(s) of observation.", observed_days),
                        observed_days,
                    ));
                }
            }
        }

        Ok(out)
    }
}
