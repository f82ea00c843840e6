/*!
 * Scan and Filter Efficiency
 *
 * Efficiency is items returned per item examined server-side. Low averages
 * mean read capacity is spent on items that are thrown away.
 *
 * - Scan inefficiency: scan/query operations that report a scanned count
 * - Fetching to filter: any operation whose result was narrowed by a filter
 */

use super::context::DetectionContext;
use super::grouping::{group_by, group_key, operation_kinds, percent};
use super::traits::{Detector, DetectorResult};
use crate::advisor::{Category, EstimatedImpact, Recommendation, Severity};
use crate::core::errors::DetectorError;
use crate::core::limits::{MIN_GROUP_SAMPLES, SCAN_EFFICIENCY_INFO, SCAN_EFFICIENCY_WARNING};
use crate::telemetry::{OperationKind, OperationRecord};

/// Map an average efficiency to a severity, `None` when acceptable
pub fn classify_efficiency(average: f64) -> Option<Severity> {
    if average < SCAN_EFFICIENCY_WARNING {
        Some(Severity::Warning)
    } else if average < SCAN_EFFICIENCY_INFO {
        Some(Severity::Info)
    } else {
        None
    }
}

/// Per-group efficiency summary
struct EfficiencySummary {
    operations: usize,
    average: f64,
    scanned: u64,
    returned: u64,
    read_units: Option<f64>,
}

fn summarize(detector: &str, records: &[&OperationRecord]) -> Result<EfficiencySummary, DetectorError> {
    if records.is_empty() {
        return Err(DetectorError::EmptyGroup(detector.into()));
    }

    let mut sum = 0.0;
    let mut scanned = 0u64;
    let mut returned = 0u64;
    let mut read_units: Option<f64> = None;

    for record in records {
        sum += record.efficiency().unwrap_or(1.0);
        scanned = scanned.saturating_add(record.scanned_count.unwrap_or(0));
        returned = returned.saturating_add(record.item_count);
        if let Some(units) = record.consumed_read_units {
            *read_units.get_or_insert(0.0) += units;
        }
    }

    let average = sum / records.len() as f64;
    if !average.is_finite() {
        return Err(DetectorError::NonFiniteMetric {
            detector: detector.into(),
            metric: "efficiency".into(),
        });
    }

    Ok(EfficiencySummary {
        operations: records.len(),
        average,
        scanned,
        returned,
        read_units,
    })
}

fn wasted_impact(summary: &EfficiencySummary) -> EstimatedImpact {
    let wasted = 1.0 - summary.average;
    let impact = EstimatedImpact::scored(wasted * 100.0).with_performance(format!(
        "{} operations examined {} items to return {}",
        summary.operations, summary.scanned, summary.returned
    ));
    match summary.read_units {
        Some(units) if units > 0.0 => impact.with_cost(format!(
            "~{:.1} of {:.1} read units spent on discarded items",
            units * wasted,
            units
        )),
        _ => impact.with_cost(format!("~{} of examined items discarded", percent(wasted))),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ScanEfficiencyDetector;

impl Detector for ScanEfficiencyDetector {
    fn name(&self) -> &'static str {
        "scan-efficiency"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let candidates = ctx
            .records
            .iter()
            .filter(|r| r.operation.is_read_many() && r.scanned_count.is_some());

        let mut out = Vec::new();
        for (group, records) in group_by(candidates, group_key) {
            if records.len() < MIN_GROUP_SAMPLES {
                continue;
            }
            let summary = summarize(self.name(), &records)?;
            let Some(severity) = classify_efficiency(summary.average) else {
                continue;
            };

            let kinds = operation_kinds(records.iter().copied());
            let (noun, action) = if kinds.contains(&OperationKind::Scan) {
                (
                    "Scans",
                    "Replace the scan with a query against a key or secondary index that matches this access pattern",
                )
            } else {
                (
                    "Queries",
                    "Tighten the key condition, or add a secondary index whose sort key encodes the filtered attribute",
                )
            };

            out.push(
                Recommendation::new(
                    severity,
                    Category::ScanInefficiency,
                    format!(
                        "{} for '{}' return only {} of the items they examine",
                        noun,
                        group,
                        percent(summary.average)
                    ),
                    format!(
                        "Average efficiency across {} operations is {} ({} items returned of {} examined).",
                        summary.operations,
                        percent(summary.average),
                        summary.returned,
                        summary.scanned
                    ),
                )
                .with_action(action)
                .with_operations(kinds)
                .with_impact(wasted_impact(&summary))
                .with_scope(group.clone())
                .with_occurrences(summary.operations as u64),
            );
        }

        Ok(out)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FetchingToFilterDetector;

impl Detector for FetchingToFilterDetector {
    fn name(&self) -> &'static str {
        "fetching-to-filter"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let candidates = ctx
            .records
            .iter()
            .filter(|r| r.filter_applied && r.scanned_count.is_some());

        let mut out = Vec::new();
        for (group, records) in group_by(candidates, group_key) {
            if records.len() < MIN_GROUP_SAMPLES {
                continue;
            }
            let summary = summarize(self.name(), &records)?;
            let Some(severity) = classify_efficiency(summary.average) else {
                continue;
            };

            out.push(
                Recommendation::new(
                    severity,
                    Category::FetchingToFilter,
                    format!(
                        "'{}' fetches items only to keep {} of them after filtering",
                        group,
                        percent(summary.average)
                    ),
                    format!(
                        "{} filtered operations fetched {} items and kept {}. \
                         Filtering after the fetch still pays for every item read.",
                        summary.operations, summary.scanned, summary.returned
                    ),
                )
                .with_action(
                    "Push the predicate into a server-side filter expression, or better into the \
                     key condition so discarded items are never read",
                )
                .with_operations(operation_kinds(records.iter().copied()))
                .with_impact(wasted_impact(&summary))
                .with_scope(group.clone())
                .with_occurrences(summary.operations as u64),
            );
        }

        Ok(out)
    }
}
