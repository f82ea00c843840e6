/*!
 * Expensive Operations
 *
 * Groups whose average latency or consumed capacity exceeds the configured
 * thresholds.
 */

use super::context::DetectionContext;
use super::grouping::{group_by, group_key, operation_kinds};
use super::traits::{Detector, DetectorResult};
use crate::advisor::{Category, EstimatedImpact, Recommendation, Severity};
use crate::core::errors::DetectorError;
use crate::core::limits::MIN_GROUP_SAMPLES;
use crate::telemetry::{Aggregate, OperationRecord};

#[derive(Debug, Default, Clone, Copy)]
pub struct ExpensiveOperationsDetector;

impl ExpensiveOperationsDetector {
    fn check_finite(&self, metric: &str, value: f64) -> Result<f64, DetectorError> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(DetectorError::NonFiniteMetric {
                detector: self.name().into(),
                metric: metric.into(),
            })
        }
    }

    fn capacity(
        group: &str,
        records: &[&OperationRecord],
        kind: &str,
        average: f64,
        threshold: f64,
    ) -> Recommendation {
        Recommendation::new(
            Severity::Warning,
            Category::Cost,
            format!("'{}' consumes {:.1} {} units per call on average", group, average, kind),
            format!(
                "Average over {} operations exceeds the {} {}-unit threshold.",
                records.len(),
                threshold,
                kind
            ),
        )
        .with_action(
            "Project only the attributes you need, narrow key conditions, or move the access \
             pattern onto an index that stores smaller items",
        )
        .with_impact(
            EstimatedImpact::scored(average / threshold * 100.0)
                .with_cost(format!("{:.1}x the {} unit threshold", average / threshold, kind)),
        )
    }
}

impl Detector for ExpensiveOperationsDetector {
    fn name(&self) -> &'static str {
        "expensive-operations"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let thresholds = &ctx.config.thresholds;
        let mut out = Vec::new();

        for (group, records) in group_by(ctx.records, group_key) {
            if records.len() < MIN_GROUP_SAMPLES {
                continue;
            }

            let mut totals = Aggregate::default();
            for record in &records {
                totals.observe(record);
            }
            let latency = self.check_finite("latency", totals.avg_latency_ms())?;
            let read_units = self.check_finite("read units", totals.avg_read_units())?;
            let write_units = self.check_finite("write units", totals.avg_write_units())?;
            let kinds = operation_kinds(records.iter().copied());

            let mut found = Vec::new();
            if latency > thresholds.slow_query_ms {
                found.push(
                    Recommendation::new(
                        Severity::Warning,
                        Category::Performance,
                        format!("'{}' averages {:.0}ms per call", group, latency),
                        format!(
                            "Average latency over {} operations exceeds the {:.0}ms slow-query threshold.",
                            records.len(),
                            thresholds.slow_query_ms
                        ),
                    )
                    .with_action(
                        "Replace scans with key-condition queries, add an index for this access pattern, \
                         or paginate large result sets",
                    )
                    .with_impact(
                        EstimatedImpact::scored(latency / thresholds.slow_query_ms * 100.0)
                            .with_performance(format!("{:.0}ms average latency", latency)),
                    ),
                );
            }
            if read_units > thresholds.high_read_units {
                found.push(Self::capacity(&group, &records, "read", read_units, thresholds.high_read_units));
            }
            if write_units > thresholds.high_write_units {
                found.push(Self::capacity(&group, &records, "write", write_units, thresholds.high_write_units));
            }

            out.extend(found.into_iter().map(|r| {
                r.with_operations(kinds.iter().copied())
                    .with_scope(group.clone())
                    .with_occurrences(records.len() as u64)
            }));
        }

        Ok(out)
    }
}
