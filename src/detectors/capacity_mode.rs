/*!
 * Capacity Mode Mismatch
 *
 * Compares observed throughput against the billing mode. Mean rates come from
 * the aggregates (every observed call); per-minute peaks come from the raw
 * buffer scaled back up by the sampling ratio.
 *
 * With a provisioned baseline: persistently idle or persistently saturated
 * capacity is flagged. Without one the table is assumed on-demand, and steady
 * traffic that would be cheaper provisioned is flagged.
 */

use super::context::DetectionContext;
use super::grouping::{format_dollars, operation_kinds, percent};
use super::traits::{Detector, DetectorResult};
use crate::advisor::{Category, CapacityBaseline, EstimatedImpact, Recommendation, Severity, UnitPricing};
use crate::core::errors::DetectorError;
use crate::core::limits::{
    CAPACITY_HIGH_UTILIZATION, CAPACITY_LOW_UTILIZATION, CAPACITY_MIN_WINDOWS,
    CAPACITY_STEADY_PEAK_RATIO, CAPACITY_TARGET_UTILIZATION, CAPACITY_WINDOW_MS,
    HOURS_PER_MONTH, MS_PER_SECOND, SECONDS_PER_MONTH,
};
use crate::telemetry::{AggregateViews, OperationRecord};
use std::collections::BTreeMap;

/// Read or write throughput
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Read,
    Write,
}

impl Dimension {
    pub const ALL: [Dimension; 2] = [Dimension::Read, Dimension::Write];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Read => "read",
            Dimension::Write => "write",
        }
    }

    fn units(&self, record: &OperationRecord) -> Option<f64> {
        match self {
            Dimension::Read => record.consumed_read_units,
            Dimension::Write => record.consumed_write_units,
        }
    }

    fn total(&self, views: &AggregateViews) -> f64 {
        match self {
            Dimension::Read => views.total_read_units(),
            Dimension::Write => views.total_write_units(),
        }
    }

    fn baseline(&self, baseline: &CapacityBaseline) -> f64 {
        match self {
            Dimension::Read => baseline.read_units_per_second,
            Dimension::Write => baseline.write_units_per_second,
        }
    }

    /// Monthly on-demand cost of a sustained rate (units per second)
    pub fn on_demand_monthly(&self, pricing: &UnitPricing, rate: f64) -> f64 {
        let per_million = match self {
            Dimension::Read => pricing.on_demand_read_per_million,
            Dimension::Write => pricing.on_demand_write_per_million,
        };
        rate * SECONDS_PER_MONTH / 1_000_000.0 * per_million
    }

    /// Monthly cost of holding `units` of provisioned capacity
    pub fn provisioned_monthly(&self, pricing: &UnitPricing, units: f64) -> f64 {
        let per_hour = match self {
            Dimension::Read => pricing.provisioned_read_per_unit_hour,
            Dimension::Write => pricing.provisioned_write_per_unit_hour,
        };
        units * HOURS_PER_MONTH * per_hour
    }
}

/// Observed throughput for one dimension
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throughput {
    /// Units per second averaged over the observed minutes
    pub mean_rate: f64,
    /// Units per second in the busiest minute
    pub peak_rate: f64,
    pub minutes: u64,
    /// Retained records carrying units for this dimension
    pub samples: u64,
}

/// Measure one dimension; `None` when no record carries its units
pub fn measure(ctx: &DetectionContext<'_>, dimension: Dimension) -> Option<Throughput> {
    let earliest = ctx.earliest_timestamp()?;
    let latest = ctx.latest_timestamp()?;

    let mut per_minute: BTreeMap<u64, f64> = BTreeMap::new();
    let mut samples = 0u64;
    for record in ctx.records {
        if let Some(units) = dimension.units(record) {
            *per_minute.entry(record.timestamp / CAPACITY_WINDOW_MS).or_default() += units;
            samples += 1;
        }
    }
    if samples == 0 {
        return None;
    }

    let minutes = latest / CAPACITY_WINDOW_MS - earliest / CAPACITY_WINDOW_MS + 1;
    let window_seconds = (CAPACITY_WINDOW_MS / MS_PER_SECOND) as f64;
    let peak_units = per_minute.values().copied().fold(0.0, f64::max);

    Some(Throughput {
        mean_rate: dimension.total(ctx.views) / (minutes as f64 * window_seconds),
        peak_rate: peak_units * ctx.views.sampling_ratio() / window_seconds,
        minutes,
        samples,
    })
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CapacityModeDetector;

impl CapacityModeDetector {
    fn against_baseline(
        dimension: Dimension,
        observed: Throughput,
        provisioned: f64,
        pricing: &UnitPricing,
    ) -> Option<Recommendation> {
        let mean_util = observed.mean_rate / provisioned;
        let peak_util = observed.peak_rate / provisioned;
        let label = dimension.as_str();
        let current_cost = dimension.provisioned_monthly(pricing, provisioned);
        let on_demand_cost = dimension.on_demand_monthly(pricing, observed.mean_rate);
        let details = format!(
            "{} {} units/s provisioned; observed mean {:.1} units/s ({}) and peak minute {:.1} units/s ({}) over {} minute(s).",
            provisioned,
            label,
            observed.mean_rate,
            percent(mean_util),
            observed.peak_rate,
            percent(peak_util),
            observed.minutes
        );

        if mean_util >= CAPACITY_HIGH_UTILIZATION {
            return Some(
                Recommendation::new(
                    Severity::Warning,
                    Category::Capacity,
                    format!("Provisioned {} capacity is {} utilized on average", label, percent(mean_util)),
                    details,
                )
                .with_action(format!(
                    "Raise provisioned {} capacity or enable auto scaling targeting {} utilization to avoid throttling",
                    label,
                    percent(CAPACITY_TARGET_UTILIZATION)
                ))
                .with_impact(
                    EstimatedImpact::scored(mean_util * 100.0)
                        .with_performance("requests above the provisioned rate are throttled"),
                ),
            );
        }

        if mean_util >= CAPACITY_LOW_UTILIZATION {
            return None;
        }

        if peak_util > CAPACITY_HIGH_UTILIZATION {
            let delta = current_cost - on_demand_cost;
            return Some(
                Recommendation::new(
                    Severity::Warning,
                    Category::Capacity,
                    format!(
                        "Bursty {} traffic: {} mean utilization with peaks at {}",
                        label,
                        percent(mean_util),
                        percent(peak_util)
                    ),
                    details,
                )
                .with_action("Switch the table to on-demand capacity so bursts are absorbed without provisioning for the peak")
                .with_impact(
                    EstimatedImpact::scored((1.0 - mean_util) * 100.0).with_cost(format!(
                        "provisioned {} vs on-demand {} (delta {})",
                        format_dollars(current_cost),
                        format_dollars(on_demand_cost),
                        format_dollars(delta)
                    )),
                ),
            );
        }

        let right_sized = (observed.peak_rate / CAPACITY_TARGET_UTILIZATION).ceil().max(1.0);
        let right_sized_cost = dimension.provisioned_monthly(pricing, right_sized);
        let (action, target_cost) = if on_demand_cost < right_sized_cost {
            (
                "Switch the table to on-demand capacity".to_string(),
                on_demand_cost,
            )
        } else {
            (
                format!(
                    "Lower provisioned {} capacity to about {} units/s ({} of the observed peak)",
                    label,
                    right_sized,
                    percent(CAPACITY_TARGET_UTILIZATION)
                ),
                right_sized_cost,
            )
        };
        let savings = (current_cost - target_cost).max(0.0);

        Some(
            Recommendation::new(
                Severity::Info,
                Category::Cost,
                format!("Provisioned {} capacity is {} utilized on average", label, percent(mean_util)),
                details,
            )
            .with_action(action)
            .with_impact(EstimatedImpact::scored(savings).with_cost(format!(
                "{} -> {} (save ~{})",
                format_dollars(current_cost),
                format_dollars(target_cost),
                format_dollars(savings)
            ))),
        )
    }

    fn on_demand(dimension: Dimension, observed: Throughput, pricing: &UnitPricing) -> Option<Recommendation> {
        if observed.mean_rate <= 0.0
            || observed.peak_rate > observed.mean_rate * CAPACITY_STEADY_PEAK_RATIO
        {
            return None;
        }

        let units = (observed.peak_rate / CAPACITY_TARGET_UTILIZATION).ceil().max(1.0);
        let provisioned_cost = dimension.provisioned_monthly(pricing, units);
        let on_demand_cost = dimension.on_demand_monthly(pricing, observed.mean_rate);
        if provisioned_cost >= on_demand_cost {
            return None;
        }
        let savings = on_demand_cost - provisioned_cost;
        let label = dimension.as_str();

        Some(
            Recommendation::new(
                Severity::Info,
                Category::Cost,
                format!("Steady {} traffic would be cheaper on provisioned capacity", label),
                format!(
                    "Observed mean {:.1} units/s with peak minute {:.1} units/s over {} minute(s); \
                     on-demand costs about {} versus {} for {} provisioned units.",
                    observed.mean_rate,
                    observed.peak_rate,
                    observed.minutes,
                    format_dollars(on_demand_cost),
                    format_dollars(provisioned_cost),
                    units
                ),
            )
            .with_action(format!(
                "Switch to provisioned capacity with about {} {} units/s and auto scaling",
                units, label
            ))
            .with_impact(
                EstimatedImpact::scored(savings)
                    .with_cost(format!("save ~{}", format_dollars(savings))),
            ),
        )
    }
}

impl Detector for CapacityModeDetector {
    fn name(&self) -> &'static str {
        "capacity-mode"
    }

    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult {
        let mut out = Vec::new();

        for dimension in Dimension::ALL {
            let Some(observed) = measure(ctx, dimension) else {
                continue;
            };
            if observed.minutes < CAPACITY_MIN_WINDOWS {
                continue;
            }
            if !observed.mean_rate.is_finite() || !observed.peak_rate.is_finite() {
                return Err(DetectorError::NonFiniteMetric {
                    detector: self.name().into(),
                    metric: "throughput".into(),
                });
            }

            let pricing = &ctx.config.pricing;
            let recommendation = match &ctx.config.capacity_baseline {
                Some(baseline) => {
                    Self::against_baseline(dimension, observed, dimension.baseline(baseline), pricing)
                }
                None => Self::on_demand(dimension, observed, pricing),
            };

            if let Some(recommendation) = recommendation {
                let kinds = operation_kinds(ctx.records.iter().filter(|r| dimension.units(r).is_some()));
                out.push(
                    recommendation
                        .with_operations(kinds)
                        .with_scope(dimension.as_str())
                        .with_occurrences(observed.samples),
                );
            }
        }

        Ok(out)
    }
}
