/*!
 * Aggregate Views
 * Running per-operation and per-access-pattern totals
 */

use super::record::{OperationKind, OperationRecord};
use crate::core::serde::is_zero_u64;
use crate::core::types::Name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Running totals for one operation kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    pub count: u64,
    pub total_latency_ms: f64,
    pub total_read_units: f64,
    pub total_write_units: f64,
}

impl Aggregate {
    /// Fold one record into the totals
    #[inline]
    pub fn observe(&mut self, record: &OperationRecord) {
        self.count += 1;
        self.total_latency_ms += record.latency_ms;
        self.total_read_units += record.read_units();
        self.total_write_units += record.write_units();
    }

    pub fn avg_latency_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_latency_ms / self.count as f64
        }
    }

    pub fn avg_read_units(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_read_units / self.count as f64
        }
    }

    pub fn avg_write_units(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_write_units / self.count as f64
        }
    }
}

/// Running totals for one access pattern
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPatternAggregate {
    #[serde(flatten)]
    pub totals: Aggregate,
    pub total_items_returned: u64,
}

impl AccessPatternAggregate {
    #[inline]
    pub fn observe(&mut self, record: &OperationRecord) {
        self.totals.observe(record);
        self.total_items_returned += record.item_count;
    }
}

/// Snapshot of all aggregates at a point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateViews {
    /// Calls observed while enabled (sampled or not)
    pub total_operations: u64,
    /// Records currently retained in the raw buffer
    pub buffered_records: u64,
    /// Calls observed but not retained by the sampler
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub sampled_out: u64,
    pub by_operation: BTreeMap<OperationKind, Aggregate>,
    pub by_access_pattern: BTreeMap<Name, AccessPatternAggregate>,
}

impl AggregateViews {
    /// Recompute aggregates from scratch over a record buffer
    ///
    /// Matches the incrementally maintained views exactly when every call was
    /// retained.
    pub fn replay<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a OperationRecord>,
    {
        let mut views = Self::default();
        for record in records {
            views.total_operations += 1;
            views.buffered_records += 1;
            views
                .by_operation
                .entry(record.operation)
                .or_default()
                .observe(record);
            if let Some(pattern) = &record.access_pattern_name {
                views
                    .by_access_pattern
                    .entry(pattern.clone())
                    .or_default()
                    .observe(record);
            }
        }
        views
    }

    /// Operation-kind aggregate, zeroed if never observed
    pub fn operation(&self, kind: OperationKind) -> Aggregate {
        self.by_operation.get(&kind).cloned().unwrap_or_default()
    }

    /// Sum of consumed read units across all operation kinds
    pub fn total_read_units(&self) -> f64 {
        self.by_operation.values().map(|a| a.total_read_units).sum()
    }

    /// Sum of consumed write units across all operation kinds
    pub fn total_write_units(&self) -> f64 {
        self.by_operation.values().map(|a| a.total_write_units).sum()
    }

    /// Observed calls per retained record (1.0 at full capture)
    pub fn sampling_ratio(&self) -> f64 {
        if self.buffered_records == 0 {
            1.0
        } else {
            self.total_operations as f64 / self.buffered_records as f64
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_operations == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_observe() {
        let mut agg = Aggregate::default();
        agg.observe(
            &OperationRecord::new(OperationKind::Query, "users", 0)
                .with_latency_ms(10.0)
                .with_read_units(2.0),
        );
        agg.observe(
            &OperationRecord::new(OperationKind::Query, "users", 1)
                .with_latency_ms(30.0)
                .with_read_units(4.0),
        );

        assert_eq!(agg.count, 2);
        assert_eq!(agg.avg_latency_ms(), 20.0);
        assert_eq!(agg.avg_read_units(), 3.0);
        assert_eq!(agg.avg_write_units(), 0.0);
    }

    #[test]
    fn test_replay_groups_by_pattern() {
        let records = vec![
            OperationRecord::new(OperationKind::Query, "users", 0)
                .with_access_pattern("byEmail")
                .with_item_count(1),
            OperationRecord::new(OperationKind::Query, "users", 1)
                .with_access_pattern("byEmail")
                .with_item_count(3),
            OperationRecord::new(OperationKind::Put, "users", 2),
        ];

        let views = AggregateViews::replay(&records);
        assert_eq!(views.total_operations, 3);
        assert_eq!(views.operation(OperationKind::Query).count, 2);
        assert_eq!(views.operation(OperationKind::Put).count, 1);
        assert_eq!(views.operation(OperationKind::Scan).count, 0);

        let pattern = &views.by_access_pattern["byEmail"];
        assert_eq!(pattern.totals.count, 2);
        assert_eq!(pattern.total_items_returned, 4);
    }

    #[test]
    fn test_empty_views() {
        let views = AggregateViews::default();
        assert!(views.is_empty());
        assert_eq!(views.sampling_ratio(), 1.0);
        assert_eq!(views.total_read_units(), 0.0);
    }
}
