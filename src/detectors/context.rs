/*!
 * Detection Context
 * Read-only snapshot handed to every detector in one evaluation
 */

use crate::advisor::{AdvisorConfig, ReferenceClock};
use crate::core::types::TimestampMs;
use crate::telemetry::{AggregateViews, OperationRecord};

/// Everything a detector may look at
#[derive(Debug, Clone, Copy)]
pub struct DetectionContext<'a> {
    /// Raw (possibly sampled) records in arrival order
    pub records: &'a [OperationRecord],
    /// Aggregates over every observed call
    pub views: &'a AggregateViews,
    pub config: &'a AdvisorConfig,
    /// Wall-clock time captured once at the start of the evaluation
    pub now_ms: TimestampMs,
}

impl<'a> DetectionContext<'a> {
    pub fn new(
        records: &'a [OperationRecord],
        views: &'a AggregateViews,
        config: &'a AdvisorConfig,
        now_ms: TimestampMs,
    ) -> Self {
        Self {
            records,
            views,
            config,
            now_ms,
        }
    }

    pub fn earliest_timestamp(&self) -> Option<TimestampMs> {
        self.records.iter().map(|r| r.timestamp).min()
    }

    pub fn latest_timestamp(&self) -> Option<TimestampMs> {
        self.records.iter().map(|r| r.timestamp).max()
    }

    /// "Now" for recency checks, per the configured reference clock
    pub fn reference_time(&self) -> TimestampMs {
        let latest = self.latest_timestamp().unwrap_or(0);
        match self.config.reference_clock {
            ReferenceClock::LatestRecord => latest,
            ReferenceClock::WallClock => latest.max(self.now_ms),
        }
    }
}
