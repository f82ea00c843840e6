/*!
 * Recorder
 * Raw record buffer and running aggregates behind a single lock
 *
 * The buffer append and the aggregate update form one critical section, so a
 * reader never observes a record without its aggregate contribution.
 */

use super::aggregates::{AccessPatternAggregate, Aggregate, AggregateViews};
use super::record::{OperationKind, OperationRecord};
use crate::core::types::Name;
use ahash::RandomState;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Mutable state owned by one recorder
#[derive(Debug, Default)]
struct RecorderState {
    buffer: Vec<OperationRecord>,
    total_operations: u64,
    sampled_out: u64,
    by_operation: HashMap<OperationKind, Aggregate, RandomState>,
    by_access_pattern: HashMap<Name, AccessPatternAggregate, RandomState>,
}

impl RecorderState {
    fn views(&self) -> AggregateViews {
        AggregateViews {
            total_operations: self.total_operations,
            buffered_records: self.buffer.len() as u64,
            sampled_out: self.sampled_out,
            by_operation: self
                .by_operation
                .iter()
                .map(|(kind, agg)| (*kind, agg.clone()))
                .collect(),
            by_access_pattern: self
                .by_access_pattern
                .iter()
                .map(|(name, agg)| (name.clone(), agg.clone()))
                .collect(),
        }
    }
}

/// Shared record buffer with incremental aggregates
///
/// Clones share state; independent recorders share nothing.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    state: Arc<RwLock<RecorderState>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a record into the aggregates and, if retained, append it to the buffer
    pub fn append(&self, record: OperationRecord, retained: bool) {
        let mut state = self.state.write();

        state.total_operations += 1;
        state
            .by_operation
            .entry(record.operation)
            .or_default()
            .observe(&record);
        if let Some(pattern) = &record.access_pattern_name {
            state
                .by_access_pattern
                .entry(pattern.clone())
                .or_default()
                .observe(&record);
        }

        if retained {
            state.buffer.push(record);
        } else {
            state.sampled_out += 1;
        }
    }

    /// Current aggregate views (O(groups), no detector work)
    pub fn views(&self) -> AggregateViews {
        self.state.read().views()
    }

    /// Run `f` against one consistent snapshot of buffer and aggregates
    pub fn with_snapshot<R>(&self, f: impl FnOnce(&[OperationRecord], &AggregateViews) -> R) -> R {
        let state = self.state.read();
        let views = state.views();
        f(&state.buffer, &views)
    }

    /// Copy of the full raw buffer, in arrival order
    pub fn export(&self) -> Vec<OperationRecord> {
        self.state.read().buffer.clone()
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.state.read().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear buffer and aggregates atomically
    pub fn reset(&self) {
        let mut state = self.state.write();
        let dropped = state.buffer.len();
        *state = RecorderState::default();
        drop(state);
        info!(dropped_records = dropped, "recorder reset");
    }
}
