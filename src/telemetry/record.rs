/*!
 * Operation Records
 * Immutable unit of telemetry describing one completed store call
 */

use crate::core::types::{Name, TimestampMs};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Store operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Get,
    Put,
    Update,
    Delete,
    Query,
    Scan,
    BatchGet,
    BatchWrite,
    TransactWrite,
    TransactGet,
}

impl OperationKind {
    pub const ALL: [OperationKind; 10] = [
        OperationKind::Get,
        OperationKind::Put,
        OperationKind::Update,
        OperationKind::Delete,
        OperationKind::Query,
        OperationKind::Scan,
        OperationKind::BatchGet,
        OperationKind::BatchWrite,
        OperationKind::TransactWrite,
        OperationKind::TransactGet,
    ];

    /// Wire name of the operation tag
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Get => "get",
            OperationKind::Put => "put",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
            OperationKind::Query => "query",
            OperationKind::Scan => "scan",
            OperationKind::BatchGet => "batchGet",
            OperationKind::BatchWrite => "batchWrite",
            OperationKind::TransactWrite => "transactWrite",
            OperationKind::TransactGet => "transactGet",
        }
    }

    /// Single-item write that could be folded into a batch write
    #[inline]
    pub fn is_single_write(&self) -> bool {
        matches!(self, OperationKind::Put | OperationKind::Delete)
    }

    /// Operation that examines items server-side before returning them
    #[inline]
    pub fn is_read_many(&self) -> bool {
        matches!(self, OperationKind::Query | OperationKind::Scan)
    }

    /// Operation that writes a whole or partial item body
    #[inline]
    pub fn writes_item_body(&self) -> bool {
        matches!(self, OperationKind::Put | OperationKind::Update)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed store operation
///
/// Records are created by the store client at call completion and never
/// mutated once recorded. Key values are snapshots used only for pattern
/// detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub operation: OperationKind,
    pub table_name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_name: Option<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_pattern_name: Option<Name>,
    pub timestamp: TimestampMs,
    #[serde(default)]
    pub latency_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_read_units: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumed_write_units: Option<f64>,
    #[serde(default)]
    pub item_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scanned_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_key_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_size_bytes: Option<u64>,
    #[serde(default, skip_serializing_if = "crate::core::serde::is_false")]
    pub filter_applied: bool,
}

impl OperationRecord {
    /// Create a record with only the required fields set
    pub fn new(operation: OperationKind, table_name: impl Into<Name>, timestamp: TimestampMs) -> Self {
        Self {
            operation,
            table_name: table_name.into(),
            index_name: None,
            access_pattern_name: None,
            timestamp,
            latency_ms: 0.0,
            consumed_read_units: None,
            consumed_write_units: None,
            item_count: 0,
            scanned_count: None,
            partition_key_value: None,
            sort_key_value: None,
            item_size_bytes: None,
            filter_applied: false,
        }
    }

    pub fn with_index(mut self, index_name: impl Into<Name>) -> Self {
        self.index_name = Some(index_name.into());
        self
    }

    pub fn with_access_pattern(mut self, name: impl Into<Name>) -> Self {
        self.access_pattern_name = Some(name.into());
        self
    }

    pub fn with_latency_ms(mut self, latency_ms: f64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_read_units(mut self, units: f64) -> Self {
        self.consumed_read_units = Some(units);
        self
    }

    pub fn with_write_units(mut self, units: f64) -> Self {
        self.consumed_write_units = Some(units);
        self
    }

    pub fn with_item_count(mut self, item_count: u64) -> Self {
        self.item_count = item_count;
        self
    }

    pub fn with_scanned_count(mut self, scanned_count: u64) -> Self {
        self.scanned_count = Some(scanned_count);
        self
    }

    /// Set the partition key snapshot
    pub fn with_partition_key(mut self, value: impl Into<String>) -> Self {
        self.partition_key_value = Some(value.into());
        self
    }

    /// Set both key snapshots
    pub fn with_key(mut self, partition: impl Into<String>, sort: impl Into<String>) -> Self {
        self.partition_key_value = Some(partition.into());
        self.sort_key_value = Some(sort.into());
        self
    }

    pub fn with_item_size(mut self, bytes: u64) -> Self {
        self.item_size_bytes = Some(bytes);
        self
    }

    pub fn with_filter_applied(mut self, applied: bool) -> Self {
        self.filter_applied = applied;
        self
    }

    /// Clamp impossible values instead of rejecting the record
    ///
    /// Negative or non-finite latency becomes 0. Negative capacity units become
    /// 0, non-finite units are dropped. Empty optional labels are dropped.
    /// `item_count > scanned_count` is kept as-is.
    pub fn normalized(mut self) -> Self {
        if !self.latency_ms.is_finite() || self.latency_ms < 0.0 {
            self.latency_ms = 0.0;
        }
        self.consumed_read_units = clamp_units(self.consumed_read_units);
        self.consumed_write_units = clamp_units(self.consumed_write_units);

        if self.index_name.as_ref().is_some_and(|n| n.is_empty()) {
            self.index_name = None;
        }
        if self.access_pattern_name.as_ref().is_some_and(|n| n.is_empty()) {
            self.access_pattern_name = None;
        }
        if self.partition_key_value.as_ref().is_some_and(|v| v.is_empty()) {
            self.partition_key_value = None;
        }
        if self.sort_key_value.as_ref().is_some_and(|v| v.is_empty()) {
            self.sort_key_value = None;
        }
        self
    }

    /// Items returned per item examined, clamped to [0, 1]
    ///
    /// Returns `None` when no scanned count was reported. A zero scanned count
    /// or an item count above the scanned count yields 1.0.
    pub fn efficiency(&self) -> Option<f64> {
        let scanned = self.scanned_count?;
        if scanned == 0 || self.item_count >= scanned {
            return Some(1.0);
        }
        Some(self.item_count as f64 / scanned as f64)
    }

    #[inline]
    pub fn read_units(&self) -> f64 {
        self.consumed_read_units.unwrap_or(0.0)
    }

    #[inline]
    pub fn write_units(&self) -> f64 {
        self.consumed_write_units.unwrap_or(0.0)
    }
}

fn clamp_units(units: Option<f64>) -> Option<f64> {
    match units {
        Some(u) if !u.is_finite() => None,
        Some(u) => Some(u.max(0.0)),
        None => None,
    }
}
