/*!
 * Recommendations
 * Output-only advice values produced fresh on every evaluation
 */

use crate::core::serde::is_empty_vec;
use crate::core::types::Name;
use crate::telemetry::OperationKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recommendation severity, ordered for prioritization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    Info = 0,
    Warning = 1,
    Error = 2,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// Recommendation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    HotPartition,
    ScanInefficiency,
    FetchingToFilter,
    BatchOpportunity,
    ReadBeforeWrite,
    LargeItem,
    UniformPartitionKey,
    UnusedIndex,
    Capacity,
    Cost,
    Performance,
    MultiAttributeKey,
    BestPractice,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::HotPartition => "hot-partition",
            Category::ScanInefficiency => "scan-inefficiency",
            Category::FetchingToFilter => "fetching-to-filter",
            Category::BatchOpportunity => "batch-opportunity",
            Category::ReadBeforeWrite => "read-before-write",
            Category::LargeItem => "large-item",
            Category::UniformPartitionKey => "uniform-partition-key",
            Category::UnusedIndex => "unused-index",
            Category::Capacity => "capacity",
            Category::Cost => "cost",
            Category::Performance => "performance",
            Category::MultiAttributeKey => "multi-attribute-key",
            Category::BestPractice => "best-practice",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form cost and performance estimate with an optional ranking score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedImpact {
    /// Higher is more impactful; used as a secondary sort key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<String>,
}

impl EstimatedImpact {
    pub fn scored(score: f64) -> Self {
        Self {
            score: score.is_finite().then_some(score),
            ..Self::default()
        }
    }

    pub fn with_cost(mut self, cost: impl Into<String>) -> Self {
        self.cost = Some(cost.into());
        self
    }

    pub fn with_performance(mut self, performance: impl Into<String>) -> Self {
        self.performance = Some(performance.into());
        self
    }
}

/// One piece of advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub affected_operations: Vec<OperationKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_impact: Option<EstimatedImpact>,
    /// Grouping key the finding applies to (access pattern, table, table/index)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<Name>,
    /// Number of records supporting the finding
    pub occurrences: u64,
    /// Name of the detector that produced the finding
    pub detector: Name,
}

impl Recommendation {
    pub fn new(
        severity: Severity,
        category: Category,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            details: details.into(),
            suggested_action: None,
            affected_operations: Vec::new(),
            estimated_impact: None,
            scope: None,
            occurrences: 0,
            detector: Name::new(),
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = Some(action.into());
        self
    }

    /// Set affected operation kinds, sorted and deduplicated
    pub fn with_operations(mut self, operations: impl IntoIterator<Item = OperationKind>) -> Self {
        let mut ops: Vec<OperationKind> = operations.into_iter().collect();
        ops.sort();
        ops.dedup();
        self.affected_operations = ops;
        self
    }

    pub fn with_impact(mut self, impact: EstimatedImpact) -> Self {
        self.estimated_impact = Some(impact);
        self
    }

    pub fn with_scope(mut self, scope: impl Into<Name>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_occurrences(mut self, occurrences: u64) -> Self {
        self.occurrences = occurrences;
        self
    }

    pub(crate) fn from_detector(mut self, detector: &str) -> Self {
        self.detector = detector.into();
        self
    }

    /// Ranking score carried by the estimated impact, if any
    pub fn impact_score(&self) -> Option<f64> {
        self.estimated_impact.as_ref().and_then(|i| i.score)
    }
}
