/*!
 * KV Advisor Library
 * Operation telemetry and anti-pattern recommendations for a key-value store client
 */

pub mod advisor;
pub mod core;
pub mod detectors;
pub mod monitoring;
pub mod telemetry;

// Re-exports
pub use advisor::{Advisor, AdvisorConfig, Category, EstimatedImpact, Recommendation, Severity};
pub use crate::core::errors::{AdvisorError, AdvisorResult, ConfigError, DetectorError};
pub use monitoring::init_tracing;
pub use telemetry::{AggregateViews, OperationKind, OperationRecord};
