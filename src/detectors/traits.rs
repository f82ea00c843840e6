/*!
 * Detector Traits
 */

use super::context::DetectionContext;
use crate::advisor::Recommendation;
use crate::core::errors::DetectorError;

/// Result of one detector run
pub type DetectorResult = Result<Vec<Recommendation>, DetectorError>;

/// Stateless heuristic over the record buffer and aggregates
///
/// Implementations must be pure: the same context always yields the same
/// candidates in the same order.
pub trait Detector: Send + Sync {
    /// Stable detector name, attached to every candidate it produces
    fn name(&self) -> &'static str;

    /// Produce zero or more recommendation candidates
    fn detect(&self, ctx: &DetectionContext<'_>) -> DetectorResult;
}
