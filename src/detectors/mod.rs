/*!
 * Detector Catalogue
 * Independent anti-pattern heuristics over the telemetry buffer
 *
 * Every detector is a stateless `Detector` implementation. The catalogue
 * order below is the final tiebreak when candidates are prioritized.
 */

mod batch_opportunity;
mod capacity_mode;
mod composite_key;
mod context;
mod expensive_operations;
pub mod grouping;
mod hot_partition;
mod key_distribution;
pub mod key_patterns;
mod large_item;
mod read_before_write;
mod scan_efficiency;
mod traits;
mod unused_index;

pub use batch_opportunity::{batch_requests, BatchOpportunityDetector};
pub use capacity_mode::{measure, CapacityModeDetector, Dimension, Throughput};
pub use composite_key::{dominant_shape, KeyShape, MultiAttributeKeyDetector};
pub use context::DetectionContext;
pub use expensive_operations::ExpensiveOperationsDetector;
pub use hot_partition::HotPartitionDetector;
pub use key_distribution::{increasing_ratio, temporal_ratio, UniformPartitionKeyDetector};
pub use large_item::{classify_size, LargeItemDetector};
pub use read_before_write::{count_pairs, ReadBeforeWriteDetector};
pub use scan_efficiency::{classify_efficiency, FetchingToFilterDetector, ScanEfficiencyDetector};
pub use traits::{Detector, DetectorResult};
pub use unused_index::UnusedIndexDetector;

/// Built-in detectors in declaration order
pub fn default_catalogue() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(HotPartitionDetector),
        Box::new(ScanEfficiencyDetector),
        Box::new(FetchingToFilterDetector),
        Box::new(BatchOpportunityDetector),
        Box::new(ReadBeforeWriteDetector),
        Box::new(LargeItemDetector),
        Box::new(UniformPartitionKeyDetector),
        Box::new(UnusedIndexDetector),
        Box::new(CapacityModeDetector),
        Box::new(MultiAttributeKeyDetector),
        Box::new(ExpensiveOperationsDetector),
    ]
}
