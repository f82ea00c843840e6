/*!
 * Telemetry
 * Operation records, sampling, buffering, and aggregate views
 */

mod aggregates;
mod record;
mod recorder;
mod sampler;

pub use aggregates::{AccessPatternAggregate, Aggregate, AggregateViews};
pub use record::{OperationKind, OperationRecord};
pub use recorder::Recorder;
pub use sampler::{SampleDecision, Sampler};
