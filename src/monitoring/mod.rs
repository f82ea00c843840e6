/*!
 * Monitoring
 * Tracing setup and detector spans
 */

mod tracer;

pub use tracer::{init_tracing, DetectionSpan};
