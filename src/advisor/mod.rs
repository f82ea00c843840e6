/*!
 * Advisor
 * Configuration, recommendation model, prioritization and the engine
 */

mod config;
mod engine;
mod prioritize;
mod recommendation;

pub use config::{
    AdvisorConfig, AdvisorConfigBuilder, CapacityBaseline, IndexRef, ReferenceClock, Thresholds,
    UnitPricing,
};
pub use engine::Advisor;
pub use prioritize::{compare, prioritize, Candidate};
pub use recommendation::{Category, EstimatedImpact, Recommendation, Severity};
