/*!
 * Recommendation Engine
 *
 * Owns the sampler, the recorder and the detector catalogue. Detectors run in
 * isolation: an error or panic in one drops that detector's candidates for
 * the current evaluation and nothing else.
 */

use super::config::AdvisorConfig;
use super::prioritize::{prioritize, Candidate};
use super::recommendation::Recommendation;
use crate::core::errors::{ConfigError, DetectorError};
use crate::core::types::now_ms;
use crate::detectors::{default_catalogue, DetectionContext, Detector};
use crate::monitoring::DetectionSpan;
use crate::telemetry::{AggregateViews, OperationRecord, Recorder, SampleDecision, Sampler};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, trace, warn};

/// Telemetry sink and anti-pattern advisor
///
/// Clones share the same buffer, aggregates and catalogue.
#[derive(Clone)]
pub struct Advisor {
    config: Arc<AdvisorConfig>,
    sampler: Sampler,
    recorder: Recorder,
    catalogue: Arc<Vec<Box<dyn Detector>>>,
    detector_failures: Arc<AtomicU64>,
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor")
            .field("config", &self.config)
            .field("buffered", &self.recorder.len())
            .field("detectors", &self.catalogue.len())
            .finish()
    }
}

impl Advisor {
    /// Advisor with the built-in catalogue
    pub fn new(config: AdvisorConfig) -> Result<Self, ConfigError> {
        Self::with_catalogue(config, default_catalogue())
    }

    /// Advisor with a caller-supplied catalogue, in priority tiebreak order
    pub fn with_catalogue(
        config: AdvisorConfig,
        catalogue: Vec<Box<dyn Detector>>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let sampler = match config.sampler_seed {
            Some(seed) => Sampler::with_seed(config.sample_rate, seed),
            None => Sampler::new(config.sample_rate),
        };

        Ok(Self {
            config: Arc::new(config),
            sampler,
            recorder: Recorder::new(),
            catalogue: Arc::new(catalogue),
            detector_failures: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Ingest one completed operation; never fails
    pub fn record(&self, op: OperationRecord) {
        if !self.config.enabled {
            return;
        }

        let op = op.normalized();
        let retained = self.sampler.should_sample() == SampleDecision::Accept;
        if !retained {
            trace!(operation = %op.operation, table = %op.table_name, "record sampled out");
        }
        self.recorder.append(op, retained);
    }

    /// Run every detector over one snapshot and return prioritized advice
    pub fn get_recommendations(&self) -> Vec<Recommendation> {
        let now = now_ms();

        let candidates = self.recorder.with_snapshot(|records, views| {
            let ctx = DetectionContext::new(records, views, &self.config, now);
            let mut candidates: Vec<Candidate> = Vec::new();

            for (index, detector) in self.catalogue.iter().enumerate() {
                match self.run_detector(detector.as_ref(), &ctx) {
                    Ok(found) => candidates.extend(
                        found
                            .into_iter()
                            .map(|rec| (index, rec.from_detector(detector.name()))),
                    ),
                    Err(err) => {
                        self.detector_failures.fetch_add(1, Ordering::Relaxed);
                        warn!(detector = detector.name(), error = %err, "detector failed; skipping its candidates");
                    }
                }
            }
            candidates
        });

        let recommendations = prioritize(candidates);
        debug!(count = recommendations.len(), "recommendations evaluated");
        recommendations
    }

    fn run_detector(
        &self,
        detector: &dyn Detector,
        ctx: &DetectionContext<'_>,
    ) -> Result<Vec<Recommendation>, DetectorError> {
        let mut span = DetectionSpan::new(detector.name(), ctx.records.len());
        let outcome = {
            let _entered = span.enter();
            catch_unwind(AssertUnwindSafe(|| detector.detect(ctx)))
        };

        let result = match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(detector = detector.name(), panic = %message, "detector panicked");
                Err(DetectorError::Panicked {
                    detector: detector.name().into(),
                    message,
                })
            }
        };

        match &result {
            Ok(found) => span.record_candidates(found.len()),
            Err(err) => span.record_error(&err.to_string()),
        }
        result
    }

    /// Current aggregates, without running detectors
    pub fn get_stats(&self) -> AggregateViews {
        self.recorder.views()
    }

    /// Full raw buffer in arrival order
    pub fn export(&self) -> Vec<OperationRecord> {
        self.recorder.export()
    }

    /// Clear buffer and aggregates
    pub fn reset(&self) {
        self.recorder.reset();
        self.sampler.reset();
    }

    /// Detector runs that failed or panicked since construction
    pub fn detector_failures(&self) -> u64 {
        self.detector_failures.load(Ordering::Relaxed)
    }

    /// Fraction of records retained by the sampler so far
    pub fn acceptance_rate(&self) -> f64 {
        self.sampler.acceptance_rate()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
