/*!
 * Structured Tracing
 * Subscriber setup and per-detector spans using the tracing crate
 */

use std::time::Instant;
use tracing::{debug, info, span, warn, Level};
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Detector runs slower than this are logged at warn level
const SLOW_DETECTOR_MS: u128 = 50;

/// Install a global subscriber
///
/// Environment variables:
/// - RUST_LOG: log filter (default: info)
/// - ADVISOR_TRACE_JSON: `1` or `true` for JSON output
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = json_requested(std::env::var("ADVISOR_TRACE_JSON").ok().as_deref());

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "advisor tracing initialized");
    }
    installed
}

fn json_requested(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

/// Span covering one detector run within an evaluation
pub struct DetectionSpan {
    span: tracing::Span,
    start: Instant,
    detector: &'static str,
    candidates: Option<usize>,
}

impl DetectionSpan {
    pub fn new(detector: &'static str, records: usize) -> Self {
        let span = span!(
            Level::DEBUG,
            "detector",
            detector = detector,
            records = records,
            candidates = tracing::field::Empty,
            result = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        Self {
            span,
            start: Instant::now(),
            detector,
            candidates: None,
        }
    }

    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    /// Record a successful run
    pub fn record_candidates(&mut self, count: usize) {
        self.candidates = Some(count);
        self.span.record("candidates", count);
        self.span.record("result", "success");
    }

    /// Record an isolated failure
    pub fn record_error(&self, error: &str) {
        self.span.record("error", error);
        self.span.record("result", "error");
    }
}

impl Drop for DetectionSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        let _entered = self.span.enter();

        if duration.as_millis() > SLOW_DETECTOR_MS {
            warn!(
                detector = self.detector,
                duration_ms = duration.as_millis(),
                slow = true,
                "slow detector run"
            );
        } else {
            debug!(
                detector = self.detector,
                candidates = self.candidates,
                duration_us = duration.as_micros(),
                "detector completed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_requested() {
        assert!(json_requested(Some("1")));
        assert!(json_requested(Some("true")));
        assert!(!json_requested(Some("yes")));
        assert!(!json_requested(None));
    }

    #[test]
    fn test_detection_span_without_subscriber() {
        let mut span = DetectionSpan::new("hot-partition", 10);
        {
            let _entered = span.enter();
        }
        span.record_candidates(2);
        span.record_error("ignored");
    }
}
