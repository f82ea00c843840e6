/*!
 * Record Sampling
 * Per-call retention decision for the raw record buffer
 *
 * Strategy: a fixed rate in parts-per-million compared against a xorshift
 * draw. Aggregates are updated for every call regardless of the decision;
 * only buffer retention is sampled.
 */

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

/// Rate resolution (parts per million)
const RATE_SCALE: u32 = 1_000_000;

/// Sampling decision result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDecision {
    Accept,
    Reject,
}

/// Fixed-rate sampler with shared counters
pub struct Sampler {
    /// Retention rate in parts per million
    rate_ppm: Arc<AtomicU32>,

    /// Calls evaluated
    evaluated: Arc<AtomicU64>,

    /// Calls accepted
    accepted: Arc<AtomicU64>,

    /// Xorshift state
    state: Arc<AtomicU64>,
}

impl Sampler {
    /// Create a sampler seeded from the wall clock
    pub fn new(rate: f64) -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or(std::time::Duration::from_nanos(1)) // Fallback for broken clocks
            .as_nanos() as u64;
        Self::with_seed(rate, seed)
    }

    /// Create a sampler with a fixed seed (deterministic draws)
    pub fn with_seed(rate: f64, seed: u64) -> Self {
        Self {
            rate_ppm: Arc::new(AtomicU32::new(rate_to_ppm(rate))),
            evaluated: Arc::new(AtomicU64::new(0)),
            accepted: Arc::new(AtomicU64::new(0)),
            // Xorshift never leaves zero
            state: Arc::new(AtomicU64::new(if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed })),
        }
    }

    /// Decide whether to retain this record (fast path)
    #[inline]
    pub fn should_sample(&self) -> SampleDecision {
        self.evaluated.fetch_add(1, Ordering::Relaxed);

        let rate = self.rate_ppm.load(Ordering::Relaxed);

        if rate < RATE_SCALE {
            if rate == 0 {
                return SampleDecision::Reject;
            }
            let random = self.next_random() % RATE_SCALE as u64;
            if random >= rate as u64 {
                return SampleDecision::Reject;
            }
        }

        self.accepted.fetch_add(1, Ordering::Relaxed);
        SampleDecision::Accept
    }

    /// Get configured sampling rate
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate_ppm.load(Ordering::Relaxed) as f64 / RATE_SCALE as f64
    }

    /// Get acceptance rate (actual samples / evaluated)
    pub fn acceptance_rate(&self) -> f64 {
        let evaluated = self.evaluated.load(Ordering::Relaxed);
        let accepted = self.accepted.load(Ordering::Relaxed);

        if evaluated == 0 {
            1.0
        } else {
            accepted as f64 / evaluated as f64
        }
    }

    /// Reset statistics
    pub fn reset(&self) {
        self.evaluated.store(0, Ordering::Relaxed);
        self.accepted.store(0, Ordering::Relaxed);
    }

    /// Xorshift64 step shared by all clones
    #[inline]
    fn next_random(&self) -> u64 {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let mut x = current;
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            match self
                .state
                .compare_exchange_weak(current, x, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return x,
                Err(actual) => current = actual,
            }
        }
    }
}

fn rate_to_ppm(rate: f64) -> u32 {
    if !rate.is_finite() {
        return RATE_SCALE;
    }
    (rate.clamp(0.0, 1.0) * RATE_SCALE as f64).round() as u32
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Clone for Sampler {
    fn clone(&self) -> Self {
        Self {
            rate_ppm: Arc::clone(&self.rate_ppm),
            evaluated: Arc::clone(&self.evaluated),
            accepted: Arc::clone(&self.accepted),
            state: Arc::clone(&self.state),
        }
    }
}
