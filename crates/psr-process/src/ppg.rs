//! PPG peak-derived rate estimation

use std::time::Duration;

use psr_core::Sample;
use serde::{Deserialize, Serialize};

use crate::conditioner::Conditioner;

/// Derived channel name for the instantaneous pulse rate
pub const RATE_CHANNEL: &str = "BPM";

/// Peak-detection-based pulse rate estimator
///
/// Scans the windowed PPG samples for local maxima and accepts a candidate
/// peak only if it lies at least `min_interval` after the previously accepted
/// one, rejecting double-counts from noise riding on a true pulse. Each pair
/// of consecutive accepted peaks yields one derived sample at the later
/// peak's timestamp with value `60 / inter-peak-interval-seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateEstimator {
    /// Minimum spacing between two accepted peaks
    pub min_interval: Duration,
}

impl RateEstimator {
    /// Create an estimator with the given peak acceptance interval
    pub fn new(min_interval: Duration) -> Self {
        RateEstimator { min_interval }
    }
}

impl Default for RateEstimator {
    fn default() -> Self {
        // 100ms refractory rejects anything above 600 BPM as noise.
        RateEstimator::new(Duration::from_millis(100))
    }
}

impl Conditioner for RateEstimator {
    fn derived_name(&self) -> &str {
        RATE_CHANNEL
    }

    fn condition(&self, samples: &[Sample]) -> Vec<Sample> {
        let values: Vec<f64> = samples
            .iter()
            .map(|s| s.v.components().first().copied().unwrap_or(0.0))
            .collect();

        // Local maxima with a refractory interval since the last accepted peak.
        let mut peaks: Vec<usize> = Vec::new();
        for i in 1..values.len().saturating_sub(1) {
            if values[i] >= values[i - 1] && values[i] >= values[i + 1] {
                if let Some(&last) = peaks.last() {
                    match samples[i].t.since(samples[last].t) {
                        Some(gap) if gap >= self.min_interval => {}
                        _ => continue,
                    }
                }
                peaks.push(i);
            }
        }

        // Fewer than two accepted peaks: nothing to derive, not an error.
        peaks
            .windows(2)
            .filter_map(|pair| {
                let earlier = &samples[pair[0]];
                let later = &samples[pair[1]];
                let interval = later.t.since(earlier.t)?.as_secs_f64();
                (interval > 0.0).then(|| Sample::scalar(later.t, 60.0 / interval))
            })
            .collect()
    }
}
