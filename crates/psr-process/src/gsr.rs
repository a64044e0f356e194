//! GSR smoothing filter

use std::collections::VecDeque;

use psr_core::Sample;
use serde::{Deserialize, Serialize};

use crate::conditioner::Conditioner;

/// Derived channel name for smoothed GSR output
pub const FILTERED_GSR_CHANNEL: &str = "Processed GSR";

/// Moving-average smoother for galvanic skin response
///
/// Produces one smoothed value per input sample at the same timestamp: each
/// output is the mean of the window ending at that sample. The window fills
/// from the start of the input, so the first samples average over fewer
/// points rather than being dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GsrFilter {
    /// Number of samples averaged per output value
    pub window_size: usize,
}

impl GsrFilter {
    /// Create a filter with the given window size (minimum 1)
    pub fn new(window_size: usize) -> Self {
        GsrFilter {
            window_size: window_size.max(1),
        }
    }
}

impl Default for GsrFilter {
    fn default() -> Self {
        // 8 samples is 16ms of smoothing at the sampler's 500 Hz.
        GsrFilter::new(8)
    }
}

impl Conditioner for GsrFilter {
    fn derived_name(&self) -> &str {
        FILTERED_GSR_CHANNEL
    }

    fn condition(&self, samples: &[Sample]) -> Vec<Sample> {
        let mut window: VecDeque<f64> = VecDeque::with_capacity(self.window_size);
        let mut sum = 0.0;

        samples
            .iter()
            .map(|sample| {
                let x = sample.v.components().first().copied().unwrap_or(0.0);
                window.push_back(x);
                sum += x;
                if window.len() > self.window_size {
                    if let Some(old) = window.pop_front() {
                        sum -= old;
                    }
                }
                Sample::scalar(sample.t, sum / window.len() as f64)
            })
            .collect()
    }
}
