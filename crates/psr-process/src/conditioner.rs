//! The signal conditioner seam
//!
//! A conditioner turns one windowed channel into one derived channel. Every
//! implementation is stateless per call: the output depends only on the
//! samples passed in, so re-extracting the same window always reproduces the
//! same derived data.

use psr_core::Sample;

/// Stateless-per-call transform from one windowed channel to a derived one
pub trait Conditioner {
    /// Name of the derived channel this conditioner produces
    fn derived_name(&self) -> &str;

    /// Compute the derived samples for one windowed input
    fn condition(&self, samples: &[Sample]) -> Vec<Sample>;
}
