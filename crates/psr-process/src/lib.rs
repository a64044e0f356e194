//! psr-process: Signal conditioning for extracted windows
//!
//! Stateless transforms applied to windowed channels before export: GSR
//! smoothing and PPG peak-derived rate estimation.

pub mod conditioner;
pub mod gsr;
pub mod ppg;

pub use conditioner::Conditioner;
pub use gsr::{GsrFilter, FILTERED_GSR_CHANNEL};
pub use ppg::{RateEstimator, RATE_CHANNEL};
