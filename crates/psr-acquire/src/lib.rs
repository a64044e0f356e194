//! psr-acquire: Dual-source signal acquisition
//!
//! Source adapters for the headset and the GSR/PPG sampler, plus the
//! recording session that coordinates them.

pub mod adapter;
pub mod headset;
pub mod sampler;
pub mod session;

mod sim;

pub use adapter::SourceAdapter;
pub use headset::{HeadsetAdapter, HeadsetConfig, HeadsetData};
pub use sampler::{SamplerAdapter, SamplerConfig, SamplingRate};
pub use session::RecordingSession;
