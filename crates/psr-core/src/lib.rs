//! psr-core: Foundation types for physiological signal recording
//!
//! Samples, channel buffers, persisted records, and windowed extraction.

pub mod channel;
pub mod error;
pub mod record;
pub mod sample;
pub mod timestamp;
pub mod window;

pub use channel::{ChannelBuffer, ChannelKind};
pub use error::{PsrError, PsrResult};
pub use record::Record;
pub use sample::{Sample, SampleValue};
pub use timestamp::SessionTime;
pub use window::{WindowedChannel, WindowedView};
