//! The source adapter interface consumed by the recording session

use std::collections::HashMap;

use psr_core::{ChannelBuffer, PsrResult};

/// One physical acquisition stream, wrapped behind a uniform lifecycle
///
/// Implemented by each vendor driver. No assumption is made about internal
/// sampling rate, channel count, or vector width beyond each channel
/// reporting a consistent value shape across its own samples.
pub trait SourceAdapter: Send {
    /// Human-readable adapter label, used in error reports and logs
    fn label(&self) -> &str;

    /// Begin acquisition; buffers are created empty and appended to while
    /// running
    fn start(&mut self) -> PsrResult<()>;

    /// Stop acquisition, freezing the channel buffers at the moment of the
    /// call
    fn stop(&mut self) -> PsrResult<()>;

    /// Take the frozen channel buffers produced up to the last stop
    ///
    /// Valid once after a successful [`stop`](SourceAdapter::stop); the
    /// buffers move out of the adapter and into the caller.
    fn channels(&mut self) -> PsrResult<HashMap<String, ChannelBuffer>>;
}
