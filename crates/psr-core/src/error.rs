//! Error handling for the recording and extraction pipeline
//!
//! Every fallible operation in the workspace reports one of these variants,
//! carrying enough context (channel name, window, file path) to diagnose a
//! failure without access to the data itself.

use core::fmt;

/// Result type alias for recorder operations
pub type PsrResult<T> = Result<T, PsrError>;

/// Error type for all recorder operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PsrError {
    /// A recording session was started while already running
    AlreadyRunning,

    /// Two sources produced a channel with the same name
    DuplicateChannelName {
        /// The colliding channel name
        channel: String,
    },

    /// Extraction window with a non-positive duration
    InvalidWindow {
        /// Description of the rejected window
        reason: String,
    },

    /// Persisted record payload is not well-formed
    Parse {
        /// Description of the parse failure
        reason: String,
    },

    /// A channel's kind tag was not recognized at load time
    UnknownChannelKind {
        /// Channel carrying the unrecognized tag
        channel: String,
        /// The tag as found in the payload
        kind: String,
    },

    /// Failed to write to persistent storage
    IoWrite {
        /// Destination path
        path: String,
        /// Underlying I/O error description
        reason: String,
    },

    /// Failed to read from persistent storage
    IoRead {
        /// Source path
        path: String,
        /// Underlying I/O error description
        reason: String,
    },

    /// A source adapter could not start, stop, or read
    AdapterFailure {
        /// Adapter label (e.g. "headset", "gsr/ppg sampler")
        adapter: String,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for PsrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PsrError::AlreadyRunning => {
                write!(f, "recording session is already running")
            }
            PsrError::DuplicateChannelName { channel } => {
                write!(f, "duplicate channel name across sources: {}", channel)
            }
            PsrError::InvalidWindow { reason } => {
                write!(f, "invalid extraction window: {}", reason)
            }
            PsrError::Parse { reason } => {
                write!(f, "malformed record payload: {}", reason)
            }
            PsrError::UnknownChannelKind { channel, kind } => {
                write!(f, "unknown kind tag '{}' on channel {}", kind, channel)
            }
            PsrError::IoWrite { path, reason } => {
                write!(f, "failed to write {}: {}", path, reason)
            }
            PsrError::IoRead { path, reason } => {
                write!(f, "failed to read {}: {}", path, reason)
            }
            PsrError::AdapterFailure { adapter, reason } => {
                write!(f, "adapter '{}' failed: {}", adapter, reason)
            }
        }
    }
}

impl std::error::Error for PsrError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = PsrError::DuplicateChannelName {
            channel: "GSR".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("duplicate channel name"));
        assert!(display.contains("GSR"));
    }

    #[test]
    fn test_error_equality() {
        let error1 = PsrError::AlreadyRunning;
        let error2 = PsrError::AlreadyRunning;
        assert_eq!(error1, error2);
    }
}
