//! Channel classification and per-channel sample buffers

use core::fmt;
use core::str::FromStr;

use crate::error::{PsrError, PsrResult};
use crate::sample::Sample;
use crate::timestamp::SessionTime;

/// Kind tag identifying what a channel measures
///
/// The tag is persisted with each channel and resolved once at load/merge
/// time; extraction and export branch on it instead of inspecting rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// Multi-electrode EEG, one vector sample per instant
    Eeg,
    /// Accelerometer, 3-axis vector
    Acc,
    /// Gyroscope, 3-axis vector
    Gyro,
    /// Galvanic skin response, scalar
    Gsr,
    /// Photoplethysmography, scalar
    Ppg,
}

impl ChannelKind {
    /// Stable tag written into persisted records
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Eeg => "eeg",
            ChannelKind::Acc => "acc",
            ChannelKind::Gyro => "gyro",
            ChannelKind::Gsr => "gsr",
            ChannelKind::Ppg => "ppg",
        }
    }

    /// Column labels for a channel of this kind and component width
    ///
    /// EEG with the standard four-electrode layout gets its electrode names;
    /// inertial kinds get axis names; anything else falls back to generic
    /// component labels, or the single `Value` column for scalars.
    pub fn component_labels(&self, width: usize) -> Vec<String> {
        match (self, width) {
            (ChannelKind::Eeg, 4) => {
                ["TP9", "AF7", "AF8", "TP10"].iter().map(|s| s.to_string()).collect()
            }
            (ChannelKind::Acc, 3) => {
                ["AccX", "AccY", "AccZ"].iter().map(|s| s.to_string()).collect()
            }
            (ChannelKind::Gyro, 3) => {
                ["GyroX", "GyroY", "GyroZ"].iter().map(|s| s.to_string()).collect()
            }
            (_, 1) => vec!["Value".to_string()],
            (_, n) => (1..=n).map(|i| format!("c{}", i)).collect(),
        }
    }
}

impl FromStr for ChannelKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eeg" => Ok(ChannelKind::Eeg),
            "acc" => Ok(ChannelKind::Acc),
            "gyro" => Ok(ChannelKind::Gyro),
            "gsr" => Ok(ChannelKind::Gsr),
            "ppg" => Ok(ChannelKind::Ppg),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only ordered collection of samples for one named channel
///
/// A buffer is owned by the source adapter that produces it until the session
/// merges it into a [`Record`](crate::record::Record); after the merge it is
/// never mutated again. Timestamps must be appended in non-decreasing order;
/// duplicate timestamps are allowed and keep arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelBuffer {
    name: String,
    kind: ChannelKind,
    samples: Vec<Sample>,
}

impl ChannelBuffer {
    /// Create an empty buffer for a named channel
    pub fn new(name: impl Into<String>, kind: ChannelKind) -> Self {
        ChannelBuffer {
            name: name.into(),
            kind,
            samples: Vec::new(),
        }
    }

    /// Create a buffer from already-ordered samples
    pub fn from_samples(
        name: impl Into<String>,
        kind: ChannelKind,
        samples: Vec<Sample>,
    ) -> Self {
        debug_assert!(
            samples.windows(2).all(|w| w[0].t <= w[1].t),
            "channel samples must be ordered by timestamp"
        );
        ChannelBuffer {
            name: name.into(),
            kind,
            samples,
        }
    }

    /// Append one sample
    ///
    /// Precondition: `sample.t` is not earlier than the last appended
    /// timestamp. Producers stamp readings from a monotonic elapsed clock, so
    /// this holds by construction.
    pub fn push(&mut self, sample: Sample) {
        debug_assert!(
            self.samples.last().map_or(true, |last| last.t <= sample.t),
            "timestamps must be non-decreasing within a channel"
        );
        self.samples.push(sample);
    }

    /// Channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Channel kind tag
    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// All samples in arrival order
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamp of the last sample, if any
    pub fn last_time(&self) -> Option<SessionTime> {
        self.samples.last().map(|s| s.t)
    }

    /// The maximal contiguous run of samples with `start <= t < end`
    ///
    /// Pure slicing over the ordered buffer; never copies or reorders. An
    /// empty slice is returned when the range lies past the recorded data.
    pub fn range(&self, start: SessionTime, end: SessionTime) -> &[Sample] {
        let lo = self.samples.partition_point(|s| s.t < start);
        let hi = self.samples.partition_point(|s| s.t < end);
        &self.samples[lo..hi]
    }

    /// Consume the buffer, yielding its samples
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

/// Parse a persisted kind tag, reporting the channel it belongs to on failure
pub(crate) fn parse_kind(channel: &str, tag: &str) -> PsrResult<ChannelKind> {
    tag.parse().map_err(|_| PsrError::UnknownChannelKind {
        channel: channel.to_string(),
        kind: tag.to_string(),
    })
}
