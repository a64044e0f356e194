//! Time-sliced read-only projections of a record

use std::collections::BTreeMap;
use std::time::Duration;

use crate::channel::ChannelKind;
use crate::error::{PsrError, PsrResult};
use crate::record::Record;
use crate::sample::Sample;
use crate::timestamp::SessionTime;

/// A non-owning projection of a [`Record`] onto `[offset, offset+duration)`
///
/// Each channel maps to the maximal contiguous run of its samples whose
/// timestamps fall inside the window, in original order. Slices borrow the
/// record directly; nothing is copied or cached, so repeated extraction of
/// the same window always yields the same view.
#[derive(Debug)]
pub struct WindowedView<'a> {
    offset: SessionTime,
    duration: Duration,
    channels: BTreeMap<&'a str, WindowedChannel<'a>>,
}

/// One channel's slice within a window
#[derive(Debug, Clone, Copy)]
pub struct WindowedChannel<'a> {
    kind: ChannelKind,
    samples: &'a [Sample],
}

impl<'a> WindowedChannel<'a> {
    /// Channel kind tag
    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    /// The in-window samples, in original order
    pub fn samples(&self) -> &'a [Sample] {
        self.samples
    }
}

impl<'a> WindowedView<'a> {
    /// Slice `record` to the window `[offset, offset + duration)`
    ///
    /// Every channel is projected, known kind or not. A window starting past
    /// a channel's data yields an empty slice for that channel; a window
    /// running past the data is truncated. The only rejected input is a
    /// zero-length duration.
    pub fn over(
        record: &'a Record,
        offset: SessionTime,
        duration: Duration,
    ) -> PsrResult<WindowedView<'a>> {
        if duration.is_zero() {
            return Err(PsrError::InvalidWindow {
                reason: format!("duration must be positive (offset {}, duration 0)", offset),
            });
        }

        let end = offset + duration;
        let channels = record
            .channels()
            .map(|buffer| {
                (
                    buffer.name(),
                    WindowedChannel {
                        kind: buffer.kind(),
                        samples: buffer.range(offset, end),
                    },
                )
            })
            .collect();

        Ok(WindowedView {
            offset,
            duration,
            channels,
        })
    }

    /// Window start
    pub fn offset(&self) -> SessionTime {
        self.offset
    }

    /// Window length
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Look up one channel's slice by name
    pub fn channel(&self, name: &str) -> Option<&WindowedChannel<'a>> {
        self.channels.get(name)
    }

    /// All channel slices, ordered by name
    pub fn channels(&self) -> impl Iterator<Item = (&'a str, &WindowedChannel<'a>)> + '_ {
        self.channels.iter().map(|(name, ch)| (*name, ch))
    }
}
