//! The persisted unit: a merged set of channel buffers
//!
//! A record is assembled once at session stop by merging the frozen buffers
//! of both sources, persisted as a whole, and never mutated afterwards.
//!
//! Persisted layout is a single JSON object keyed by channel name:
//!
//! ```text
//! {
//!   "EEG": { "kind": "eeg", "samples": [ { "t": 0, "v": [..] }, ... ] },
//!   "GSR": { "kind": "gsr", "samples": [ { "t": 0, "v": 0.41 }, ... ] }
//! }
//! ```
//!
//! Records from the two sources merge by shallow key union, so the format
//! stays mergeable without a container header.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::channel::{parse_kind, ChannelBuffer};
use crate::error::{PsrError, PsrResult};
use crate::sample::Sample;

/// Wire form of one channel inside a persisted record
#[derive(Debug, Serialize, Deserialize)]
struct PersistedChannel {
    kind: String,
    samples: Vec<Sample>,
}

/// Mapping from channel name to its frozen buffer
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    channels: BTreeMap<String, ChannelBuffer>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Record::default()
    }

    /// Insert one channel buffer
    ///
    /// Fails with [`PsrError::DuplicateChannelName`] if the record already
    /// holds a channel with the same name.
    pub fn insert(&mut self, buffer: ChannelBuffer) -> PsrResult<()> {
        if self.channels.contains_key(buffer.name()) {
            return Err(PsrError::DuplicateChannelName {
                channel: buffer.name().to_string(),
            });
        }
        self.channels.insert(buffer.name().to_string(), buffer);
        Ok(())
    }

    /// Merge another record into this one by shallow key union
    ///
    /// Channel names must be disjoint; the first collision aborts the merge
    /// with [`PsrError::DuplicateChannelName`] and leaves previously merged
    /// channels in place.
    pub fn merge(&mut self, other: Record) -> PsrResult<()> {
        for (_, buffer) in other.channels {
            self.insert(buffer)?;
        }
        Ok(())
    }

    /// Look up one channel by name
    pub fn channel(&self, name: &str) -> Option<&ChannelBuffer> {
        self.channels.get(name)
    }

    /// All channels, ordered by name
    pub fn channels(&self) -> impl Iterator<Item = &ChannelBuffer> {
        self.channels.values()
    }

    /// Channel names, ordered
    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(|s| s.as_str())
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether the record holds no channels
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Serialize the record to `destination`
    ///
    /// The payload is written to a staging file next to the destination and
    /// atomically renamed into place, so a pre-existing record is never
    /// truncated before the full replacement is on disk.
    pub fn save(&self, destination: &Path) -> PsrResult<()> {
        let wire: BTreeMap<&str, PersistedChannel> = self
            .channels
            .iter()
            .map(|(name, buffer)| {
                (
                    name.as_str(),
                    PersistedChannel {
                        kind: buffer.kind().as_str().to_string(),
                        samples: buffer.samples().to_vec(),
                    },
                )
            })
            .collect();

        let payload = serde_json::to_string(&wire).map_err(|e| PsrError::IoWrite {
            path: destination.display().to_string(),
            reason: e.to_string(),
        })?;

        let staging = destination.with_extension("tmp");
        let write_err = |e: std::io::Error| PsrError::IoWrite {
            path: destination.display().to_string(),
            reason: e.to_string(),
        };
        fs::write(&staging, payload).map_err(write_err)?;
        fs::rename(&staging, destination).map_err(write_err)?;

        tracing::debug!(path = %destination.display(), channels = self.len(), "record saved");
        Ok(())
    }

    /// Load a record from `source`
    ///
    /// Fails with [`PsrError::Parse`] on a malformed payload and
    /// [`PsrError::UnknownChannelKind`] on an unrecognized kind tag; a channel
    /// is never silently dropped.
    pub fn load(source: &Path) -> PsrResult<Record> {
        let payload = fs::read_to_string(source).map_err(|e| PsrError::IoRead {
            path: source.display().to_string(),
            reason: e.to_string(),
        })?;

        let wire: BTreeMap<String, PersistedChannel> =
            serde_json::from_str(&payload).map_err(|e| PsrError::Parse {
                reason: e.to_string(),
            })?;

        let mut record = Record::new();
        for (name, channel) in wire {
            let kind = parse_kind(&name, &channel.kind)?;
            record.insert(ChannelBuffer::from_samples(name, kind, channel.samples))?;
        }

        tracing::debug!(path = %source.display(), channels = record.len(), "record loaded");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelKind;
    use crate::timestamp::SessionTime;
    use tempfile::tempdir;

    fn sample_record() -> Record {
        let mut record = Record::new();

        let mut eeg = ChannelBuffer::new("EEG", ChannelKind::Eeg);
        for i in 0..5u64 {
            eeg.push(Sample::vector(
                SessionTime::from_millis(i * 10),
                vec![i as f64, 0.0, -(i as f64), 1.0],
            ));
        }
        record.insert(eeg).unwrap();

        let mut gsr = ChannelBuffer::new("GSR", ChannelKind::Gsr);
        for i in 0..5u64 {
            gsr.push(Sample::scalar(SessionTime::from_millis(i * 2), 0.4 + i as f64));
        }
        record.insert(gsr).unwrap();

        record
    }

    #[test]
    fn test_insert_rejects_duplicate_name() {
        let mut record = sample_record();
        let err = record
            .insert(ChannelBuffer::new("GSR", ChannelKind::Gsr))
            .unwrap_err();
        assert_eq!(
            err,
            PsrError::DuplicateChannelName {
                channel: "GSR".to_string()
            }
        );
    }

    #[test]
    fn test_merge_disjoint_is_union() {
        let mut left = sample_record();
        let mut right = Record::new();
        right
            .insert(ChannelBuffer::new("PPG", ChannelKind::Ppg))
            .unwrap();

        left.merge(right).unwrap();
        let names: Vec<_> = left.channel_names().collect();
        assert_eq!(names, vec!["EEG", "GSR", "PPG"]);
    }

    #[test]
    fn test_merge_collision_fails() {
        let mut left = sample_record();
        let mut right = Record::new();
        right
            .insert(ChannelBuffer::new("EEG", ChannelKind::Eeg))
            .unwrap();

        let err = left.merge(right).unwrap_err();
        assert!(matches!(err, PsrError::DuplicateChannelName { channel } if channel == "EEG"));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let record = sample_record();
        record.save(&path).unwrap();
        let loaded = Record::load(&path).unwrap();

        assert_eq!(loaded, record);
    }

    #[test]
    fn test_save_empty_record_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");

        let record = Record::new();
        record.save(&path).unwrap();
        assert_eq!(Record::load(&path).unwrap(), record);
    }

    #[test]
    fn test_save_leaves_no_staging_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        sample_record().save(&path).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_malformed_payload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Record::load(&path).unwrap_err();
        assert!(matches!(err, PsrError::Parse { .. }));
    }

    #[test]
    fn test_load_unknown_kind_tag() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.json");
        fs::write(
            &path,
            r#"{"SpO2":{"kind":"spo2","samples":[{"t":0,"v":97.0}]}}"#,
        )
        .unwrap();

        let err = Record::load(&path).unwrap_err();
        assert_eq!(
            err,
            PsrError::UnknownChannelKind {
                channel: "SpO2".to_string(),
                kind: "spo2".to_string()
            }
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = Record::load(Path::new("/nonexistent/session.json")).unwrap_err();
        assert!(matches!(err, PsrError::IoRead { .. }));
    }
}
