//! Dual-source recording session
//!
//! Coordinates the two source adapters over one wall-clock span and merges
//! their frozen buffers into a single record at stop.

use std::time::{Duration, Instant};

use psr_core::{PsrError, PsrResult, Record};
use uuid::Uuid;

use crate::adapter::SourceAdapter;

/// One logical recording over two independently clocked sources
///
/// Single-owner: only the thread that called [`start`](RecordingSession::start)
/// may call [`stop`](RecordingSession::stop), and concurrent stops are the
/// caller's responsibility to prevent. Reading
/// [`elapsed`](RecordingSession::elapsed) is safe from any thread holding a
/// shared reference.
pub struct RecordingSession {
    id: Uuid,
    headset: Box<dyn SourceAdapter>,
    sampler: Box<dyn SourceAdapter>,
    started_at: Option<Instant>,
}

impl RecordingSession {
    /// Create a session over two already-configured adapters
    pub fn new(headset: Box<dyn SourceAdapter>, sampler: Box<dyn SourceAdapter>) -> Self {
        RecordingSession {
            id: Uuid::new_v4(),
            headset,
            sampler,
            started_at: None,
        }
    }

    /// Session identifier, for log correlation
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the session is currently acquiring
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Advisory elapsed time since start; zero while idle
    ///
    /// For progress reporting only, never part of the persisted data.
    pub fn elapsed(&self) -> Duration {
        self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }

    /// Start both adapters and the shared elapsed clock
    ///
    /// Fails with [`PsrError::AlreadyRunning`] on a second start. If the
    /// second adapter fails to start, the first is stopped again so no
    /// half-started session lingers.
    pub fn start(&mut self) -> PsrResult<()> {
        if self.started_at.is_some() {
            return Err(PsrError::AlreadyRunning);
        }

        self.headset.start()?;
        if let Err(e) = self.sampler.start() {
            // Best effort: the headset result is discarded either way.
            let _ = self.headset.stop();
            return Err(e);
        }

        self.started_at = Some(Instant::now());
        tracing::info!(session = %self.id, "recording session started");
        Ok(())
    }

    /// Stop both adapters and merge their buffers into one record
    ///
    /// The buffers freeze at the moment of the call; the two sources need
    /// not agree on sample counts or end timestamps. Fails with
    /// [`PsrError::DuplicateChannelName`] if the sources collide on a channel
    /// name. Persisting the returned record is a separate, explicit step.
    ///
    /// Precondition: the session is running.
    pub fn stop(&mut self) -> PsrResult<Record> {
        let started_at = self.started_at.take().ok_or(PsrError::AdapterFailure {
            adapter: "session".to_string(),
            reason: "stop called before start".to_string(),
        })?;

        // Stop both before reporting, so one adapter failing never leaves
        // the other acquiring into a dead session.
        let headset_stopped = self.headset.stop();
        let sampler_stopped = self.sampler.stop();
        headset_stopped?;
        sampler_stopped?;

        let mut record = Record::new();
        for buffer in self.headset.channels()?.into_values() {
            record.insert(buffer)?;
        }
        for buffer in self.sampler.channels()?.into_values() {
            record.insert(buffer)?;
        }

        tracing::info!(
            session = %self.id,
            channels = record.len(),
            elapsed_ms = started_at.elapsed().as_millis() as u64,
            "recording session stopped"
        );
        Ok(record)
    }
}
