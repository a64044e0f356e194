//! Worker-thread producer shared by the simulated device drivers
//!
//! Each adapter spawns one producer thread that owns its channel buffers
//! outright; the thread hands them back on join, so no locking is needed
//! between concurrently running adapters.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use psr_core::{ChannelBuffer, ChannelKind, Sample, SampleValue, SessionTime};

/// One synthetic stream: a named channel plus its waveform generator
///
/// The generator is called with the sample's session time in seconds and
/// returns the reading for that instant.
pub(crate) struct SimStream {
    pub name: String,
    pub kind: ChannelKind,
    pub period: Duration,
    pub synth: Box<dyn FnMut(f64) -> SampleValue + Send>,
}

/// Handle to a running producer thread
pub(crate) struct Producer {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<HashMap<String, ChannelBuffer>>>,
}

impl Producer {
    /// Spawn a producer generating every stream against one shared elapsed
    /// clock
    ///
    /// Sample timestamps are exact multiples of each stream's period, so the
    /// pacing jitter of the thread never leaks into the recorded data.
    pub fn spawn(streams: Vec<SimStream>) -> Producer {
        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);

        let handle = thread::spawn(move || {
            let clock = Instant::now();
            let mut streams = streams;
            let mut buffers: HashMap<String, ChannelBuffer> = streams
                .iter()
                .map(|s| (s.name.clone(), ChannelBuffer::new(s.name.clone(), s.kind)))
                .collect();
            // Index of the next sample due, per stream.
            let mut next: Vec<u64> = vec![0; streams.len()];

            while flag.load(Ordering::Relaxed) {
                let elapsed = clock.elapsed().as_nanos() as u64;
                for (i, stream) in streams.iter_mut().enumerate() {
                    let period = stream.period.as_nanos() as u64;
                    let buffer = buffers
                        .get_mut(&stream.name)
                        .expect("buffer exists for every stream");
                    loop {
                        let due = next[i] * period;
                        if due > elapsed {
                            break;
                        }
                        let t = SessionTime::from_nanos(due);
                        let value = (stream.synth)(t.as_secs_f64());
                        buffer.push(Sample { t, v: value });
                        next[i] += 1;
                    }
                }
                thread::sleep(Duration::from_millis(1));
            }

            buffers
        });

        Producer {
            running,
            handle: Some(handle),
        }
    }

    /// Stop the thread and take back the frozen buffers
    ///
    /// Returns `None` if the producer was already stopped or its thread
    /// panicked.
    pub fn stop(&mut self) -> Option<HashMap<String, ChannelBuffer>> {
        self.running.store(false, Ordering::Relaxed);
        self.handle.take().and_then(|h| h.join().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_producer_paces_timestamps_on_grid() {
        let mut producer = Producer::spawn(vec![SimStream {
            name: "GSR".to_string(),
            kind: ChannelKind::Gsr,
            period: Duration::from_millis(2),
            synth: Box::new(|t| SampleValue::Scalar(t)),
        }]);

        thread::sleep(Duration::from_millis(30));
        let buffers = producer.stop().unwrap();
        let gsr = &buffers["GSR"];

        assert!(!gsr.is_empty());
        for (i, sample) in gsr.samples().iter().enumerate() {
            assert_eq!(sample.t, SessionTime::from_millis(i as u64 * 2));
        }
    }

    #[test]
    fn test_stop_twice_yields_nothing() {
        let mut producer = Producer::spawn(Vec::new());
        assert!(producer.stop().is_some());
        assert!(producer.stop().is_none());
    }
}
