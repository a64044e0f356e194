//! Simulated multi-channel biosignal headset
//!
//! Stands in for the vendor headset driver: four EEG electrodes plus optional
//! inertial streams, each produced on its own sampling grid.

use std::collections::HashMap;

use psr_core::{ChannelBuffer, ChannelKind, PsrError, PsrResult, SampleValue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::adapter::SourceAdapter;
use crate::sim::{Producer, SimStream};

/// Selectable headset data streams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadsetData {
    /// Four-electrode EEG at 256 Hz
    Eeg,
    /// 3-axis accelerometer at 52 Hz
    Acc,
    /// 3-axis gyroscope at 52 Hz
    Gyro,
}

impl HeadsetData {
    /// Channel name this stream records under
    pub fn channel_name(&self) -> &'static str {
        match self {
            HeadsetData::Eeg => "EEG",
            HeadsetData::Acc => "ACC",
            HeadsetData::Gyro => "GYRO",
        }
    }

    /// Kind tag for the produced channel
    pub fn kind(&self) -> ChannelKind {
        match self {
            HeadsetData::Eeg => ChannelKind::Eeg,
            HeadsetData::Acc => ChannelKind::Acc,
            HeadsetData::Gyro => ChannelKind::Gyro,
        }
    }

    /// Sampling rate in Hz
    pub fn rate_hz(&self) -> u32 {
        match self {
            HeadsetData::Eeg => 256,
            HeadsetData::Acc | HeadsetData::Gyro => 52,
        }
    }
}

/// Headset adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadsetConfig {
    /// Streams to acquire
    pub data: Vec<HeadsetData>,
    /// Random seed for reproducible synthetic signals
    pub seed: Option<u64>,
}

impl Default for HeadsetConfig {
    fn default() -> Self {
        Self {
            data: vec![HeadsetData::Eeg],
            seed: None,
        }
    }
}

/// Simulated headset source adapter
pub struct HeadsetAdapter {
    config: HeadsetConfig,
    producer: Option<Producer>,
    frozen: Option<HashMap<String, ChannelBuffer>>,
}

impl HeadsetAdapter {
    /// Create an adapter for the configured streams
    pub fn new(config: HeadsetConfig) -> Self {
        HeadsetAdapter {
            config,
            producer: None,
            frozen: None,
        }
    }

    /// Device model string, for the startup banner
    pub fn model(&self) -> &'static str {
        "PSR Headband S4 (simulated)"
    }

    /// Device name string, for the startup banner
    pub fn device_name(&self) -> &'static str {
        "psr-headset-0"
    }

    fn build_streams(&self) -> Vec<SimStream> {
        let base_seed = self.config.seed.unwrap_or_else(rand::random);

        // Repeated selections collapse; the selector has flag-set semantics.
        let mut selected: Vec<HeadsetData> = Vec::new();
        for data in &self.config.data {
            if !selected.contains(data) {
                selected.push(*data);
            }
        }

        selected
            .iter()
            .enumerate()
            .map(|(i, data)| {
                let period = Duration::from_nanos(1_000_000_000 / data.rate_hz() as u64);
                let seed = base_seed.wrapping_add(i as u64);
                SimStream {
                    name: data.channel_name().to_string(),
                    kind: data.kind(),
                    period,
                    synth: synth_for(*data, seed),
                }
            })
            .collect()
    }
}

/// Waveform generator for one headset stream
fn synth_for(data: HeadsetData, seed: u64) -> Box<dyn FnMut(f64) -> SampleValue + Send> {
    let mut rng = StdRng::seed_from_u64(seed);
    match data {
        HeadsetData::Eeg => {
            // Alpha rhythm plus a weaker beta component, microvolt scale.
            let noise = Normal::new(0.0, 6.0).expect("valid std dev");
            Box::new(move |t| {
                let values = (0..4)
                    .map(|electrode| {
                        let phase = electrode as f64 * 0.7;
                        let alpha = 30.0 * (2.0 * std::f64::consts::PI * 10.0 * t + phase).sin();
                        let beta = 8.0 * (2.0 * std::f64::consts::PI * 22.0 * t).sin();
                        alpha + beta + noise.sample(&mut rng)
                    })
                    .collect();
                SampleValue::Vector(values)
            })
        }
        HeadsetData::Acc => {
            // Gravity on Z with slow postural sway.
            let noise = Normal::new(0.0, 0.02).expect("valid std dev");
            Box::new(move |t| {
                let sway = 0.05 * (2.0 * std::f64::consts::PI * 0.3 * t).sin();
                SampleValue::Vector(vec![
                    sway + noise.sample(&mut rng),
                    noise.sample(&mut rng),
                    1.0 + noise.sample(&mut rng),
                ])
            })
        }
        HeadsetData::Gyro => Box::new(move |_| {
            SampleValue::Vector(vec![
                rng.gen_range(-0.5..0.5),
                rng.gen_range(-0.5..0.5),
                rng.gen_range(-0.5..0.5),
            ])
        }),
    }
}

impl SourceAdapter for HeadsetAdapter {
    fn label(&self) -> &str {
        "headset"
    }

    fn start(&mut self) -> PsrResult<()> {
        if self.producer.is_some() {
            return Err(PsrError::AdapterFailure {
                adapter: self.label().to_string(),
                reason: "already reading".to_string(),
            });
        }
        if self.config.data.is_empty() {
            return Err(PsrError::AdapterFailure {
                adapter: self.label().to_string(),
                reason: "no data streams selected".to_string(),
            });
        }
        tracing::info!(streams = self.config.data.len(), "headset reading started");
        self.producer = Some(Producer::spawn(self.build_streams()));
        Ok(())
    }

    fn stop(&mut self) -> PsrResult<()> {
        let mut producer = self.producer.take().ok_or_else(|| PsrError::AdapterFailure {
            adapter: self.label().to_string(),
            reason: "stop called while not reading".to_string(),
        })?;
        let buffers = producer.stop().ok_or_else(|| PsrError::AdapterFailure {
            adapter: self.label().to_string(),
            reason: "acquisition thread terminated abnormally".to_string(),
        })?;
        tracing::info!(channels = buffers.len(), "headset reading stopped");
        self.frozen = Some(buffers);
        Ok(())
    }

    fn channels(&mut self) -> PsrResult<HashMap<String, ChannelBuffer>> {
        self.frozen.take().ok_or_else(|| PsrError::AdapterFailure {
            adapter: self.label().to_string(),
            reason: "no frozen channels; stop the adapter first".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_headset_produces_selected_streams() {
        let mut adapter = HeadsetAdapter::new(HeadsetConfig {
            data: vec![HeadsetData::Eeg, HeadsetData::Acc],
            seed: Some(7),
        });

        adapter.start().unwrap();
        thread::sleep(Duration::from_millis(40));
        adapter.stop().unwrap();

        let channels = adapter.channels().unwrap();
        assert_eq!(channels.len(), 2);
        assert!(!channels["EEG"].is_empty());
        assert_eq!(channels["EEG"].kind(), ChannelKind::Eeg);
        assert_eq!(channels["EEG"].samples()[0].v.width(), 4);
        assert_eq!(channels["ACC"].samples()[0].v.width(), 3);
    }

    #[test]
    fn test_double_start_fails() {
        let mut adapter = HeadsetAdapter::new(HeadsetConfig::default());
        adapter.start().unwrap();
        assert!(matches!(
            adapter.start(),
            Err(PsrError::AdapterFailure { .. })
        ));
        adapter.stop().unwrap();
    }

    #[test]
    fn test_repeated_selection_collapses() {
        let mut adapter = HeadsetAdapter::new(HeadsetConfig {
            data: vec![HeadsetData::Eeg, HeadsetData::Eeg],
            seed: Some(3),
        });

        adapter.start().unwrap();
        thread::sleep(Duration::from_millis(20));
        adapter.stop().unwrap();

        let channels = adapter.channels().unwrap();
        assert_eq!(channels.len(), 1);
        // A single producer grid: strictly increasing timestamps.
        for pair in channels["EEG"].samples().windows(2) {
            assert!(pair[0].t < pair[1].t);
        }
    }

    #[test]
    fn test_channels_before_stop_fails() {
        let mut adapter = HeadsetAdapter::new(HeadsetConfig::default());
        assert!(adapter.channels().is_err());
    }
}
