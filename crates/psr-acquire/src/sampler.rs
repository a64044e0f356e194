//! Simulated GSR/PPG serial sampler
//!
//! Stands in for the serial-port sampler driver: one galvanic skin response
//! channel and one photoplethysmography channel, both scalar.

use std::collections::HashMap;
use std::time::Duration;

use psr_core::{ChannelBuffer, ChannelKind, PsrError, PsrResult, SampleValue};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::adapter::SourceAdapter;
use crate::sim::{Producer, SimStream};

/// Supported sampler rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingRate {
    /// 250 samples per second
    Hz250,
    /// 500 samples per second
    Hz500,
}

impl SamplingRate {
    /// Rate in Hz
    pub fn as_hz(&self) -> u32 {
        match self {
            SamplingRate::Hz250 => 250,
            SamplingRate::Hz500 => 500,
        }
    }

    fn period(&self) -> Duration {
        Duration::from_nanos(1_000_000_000 / self.as_hz() as u64)
    }
}

impl std::fmt::Display for SamplingRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz", self.as_hz())
    }
}

/// GSR/PPG sampler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Serial port the physical sampler would sit on
    pub port: String,
    /// Serial baud rate
    pub baud_rate: u32,
    /// GSR channel sampling rate
    pub gsr_rate: SamplingRate,
    /// PPG channel sampling rate
    pub ppg_rate: SamplingRate,
    /// Simulated pulse rate, beats per minute
    pub pulse_bpm: f64,
    /// Random seed for reproducible synthetic signals
    pub seed: Option<u64>,
}

impl SamplerConfig {
    /// Standard configuration for a sampler on the given port
    pub fn on_port(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: 115_200,
            gsr_rate: SamplingRate::Hz500,
            ppg_rate: SamplingRate::Hz500,
            pulse_bpm: 72.0,
            seed: None,
        }
    }
}

/// Simulated GSR/PPG source adapter
pub struct SamplerAdapter {
    config: SamplerConfig,
    producer: Option<Producer>,
    frozen: Option<HashMap<String, ChannelBuffer>>,
}

impl SamplerAdapter {
    /// Create an adapter for the configured sampler
    pub fn new(config: SamplerConfig) -> Self {
        SamplerAdapter {
            config,
            producer: None,
            frozen: None,
        }
    }

    /// Configured serial port, for the startup banner
    pub fn port(&self) -> &str {
        &self.config.port
    }

    /// Configured baud rate, for the startup banner
    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }

    /// Configured GSR sampling rate
    pub fn gsr_rate(&self) -> SamplingRate {
        self.config.gsr_rate
    }

    /// Configured PPG sampling rate
    pub fn ppg_rate(&self) -> SamplingRate {
        self.config.ppg_rate
    }

    fn build_streams(&self) -> Vec<SimStream> {
        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let pulse_hz = self.config.pulse_bpm / 60.0;

        let mut gsr_rng = StdRng::seed_from_u64(base_seed);
        let gsr_noise = Normal::new(0.0, 0.01).expect("valid std dev");
        let gsr = SimStream {
            name: "GSR".to_string(),
            kind: ChannelKind::Gsr,
            period: self.config.gsr_rate.period(),
            // Tonic skin conductance with slow drift, microsiemens scale.
            synth: Box::new(move |t| {
                let tonic = 2.5 + 0.4 * (2.0 * std::f64::consts::PI * 0.05 * t).sin();
                SampleValue::Scalar(tonic + gsr_noise.sample(&mut gsr_rng))
            }),
        };

        let mut ppg_rng = StdRng::seed_from_u64(base_seed.wrapping_add(1));
        let ppg_noise = Normal::new(0.0, 0.02).expect("valid std dev");
        let ppg = SimStream {
            name: "PPG".to_string(),
            kind: ChannelKind::Ppg,
            period: self.config.ppg_rate.period(),
            // Pulse waveform: fundamental plus dicrotic harmonic.
            synth: Box::new(move |t| {
                let theta = 2.0 * std::f64::consts::PI * pulse_hz * t;
                let wave = theta.sin() + 0.3 * (2.0 * theta).sin();
                SampleValue::Scalar(wave + ppg_noise.sample(&mut ppg_rng))
            }),
        };

        vec![gsr, ppg]
    }
}

impl SourceAdapter for SamplerAdapter {
    fn label(&self) -> &str {
        "gsr/ppg sampler"
    }

    fn start(&mut self) -> PsrResult<()> {
        if self.producer.is_some() {
            return Err(PsrError::AdapterFailure {
                adapter: self.label().to_string(),
                reason: "already reading".to_string(),
            });
        }
        tracing::info!(
            port = %self.config.port,
            baud = self.config.baud_rate,
            "sampler reading started"
        );
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
        tracing::info!(channels = buffers.len(), "sampler reading stopped");
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
    fn test_sampler_produces_gsr_and_ppg() {
        let mut config = SamplerConfig::on_port("COM7");
        config.seed = Some(11);
        let mut adapter = SamplerAdapter::new(config);

        adapter.start().unwrap();
        thread::sleep(Duration::from_millis(40));
        adapter.stop().unwrap();

        let channels = adapter.channels().unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels["GSR"].kind(), ChannelKind::Gsr);
        assert_eq!(channels["PPG"].kind(), ChannelKind::Ppg);
        assert!(!channels["GSR"].is_empty());
        assert!(channels["PPG"].samples()[0].v.as_scalar().is_some());
    }

    #[test]
    fn test_stop_without_start_fails() {
        let mut adapter = SamplerAdapter::new(SamplerConfig::on_port("COM7"));
        assert!(matches!(
            adapter.stop(),
            Err(PsrError::AdapterFailure { .. })
        ));
    }
}
