//! The `record` subcommand: run a session to completion and persist it

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use psr_acquire::{
    HeadsetAdapter, HeadsetConfig, HeadsetData, RecordingSession, SamplerAdapter, SamplerConfig,
};
use psr_core::SessionTime;

/// Record from both sources until Ctrl-C, then save the merged record
pub async fn run(port: String, output: &Path, data: Vec<HeadsetData>) -> Result<()> {
    let headset = HeadsetAdapter::new(HeadsetConfig { data, seed: None });
    println!("Headset model = {}", headset.model());
    println!("Headset name = {}", headset.device_name());

    let sampler = SamplerAdapter::new(SamplerConfig::on_port(port));
    println!(
        "GSR/PPG sampler port = {}, baudrate = {}",
        sampler.port(),
        sampler.baud_rate()
    );
    println!("GSR sampling rate = {}", sampler.gsr_rate());
    println!("PPG sampling rate = {}", sampler.ppg_rate());

    println!("Press Enter to start recording");
    wait_for_enter()?;

    let mut session = RecordingSession::new(Box::new(headset), Box::new(sampler));
    session.start()?;

    // Ctrl-C is the normal termination path: partial data up to the stop
    // instant is exactly what gets persisted.
    println!("Press Ctrl + C to stop");
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticker = tokio::time::interval(Duration::from_millis(100));

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                result.context("failed to listen for Ctrl-C")?;
                break;
            }
            _ = ticker.tick() => {
                print!("\r{}", SessionTime::from_duration(session.elapsed()));
                io::stdout().flush().ok();
            }
        }
    }
    println!();

    let record = session.stop()?;
    println!("Saving data...");
    record.save(output)?;
    println!("Saved {} channels to {}", record.len(), output.display());

    Ok(())
}

fn wait_for_enter() -> Result<()> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    Ok(())
}
