//! End-to-end extraction over a synthetic recorded session

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use psr_core::{ChannelBuffer, ChannelKind, Record, Sample, SessionTime};

/// A record matching a five-second dual-source session: EEG 4-vectors every
/// 10ms, GSR and PPG scalars every 2ms, PPG pulsing once every 500ms.
fn recorded_session() -> Record {
    let mut record = Record::new();

    let mut eeg = ChannelBuffer::new("EEG", ChannelKind::Eeg);
    for i in 0..500u64 {
        let t = SessionTime::from_millis(i * 10);
        let base = (i as f64 / 10.0).sin();
        eeg.push(Sample::vector(t, vec![base, base + 1.0, base + 2.0, base + 3.0]));
    }
    record.insert(eeg).unwrap();

    let mut gsr = ChannelBuffer::new("GSR", ChannelKind::Gsr);
    let mut ppg = ChannelBuffer::new("PPG", ChannelKind::Ppg);
    for i in 0..2500u64 {
        let t = SessionTime::from_millis(i * 2);
        gsr.push(Sample::scalar(t, 2.5 + (i as f64 / 200.0).sin() * 0.1));
        // Tent wave peaking at 250ms, 750ms, ... (period 500ms).
        let phase = i % 250;
        ppg.push(Sample::scalar(t, -((phase as i64 - 125).abs() as f64)));
    }
    record.insert(gsr).unwrap();
    record.insert(ppg).unwrap();

    record
}

fn data_rows(contents: &str) -> Vec<Vec<String>> {
    contents
        .lines()
        .skip(1)
        .map(|line| line.split(',').map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn test_extract_writes_windowed_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("session.json");
    let report = dir.path().join("report");

    recorded_session().save(&input).unwrap();

    Command::cargo_bin("psr")
        .unwrap()
        .args([
            "extract",
            "--input",
            input.to_str().unwrap(),
            "--timeoff",
            "1000ms",
            "--duration",
            "2000ms",
            "--output",
            report.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 5 tables"));

    // One table per raw channel plus the two derived tables.
    for name in ["EEG", "GSR", "PPG", "Processed_GSR", "BPM"] {
        assert!(report.join(format!("{}.csv", name)).exists(), "{} missing", name);
    }

    let eeg = fs::read_to_string(report.join("EEG.csv")).unwrap();
    let mut lines = eeg.lines();
    assert_eq!(lines.next(), Some("Timestamp,TP9,AF7,AF8,TP10"));
    let rows = data_rows(&eeg);
    assert_eq!(rows.len(), 200);
    assert_eq!(rows.first().unwrap()[0], "0:00:01.000");
    assert_eq!(rows.last().unwrap()[0], "0:00:02.990");

    let gsr = fs::read_to_string(report.join("GSR.csv")).unwrap();
    let rows = data_rows(&gsr);
    assert_eq!(rows.len(), 1000);
    assert_eq!(rows.first().unwrap()[0], "0:00:01.000");
    assert_eq!(rows.last().unwrap()[0], "0:00:02.998");

    // Four pulses fall inside [1000ms, 3000ms): three inter-peak rates of
    // exactly 120 BPM.
    let bpm = fs::read_to_string(report.join("BPM.csv")).unwrap();
    let rows = data_rows(&bpm);
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row[1], "120");
    }

    // Smoothed GSR keeps the raw channel's cardinality.
    let processed = fs::read_to_string(report.join("Processed_GSR.csv")).unwrap();
    assert_eq!(data_rows(&processed).len(), 1000);
}

#[test]
fn test_extract_window_past_data_yields_empty_tables() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("session.json");
    let report = dir.path().join("report");

    recorded_session().save(&input).unwrap();

    Command::cargo_bin("psr")
        .unwrap()
        .args([
            "extract",
            "--input",
            input.to_str().unwrap(),
            "--timeoff",
            "1:00:00",
            "--duration",
            "5s",
            "--output",
            report.to_str().unwrap(),
        ])
        .assert()
        .success();

    let eeg = fs::read_to_string(report.join("EEG.csv")).unwrap();
    assert_eq!(data_rows(&eeg).len(), 0);
}

#[test]
fn test_extract_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("psr")
        .unwrap()
        .args([
            "extract",
            "--input",
            dir.path().join("absent.json").to_str().unwrap(),
            "--timeoff",
            "0ms",
            "--duration",
            "1s",
            "--output",
            dir.path().join("report").to_str().unwrap(),
        ])
        .assert()
        .failure();
}
