//! The `extract` subcommand: window a record and export tables

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use psr_core::{ChannelKind, Record, SessionTime, WindowedView};
use psr_process::{Conditioner, GsrFilter, RateEstimator};

use crate::report::{CsvReportWriter, Table, TableWriter};

/// Load a record, slice it, run the conditioners, and write the report
pub fn run(input: &Path, timeoff: Duration, duration: Duration, output: &Path) -> Result<()> {
    let record = Record::load(input)?;
    let view = WindowedView::over(&record, SessionTime::from_duration(timeoff), duration)?;

    let tables = build_tables(&view);

    let mut writer = CsvReportWriter::new(output)?;
    for table in &tables {
        writer.write_table(table)?;
    }

    println!(
        "Wrote {} tables to {} (window {} + {:?})",
        tables.len(),
        output.display(),
        view.offset(),
        view.duration()
    );
    Ok(())
}

/// One raw table per channel, plus derived tables for GSR and PPG channels
///
/// Channels of unrecognized-but-loadable kinds pass through as raw tables;
/// no fixed channel schema is assumed.
pub fn build_tables(view: &WindowedView<'_>) -> Vec<Table> {
    let gsr_filter = GsrFilter::default();
    let rate_estimator = RateEstimator::default();

    let mut tables = Vec::new();
    for (name, channel) in view.channels() {
        tables.push(Table::from_channel(name, channel));

        match channel.kind() {
            ChannelKind::Gsr => {
                let smoothed = gsr_filter.condition(channel.samples());
                tables.push(Table::from_derived(gsr_filter.derived_name(), &smoothed));
            }
            ChannelKind::Ppg => {
                let rates = rate_estimator.condition(channel.samples());
                tables.push(Table::from_derived(rate_estimator.derived_name(), &rates));
            }
            _ => {}
        }
    }
    tables
}
