//! Tabular report writing
//!
//! The extraction stage hands one ordered table per channel or derived
//! channel to a [`TableWriter`]; the bundled writer emits one CSV file per
//! table into the report directory. Each file is staged and atomically
//! renamed into place so an aborted extraction never leaves a table that
//! looks complete.

use std::fs;
use std::path::PathBuf;

use psr_core::{PsrError, PsrResult, Sample, WindowedChannel};

/// One named table: a header row plus data rows
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name; doubles as the output file stem
    pub name: String,
    /// Column labels, starting with the timestamp column
    pub columns: Vec<String>,
    /// Data rows, one per sample
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build the raw table for one windowed channel
    ///
    /// Rows are `(formatted timestamp, one field per vector component)`,
    /// with component labels supplied by the channel kind.
    pub fn from_channel(name: &str, channel: &WindowedChannel<'_>) -> Table {
        let width = channel
            .samples()
            .first()
            .map_or(1, |sample| sample.v.width());

        let mut columns = vec!["Timestamp".to_string()];
        columns.extend(channel.kind().component_labels(width));

        Table {
            name: name.to_string(),
            columns,
            rows: rows_from_samples(channel.samples()),
        }
    }

    /// Build the table for a derived channel
    ///
    /// Derived channels are always scalar: `(formatted timestamp, value)`.
    pub fn from_derived(name: &str, samples: &[Sample]) -> Table {
        Table {
            name: name.to_string(),
            columns: vec!["Timestamp".to_string(), "Value".to_string()],
            rows: rows_from_samples(samples),
        }
    }
}

fn rows_from_samples(samples: &[Sample]) -> Vec<Vec<String>> {
    samples
        .iter()
        .map(|sample| {
            let mut row = Vec::with_capacity(1 + sample.v.width());
            row.push(sample.t.to_string());
            row.extend(sample.v.components().iter().map(|v| v.to_string()));
            row
        })
        .collect()
}

/// Destination for extracted tables
///
/// The extraction core is indifferent to the output format beyond this row
/// contract; alternative report backends implement this trait.
pub trait TableWriter {
    /// Write one complete table
    fn write_table(&mut self, table: &Table) -> PsrResult<()>;
}

/// Writes each table as `<name>.csv` inside one report directory
pub struct CsvReportWriter {
    dir: PathBuf,
}

impl CsvReportWriter {
    /// Create the report directory (if needed) and a writer into it
    pub fn new(dir: impl Into<PathBuf>) -> PsrResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| PsrError::IoWrite {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(CsvReportWriter { dir })
    }

    fn table_path(&self, table: &Table) -> PathBuf {
        let stem: String = table
            .name
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.csv", stem))
    }
}

impl TableWriter for CsvReportWriter {
    fn write_table(&mut self, table: &Table) -> PsrResult<()> {
        let path = self.table_path(table);
        let staging = path.with_extension("csv.tmp");
        let write_err = |reason: String| PsrError::IoWrite {
            path: path.display().to_string(),
            reason,
        };

        {
            let mut writer =
                csv::Writer::from_path(&staging).map_err(|e| write_err(e.to_string()))?;
            writer
                .write_record(&table.columns)
                .map_err(|e| write_err(e.to_string()))?;
            for row in &table.rows {
                writer
                    .write_record(row)
                    .map_err(|e| write_err(e.to_string()))?;
            }
            writer.flush().map_err(|e| write_err(e.to_string()))?;
        }

        fs::rename(&staging, &path).map_err(|e| write_err(e.to_string()))?;
        tracing::debug!(table = %table.name, rows = table.rows.len(), "table written");
        Ok(())
    }
}
