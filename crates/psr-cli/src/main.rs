//! psr: record and extract physiological signal sessions

mod extract;
mod record;
mod report;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use psr_acquire::HeadsetData;

#[derive(Parser)]
#[command(name = "psr", version, about = "Dual-source physiological signal recorder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record data from the headset and the GSR/PPG sampler
    Record {
        /// GSR/PPG sampler serial port
        #[arg(short, long)]
        port: String,

        /// Record file to be written
        #[arg(short, long)]
        output: PathBuf,

        /// Headset data to read, ':'-separated
        #[arg(short, long, value_enum, value_delimiter = ':', default_value = "eeg")]
        data: Vec<DataArg>,
    },

    /// Extract a time window from a recorded file into a tabular report
    Extract {
        /// Record file to be processed
        #[arg(short, long)]
        input: PathBuf,

        /// Start offset into the record (e.g. 1500ms, 2s, 0:01:30)
        #[arg(short = 's', long, value_parser = parse_duration)]
        timeoff: Duration,

        /// Window length (end = offset + duration)
        #[arg(short = 't', long, value_parser = parse_duration)]
        duration: Duration,

        /// Report directory to be written
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// CLI surface for the headset stream selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DataArg {
    Eeg,
    Acc,
    Gyro,
}

impl From<DataArg> for HeadsetData {
    fn from(arg: DataArg) -> Self {
        match arg {
            DataArg::Eeg => HeadsetData::Eeg,
            DataArg::Acc => HeadsetData::Acc,
            DataArg::Gyro => HeadsetData::Gyro,
        }
    }
}

/// Parse `1500ms`, `2s`, `3m`, a bare millisecond count, or `h:mm:ss[.fff]`
fn parse_duration(arg: &str) -> Result<Duration, String> {
    let arg = arg.trim();
    if arg.contains(':') {
        return parse_clock(arg);
    }

    let (digits, unit) = match arg.find(|c: char| !c.is_ascii_digit()) {
        Some(split) => arg.split_at(split),
        None => (arg, "ms"),
    };
    let count: u64 = digits
        .parse()
        .map_err(|_| format!("invalid duration '{}'", arg))?;

    match unit {
        "ms" => Ok(Duration::from_millis(count)),
        "s" => Ok(Duration::from_secs(count)),
        "m" => Ok(Duration::from_secs(count * 60)),
        "h" => Ok(Duration::from_secs(count * 3600)),
        _ => Err(format!("invalid duration unit '{}'", unit)),
    }
}

fn parse_clock(arg: &str) -> Result<Duration, String> {
    let bad = || format!("invalid duration '{}', expected h:mm:ss[.fff]", arg);
    let parts: Vec<&str> = arg.split(':').collect();
    if parts.len() != 3 {
        return Err(bad());
    }

    let hours: u64 = parts[0].parse().map_err(|_| bad())?;
    let mins: u64 = parts[1].parse().map_err(|_| bad())?;
    let (secs, millis) = match parts[2].split_once('.') {
        Some((s, frac)) => {
            let padded = format!("{:0<3}", frac);
            let millis: u64 = padded.get(..3).ok_or_else(bad)?.parse().map_err(|_| bad())?;
            (s.parse::<u64>().map_err(|_| bad())?, millis)
        }
        None => (parts[2].parse().map_err(|_| bad())?, 0),
    };
    if mins >= 60 || secs >= 60 {
        return Err(bad());
    }

    Ok(Duration::from_millis(
        ((hours * 60 + mins) * 60 + secs) * 1000 + millis,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Record { port, output, data } => {
            let data = data.into_iter().map(HeadsetData::from).collect();
            record::run(port, &output, data).await
        }
        Commands::Extract {
            input,
            timeoff,
            duration,
            output,
        } => extract::run(&input, timeoff, duration, &output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("1500ms").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("3m").unwrap(), Duration::from_secs(180));
        assert_eq!(parse_duration("250").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn test_parse_duration_clock_format() {
        assert_eq!(
            parse_duration("0:01:30").unwrap(),
            Duration::from_secs(90)
        );
        assert_eq!(
            parse_duration("1:00:00.250").unwrap(),
            Duration::from_millis(3_600_250)
        );
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("10q").is_err());
        assert!(parse_duration("0:99:00").is_err());
        assert!(parse_duration("1:2").is_err());
    }
}
