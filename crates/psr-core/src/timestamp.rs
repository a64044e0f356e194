//! Session-relative timestamps
//!
//! Every sample is stamped with the elapsed time since its own source started
//! producing, not with wall-clock time. Nanosecond storage keeps alignment
//! exact across sources sampling at different rates.

use core::fmt;
use core::ops::Add;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Elapsed time since session start, nanosecond resolution
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct SessionTime {
    nanos: u64,
}

impl SessionTime {
    /// Zero elapsed time (the session start itself)
    pub const ZERO: SessionTime = SessionTime { nanos: 0 };

    /// Create a timestamp from nanoseconds since session start
    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Create a timestamp from microseconds since session start
    #[inline]
    pub const fn from_micros(micros: u64) -> Self {
        Self { nanos: micros * 1_000 }
    }

    /// Create a timestamp from milliseconds since session start
    #[inline]
    pub const fn from_millis(millis: u64) -> Self {
        Self { nanos: millis * 1_000_000 }
    }

    /// Create a timestamp from seconds since session start
    #[inline]
    pub const fn from_secs(secs: u64) -> Self {
        Self { nanos: secs * 1_000_000_000 }
    }

    /// Create a timestamp from an elapsed [`Duration`]
    #[inline]
    pub fn from_duration(elapsed: Duration) -> Self {
        Self { nanos: elapsed.as_nanos() as u64 }
    }

    /// Nanoseconds since session start
    #[inline]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Milliseconds since session start
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.nanos / 1_000_000
    }

    /// Fractional seconds since session start
    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.nanos as f64 / 1_000_000_000.0
    }

    /// Elapsed time between this timestamp and an earlier one
    ///
    /// Returns `None` if `earlier` is after `self`.
    #[inline]
    pub fn since(&self, earlier: SessionTime) -> Option<Duration> {
        self.nanos
            .checked_sub(earlier.nanos)
            .map(Duration::from_nanos)
    }
}

impl Add<Duration> for SessionTime {
    type Output = SessionTime;

    #[inline]
    fn add(self, rhs: Duration) -> SessionTime {
        SessionTime::from_nanos(self.nanos.saturating_add(rhs.as_nanos() as u64))
    }
}

impl fmt::Display for SessionTime {
    /// Formats as `h:mm:ss.fff`, the layout used in exported report rows
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_millis = self.as_millis();
        let millis = total_millis % 1_000;
        let secs = (total_millis / 1_000) % 60;
        let mins = (total_millis / 60_000) % 60;
        let hours = total_millis / 3_600_000;
        write!(f, "{}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_conversions() {
        let t = SessionTime::from_millis(1_500);
        assert_eq!(t.as_nanos(), 1_500_000_000);
        assert_eq!(t.as_millis(), 1_500);
        assert!((t.as_secs_f64() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_timestamp_ordering() {
        assert!(SessionTime::from_millis(10) < SessionTime::from_millis(20));
        assert_eq!(SessionTime::ZERO, SessionTime::from_nanos(0));
    }

    #[test]
    fn test_since() {
        let a = SessionTime::from_millis(100);
        let b = SessionTime::from_millis(350);
        assert_eq!(b.since(a), Some(Duration::from_millis(250)));
        assert_eq!(a.since(b), None);
    }

    #[test]
    fn test_add_duration() {
        let t = SessionTime::from_millis(100) + Duration::from_millis(50);
        assert_eq!(t.as_millis(), 150);
    }

    #[test]
    fn test_display_format() {
        let t = SessionTime::from_millis(3_661_042);
        assert_eq!(t.to_string(), "1:01:01.042");
        assert_eq!(SessionTime::ZERO.to_string(), "0:00:00.000");
    }
}
