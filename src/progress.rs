//! Progress reporting
//!
//! Progress is purely observational: a [`ProgressReader`] counts the bytes
//! a parser pulls from the input, and [`Progress`] turns those counts into a
//! rate-limited status line. Neither affects what is scanned.

use chrono::{DateTime, Local, TimeDelta};
use std::io::{self, Read};
use std::time::{Duration, Instant};

/// Minimum time between two progress lines
pub const DISPLAY_INTERVAL: Duration = Duration::from_secs(1);

/// A reader that reports the cumulative number of bytes read through it
pub struct ProgressReader<R, F> {
    inner: R,
    consumed: u64,
    on_read: F,
}

impl<R: Read, F: FnMut(u64)> ProgressReader<R, F> {
    /// Wrap `inner`, calling `on_read` with the running total after each read
    pub fn new(inner: R, on_read: F) -> Self {
        Self {
            inner,
            consumed: 0,
            on_read,
        }
    }

    /// Bytes read so far
    pub fn consumed(&self) -> u64 {
        self.consumed
    }
}

impl<R: Read, F: FnMut(u64)> Read for ProgressReader<R, F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.consumed += n as u64;
            (self.on_read)(self.consumed);
        }
        Ok(n)
    }
}

/// Rate-limited progress line builder for an input of known size
#[derive(Debug, Clone)]
pub struct Progress {
    total: u64,
    started: Instant,
    last_display: Instant,
    interval: Duration,
    displayed: bool,
}

impl Progress {
    /// Track progress through `total` bytes, starting now
    pub fn new(total: u64) -> Self {
        let now = Instant::now();
        Self {
            total,
            started: now,
            last_display: now,
            interval: DISPLAY_INTERVAL,
            displayed: false,
        }
    }

    /// Set the minimum time between lines
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Line to display for `consumed` bytes, or `None` if it is too soon
    pub fn update(&mut self, consumed: u64) -> Option<String> {
        let now = Instant::now();
        if consumed == 0 || now.duration_since(self.last_display) < self.interval {
            return None;
        }
        self.last_display = now;
        let line = progress_line(consumed, self.total, now - self.started, Local::now());
        self.displayed |= line.is_some();
        line
    }

    /// Whether any line has been produced, so the display needs a final newline
    pub fn displayed(&self) -> bool {
        self.displayed
    }
}

/// Format `\r{percent}%: remaining {secs}s, ETA: {time}`.
///
/// The remaining time extrapolates the rate so far. Returns `None` when
/// nothing has been read or the total is unknown.
pub fn progress_line(
    consumed: u64,
    total: u64,
    elapsed: Duration,
    now: DateTime<Local>,
) -> Option<String> {
    if consumed == 0 || total == 0 {
        return None;
    }
    let proportion = (consumed as f64 / total as f64).min(1.0);
    let elapsed = elapsed.as_secs_f64();
    let remaining = elapsed / proportion - elapsed;
    let eta = now + TimeDelta::milliseconds((remaining * 1000.0) as i64);

    Some(format!(
        "\r{:.2}%: remaining {:.0}s, ETA: {}",
        100.0 * proportion,
        remaining,
        eta.format("%Y-%m-%d %H:%M:%S")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reader_reports_running_total() {
        let mut seen = Vec::new();
        let mut reader = ProgressReader::new(&b"hello world"[..], |n| seen.push(n));

        let mut buf = [0u8; 4];
        while reader.read(&mut buf).unwrap() > 0 {}
        assert_eq!(reader.consumed(), 11);
        drop(reader);

        assert_eq!(seen, vec![4, 8, 11]);
    }

    #[test]
    fn test_reader_passes_data_through() {
        let mut reader = ProgressReader::new(&b"<r/>"[..], |_| {});
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        assert_eq!(out, "<r/>");
    }

    #[test]
    fn test_progress_line_format() {
        let now = Local.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let line = progress_line(250, 1000, Duration::from_secs(10), now).unwrap();
        assert_eq!(line, "\r25.00%: remaining 30s, ETA: 2024-03-01 12:00:30");
    }

    #[test]
    fn test_progress_line_needs_data() {
        let now = Local::now();
        assert_eq!(progress_line(0, 1000, Duration::from_secs(1), now), None);
        assert_eq!(progress_line(10, 0, Duration::from_secs(1), now), None);
    }

    #[test]
    fn test_progress_line_caps_at_complete() {
        let now = Local::now();
        let line = progress_line(2000, 1000, Duration::from_secs(5), now).unwrap();
        assert!(line.starts_with("\r100.00%: remaining 0s"), "got {:?}", line);
    }

    #[test]
    fn test_update_is_rate_limited() {
        let mut progress = Progress::new(100).with_interval(Duration::from_secs(3600));
        assert_eq!(progress.update(50), None);

        let mut progress = Progress::new(100).with_interval(Duration::ZERO);
        assert_eq!(progress.update(0), None);
        assert!(progress.update(50).is_some());
    }

    #[test]
    fn test_displayed_only_after_a_line() {
        let mut progress = Progress::new(100).with_interval(Duration::from_secs(3600));
        progress.update(50);
        progress.update(100);
        assert!(!progress.displayed());

        let mut progress = Progress::new(0).with_interval(Duration::ZERO);
        progress.update(50);
        assert!(!progress.displayed(), "unknown total never prints");

        let mut progress = Progress::new(100).with_interval(Duration::ZERO);
        progress.update(50);
        assert!(progress.displayed());
    }
}
