//! Timing utilities for pipeline phases
//!
//! Lap lines go through `tracing` at debug level with a `TIMEPROF:` prefix;
//! the overall run time is reported by the caller from [`Stopwatch::elapsed`].

use std::time::{Duration, Instant};
use tracing::debug;

/// Wall-clock timer for a run, with named laps
///
/// Each lap logs `TIMEPROF: <label> [+<lap>s, total: <total>s]` at debug level.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    start: Instant,
    lap: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            lap: now,
        }
    }

    /// Start and log the beginning of a timed section
    pub fn started(label: &str) -> Self {
        debug!("TIMEPROF: {} ...", label);
        Self::start()
    }

    /// Close the current lap, log it, and return its duration
    pub fn lap(&mut self, label: &str) -> Duration {
        let lap = self.lap.elapsed();
        debug!(
            "TIMEPROF: {} [+{:.3}s, total: {:.3}s]",
            label,
            lap.as_secs_f64(),
            self.elapsed().as_secs_f64()
        );
        self.lap = Instant::now();
        lap
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Format seconds the way `{:,g}` does: six significant digits, trailing
/// zeros dropped, thousands separated by commas.
pub fn format_seconds(seconds: f64) -> String {
    if seconds == 0.0 {
        return "0".to_string();
    }

    let magnitude = seconds.abs().log10().floor() as i32;
    if !(-5..6).contains(&magnitude) {
        return format!("{:.5e}", seconds);
    }

    let decimals = (5 - magnitude).max(0) as usize;
    let fixed = format!("{:.*}", decimals, seconds);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (trimmed, None),
    };
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(d) => ("-", d),
        None => ("", int_part),
    };

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
