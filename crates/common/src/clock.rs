//! Session clock for sample timestamping.
//!
//! Every MoodLens session is anchored to a monotonic epoch recorded when
//! the session starts. Frame captures and accepted samples are stamped in
//! milliseconds relative to that epoch; the wall-clock time at the epoch is
//! kept alongside for report headers.

use std::time::Instant;

/// A session clock providing monotonic millisecond timestamps relative to
/// a fixed epoch (the moment the session started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Milliseconds elapsed since session start.
    pub fn elapsed_ms(&self) -> i64 {
        self.epoch.elapsed().as_millis() as i64
    }

    /// Seconds elapsed since session start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Minutes elapsed since session start.
    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed_secs() / 60.0
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }

    /// The underlying epoch instant.
    pub fn epoch(&self) -> Instant {
        self.epoch
    }

    /// Convert a millisecond offset to fractional seconds.
    pub fn ms_to_secs(ms: i64) -> f64 {
        ms as f64 / 1_000.0
    }

    /// Convert fractional seconds to milliseconds.
    pub fn secs_to_ms(secs: f64) -> i64 {
        (secs * 1_000.0) as i64
    }
}

/// Render a millisecond session offset as a `HH:MM:SS` display key for
/// chart axes.
pub fn display_time_key(timestamp_ms: i64) -> String {
    let total_secs = (timestamp_ms / 1_000).max(0);
    let hours = total_secs / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
