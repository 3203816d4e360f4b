//! Application and session configuration.
//!
//! Out-of-range analysis settings are clamped to the nearest valid value
//! rather than rejected, so a stale or hand-edited config file can never
//! prevent a session from starting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Capture intervals the frame scheduler supports, in milliseconds.
pub const ANALYSIS_INTERVALS_MS: [u64; 3] = [1_000, 2_000, 5_000];

/// Chart time ranges the window builder supports, in seconds.
pub const TIME_RANGES_SECONDS: [u64; 3] = [10, 20, 60];

/// Default rolling-history capacity (accepted samples kept per session).
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;

/// Emotion labels of the default inference service, in canonical order.
pub const DEFAULT_LABELS: [&str; 5] = ["joy", "surprise", "anger", "sadness", "neutral"];

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Session analysis settings.
    pub analysis: AnalysisConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Per-session analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Frame capture interval in milliseconds. One of [`ANALYSIS_INTERVALS_MS`].
    pub analysis_interval_ms: u64,

    /// Samples below this confidence are discarded. In `[0, 1]`.
    pub confidence_threshold: f64,

    /// Chart window time range in seconds. One of [`TIME_RANGES_SECONDS`].
    pub time_range_seconds: u64,

    /// Whether the periodic insight generator runs.
    pub show_insights: bool,

    /// Rolling-history capacity, fixed for the session lifetime.
    pub history_capacity: usize,

    /// Declared emotion labels in canonical order. The first label is the
    /// primary label for insight volatility/trend analysis.
    pub labels: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "moodlens=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            analysis_interval_ms: 1_000,
            confidence_threshold: 0.7,
            time_range_seconds: 20,
            show_insights: true,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            labels: DEFAULT_LABELS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AnalysisConfig {
    /// Clamp every field to its valid range, warning about adjustments.
    ///
    /// Enumerated settings snap to the nearest allowed value; continuous
    /// settings clamp to their interval bounds.
    pub fn clamped(mut self) -> Self {
        let interval = nearest_allowed(self.analysis_interval_ms, &ANALYSIS_INTERVALS_MS);
        if interval != self.analysis_interval_ms {
            tracing::warn!(
                requested = self.analysis_interval_ms,
                clamped = interval,
                "Analysis interval outside supported set, clamping"
            );
            self.analysis_interval_ms = interval;
        }

        let range = nearest_allowed(self.time_range_seconds, &TIME_RANGES_SECONDS);
        if range != self.time_range_seconds {
            tracing::warn!(
                requested = self.time_range_seconds,
                clamped = range,
                "Chart time range outside supported set, clamping"
            );
            self.time_range_seconds = range;
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            let clamped = self.confidence_threshold.clamp(0.0, 1.0);
            tracing::warn!(
                requested = self.confidence_threshold,
                clamped,
                "Confidence threshold outside [0, 1], clamping"
            );
            self.confidence_threshold = clamped;
        }

        if self.history_capacity == 0 {
            tracing::warn!("History capacity of zero is not usable, falling back to default");
            self.history_capacity = DEFAULT_HISTORY_CAPACITY;
        }

        if self.labels.is_empty() {
            tracing::warn!("Empty label set, falling back to default labels");
            self.labels = DEFAULT_LABELS.iter().map(|s| s.to_string()).collect();
        }

        self
    }

    /// Expected accepted-sample rate implied by the capture interval.
    pub fn samples_per_second(&self) -> f64 {
        1_000.0 / self.analysis_interval_ms as f64
    }

    /// Capture interval as fractional seconds.
    pub fn interval_secs(&self) -> f64 {
        self.analysis_interval_ms as f64 / 1_000.0
    }
}

fn nearest_allowed(value: u64, allowed: &[u64]) -> u64 {
    *allowed
        .iter()
        .min_by_key(|candidate| candidate.abs_diff(value))
        .unwrap_or(&value)
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    ///
    /// Analysis settings are clamped on load.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                    Ok(mut config) => {
                        config.analysis = config.analysis.clamped();
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("moodlens").join("config.json")
}
