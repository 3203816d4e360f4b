//! Visualization-ready chart window.
//!
//! A separate bounded series per label plus a shared display-time key
//! sequence, decoupled from the rolling-history capacity. The window
//! capacity derives from the configured capture interval, not an assumed
//! fixed sample rate.

use std::collections::{BTreeMap, VecDeque};

use moodlens_common::clock::display_time_key;
use moodlens_session_model::{EmotionSample, LabelSet};

/// Chart window capacity for a time range and capture interval:
/// `floor(time_range_seconds * samples_per_second)`, at least 1.
pub fn chart_capacity(time_range_seconds: u64, analysis_interval_ms: u64) -> usize {
    let samples_per_second = 1_000.0 / analysis_interval_ms.max(1) as f64;
    ((time_range_seconds as f64 * samples_per_second).floor() as usize).max(1)
}

/// Bounded per-label series for visualization.
#[derive(Debug, Clone)]
pub struct ChartWindow {
    capacity: usize,
    series: BTreeMap<String, VecDeque<f64>>,
    time_keys: VecDeque<String>,
}

impl ChartWindow {
    /// Create a window for the declared labels.
    pub fn new(capacity: usize, labels: &LabelSet) -> Self {
        let series = labels
            .labels()
            .iter()
            .map(|label| (label.clone(), VecDeque::new()))
            .collect();
        Self {
            capacity: capacity.max(1),
            series,
            time_keys: VecDeque::new(),
        }
    }

    /// Current capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Change the capacity for future appends only. Existing entries are
    /// not resized or backfilled; the next append truncates as needed.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
    }

    /// Append one accepted sample: each declared label's intensity goes to
    /// its series, and the display-time key to the shared sequence. Oldest
    /// entries beyond the capacity are dropped.
    pub fn push(&mut self, sample: &EmotionSample) {
        for (label, values) in &mut self.series {
            values.push_back(sample.intensity(label));
            while values.len() > self.capacity {
                values.pop_front();
            }
        }

        self.time_keys.push_back(display_time_key(sample.timestamp_ms));
        while self.time_keys.len() > self.capacity {
            self.time_keys.pop_front();
        }
    }

    /// Number of points currently held.
    pub fn len(&self) -> usize {
        self.time_keys.len()
    }

    /// Whether the window holds no points.
    pub fn is_empty(&self) -> bool {
        self.time_keys.is_empty()
    }

    /// A label's series, oldest-first. Empty for undeclared labels.
    pub fn series(&self, label: &str) -> Vec<f64> {
        self.series
            .get(label)
            .map(|values| values.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The shared display-time keys, oldest-first.
    pub fn time_keys(&self) -> Vec<String> {
        self.time_keys.iter().cloned().collect()
    }

    /// Drop every point. User-triggered reset only.
    pub fn clear(&mut self) {
        for values in self.series.values_mut() {
            values.clear();
        }
        self.time_keys.clear();
    }
}
