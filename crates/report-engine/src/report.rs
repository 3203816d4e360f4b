//! Session report assembly and rendering.

use serde::{Deserialize, Serialize};

use moodlens_analytics_core::dominant_emotion;
use moodlens_common::error::MoodlensResult;
use moodlens_session_model::{
    EmotionSample, LabelSet, PerformanceSnapshot, SessionSnapshot, SessionStatistics,
};

/// Maximum entries in the report's recent-history listing.
pub const RECENT_HISTORY_LIMIT: usize = 20;

/// Maximum entries in the report's confidence-peak listing.
pub const PEAK_LIMIT: usize = 10;

/// One history entry as it appears in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Capture timestamp in milliseconds since session start.
    pub timestamp_ms: i64,

    /// Dominant label of the sample, when it carried any intensities.
    pub dominant: Option<String>,

    /// Intensity of the dominant label.
    pub intensity: f64,

    /// Sample confidence.
    pub confidence: f64,
}

/// An exportable session document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// When this report was generated (ISO 8601).
    pub generated_at: String,

    /// When the session started (ISO 8601).
    pub session_started_at: String,

    /// Total accepted samples over the session lifetime.
    pub sample_count: usize,

    /// Derived duration: `sample_count × interval_secs / 60`.
    pub duration_minutes: f64,

    /// Declared labels in canonical order.
    pub labels: Vec<String>,

    /// Derived per-label and buffer-wide statistics.
    pub statistics: SessionStatistics,

    /// Insight list from the most recent generation cycle.
    pub insights: Vec<String>,

    /// Collaborator-supplied performance snapshot.
    pub performance: PerformanceSnapshot,

    /// Bounded recent-history listing, newest-first.
    pub recent_history: Vec<HistoryEntry>,

    /// Bounded listing of confidence peaks (confidence > 0.8), newest-first.
    pub peaks: Vec<HistoryEntry>,
}

impl SessionReport {
    /// Assemble a report from a session snapshot.
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        let labels = LabelSet::new(snapshot.labels.iter().cloned());

        let recent_history: Vec<HistoryEntry> = snapshot
            .history
            .iter()
            .rev()
            .take(RECENT_HISTORY_LIMIT)
            .map(|sample| history_entry(sample, &labels))
            .collect();

        let peaks: Vec<HistoryEntry> = snapshot
            .history
            .iter()
            .rev()
            .filter(|sample| {
                sample.confidence > moodlens_analytics_core::PEAK_CONFIDENCE_THRESHOLD
            })
            .take(PEAK_LIMIT)
            .map(|sample| history_entry(sample, &labels))
            .collect();

        tracing::debug!(
            samples = snapshot.sample_count,
            recent = recent_history.len(),
            peaks = peaks.len(),
            "Assembled session report"
        );

        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            session_started_at: snapshot.started_at.clone(),
            sample_count: snapshot.sample_count,
            duration_minutes: snapshot.sample_count as f64 * snapshot.interval_secs / 60.0,
            labels: snapshot.labels.clone(),
            statistics: snapshot.statistics.clone(),
            insights: snapshot.insights.clone(),
            performance: snapshot.performance,
            recent_history,
            peaks,
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> MoodlensResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Render as a sectioned plain-text report.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        out.push_str("MoodLens Session Report\n");
        out.push_str("=======================\n\n");

        out.push_str("Session\n-------\n");
        out.push_str(&format!("Generated:    {}\n", self.generated_at));
        out.push_str(&format!("Started:      {}\n", self.session_started_at));
        out.push_str(&format!("Samples:      {}\n", self.sample_count));
        out.push_str(&format!(
            "Duration:     {:.1} minutes (derived)\n\n",
            self.duration_minutes
        ));

        out.push_str("Statistics\n----------\n");
        if self.labels.is_empty() {
            out.push_str("(no labels declared)\n");
        }
        for label in &self.labels {
            let stats = self.statistics.label(label);
            out.push_str(&format!(
                "{label:<12} avg {:.3}  max {:.3}  trend {:+.3}\n",
                stats.average, stats.maximum, stats.trend
            ));
        }
        out.push_str(&format!(
            "Average confidence: {:.3}\n",
            self.statistics.average_confidence
        ));
        out.push_str(&format!(
            "Confidence peaks:   {}\n\n",
            self.statistics.peak_count
        ));

        out.push_str("Insights\n--------\n");
        if self.insights.is_empty() {
            out.push_str("(none)\n");
        }
        for insight in &self.insights {
            out.push_str(&format!("- {insight}\n"));
        }
        out.push('\n');

        out.push_str("Performance\n-----------\n");
        out.push_str(&format!(
            "fps {:.1}  latency {:.0} ms  accuracy {:.2}  memory {:.1} MB  processing {:.0} ms  confidence {:.2}\n\n",
            self.performance.fps,
            self.performance.latency_ms,
            self.performance.accuracy,
            self.performance.memory_usage_mb,
            self.performance.processing_time_ms,
            self.performance.confidence,
        ));

        out.push_str("Confidence Peaks (newest first)\n-------------------------------\n");
        if self.peaks.is_empty() {
            out.push_str("(none)\n");
        }
        for entry in &self.peaks {
            let label = entry.dominant.as_deref().unwrap_or("-");
            out.push_str(&format!(
                "t={:<8} {label:<12} confidence {:.3}\n",
                entry.timestamp_ms, entry.confidence
            ));
        }
        out.push('\n');

        out.push_str("Recent History (newest first)\n-----------------------------\n");
        if self.recent_history.is_empty() {
            out.push_str("(empty session)\n");
        }
        for entry in &self.recent_history {
            let label = entry.dominant.as_deref().unwrap_or("-");
            out.push_str(&format!(
                "t={:<8} {label:<12} intensity {:.3}  confidence {:.3}\n",
                entry.timestamp_ms, entry.intensity, entry.confidence
            ));
        }

        out
    }
}

/// Chronological (ascending) timeline over the full retained history, for
/// visualization targets.
pub fn timeline(snapshot: &SessionSnapshot) -> Vec<HistoryEntry> {
    let labels = LabelSet::new(snapshot.labels.iter().cloned());
    snapshot
        .history
        .iter()
        .map(|sample| history_entry(sample, &labels))
        .collect()
}

fn history_entry(sample: &EmotionSample, labels: &LabelSet) -> HistoryEntry {
    let dominant = dominant_emotion(sample, labels);
    HistoryEntry {
        timestamp_ms: sample.timestamp_ms,
        dominant: dominant.as_ref().map(|d| d.label.clone()),
        intensity: dominant.map(|d| d.intensity).unwrap_or(0.0),
        confidence: sample.confidence,
    }
}
