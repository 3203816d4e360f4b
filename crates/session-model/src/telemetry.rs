//! Derived session telemetry types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Derived statistics for a single emotion label.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelStatistics {
    /// Mean intensity across the rolling history. 0 when empty.
    pub average: f64,

    /// Maximum intensity across the rolling history.
    pub maximum: f64,

    /// One-step finite difference: last value minus second-to-last.
    /// 0 when fewer than two samples exist.
    pub trend: f64,
}

/// Full derived statistics for a session, recomputed on every accepted
/// sample from the rolling history alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStatistics {
    /// Per-label statistics, keyed by declared label.
    pub labels: BTreeMap<String, LabelStatistics>,

    /// Number of samples the statistics were derived from.
    pub sample_count: usize,

    /// Mean confidence across the rolling history. 0 when empty.
    pub average_confidence: f64,

    /// Samples whose confidence exceeds the peak threshold (0.8).
    pub peak_count: usize,
}

impl SessionStatistics {
    /// Statistics for a label, zeroed when the label was never observed.
    pub fn label(&self, label: &str) -> LabelStatistics {
        self.labels.get(label).copied().unwrap_or_default()
    }
}

/// Severity of a transient notification. Serialized as `type` to match
/// the display surface contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSeverity {
    Info,
    Warning,
    Alert,
}

/// A transient notification handed to the display surface. The core
/// produces and expires these; it never renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Session-unique id, used to target the scheduled expiry.
    pub id: u64,

    /// Human-readable message.
    pub message: String,

    /// Display severity.
    #[serde(rename = "type")]
    pub severity: NotificationSeverity,
}

/// Runtime performance snapshot supplied by an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    /// Frames processed per second.
    pub fps: f64,

    /// Round-trip latency to the inference service in milliseconds.
    pub latency_ms: f64,

    /// Reported classifier accuracy in `[0, 1]`.
    pub accuracy: f64,

    /// Resident memory in megabytes.
    pub memory_usage_mb: f64,

    /// Per-frame processing time in milliseconds.
    pub processing_time_ms: f64,

    /// Rolling mean confidence as seen by the collaborator.
    pub confidence: f64,
}

/// Point-in-time view of a session, handed to the exporter.
///
/// Carries everything a report needs so the exporter never touches live
/// session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Wall-clock time the session started (ISO 8601).
    pub started_at: String,

    /// Total accepted samples over the session lifetime (not capped by
    /// the rolling-history capacity).
    pub sample_count: usize,

    /// Configured capture interval in fractional seconds.
    pub interval_secs: f64,

    /// Declared labels in canonical order.
    pub labels: Vec<String>,

    /// Statistics derived from the current rolling history.
    pub statistics: SessionStatistics,

    /// Insight list from the most recent generation cycle.
    pub insights: Vec<String>,

    /// Collaborator-supplied performance snapshot.
    pub performance: PerformanceSnapshot,

    /// Rolling-history contents, oldest-first.
    pub history: Vec<crate::sample::EmotionSample>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_label_statistics_are_zeroed() {
        let stats = SessionStatistics::default();
        let label = stats.label("joy");
        assert_eq!(label.average, 0.0);
        assert_eq!(label.maximum, 0.0);
        assert_eq!(label.trend, 0.0);
    }

    #[test]
    fn test_notification_severity_serializes_as_type() {
        let notification = Notification {
            id: 7,
            message: "High confidence joy detected (90%)".to_string(),
            severity: NotificationSeverity::Alert,
        };
        let json = serde_json::to_string(&notification).unwrap();
        assert!(json.contains("\"type\":\"alert\""));
        assert!(json.contains("\"id\":7"));
    }

    #[test]
    fn test_performance_snapshot_roundtrip() {
        let snapshot = PerformanceSnapshot {
            fps: 1.0,
            latency_ms: 120.0,
            accuracy: 0.91,
            memory_usage_mb: 48.0,
            processing_time_ms: 35.0,
            confidence: 0.88,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: PerformanceSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, parsed);
    }
}
