//! Session controller: owns all mutable session state.
//!
//! `EmotionSession` is a synchronous state machine. The async driver
//! feeds it one event at a time (capture ticks, inbound classifications,
//! insight ticks, notification expiries), which makes every accepted
//! sample's pipeline (validate, buffer insert, statistics recompute,
//! chart update, notification check) a single atomic unit. Two samples
//! can never interleave.

use moodlens_analytics_core::{
    chart_capacity, derive_statistics, high_intensity_alert, ChartWindow, InsightGenerator,
    NotificationCenter, RollingHistory, SampleValidator,
};
use moodlens_common::clock::SessionClock;
use moodlens_common::config::AnalysisConfig;
use moodlens_common::error::{MoodlensError, MoodlensResult};
use moodlens_session_model::{
    EmotionSample, FramePacket, LabelSet, Notification, NotificationSeverity, PerformanceSnapshot,
    RawEmotionPayload, SessionSnapshot, SessionStatistics,
};

use crate::frame::{encode_frame, RawFrame, TARGET_HEIGHT, TARGET_WIDTH};

/// How long the cosmetic "analyzing" indicator stays raised after a
/// capture tick. Display-only; carries no scheduling semantics.
pub const ANALYZING_FLASH_MS: i64 = 1_000;

/// State of an emotion-telemetry session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session created but not started.
    Idle,
    /// Capture and analysis in progress.
    Running,
    /// Timers cancelled; session state kept for export.
    Stopped,
}

/// An emotion-telemetry session.
///
/// Constructed at session start and torn down at session end; each
/// session owns its own transport handle, so independent sessions can
/// coexist.
pub struct EmotionSession {
    config: AnalysisConfig,
    labels: LabelSet,
    clock: SessionClock,
    validator: SampleValidator,
    history: RollingHistory,
    chart: ChartWindow,
    statistics: SessionStatistics,
    insight_generator: InsightGenerator,
    insights: Vec<String>,
    notifications: NotificationCenter,
    state: SessionState,
    accepted_total: usize,
    analyzing_until_ms: i64,
    transport_alerted: bool,
}

impl EmotionSession {
    /// Create a session from (clamped) analysis settings.
    pub fn new(config: AnalysisConfig) -> Self {
        let config = config.clamped();
        let labels = LabelSet::new(config.labels.iter().cloned());
        let chart = ChartWindow::new(
            chart_capacity(config.time_range_seconds, config.analysis_interval_ms),
            &labels,
        );
        let history = RollingHistory::new(config.history_capacity);
        let validator = SampleValidator::new(config.confidence_threshold);
        let statistics = derive_statistics(&[], &labels);

        Self {
            config,
            labels,
            clock: SessionClock::start(),
            validator,
            history,
            chart,
            statistics,
            insight_generator: InsightGenerator::default(),
            insights: Vec::new(),
            notifications: NotificationCenter::new(),
            state: SessionState::Idle,
            accepted_total: 0,
            analyzing_until_ms: 0,
            transport_alerted: false,
        }
    }

    /// Begin capturing.
    pub fn start(&mut self) -> MoodlensResult<()> {
        if self.state != SessionState::Idle {
            return Err(MoodlensError::session("Session already started"));
        }
        tracing::info!(
            interval_ms = self.config.analysis_interval_ms,
            labels = self.labels.len(),
            history_capacity = self.history.capacity(),
            "Starting emotion session"
        );
        self.state = SessionState::Running;
        Ok(())
    }

    /// Stop capturing. Buffers are kept; clearing them is a separate,
    /// explicit action.
    pub fn stop(&mut self) -> MoodlensResult<()> {
        if self.state != SessionState::Running {
            return Err(MoodlensError::session("Session not running"));
        }
        tracing::info!(
            accepted = self.accepted_total,
            elapsed_secs = self.clock.elapsed_secs(),
            "Stopping emotion session"
        );
        self.state = SessionState::Stopped;
        Ok(())
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// One capture tick. Returns the packet to send, or `None` when the
    /// session is not running or the source has no live frame (a silent
    /// skip, not an error).
    pub fn on_capture_tick(&mut self, frame: Option<RawFrame>) -> Option<FramePacket> {
        if self.state != SessionState::Running {
            return None;
        }

        let Some(frame) = frame else {
            tracing::trace!("No live frame at capture tick, skipping");
            return None;
        };

        let timestamp = self.clock.elapsed_ms();
        self.analyzing_until_ms = timestamp + ANALYZING_FLASH_MS;

        let downsampled = frame.downsample(TARGET_WIDTH, TARGET_HEIGHT);
        Some(encode_frame(&downsampled, timestamp))
    }

    /// Whether the cosmetic "analyzing" indicator is currently raised.
    pub fn is_analyzing(&self) -> bool {
        self.clock.elapsed_ms() < self.analyzing_until_ms
    }

    /// Process one inbound classification payload.
    ///
    /// Rejection is silent. On acceptance, the history insert, statistics
    /// recompute, chart update, and notification check happen before this
    /// returns. The returned id, if any, is a freshly posted notification
    /// the caller must schedule an expiry for.
    pub fn on_sample(&mut self, payload: RawEmotionPayload) -> Option<u64> {
        if self.state != SessionState::Running {
            tracing::trace!("Dropping classification for non-running session");
            return None;
        }

        let sample = self.validator.normalize(payload)?;

        self.history.push(sample.clone());
        self.chart.push(&sample);
        self.accepted_total += 1;

        let samples: Vec<&EmotionSample> = self.history.iter().collect();
        self.statistics = derive_statistics(&samples, &self.labels);

        high_intensity_alert(&sample, &self.labels)
            .map(|message| self.notifications.post(message, NotificationSeverity::Alert))
    }

    /// One insight cycle. A gated cycle leaves the previous list standing.
    pub fn on_insight_tick(&mut self) {
        if self.state != SessionState::Running {
            return;
        }
        if let Some(insights) =
            self.insight_generator
                .generate(&self.history, &self.labels, self.config.show_insights)
        {
            tracing::debug!(count = insights.len(), "Insight cycle produced new list");
            self.insights = insights;
        }
    }

    /// Scheduled removal of a notification.
    pub fn on_notification_expired(&mut self, id: u64) {
        self.notifications.expire(id);
    }

    /// A frame send failed. The first failure posts one user-visible
    /// warning; further failures stay silent until a send succeeds again.
    pub fn on_transport_failure(&mut self) -> Option<u64> {
        if self.transport_alerted {
            return None;
        }
        self.transport_alerted = true;
        Some(self.notifications.post(
            "Unable to reach the analysis service; frames are being dropped",
            NotificationSeverity::Warning,
        ))
    }

    /// A frame send succeeded; re-arm the transport warning.
    pub fn on_transport_success(&mut self) {
        self.transport_alerted = false;
    }

    /// User-triggered reset: drop history, chart, statistics, insights,
    /// and the accepted-sample counter. Never implied by `stop`.
    pub fn clear(&mut self) {
        tracing::info!(dropped = self.history.len(), "Clearing session buffers");
        self.history.clear();
        self.chart.clear();
        self.insights.clear();
        self.accepted_total = 0;
        self.statistics = derive_statistics(&[], &self.labels);
    }

    /// Apply changed settings from the settings store.
    ///
    /// The label set and history capacity are fixed at session start;
    /// changes to them are ignored with a warning. Chart capacity changes
    /// apply to future appends only.
    pub fn apply_settings(&mut self, settings: AnalysisConfig) {
        let settings = settings.clamped();

        if settings.labels != self.config.labels {
            tracing::warn!("Label set is fixed at session start; ignoring change");
        }
        if settings.history_capacity != self.config.history_capacity {
            tracing::warn!("History capacity is fixed at session start; ignoring change");
        }

        self.config.confidence_threshold = settings.confidence_threshold;
        self.validator = SampleValidator::new(settings.confidence_threshold);
        self.config.show_insights = settings.show_insights;
        self.config.analysis_interval_ms = settings.analysis_interval_ms;
        self.config.time_range_seconds = settings.time_range_seconds;
        self.chart.set_capacity(chart_capacity(
            self.config.time_range_seconds,
            self.config.analysis_interval_ms,
        ));
    }

    /// Point-in-time snapshot for the exporter.
    pub fn snapshot(&self, performance: PerformanceSnapshot) -> SessionSnapshot {
        SessionSnapshot {
            started_at: self.clock.epoch_wall().to_string(),
            sample_count: self.accepted_total,
            interval_secs: self.config.interval_secs(),
            labels: self.labels.labels().to_vec(),
            statistics: self.statistics.clone(),
            insights: self.insights.clone(),
            performance,
            history: self.history.snapshot(),
        }
    }

    /// Effective (clamped) session settings.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The session's declared labels.
    pub fn labels(&self) -> &LabelSet {
        &self.labels
    }

    /// Statistics derived from the current rolling history.
    pub fn statistics(&self) -> &SessionStatistics {
        &self.statistics
    }

    /// Insight list from the most recent generation cycle.
    pub fn insights(&self) -> &[String] {
        &self.insights
    }

    /// Currently visible notifications.
    pub fn notifications(&self) -> &[Notification] {
        self.notifications.active()
    }

    /// Number of samples currently in the rolling history.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The visualization window.
    pub fn chart(&self) -> &ChartWindow {
        &self.chart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    fn running_session(config: AnalysisConfig) -> EmotionSession {
        let mut session = EmotionSession::new(config);
        session.start().unwrap();
        session
    }

    fn payload(timestamp: i64, joy: f64, confidence: f64) -> RawEmotionPayload {
        RawEmotionPayload::new(timestamp, [("joy", joy), ("neutral", 0.1)])
            .with_confidence(confidence)
    }

    #[test]
    fn test_start_twice_fails() {
        let mut session = running_session(config());
        assert!(session.start().is_err());
    }

    #[test]
    fn test_low_confidence_sample_leaves_no_trace() {
        let mut session = running_session(config());
        assert!(session.on_sample(payload(0, 0.9, 0.5)).is_none());
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.chart().len(), 0);
        assert_eq!(session.statistics().sample_count, 0);
    }

    #[test]
    fn test_accepted_sample_updates_history_and_chart_together() {
        let mut session = running_session(config());
        session.on_sample(payload(0, 0.6, 0.9));
        assert_eq!(session.history_len(), 1);
        assert_eq!(session.chart().len(), 1);
        assert!((session.statistics().label("joy").average - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_high_intensity_sample_posts_notification() {
        let mut session = running_session(config());
        let id = session.on_sample(payload(0, 0.9, 0.95));
        assert!(id.is_some());
        let notifications = session.notifications();
        assert_eq!(notifications.len(), 1);
        assert!(notifications[0].message.contains("joy"));
        assert!(notifications[0].message.contains("90%"));

        session.on_notification_expired(id.unwrap());
        assert!(session.notifications().is_empty());
    }

    #[test]
    fn test_moderate_sample_posts_no_notification() {
        let mut session = running_session(config());
        assert!(session.on_sample(payload(0, 0.5, 0.95)).is_none());
        assert!(session.notifications().is_empty());
    }

    #[test]
    fn test_history_eviction_at_capacity() {
        let mut session = running_session(AnalysisConfig {
            history_capacity: 100,
            ..config()
        });
        for i in 0..150 {
            session.on_sample(payload(i, 0.5, 0.9));
        }
        assert_eq!(session.history_len(), 100);
        let snapshot = session.snapshot(PerformanceSnapshot::default());
        // The 51st accepted sample carries timestamp 50.
        assert_eq!(snapshot.history.first().unwrap().timestamp_ms, 50);
        assert_eq!(snapshot.sample_count, 150);
    }

    #[test]
    fn test_stop_keeps_buffers_and_drops_late_samples() {
        let mut session = running_session(config());
        session.on_sample(payload(0, 0.6, 0.9));
        session.stop().unwrap();

        assert_eq!(session.history_len(), 1);
        assert!(session.on_sample(payload(1_000, 0.7, 0.9)).is_none());
        assert_eq!(session.history_len(), 1);
    }

    #[test]
    fn test_clear_is_explicit_and_total() {
        let mut session = running_session(config());
        for i in 0..12 {
            session.on_sample(payload(i, 0.8, 0.9));
        }
        session.on_insight_tick();
        assert!(!session.insights().is_empty());

        session.clear();
        assert_eq!(session.history_len(), 0);
        assert_eq!(session.chart().len(), 0);
        assert!(session.insights().is_empty());
        assert_eq!(session.statistics().sample_count, 0);
        assert_eq!(session.statistics().label("joy").average, 0.0);
    }

    #[test]
    fn test_insight_cycle_gated_below_min_history() {
        let mut session = running_session(config());
        for i in 0..5 {
            session.on_sample(payload(i, 0.8, 0.9));
        }
        session.on_insight_tick();
        assert!(session.insights().is_empty());
    }

    #[test]
    fn test_insight_cycle_replaces_previous_list() {
        let mut session = running_session(config());
        for i in 0..15 {
            session.on_sample(payload(i, 0.85, 0.9));
        }
        session.on_insight_tick();
        let first = session.insights().to_vec();
        assert!(first.iter().any(|s| s.contains("joy")));

        session.on_insight_tick();
        // Same data, same list; replaced wholesale rather than appended.
        assert_eq!(session.insights(), first.as_slice());
    }

    #[test]
    fn test_capture_tick_skips_without_frame() {
        let mut session = running_session(config());
        assert!(session.on_capture_tick(None).is_none());
    }

    #[test]
    fn test_capture_tick_packets_and_raises_analyzing_flag() {
        let mut session = running_session(config());
        let frame = RawFrame::new(2, 2, vec![0; 12]).unwrap();
        let packet = session.on_capture_tick(Some(frame)).unwrap();
        assert!(!packet.img.is_empty());
        assert!(session.is_analyzing());
    }

    #[test]
    fn test_transport_failure_alerts_once_until_recovery() {
        let mut session = running_session(config());
        assert!(session.on_transport_failure().is_some());
        assert!(session.on_transport_failure().is_none());
        session.on_transport_success();
        assert!(session.on_transport_failure().is_some());
    }

    #[test]
    fn test_settings_change_keeps_labels_and_capacity() {
        let mut session = running_session(config());
        let mut settings = config();
        settings.confidence_threshold = 0.4;
        settings.time_range_seconds = 60;
        settings.labels = vec!["other".to_string()];
        settings.history_capacity = 5;
        session.apply_settings(settings);

        assert!((session.config().confidence_threshold - 0.4).abs() < 1e-9);
        assert_eq!(session.config().time_range_seconds, 60);
        // Fixed-at-start parameters are untouched.
        assert_eq!(session.labels().primary(), Some("joy"));
        assert_eq!(session.config().history_capacity, 200);
    }

    #[test]
    fn test_chart_capacity_follows_time_range_change() {
        let mut session = running_session(config());
        let before = session.chart().capacity();
        let mut settings = session.config().clone();
        settings.time_range_seconds = 60;
        session.apply_settings(settings);
        assert!(session.chart().capacity() > before);
    }

    #[test]
    fn test_snapshot_of_empty_session_is_complete() {
        let session = EmotionSession::new(config());
        let snapshot = session.snapshot(PerformanceSnapshot::default());
        assert_eq!(snapshot.sample_count, 0);
        assert!(snapshot.history.is_empty());
        assert!(snapshot.insights.is_empty());
        assert_eq!(snapshot.labels.len(), 5);
        // Statistics carry zeroed entries for every declared label.
        assert_eq!(snapshot.statistics.label("joy").average, 0.0);
        assert!(!snapshot.started_at.is_empty());
    }
}
