//! Transient notifications for high-confidence dominant emotions.

use moodlens_session_model::{EmotionSample, LabelSet, Notification, NotificationSeverity};

use crate::dominant::dominant_emotion;

/// Dominant intensity above which a sample triggers an alert.
pub const HIGH_INTENSITY_THRESHOLD: f64 = 0.8;

/// How long a notification stays visible before its scheduled removal.
pub const NOTIFICATION_TTL_MS: u64 = 3_000;

/// Alert message for a sample whose dominant intensity exceeds the
/// threshold, naming the emotion and its rounded percentage.
pub fn high_intensity_alert(sample: &EmotionSample, labels: &LabelSet) -> Option<String> {
    let dominant = dominant_emotion(sample, labels)?;
    if dominant.intensity <= HIGH_INTENSITY_THRESHOLD {
        return None;
    }
    let percent = (dominant.intensity * 100.0).round() as i64;
    Some(format!(
        "High intensity {} detected ({percent}%)",
        dominant.label
    ))
}

/// Holds the currently visible notifications and allocates their ids.
///
/// Expiry is time-driven: the session driver schedules a removal
/// [`NOTIFICATION_TTL_MS`] after posting, independent of later events.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    next_id: u64,
    active: Vec<Notification>,
}

impl NotificationCenter {
    /// Create an empty center.
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a notification, returning its id for the scheduled expiry.
    pub fn post(&mut self, message: impl Into<String>, severity: NotificationSeverity) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let message = message.into();
        tracing::debug!(id, %message, "Posting notification");
        self.active.push(Notification {
            id,
            message,
            severity,
        });
        id
    }

    /// Remove a notification by id. Returns whether it was still active.
    pub fn expire(&mut self, id: u64) -> bool {
        let before = self.active.len();
        self.active.retain(|notification| notification.id != id);
        before != self.active.len()
    }

    /// Currently visible notifications, oldest-first.
    pub fn active(&self) -> &[Notification] {
        &self.active
    }
}
