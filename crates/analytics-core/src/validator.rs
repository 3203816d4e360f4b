//! Inbound sample validation and normalization.

use moodlens_session_model::{EmotionSample, RawEmotionPayload};

/// Confidence substituted when the service omits the field, so downstream
/// statistics stay populated.
pub const DEFAULT_CONFIDENCE: f64 = 0.9;

/// Filters and normalizes raw classification payloads.
///
/// Rejection is silent and all-or-nothing: a sample below the confidence
/// threshold leaves no trace in the rolling history or the chart window.
#[derive(Debug, Clone)]
pub struct SampleValidator {
    confidence_threshold: f64,
}

impl SampleValidator {
    /// Create a validator with the session's confidence threshold.
    pub fn new(confidence_threshold: f64) -> Self {
        Self {
            confidence_threshold: confidence_threshold.clamp(0.0, 1.0),
        }
    }

    /// The active threshold.
    pub fn confidence_threshold(&self) -> f64 {
        self.confidence_threshold
    }

    /// Validate a raw payload into an accepted sample.
    ///
    /// Returns `None` when the payload's reported confidence falls below
    /// the threshold. A missing confidence is substituted with
    /// [`DEFAULT_CONFIDENCE`]; intensities are clamped into `[0, 1]`.
    pub fn normalize(&self, payload: RawEmotionPayload) -> Option<EmotionSample> {
        if let Some(confidence) = payload.confidence {
            if confidence < self.confidence_threshold {
                tracing::trace!(
                    confidence,
                    threshold = self.confidence_threshold,
                    "Discarding low-confidence sample"
                );
                return None;
            }
        }

        let confidence = payload
            .confidence
            .unwrap_or(DEFAULT_CONFIDENCE)
            .clamp(0.0, 1.0);

        let emotions = payload
            .emotions
            .into_iter()
            .map(|(label, value)| (label, value.clamp(0.0, 1.0)))
            .collect();

        Some(EmotionSample {
            timestamp_ms: payload.timestamp,
            emotions,
            confidence,
            media_time_secs: payload.video_time,
            face_detected: payload.face_detected,
        })
    }
}
