//! Classification samples and the transport payloads they arrive in.
//!
//! The inference service answers each `frame` event with an `emotion`
//! event. `RawEmotionPayload` is that wire form, field names included;
//! `EmotionSample` is the validated, immutable form the session keeps.
//! Intensities are in `[0.0, 1.0]` per label and need not sum to 1.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Millisecond timestamp relative to the session clock epoch.
pub type TimestampMs = i64;

/// Outbound wire payload: one downsampled frame for classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramePacket {
    /// Base64-encoded downsampled frame pixels.
    pub img: String,

    /// Capture timestamp in milliseconds.
    pub timestamp: TimestampMs,
}

/// Inbound wire payload: one classification result, as received.
///
/// `confidence` is optional on the wire; the sample validator substitutes
/// a default when it is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEmotionPayload {
    /// Per-label intensities.
    pub emotions: BTreeMap<String, f64>,

    /// Classifier confidence for the whole sample, if reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    /// Capture timestamp echoed back by the service (ms).
    pub timestamp: TimestampMs,

    /// Position in the watched media, if the capture source reported one.
    #[serde(rename = "videoTime", skip_serializing_if = "Option::is_none")]
    pub video_time: Option<f64>,

    /// Whether the service found a face in the frame.
    #[serde(rename = "face_detected", skip_serializing_if = "Option::is_none")]
    pub face_detected: Option<bool>,
}

/// One accepted classification sample. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionSample {
    /// Capture timestamp in milliseconds.
    pub timestamp_ms: TimestampMs,

    /// Per-label intensities in `[0, 1]`.
    pub emotions: BTreeMap<String, f64>,

    /// Sample confidence in `[0, 1]`. Always present after validation.
    pub confidence: f64,

    /// Position in the watched media, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_time_secs: Option<f64>,

    /// Whether a face was detected in the source frame, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face_detected: Option<bool>,
}

impl EmotionSample {
    /// Create a sample from label/intensity pairs.
    pub fn new<L, I>(timestamp_ms: TimestampMs, emotions: I, confidence: f64) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, f64)>,
    {
        Self {
            timestamp_ms,
            emotions: emotions
                .into_iter()
                .map(|(label, value)| (label.into(), value))
                .collect(),
            confidence,
            media_time_secs: None,
            face_detected: None,
        }
    }

    /// Intensity of a label, 0 when the sample does not carry it.
    pub fn intensity(&self, label: &str) -> f64 {
        self.emotions.get(label).copied().unwrap_or(0.0)
    }

    /// Timestamp as fractional seconds since session start.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ms as f64 / 1_000.0
    }
}

impl RawEmotionPayload {
    /// Create a payload carrying only emotions and a timestamp.
    pub fn new<L, I>(timestamp: TimestampMs, emotions: I) -> Self
    where
        L: Into<String>,
        I: IntoIterator<Item = (L, f64)>,
    {
        Self {
            emotions: emotions
                .into_iter()
                .map(|(label, value)| (label.into(), value))
                .collect(),
            confidence: None,
            timestamp,
            video_time: None,
            face_detected: None,
        }
    }

    /// Attach a confidence score.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// Parse samples from JSONL content (one JSON object per line).
pub fn parse_samples(jsonl: &str) -> Result<Vec<EmotionSample>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize samples to JSONL format.
pub fn serialize_samples(samples: &[EmotionSample]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for sample in samples {
        output.push_str(&serde_json::to_string(sample)?);
        output.push('\n');
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_roundtrip() {
        let sample = EmotionSample::new(1_000, [("joy", 0.8), ("neutral", 0.2)], 0.9);
        let json = serde_json::to_string(&sample).unwrap();
        let parsed: EmotionSample = serde_json::from_str(&json).unwrap();
        assert_eq!(sample, parsed);
    }

    #[test]
    fn test_raw_payload_wire_field_names() {
        let raw = r#"{
            "emotions": {"joy": 0.7, "sadness": 0.1},
            "confidence": 0.85,
            "timestamp": 4200,
            "videoTime": 12.5,
            "face_detected": true
        }"#;

        let payload: RawEmotionPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.timestamp, 4_200);
        assert_eq!(payload.confidence, Some(0.85));
        assert_eq!(payload.video_time, Some(12.5));
        assert_eq!(payload.face_detected, Some(true));
        assert!((payload.emotions["joy"] - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_raw_payload_confidence_optional() {
        let raw = r#"{"emotions": {"neutral": 1.0}, "timestamp": 0}"#;
        let payload: RawEmotionPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.confidence, None);
        assert_eq!(payload.video_time, None);
    }

    #[test]
    fn test_intensity_missing_label_is_zero() {
        let sample = EmotionSample::new(0, [("joy", 0.4)], 0.9);
        assert_eq!(sample.intensity("anger"), 0.0);
        assert!((sample.intensity("joy") - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_jsonl_roundtrip() {
        let samples = vec![
            EmotionSample::new(0, [("joy", 0.5)], 0.9),
            EmotionSample::new(1_000, [("sadness", 0.3)], 0.8),
        ];
        let jsonl = serialize_samples(&samples).unwrap();
        let parsed = parse_samples(&jsonl).unwrap();
        assert_eq!(samples, parsed);
    }

    #[test]
    fn test_parse_samples_skips_comment_lines() {
        let jsonl = "# session log\n{\"timestamp_ms\":0,\"emotions\":{\"joy\":0.5},\"confidence\":0.9}\n";
        let parsed = parse_samples(jsonl).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].timestamp_ms, 0);
    }

    #[test]
    fn test_frame_packet_roundtrip() {
        let packet = FramePacket {
            img: "AAAA".to_string(),
            timestamp: 99,
        };
        let json = serde_json::to_string(&packet).unwrap();
        assert!(json.contains("\"img\":\"AAAA\""));
        assert!(json.contains("\"timestamp\":99"));
    }
}
