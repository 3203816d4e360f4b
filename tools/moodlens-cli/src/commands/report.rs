//! Render a report from a saved JSONL sample log.

use std::path::PathBuf;

use anyhow::Context;

use moodlens_capture_engine::EmotionSession;
use moodlens_common::config::AnalysisConfig;
use moodlens_report_engine::SessionReport;
use moodlens_session_model::{parse_samples, PerformanceSnapshot, RawEmotionPayload};

pub fn run(path: PathBuf, json: bool) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read sample log {}", path.display()))?;
    let samples = parse_samples(&content)
        .with_context(|| format!("Failed to parse sample log {}", path.display()))?;

    tracing::info!(samples = samples.len(), "Replaying sample log");

    // Replay through the session core so the report reflects exactly what
    // a live session would have derived. Confidences in the log already
    // passed validation once; threshold 0 keeps the replay lossless.
    let mut session = EmotionSession::new(AnalysisConfig {
        confidence_threshold: 0.0,
        ..Default::default()
    });
    session.start()?;

    for sample in &samples {
        let payload = RawEmotionPayload {
            emotions: sample.emotions.clone(),
            confidence: Some(sample.confidence),
            timestamp: sample.timestamp_ms,
            video_time: sample.media_time_secs,
            face_detected: sample.face_detected,
        };
        if let Some(id) = session.on_sample(payload) {
            session.on_notification_expired(id);
        }
    }
    session.on_insight_tick();

    let report = SessionReport::from_snapshot(&session.snapshot(PerformanceSnapshot::default()));
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_text());
    }

    Ok(())
}
