//! Run a scripted session through the full telemetry pipeline.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;

use moodlens_capture_engine::{
    EmotionSession, NullProbe, SessionDriver, SyntheticTransport, TestPatternSource,
};
use moodlens_common::config::AnalysisConfig;
use moodlens_report_engine::SessionReport;
use moodlens_session_model::{
    serialize_samples, PerformanceSnapshot, RawEmotionPayload, SessionSnapshot,
};

/// Scripted emotion waveforms: joy swells and fades, sadness mirrors it,
/// and every 13th classification comes back below the default threshold
/// to exercise the silent-drop path.
fn scripted_payload(index: usize, timestamp: i64) -> RawEmotionPayload {
    let phase = index as f64 / 8.0;
    let joy = 0.5 + 0.45 * phase.sin();
    let sadness = 0.5 - 0.45 * phase.sin();
    let surprise = 0.3 + 0.2 * (phase * 1.7).cos();
    let confidence = if index % 13 == 5 { 0.4 } else { 0.85 + 0.1 * phase.cos() };

    RawEmotionPayload::new(
        timestamp,
        [
            ("joy", joy.clamp(0.0, 1.0)),
            ("surprise", surprise.clamp(0.0, 1.0)),
            ("anger", 0.1),
            ("sadness", sadness.clamp(0.0, 1.0)),
            ("neutral", 0.25),
        ],
    )
    .with_confidence(confidence.clamp(0.0, 1.0))
}

pub async fn run(
    samples: usize,
    interval_ms: u64,
    threshold: f64,
    realtime: bool,
    json: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = AnalysisConfig {
        analysis_interval_ms: interval_ms,
        confidence_threshold: threshold,
        ..Default::default()
    };

    let snapshot = if realtime {
        run_realtime(config, samples).await?
    } else {
        run_synchronous(config, samples)?
    };

    if let Some(path) = output {
        let log = serialize_samples(&snapshot.history)?;
        std::fs::write(&path, log)
            .with_context(|| format!("Failed to write sample log to {}", path.display()))?;
        tracing::info!(path = %path.display(), samples = snapshot.history.len(), "Wrote sample log");
    }

    let report = SessionReport::from_snapshot(&snapshot);
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report.to_text());
    }

    Ok(())
}

/// Feed scripted payloads directly into the session core, one insight
/// cycle per 30 samples (the cadence the periodic timer would have at a
/// one-second capture interval).
fn run_synchronous(config: AnalysisConfig, samples: usize) -> anyhow::Result<SessionSnapshot> {
    let mut session = EmotionSession::new(config);
    let interval_ms = session.config().analysis_interval_ms as i64;
    session.start()?;

    for index in 0..samples {
        let timestamp = index as i64 * interval_ms;
        if let Some(id) = session.on_sample(scripted_payload(index, timestamp)) {
            // No timer wheel here; expire immediately to keep the
            // notification center bounded.
            session.on_notification_expired(id);
        }
        if index % 30 == 29 {
            session.on_insight_tick();
        }
    }
    session.on_insight_tick();

    Ok(session.snapshot(PerformanceSnapshot::default()))
}

/// Drive the real async pipeline with actual timers.
async fn run_realtime(config: AnalysisConfig, samples: usize) -> anyhow::Result<SessionSnapshot> {
    let interval_ms = config.clone().clamped().analysis_interval_ms;
    let (inbound_tx, inbound_rx) = mpsc::channel(64);

    let mut index = 0usize;
    let transport = SyntheticTransport::new(inbound_tx, move |timestamp| {
        let payload = scripted_payload(index, timestamp);
        index += 1;
        payload
    });

    let session = EmotionSession::new(config);
    let (driver, handle) = SessionDriver::new(
        session,
        Box::new(transport),
        Box::new(TestPatternSource::new(640, 480)),
        Box::new(NullProbe),
        inbound_rx,
    );
    let task = tokio::spawn(driver.run());

    let run_for = Duration::from_millis(interval_ms * samples as u64 + interval_ms / 2);
    tracing::info!(seconds = run_for.as_secs_f64(), "Running realtime session");
    tokio::time::sleep(run_for).await;

    handle.stop().await?;
    let snapshot = handle.export().await?;
    handle.shutdown().await?;
    task.await??;

    Ok(snapshot)
}
