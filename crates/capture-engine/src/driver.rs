//! Async driver: timers, transport plumbing, and the command surface.
//!
//! The driver owns the capture and insight timers plus the inbound
//! classification channel, and feeds `EmotionSession` one event at a
//! time. Stopping cancels the timers only; the event loop keeps draining
//! notification expiries and commands until shutdown, so scheduled
//! expiries always run to completion.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use moodlens_common::config::AnalysisConfig;
use moodlens_common::error::{MoodlensError, MoodlensResult};
use moodlens_session_model::{Notification, RawEmotionPayload, SessionSnapshot};

use moodlens_analytics_core::NOTIFICATION_TTL_MS;

use crate::frame::FrameSource;
use crate::probe::PerformanceProbe;
use crate::session::{EmotionSession, SessionState};
use crate::transport::Transport;

/// Period of the insight generation cycle.
pub const INSIGHT_INTERVAL_SECS: u64 = 30;

/// Commands accepted by a running driver.
enum SessionCommand {
    Stop,
    Clear,
    ApplySettings(AnalysisConfig),
    Export(oneshot::Sender<SessionSnapshot>),
    ActiveNotifications(oneshot::Sender<Vec<Notification>>),
    Shutdown,
}

/// Handle for controlling a driven session from outside the event loop.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Stop capture and insight timers. Buffers are kept.
    pub async fn stop(&self) -> MoodlensResult<()> {
        self.send(SessionCommand::Stop).await
    }

    /// Explicit user reset of all session buffers.
    pub async fn clear(&self) -> MoodlensResult<()> {
        self.send(SessionCommand::Clear).await
    }

    /// Apply changed settings from the settings store.
    pub async fn apply_settings(&self, settings: AnalysisConfig) -> MoodlensResult<()> {
        self.send(SessionCommand::ApplySettings(settings)).await
    }

    /// Take a point-in-time snapshot for the exporter.
    pub async fn export(&self) -> MoodlensResult<SessionSnapshot> {
        let (reply, receive) = oneshot::channel();
        self.send(SessionCommand::Export(reply)).await?;
        receive
            .await
            .map_err(|_| MoodlensError::session("Session ended before export completed"))
    }

    /// Currently visible notifications, for the display surface.
    pub async fn active_notifications(&self) -> MoodlensResult<Vec<Notification>> {
        let (reply, receive) = oneshot::channel();
        self.send(SessionCommand::ActiveNotifications(reply)).await?;
        receive
            .await
            .map_err(|_| MoodlensError::session("Session ended before query completed"))
    }

    /// Tear the session down. Ends the event loop.
    pub async fn shutdown(&self) -> MoodlensResult<()> {
        self.send(SessionCommand::Shutdown).await
    }

    async fn send(&self, command: SessionCommand) -> MoodlensResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| MoodlensError::session("Session event loop has ended"))
    }
}

/// Runs a session's cooperative event loop.
pub struct SessionDriver {
    session: EmotionSession,
    transport: Box<dyn Transport>,
    frames: Box<dyn FrameSource>,
    probe: Box<dyn PerformanceProbe>,
    inbound: mpsc::Receiver<RawEmotionPayload>,
    commands: mpsc::Receiver<SessionCommand>,
    expiry_tx: mpsc::Sender<u64>,
    expiry_rx: mpsc::Receiver<u64>,
}

impl SessionDriver {
    /// Assemble a driver around a session and its collaborators.
    /// `inbound` is the channel the transport delivers classifications on.
    pub fn new(
        session: EmotionSession,
        transport: Box<dyn Transport>,
        frames: Box<dyn FrameSource>,
        probe: Box<dyn PerformanceProbe>,
        inbound: mpsc::Receiver<RawEmotionPayload>,
    ) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (expiry_tx, expiry_rx) = mpsc::channel(64);
        (
            Self {
                session,
                transport,
                frames,
                probe,
                inbound,
                commands: command_rx,
                expiry_tx,
                expiry_rx,
            },
            SessionHandle {
                commands: command_tx,
            },
        )
    }

    /// Run the event loop until shutdown.
    pub async fn run(mut self) -> MoodlensResult<()> {
        self.session.start()?;

        let mut capture_period = self.session.config().analysis_interval_ms;
        let mut capture = tokio::time::interval(Duration::from_millis(capture_period));
        capture.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut insight = tokio::time::interval(Duration::from_secs(INSIGHT_INTERVAL_SECS));
        insight.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            let running = self.session.state() == SessionState::Running;
            tokio::select! {
                _ = capture.tick(), if running => {
                    self.handle_capture_tick().await;
                }
                _ = insight.tick(), if running => {
                    self.session.on_insight_tick();
                }
                Some(payload) = self.inbound.recv() => {
                    if let Some(id) = self.session.on_sample(payload) {
                        self.schedule_expiry(id);
                    }
                }
                Some(id) = self.expiry_rx.recv() => {
                    self.session.on_notification_expired(id);
                }
                command = self.commands.recv() => {
                    match command {
                        Some(SessionCommand::Stop) => {
                            if let Err(err) = self.session.stop() {
                                tracing::warn!(error = %err, "Stop command ignored");
                            }
                        }
                        Some(SessionCommand::Clear) => self.session.clear(),
                        Some(SessionCommand::ApplySettings(settings)) => {
                            self.session.apply_settings(settings);
                            let period = self.session.config().analysis_interval_ms;
                            if period != capture_period {
                                capture_period = period;
                                capture =
                                    tokio::time::interval(Duration::from_millis(capture_period));
                                capture.set_missed_tick_behavior(
                                    tokio::time::MissedTickBehavior::Skip,
                                );
                            }
                        }
                        Some(SessionCommand::Export(reply)) => {
                            let snapshot = self.session.snapshot(self.probe.snapshot());
                            let _ = reply.send(snapshot);
                        }
                        Some(SessionCommand::ActiveNotifications(reply)) => {
                            let _ = reply.send(self.session.notifications().to_vec());
                        }
                        Some(SessionCommand::Shutdown) | None => {
                            tracing::info!("Session driver shutting down");
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    async fn handle_capture_tick(&mut self) {
        let frame = self.frames.poll_frame();
        let Some(packet) = self.session.on_capture_tick(frame) else {
            return;
        };

        match self.transport.send_frame(packet).await {
            Ok(()) => self.session.on_transport_success(),
            Err(err) => {
                tracing::warn!(error = %err, "Frame send failed, dropping frame");
                if let Some(id) = self.session.on_transport_failure() {
                    self.schedule_expiry(id);
                }
            }
        }
    }

    /// Schedule the fixed-duration removal of a posted notification.
    /// The timer outlives `stop`; only shutdown abandons it.
    fn schedule_expiry(&self, id: u64) {
        let expiry_tx = self.expiry_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(NOTIFICATION_TTL_MS)).await;
            let _ = expiry_tx.send(id).await;
        });
    }
}
