//! Transport to the inference service.
//!
//! The wire contract is event-based: outbound `frame` events carry a
//! [`FramePacket`], inbound `emotion` events carry a
//! [`RawEmotionPayload`]. The core mandates no reconnect or backoff
//! policy; a failing send is reported and the frame is dropped.

use async_trait::async_trait;
use tokio::sync::mpsc;

use moodlens_common::error::{MoodlensError, MoodlensResult};
use moodlens_session_model::{FramePacket, RawEmotionPayload};

/// Outbound half of the inference channel. Each session owns its own
/// transport handle; there is no shared connection.
#[async_trait]
pub trait Transport: Send {
    /// Send one frame for classification. Fire-and-forget: the caller
    /// never waits for the classification result.
    async fn send_frame(&mut self, packet: FramePacket) -> MoodlensResult<()>;
}

/// Scripted classifier used by tests and the CLI simulator.
///
/// Every sent frame is answered immediately through the inbound channel
/// with a payload produced by the script, keyed on the frame timestamp.
pub struct SyntheticTransport {
    script: Box<dyn FnMut(i64) -> RawEmotionPayload + Send>,
    inbound: mpsc::Sender<RawEmotionPayload>,
}

impl SyntheticTransport {
    /// Create a synthetic transport answering into `inbound`.
    pub fn new(
        inbound: mpsc::Sender<RawEmotionPayload>,
        script: impl FnMut(i64) -> RawEmotionPayload + Send + 'static,
    ) -> Self {
        Self {
            script: Box::new(script),
            inbound,
        }
    }
}

#[async_trait]
impl Transport for SyntheticTransport {
    async fn send_frame(&mut self, packet: FramePacket) -> MoodlensResult<()> {
        let payload = (self.script)(packet.timestamp);
        self.inbound
            .send(payload)
            .await
            .map_err(|_| MoodlensError::transport("Inbound channel closed"))
    }
}

/// A transport whose sends always fail. Used to exercise the
/// transport-unavailable path.
#[derive(Debug, Default)]
pub struct UnavailableTransport;

#[async_trait]
impl Transport for UnavailableTransport {
    async fn send_frame(&mut self, _packet: FramePacket) -> MoodlensResult<()> {
        Err(MoodlensError::transport("Inference service unreachable"))
    }
}
