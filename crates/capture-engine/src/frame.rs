//! Raw frames and the downsampling done before transport.

use base64::Engine;

use moodlens_session_model::{FramePacket, TimestampMs};

/// Resolution frames are downsampled to before classification. The
/// inference service crops and rescales on its side, so a small frame is
/// enough and keeps the wire payload bounded.
pub const TARGET_WIDTH: u32 = 160;
pub const TARGET_HEIGHT: u32 = 120;

/// An uncompressed RGB frame from the capture source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGB8 pixels, row-major.
    pub pixels: Vec<u8>,
}

impl RawFrame {
    /// Create a frame, validating the pixel buffer length.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 3 {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Nearest-neighbor downsample to the target resolution. Frames at or
    /// below the target pass through unchanged.
    pub fn downsample(&self, target_width: u32, target_height: u32) -> RawFrame {
        if self.width <= target_width && self.height <= target_height {
            return self.clone();
        }

        let mut pixels = Vec::with_capacity((target_width * target_height * 3) as usize);
        for row in 0..target_height {
            let src_row = row as u64 * self.height as u64 / target_height as u64;
            for col in 0..target_width {
                let src_col = col as u64 * self.width as u64 / target_width as u64;
                let offset = ((src_row * self.width as u64 + src_col) * 3) as usize;
                pixels.extend_from_slice(&self.pixels[offset..offset + 3]);
            }
        }

        RawFrame {
            width: target_width,
            height: target_height,
            pixels,
        }
    }
}

/// Supplies live frames. The capture engine polls; a source without a
/// frame returns `None` and the tick is silently skipped.
pub trait FrameSource: Send {
    fn poll_frame(&mut self) -> Option<RawFrame>;
}

/// Encode a frame for the `frame` transport event.
pub fn encode_frame(frame: &RawFrame, timestamp: TimestampMs) -> FramePacket {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&frame.pixels);
    FramePacket {
        img: encoded,
        timestamp,
    }
}

/// A frame source that never has a frame. Useful for sessions driven
/// purely by an external sample feed.
#[derive(Debug, Default)]
pub struct NullFrameSource;

impl FrameSource for NullFrameSource {
    fn poll_frame(&mut self) -> Option<RawFrame> {
        None
    }
}

/// Generates a moving gradient test pattern, for simulations and tests.
#[derive(Debug)]
pub struct TestPatternSource {
    width: u32,
    height: u32,
    tick: u8,
}

impl TestPatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tick: 0,
        }
    }
}

impl FrameSource for TestPatternSource {
    fn poll_frame(&mut self) -> Option<RawFrame> {
        self.tick = self.tick.wrapping_add(1);
        let mut pixels = Vec::with_capacity((self.width * self.height * 3) as usize);
        for row in 0..self.height {
            for col in 0..self.width {
                let r = (col * 255 / self.width.max(1)) as u8;
                let g = (row * 255 / self.height.max(1)) as u8;
                pixels.extend_from_slice(&[r.wrapping_add(self.tick), g, self.tick]);
            }
        }
        RawFrame::new(self.width, self.height, pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_wrong_buffer_length() {
        assert!(RawFrame::new(2, 2, vec![0; 12]).is_some());
        assert!(RawFrame::new(2, 2, vec![0; 11]).is_none());
    }

    #[test]
    fn test_downsample_halves_dimensions() {
        let frame = RawFrame::new(4, 4, vec![128; 4 * 4 * 3]).unwrap();
        let small = frame.downsample(2, 2);
        assert_eq!(small.width, 2);
        assert_eq!(small.height, 2);
        assert_eq!(small.pixels.len(), 2 * 2 * 3);
        assert!(small.pixels.iter().all(|&p| p == 128));
    }

    #[test]
    fn test_downsample_passes_small_frames_through() {
        let frame = RawFrame::new(2, 2, vec![7; 12]).unwrap();
        let same = frame.downsample(160, 120);
        assert_eq!(same, frame);
    }

    #[test]
    fn test_encode_frame_is_base64() {
        let frame = RawFrame::new(1, 1, vec![1, 2, 3]).unwrap();
        let packet = encode_frame(&frame, 42);
        assert_eq!(packet.timestamp, 42);
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(&packet.img)
            .unwrap();
        assert_eq!(decoded, vec![1, 2, 3]);
    }

    #[test]
    fn test_test_pattern_source_yields_valid_frames() {
        let mut source = TestPatternSource::new(8, 6);
        let frame = source.poll_frame().unwrap();
        assert_eq!(frame.width, 8);
        assert_eq!(frame.pixels.len(), 8 * 6 * 3);
        // Consecutive frames differ (the pattern moves).
        let next = source.poll_frame().unwrap();
        assert_ne!(frame.pixels, next.pixels);
    }

    #[test]
    fn test_null_source_never_has_frames() {
        let mut source = NullFrameSource;
        assert!(source.poll_frame().is_none());
    }
}
