//! Outbound transport seam.
//!
//! Handlers build complete frames and hand them off; addressing beyond the
//! node id byte, checksumming, retries, and acknowledgement timeouts all
//! belong to the transport behind this trait. Nothing at this layer waits
//! for delivery.

use tracing::trace;

use crate::sync::Guarded;

/// Fire-and-forget frame sink.
pub trait Transport: Send + Sync {
    /// Enqueue one encoded frame for delivery.
    fn send(&self, frame: &[u8]);
}

/// Transport stub that records every frame it is handed.
///
/// Useful in tests and as a tracing tap during bring-up.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: Guarded<Vec<Vec<u8>>>,
}

impl FrameRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        FrameRecorder::default()
    }

    /// All frames sent so far, oldest first.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.frames.lock().clone()
    }

    /// Number of frames sent so far.
    pub fn sent_count(&self) -> usize {
        self.frames.lock().len()
    }

    /// Drop all recorded frames.
    pub fn clear(&self) {
        self.frames.lock().clear();
    }
}

impl Transport for FrameRecorder {
    fn send(&self, frame: &[u8]) {
        trace!("FrameRecorder: queued frame {}", hex::encode(frame));
        self.frames.lock().push(frame.to_vec());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_keeps_frames_in_order() {
        let recorder = FrameRecorder::new();
        recorder.send(&[1, 2, 3]);
        recorder.send(&[4]);
        assert_eq!(recorder.frames(), vec![vec![1, 2, 3], vec![4]]);
        assert_eq!(recorder.sent_count(), 2);

        recorder.clear();
        assert_eq!(recorder.sent_count(), 0);
    }
}
