//! Screen-frame validation and latest-frame retention.
//!
//! The mirroring stream delivers each screen capture as one complete
//! base64 payload, so there is no multi-part assembly — the reassembler's
//! job is to reject payloads that are not recognizable images and to keep
//! the most recent good frame available for late joiners (a viewer that
//! subscribes mid-stream can render [`latest`](FrameReassembler::latest)
//! immediately instead of waiting for the next capture).

use std::sync::Arc;

use remote_core::{ScreenFrame, ScreenFramePayload};
use tracing::{debug, trace};

/// Validates incoming frame payloads and retains the newest valid frame.
///
/// Latest-value-wins: only the most recent frame is kept, older frames are
/// never queued.
#[derive(Debug, Default)]
pub struct FrameReassembler {
    latest: Option<Arc<ScreenFrame>>,
}

impl FrameReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts one decoded payload.
    ///
    /// Returns the validated frame (also retained as the latest) when the
    /// bytes carry a recognized image signature, or `None` when the payload
    /// is dropped.  A dropped payload never disturbs the retained frame.
    pub fn accept(&mut self, payload: ScreenFramePayload) -> Option<Arc<ScreenFrame>> {
        match ScreenFrame::validate(payload) {
            Some(frame) => {
                trace!(format = ?frame.format, bytes = frame.data.len(), "screen frame accepted");
                let frame = Arc::new(frame);
                self.latest = Some(Arc::clone(&frame));
                Some(frame)
            }
            None => {
                debug!("dropping screen payload with no recognizable image signature");
                None
            }
        }
    }

    /// The most recent valid frame, if any has arrived yet.
    pub fn latest(&self) -> Option<Arc<ScreenFrame>> {
        self.latest.clone()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use remote_core::ImageFormat;

    fn jpeg_payload(filler: u8) -> ScreenFramePayload {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.extend_from_slice(&[filler; 16]);
        ScreenFramePayload { bytes }
    }

    fn garbage_payload() -> ScreenFramePayload {
        ScreenFramePayload {
            bytes: vec![0x00, 0x01, 0x02, 0x03],
        }
    }

    #[test]
    fn test_valid_frame_is_returned_and_retained() {
        let mut reassembler = FrameReassembler::new();
        let frame = reassembler.accept(jpeg_payload(0xAA)).expect("valid jpeg");
        assert_eq!(frame.format, ImageFormat::Jpeg);
        assert_eq!(reassembler.latest(), Some(frame));
    }

    #[test]
    fn test_invalid_frame_is_dropped_without_touching_latest() {
        let mut reassembler = FrameReassembler::new();
        let good = reassembler.accept(jpeg_payload(0xAA)).expect("valid jpeg");

        assert!(reassembler.accept(garbage_payload()).is_none());
        assert_eq!(reassembler.latest(), Some(good));
    }

    #[test]
    fn test_newer_frame_replaces_older() {
        let mut reassembler = FrameReassembler::new();
        reassembler.accept(jpeg_payload(0x11));
        let newer = reassembler.accept(jpeg_payload(0x22)).expect("valid jpeg");
        assert_eq!(reassembler.latest(), Some(newer));
    }

    #[test]
    fn test_one_valid_among_malformed_publishes_exactly_once() {
        // Burst of four payloads where only the third is a real image.
        let mut reassembler = FrameReassembler::new();
        let payloads = vec![
            garbage_payload(),
            ScreenFramePayload { bytes: vec![] },
            jpeg_payload(0x33),
            garbage_payload(),
        ];

        let accepted: Vec<_> = payloads
            .into_iter()
            .filter_map(|p| reassembler.accept(p))
            .collect();

        assert_eq!(accepted.len(), 1);
        assert_eq!(reassembler.latest(), Some(accepted[0].clone()));
    }

    #[test]
    fn test_latest_starts_empty() {
        assert!(FrameReassembler::new().latest().is_none());
    }
}
