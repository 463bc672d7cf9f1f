//! Screen-frame payloads and image-format detection.
//!
//! The server mirrors the desktop by sending each captured frame as one
//! complete, independently decodable image (JPEG in practice, but the engine
//! does not assume an encoder).  A frame that fails validation is simply
//! dropped — lossy capture on the PC side produces the occasional corrupt
//! frame and the stream must survive that.
//!
//! Validation here is deliberately shallow: the engine never rasterizes
//! (rendering belongs to the UI layer), so recognizing the container by its
//! magic bytes is exactly as much decoding as this layer needs.

/// The base64-decoded body of one `type=screen, action=frame` message.
///
/// Created by the wire codec, consumed immediately by the frame reassembler,
/// and discarded after delivery.  Never buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenFramePayload {
    /// Raw image bytes, not yet validated.
    pub bytes: Vec<u8>,
}

/// Image container formats the engine recognizes in the frame stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
}

impl ImageFormat {
    /// Identifies the image container from its leading magic bytes.
    ///
    /// Returns `None` for anything unrecognized (including truncated data
    /// shorter than the signature being checked).
    pub fn sniff(bytes: &[u8]) -> Option<ImageFormat> {
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageFormat::Png);
        }
        if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }
        if bytes.starts_with(b"BM") {
            return Some(ImageFormat::Bmp);
        }
        // RIFF....WEBP — the four bytes after the chunk size spell the codec.
        if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }
        None
    }
}

/// A validated, renderable screen frame.
///
/// Produced by the frame reassembler once a payload passes format detection.
/// The UI layer hands `data` to its platform image decoder as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenFrame {
    /// Detected container format.
    pub format: ImageFormat,
    /// Complete encoded image bytes.
    pub data: Vec<u8>,
}

impl ScreenFrame {
    /// Validates a payload, consuming it on success.
    ///
    /// Returns `None` when the bytes do not start with a recognized image
    /// signature; the caller drops the payload in that case.
    pub fn validate(payload: ScreenFramePayload) -> Option<ScreenFrame> {
        let format = ImageFormat::sniff(&payload.bytes)?;
        Some(ScreenFrame {
            format,
            data: payload.bytes,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal byte sequences that begin with each container's signature.
    fn jpeg_bytes() -> Vec<u8> {
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]
    }

    fn png_bytes() -> Vec<u8> {
        vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00]
    }

    #[test]
    fn test_sniff_jpeg() {
        assert_eq!(ImageFormat::sniff(&jpeg_bytes()), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn test_sniff_png() {
        assert_eq!(ImageFormat::sniff(&png_bytes()), Some(ImageFormat::Png));
    }

    #[test]
    fn test_sniff_gif_both_versions() {
        assert_eq!(ImageFormat::sniff(b"GIF87a...."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::sniff(b"GIF89a...."), Some(ImageFormat::Gif));
    }

    #[test]
    fn test_sniff_bmp() {
        assert_eq!(ImageFormat::sniff(b"BM\x00\x00"), Some(ImageFormat::Bmp));
    }

    #[test]
    fn test_sniff_webp_requires_riff_and_codec_tag() {
        let mut bytes = b"RIFF".to_vec();
        bytes.extend_from_slice(&[0x10, 0x00, 0x00, 0x00]); // chunk size
        bytes.extend_from_slice(b"WEBP");
        assert_eq!(ImageFormat::sniff(&bytes), Some(ImageFormat::WebP));

        // RIFF container that is not WebP (e.g. WAV audio) must not match.
        let mut wav = b"RIFF".to_vec();
        wav.extend_from_slice(&[0x10, 0x00, 0x00, 0x00]);
        wav.extend_from_slice(b"WAVE");
        assert_eq!(ImageFormat::sniff(&wav), None);
    }

    #[test]
    fn test_sniff_empty_returns_none() {
        assert_eq!(ImageFormat::sniff(&[]), None);
    }

    #[test]
    fn test_sniff_truncated_signature_returns_none() {
        // First two bytes of a JPEG signature only.
        assert_eq!(ImageFormat::sniff(&[0xFF, 0xD8]), None);
    }

    #[test]
    fn test_sniff_garbage_returns_none() {
        assert_eq!(ImageFormat::sniff(b"not an image at all"), None);
    }

    #[test]
    fn test_validate_accepts_valid_payload() {
        let payload = ScreenFramePayload { bytes: png_bytes() };
        let frame = ScreenFrame::validate(payload).expect("PNG payload must validate");
        assert_eq!(frame.format, ImageFormat::Png);
        assert_eq!(frame.data, png_bytes());
    }

    #[test]
    fn test_validate_rejects_garbage_payload() {
        let payload = ScreenFramePayload {
            bytes: b"garbage".to_vec(),
        };
        assert!(ScreenFrame::validate(payload).is_none());
    }
}
