use std::io::Cursor;

use framescan_core::source::VideoFrame;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::error::{MediaError, Result};

/// Encode an RGB frame as JPEG.
pub fn encode_jpeg(frame: &VideoFrame, quality: u8) -> Result<Vec<u8>> {
    let expected = frame.width as usize * frame.height as usize * 3;
    if frame.data.len() != expected {
        return Err(MediaError::EncoderError(format!(
            "frame data is {} bytes, expected {expected} for {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }

    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode(&frame.data, frame.width, frame.height, ExtendedColorType::Rgb8)
        .map_err(|e| MediaError::EncoderError(format!("jpeg: {e}")))?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_jpeg_magic() {
        let frame = VideoFrame {
            width: 8,
            height: 4,
            data: vec![128; 8 * 4 * 3],
            pts_secs: 0.0,
        };
        let bytes = encode_jpeg(&frame, 80).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_rejects_short_buffer() {
        let frame = VideoFrame {
            width: 8,
            height: 4,
            data: vec![0; 10],
            pts_secs: 0.0,
        };
        assert!(matches!(encode_jpeg(&frame, 80), Err(MediaError::EncoderError(_))));
    }
}
