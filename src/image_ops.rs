//! Image encoding operations.

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

use crate::error::{CamError, Result};

/// JPEG quality used for snapshots and stream frames.
pub const JPEG_QUALITY: u8 = 80;

/// Encode a decoded camera frame as JPEG bytes.
///
/// # Errors
///
/// Returns [`CamError::EncodeFailed`] if the encoder rejects the frame.
pub fn encode_jpeg(frame: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    encoder
        .encode_image(frame)
        .map_err(|e| CamError::EncodeFailed(e.to_string()))?;
    Ok(buf)
}
