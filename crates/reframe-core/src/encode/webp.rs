//! WebP encoding for export.
//!
//! Uses libwebp via the `webp` crate: the `image` crate's own WebP encoder
//! is lossless-only, and the export flow needs the lossy path where the
//! quality slider actually matters. Alpha is preserved in both modes.

use webp::Encoder;

use super::{quality_scale, EncodeError, WEBP_LOSSLESS_THRESHOLD};
use crate::decode::Surface;

/// Encode a surface to WebP bytes.
///
/// Quality follows the JPEG mapping (`[0, 1]` clamped onto `1..=100`),
/// except that `quality >= 0.999` requests lossless encoding instead.
pub fn encode_webp(surface: &Surface, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let lossless = !quality.is_finite() || quality >= WEBP_LOSSLESS_THRESHOLD;
    let scale = f32::from(quality_scale(quality));

    let encoder = Encoder::from_rgba(&surface.pixels, surface.width, surface.height);
    let memory = encoder
        .encode_simple(lossless, scale)
        .map_err(|e| EncodeError::EncoderFailure(format!("{e:?}")))?;

    Ok(memory.to_vec())
}
