//! JPEG encoding for export.
//!
//! JPEG has no alpha channel, so surfaces are flattened onto an opaque
//! **white** background before encoding (the documented fixed rule; matte
//! color is not configurable).

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::{quality_scale, EncodeError};
use crate::decode::Surface;

/// Encode a surface to JPEG bytes.
///
/// Quality maps linearly from `[0, 1]` to the encoder's `1..=100` scale;
/// out-of-range values clamp to the nearest bound.
pub fn encode_jpeg(surface: &Surface, quality: f32) -> Result<Vec<u8>, EncodeError> {
    let rgb = flatten_onto_white(surface);

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality_scale(quality));
    encoder
        .write_image(&rgb, surface.width, surface.height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncoderFailure(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Composite RGBA pixels over an opaque white background, producing RGB.
pub(crate) fn flatten_onto_white(surface: &Surface) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(surface.pixel_count() as usize * 3);
    for px in surface.pixels.chunks_exact(4) {
        let a = u32::from(px[3]);
        let inv = 255 - a;
        for &c in &px[0..3] {
            // out = c * a + 255 * (1 - a), rounded
            let blended = (u32::from(c) * a + 255 * inv + 127) / 255;
            rgb.push(blended as u8);
        }
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opaque_gray(width: u32, height: u32) -> Surface {
        Surface::new(width, height, vec![128u8; (width * height * 4) as usize])
    }

    #[test]
    fn test_encode_jpeg_basic() {
        let surface = {
            let mut s = opaque_gray(64, 48);
            for px in s.pixels.chunks_exact_mut(4) {
                px[3] = 255;
            }
            s
        };

        let jpeg = encode_jpeg(&surface, 0.9).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_quality_above_one_matches_full_quality() {
        let surface = {
            let mut pixels = Vec::new();
            for i in 0..32 * 32 {
                let v = (i % 256) as u8;
                pixels.extend_from_slice(&[v, v.wrapping_mul(5), 200, 255]);
            }
            Surface::new(32, 32, pixels)
        };

        let clamped = encode_jpeg(&surface, 1.5).unwrap();
        let full = encode_jpeg(&surface, 1.0).unwrap();
        assert_eq!(clamped, full);
    }

    #[test]
    fn test_quality_affects_size() {
        let mut pixels = Vec::new();
        for i in 0u32..(64 * 64) {
            pixels.extend_from_slice(&[
                (i * 37 % 256) as u8,
                (i * 11 % 256) as u8,
                (i * 73 % 256) as u8,
                255,
            ]);
        }
        let surface = Surface::new(64, 64, pixels);

        let low = encode_jpeg(&surface, 0.1).unwrap();
        let high = encode_jpeg(&surface, 1.0).unwrap();
        assert!(high.len() > low.len());
    }

    #[test]
    fn test_flatten_fully_transparent_is_white() {
        let surface = Surface::new(2, 1, vec![10, 200, 60, 0, 0, 0, 0, 0]);
        let rgb = flatten_onto_white(&surface);
        assert_eq!(rgb, vec![255, 255, 255, 255, 255, 255]);
    }

    #[test]
    fn test_flatten_opaque_is_unchanged() {
        let surface = Surface::new(1, 1, vec![10, 200, 60, 255]);
        let rgb = flatten_onto_white(&surface);
        assert_eq!(rgb, vec![10, 200, 60]);
    }

    #[test]
    fn test_flatten_half_alpha_blends_toward_white() {
        let surface = Surface::new(1, 1, vec![0, 0, 0, 128]);
        let rgb = flatten_onto_white(&surface);
        // 0 * 0.5 + 255 * 0.5, rounded
        for c in rgb {
            assert!(c == 127 || c == 128, "channel {c}");
        }
    }

    #[test]
    fn test_deterministic() {
        let surface = opaque_gray(16, 16);
        let a = encode_jpeg(&surface, 0.8).unwrap();
        let b = encode_jpeg(&surface, 0.8).unwrap();
        assert_eq!(a, b);
    }
}
