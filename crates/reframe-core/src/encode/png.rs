//! PNG encoding for export.
//!
//! PNG is lossless and preserves the alpha channel; the pipeline's quality
//! parameter does not apply here.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use super::EncodeError;
use crate::decode::Surface;

/// Encode a surface to PNG bytes (RGBA, lossless).
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut buffer);
    encoder
        .write_image(
            &surface.pixels,
            surface.width,
            surface.height,
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| EncodeError::EncoderFailure(e.to_string()))?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn gradient_with_alpha(width: u32, height: u32) -> Surface {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push((x * 255 / width.max(1)) as u8);
                pixels.push((y * 255 / height.max(1)) as u8);
                pixels.push(64);
                pixels.push(((x + y) % 256) as u8);
            }
        }
        Surface::new(width, height, pixels)
    }

    #[test]
    fn test_encode_png_magic() {
        let surface = gradient_with_alpha(16, 16);
        let png = encode_png(&surface).unwrap();
        assert_eq!(&png[0..8], PNG_MAGIC);
    }

    #[test]
    fn test_round_trip_is_pixel_identical() {
        // The lossless law: encode then decode yields the exact buffer,
        // alpha included.
        let surface = gradient_with_alpha(32, 17);
        let png = encode_png(&surface).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.dimensions(), (32, 17));
        assert_eq!(decoded.into_raw(), surface.pixels);
    }

    #[test]
    fn test_round_trip_extreme_alpha_values() {
        // Zero-alpha pixels keep their color channels through PNG.
        let pixels = vec![
            200, 100, 50, 0, //
            1, 2, 3, 255, //
            255, 255, 255, 1, //
            0, 0, 0, 254,
        ];
        let surface = Surface::new(2, 2, pixels.clone());
        let png = encode_png(&surface).unwrap();

        let decoded = image::load_from_memory(&png).unwrap().into_rgba8();
        assert_eq!(decoded.into_raw(), pixels);
    }

    #[test]
    fn test_deterministic() {
        let surface = gradient_with_alpha(24, 24);
        let a = encode_png(&surface).unwrap();
        let b = encode_png(&surface).unwrap();
        assert_eq!(a, b);
    }
}
