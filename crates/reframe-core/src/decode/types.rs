//! Core types for image decoding.

use thiserror::Error;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input bytes are not in a recognized image format.
    #[error("Unsupported or unrecognized image format")]
    Unsupported,

    /// The input looked like an image but could not be decoded.
    #[error("Corrupted or incomplete image data: {0}")]
    Corrupt(String),
}

/// A decoded raster surface with RGBA pixel data.
///
/// One type serves every stage of the pipeline: the decoder produces a
/// `Surface`, the resampler consumes one and produces another, and the
/// encoders serialize one. A surface is immutable once produced and is
/// never shared between pipeline invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel, top-left origin).
    /// Length is width * height * 4.
    pub pixels: Vec<u8>,
}

impl Surface {
    /// Create a new Surface with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 4,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a Surface from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Returns true if any pixel is not fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.pixels.chunks_exact(4).any(|px| px[3] != 255)
    }

    /// Check if this is an empty/invalid surface.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
