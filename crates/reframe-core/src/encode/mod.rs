//! Encoding stage of the export pipeline.
//!
//! Serializes a raster surface into the requested container format:
//! - JPEG and PNG via the `image` crate encoders
//! - WebP via libwebp (`webp` crate), lossy or lossless
//! - PDF as a hand-built minimal single-page document wrapping an image
//!   XObject
//!
//! # Quality semantics
//!
//! Quality is a single `f32` in `[0.0, 1.0]`. Values outside the range
//! (including non-finite values) are clamped to the nearest bound rather
//! than rejected; that is a documented resolution of a caller contract
//! violation, not silent behavior. PNG ignores quality entirely. WebP
//! switches to lossless encoding at `quality >= 0.999`.
//!
//! Every encoder is byte-deterministic: no timestamps, no random seeds.

mod jpeg;
mod pdf;
mod png;
mod webp;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::Surface;

pub use jpeg::encode_jpeg;
pub use pdf::encode_pdf;
pub use png::encode_png;
pub use webp::encode_webp;

/// Lossy quality at or above this requests lossless WebP encoding.
pub(crate) const WEBP_LOSSLESS_THRESHOLD: f32 = 0.999;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The requested format name is not one the pipeline knows.
    #[error("No encoder available for format '{0}'")]
    UnsupportedFormat(String),

    /// The underlying encoder reported a failure.
    #[error("Encoder failure: {0}")]
    EncoderFailure(String),
}

/// Output container formats supported by the export pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
    Pdf,
}

impl OutputFormat {
    /// MIME type reported to the caller for download/preview wiring.
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Pdf => "application/pdf",
        }
    }

    /// File extension used for the suggested filename.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// Parse a format name as supplied by the UI layer.
    pub fn from_name(name: &str) -> Result<Self, EncodeError> {
        match name.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::Webp),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(EncodeError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Encode a surface into the requested format.
///
/// # Errors
///
/// Returns `EncodeError::EncoderFailure` if the underlying codec rejects
/// the data. Quality out of `[0, 1]` is clamped, never an error.
pub fn encode(surface: &Surface, format: OutputFormat, quality: f32) -> Result<Vec<u8>, EncodeError> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(surface, quality),
        OutputFormat::Png => encode_png(surface),
        OutputFormat::Webp => encode_webp(surface, quality),
        OutputFormat::Pdf => encode_pdf(surface, quality),
    }
}

/// Clamp a `[0, 1]` quality to the `1..=100` scale used by the JPEG and
/// WebP encoders. Non-finite input maps to full quality.
pub(crate) fn quality_scale(quality: f32) -> u8 {
    let q = if quality.is_finite() { quality } else { 1.0 };
    let scaled = (q.clamp(0.0, 1.0) * 100.0).round() as u8;
    scaled.clamp(1, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mime_types() {
        assert_eq!(OutputFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.mime_type(), "image/png");
        assert_eq!(OutputFormat::Webp.mime_type(), "image/webp");
        assert_eq!(OutputFormat::Pdf.mime_type(), "application/pdf");
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(OutputFormat::from_name("jpeg").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_name("JPG").unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_name("png").unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_name("webp").unwrap(), OutputFormat::Webp);
        assert_eq!(OutputFormat::from_name("pdf").unwrap(), OutputFormat::Pdf);
    }

    #[test]
    fn test_format_from_unknown_name() {
        let err = OutputFormat::from_name("tiff").unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedFormat(name) if name == "tiff"));
    }

    #[test]
    fn test_quality_scale_clamps() {
        assert_eq!(quality_scale(0.0), 1); // Floor is 1, not 0
        assert_eq!(quality_scale(1.0), 100);
        assert_eq!(quality_scale(-3.0), 1);
        assert_eq!(quality_scale(1.5), 100);
        assert_eq!(quality_scale(0.8), 80);
        assert_eq!(quality_scale(f32::NAN), 100);
    }
}
