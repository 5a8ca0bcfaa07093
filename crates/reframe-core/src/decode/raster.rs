//! Raster image decoding via the `image` crate.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};

use super::{DecodeError, Surface};

/// Decode image bytes into an RGBA surface.
///
/// The container format is sniffed from the byte content; `declared_mime`
/// (as reported by the host's file-selection mechanism) is only consulted
/// as a fallback hint when sniffing fails. For animated formats (GIF) the
/// first frame is decoded.
///
/// The returned surface owns its pixel buffer; no reference to `bytes` is
/// retained.
///
/// # Errors
///
/// Returns `DecodeError::Unsupported` if the bytes are not in any
/// recognized image format, and `DecodeError::Corrupt` if the container
/// was recognized but the pixel data could not be decoded or describes a
/// zero-dimension image.
pub fn decode(bytes: &[u8], declared_mime: Option<&str>) -> Result<Surface, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::Corrupt(e.to_string()))?;

    let reader = if reader.format().is_some() {
        reader
    } else {
        // Content sniffing failed; fall back to the caller's declared type.
        let hinted = declared_mime
            .and_then(ImageFormat::from_mime_type)
            .ok_or(DecodeError::Unsupported)?;
        let mut fallback = ImageReader::new(Cursor::new(bytes));
        fallback.set_format(hinted);
        fallback
    };

    let img = reader.decode().map_err(map_image_error)?;
    let rgba = img.into_rgba8();

    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(DecodeError::Corrupt("zero-dimension image".to_string()));
    }

    Ok(Surface::from_rgba_image(rgba))
}

fn map_image_error(err: image::ImageError) -> DecodeError {
    match err {
        image::ImageError::Unsupported(_) => DecodeError::Unsupported,
        other => DecodeError::Corrupt(other.to_string()),
    }
}
