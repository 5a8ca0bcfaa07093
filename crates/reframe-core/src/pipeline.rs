//! The export pipeline: decode, resolve geometry, resample, encode.
//!
//! One synchronous call per export. Every invocation is stateless and owns
//! its buffers exclusively, so unrelated exports can run concurrently (a
//! superseded in-flight export is cancelled by simply dropping its result).
//! There are no retries; the first failing stage aborts the invocation and
//! its classified error is returned to the caller, who owns user-facing
//! presentation.

use std::path::Path;

use thiserror::Error;

use crate::decode::{decode, DecodeError, Surface};
use crate::encode::{encode, EncodeError, OutputFormat};
use crate::geometry::{resolve, CropRect, GeometryError, TargetDimensions};
use crate::resample::{resample, ResampleError};

/// Classified failure of a single export invocation.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Resample(#[from] ResampleError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// A fully-resolved export request, owned by the caller for the duration
/// of one pipeline invocation.
///
/// `quality` is in `[0.0, 1.0]`; converting from a UI-scale slider value
/// is the caller's responsibility. An absent crop means the full source.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExportRequest {
    /// Optional crop rectangle in source-pixel coordinates.
    pub crop: Option<CropRect>,
    /// Output dimensions; aspect ratio is not matched to the crop.
    pub target: TargetDimensions,
    /// Output container format.
    pub format: OutputFormat,
    /// Lossy quality in [0, 1]; ignored for PNG, clamped if out of range.
    pub quality: f32,
}

/// The encoded output and its metadata, consumed by the UI for preview
/// rendering and the client-side download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResult {
    /// The encoded byte stream.
    pub bytes: Vec<u8>,
    /// Final raster width in pixels.
    pub width: u32,
    /// Final raster height in pixels.
    pub height: u32,
    /// Total size of `bytes` (for PDF, the whole document).
    pub byte_size: usize,
    /// MIME type of the encoded stream.
    pub mime_type: &'static str,
    /// Source filename stem with the output format's extension.
    pub suggested_filename: String,
}

/// Run the full pipeline on raw source bytes.
///
/// `declared_mime` is the type reported by the host's file picker (used
/// only as a decode hint); `source_name` seeds the suggested filename.
pub fn export(
    bytes: &[u8],
    declared_mime: Option<&str>,
    request: &ExportRequest,
    source_name: &str,
) -> Result<EncodedResult, ExportError> {
    let source = decode(bytes, declared_mime)?;
    export_surface(&source, request, source_name)
}

/// Run the pipeline on an already-decoded surface.
///
/// The preview flow decodes once and re-exports repeatedly as the user
/// moves sliders; this entry point skips the redundant decode.
pub fn export_surface(
    source: &Surface,
    request: &ExportRequest,
    source_name: &str,
) -> Result<EncodedResult, ExportError> {
    let plan = resolve(source.width, source.height, request.crop, request.target)?;
    let output = resample(source, &plan)?;
    let bytes = encode(&output, request.format, request.quality)?;

    Ok(EncodedResult {
        byte_size: bytes.len(),
        width: output.width,
        height: output.height,
        mime_type: request.format.mime_type(),
        suggested_filename: suggested_filename(source_name, request.format),
        bytes,
    })
}

/// Derive the output filename: source stem plus the format's extension.
pub fn suggested_filename(source_name: &str, format: OutputFormat) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("image");
    format!("{stem}.{}", format.extension())
}
