//! Export pipeline WASM bindings.
//!
//! One call per export. The crop rectangle crosses the boundary as a plain
//! JS object (`{x, y, width, height}`, or null/undefined for the full
//! source) via serde; everything else is scalar arguments.

use crate::types::{JsExportResult, JsSurface};
use reframe_core::{export, export_surface, CropRect, ExportRequest, OutputFormat, TargetDimensions};
use wasm_bindgen::prelude::*;

/// Run the full export pipeline on raw source bytes.
///
/// # Arguments
///
/// * `bytes` - Raw image file bytes (`Uint8Array`)
/// * `crop` - `{x, y, width, height}` in source-pixel coordinates, or
///   null/undefined to use the full source image
/// * `target_width` / `target_height` - Output dimensions in pixels (>= 1)
/// * `format` - One of `"jpeg"`, `"png"`, `"webp"`, `"pdf"`
/// * `quality` - Lossy quality in [0, 1] (the UI converts its 0-100 slider
///   before calling); ignored for PNG
/// * `source_name` - Original filename, used to derive the download name
///
/// # Example
///
/// ```typescript
/// const result = export_image(
///     bytes,
///     { x: 120, y: 80, width: 1600, height: 900 },
///     800, 450,
///     "webp",
///     0.8,
///     file.name,
/// );
/// const blob = new Blob([result.bytes()], { type: result.mime_type });
/// ```
#[wasm_bindgen]
pub fn export_image(
    bytes: &[u8],
    crop: JsValue,
    target_width: u32,
    target_height: u32,
    format: &str,
    quality: f32,
    source_name: &str,
) -> Result<JsExportResult, JsValue> {
    let request = build_request(crop, target_width, target_height, format, quality)?;
    export(bytes, None, &request, source_name)
        .map(JsExportResult::from_result)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Run the export pipeline on an already-decoded surface.
///
/// The preview flow decodes once and re-exports repeatedly as sliders
/// move; this avoids re-decoding the source on every change.
#[wasm_bindgen]
pub fn export_image_from_surface(
    surface: &JsSurface,
    crop: JsValue,
    target_width: u32,
    target_height: u32,
    format: &str,
    quality: f32,
    source_name: &str,
) -> Result<JsExportResult, JsValue> {
    let request = build_request(crop, target_width, target_height, format, quality)?;
    export_surface(&surface.to_surface(), &request, source_name)
        .map(JsExportResult::from_result)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn build_request(
    crop: JsValue,
    target_width: u32,
    target_height: u32,
    format: &str,
    quality: f32,
) -> Result<ExportRequest, JsValue> {
    let crop: Option<CropRect> = if crop.is_null() || crop.is_undefined() {
        None
    } else {
        serde_wasm_bindgen::from_value(crop).map_err(|e| JsValue::from_str(&e.to_string()))?
    };

    let format = OutputFormat::from_name(format).map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(ExportRequest {
        crop,
        target: TargetDimensions::new(target_width, target_height),
        format,
        quality,
    })
}
