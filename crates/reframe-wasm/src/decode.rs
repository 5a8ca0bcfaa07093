//! Image decoding WASM bindings.
//!
//! The UI decodes once for preview rendering (drawing the surface into a
//! canvas behind the crop handles), then re-exports from the same bytes or
//! surface as the user adjusts crop, dimensions, and quality.

use crate::types::JsSurface;
use reframe_core::decode;
use wasm_bindgen::prelude::*;

/// Decode image bytes into an RGBA surface.
///
/// # Arguments
///
/// * `bytes` - Raw file bytes from the file picker (`Uint8Array`)
/// * `declared_mime` - The `File.type` reported by the browser; only used
///   as a fallback hint when content sniffing fails
///
/// # Errors
///
/// Returns a JS error string when the bytes are not a decodable image.
///
/// # Example
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const surface = decode_image(bytes, file.type);
/// console.log(`Decoded ${surface.width}x${surface.height}`);
/// ```
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8], declared_mime: Option<String>) -> Result<JsSurface, JsValue> {
    decode::decode(bytes, declared_mime.as_deref())
        .map(JsSurface::from_surface)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
