//! WASM-compatible wrapper types for pipeline data.
//!
//! These types wrap the core Reframe types with a JavaScript-friendly
//! interface, handling the copy between WASM linear memory and JS.

use reframe_core::{EncodedResult, Surface};
use wasm_bindgen::prelude::*;

/// A decoded raster surface exposed to JavaScript.
///
/// # Memory Management
///
/// The pixel data lives in WASM memory; `pixels()` copies it out as a
/// `Uint8Array`. `free()` may be called to release WASM memory eagerly,
/// but wasm-bindgen's finalizer handles cleanup automatically otherwise.
#[wasm_bindgen]
pub struct JsSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsSurface {
    /// Create a surface from dimensions and RGBA pixel data
    /// (4 bytes per pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsSurface {
        JsSurface {
            width,
            height,
            pixels,
        }
    }

    /// Surface width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size of the pixel buffer in bytes (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// RGBA pixel data as a Uint8Array (copies out of WASM memory).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsSurface {
    pub(crate) fn from_surface(surface: Surface) -> Self {
        Self {
            width: surface.width,
            height: surface.height,
            pixels: surface.pixels,
        }
    }

    /// Convert back to a core Surface (clones the pixel data).
    pub(crate) fn to_surface(&self) -> Surface {
        Surface {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

/// The result of one export invocation, exposed to JavaScript.
///
/// The UI consumes this for preview rendering and for building the
/// client-side download link (`bytes` + `mime_type` + filename).
#[wasm_bindgen]
pub struct JsExportResult {
    inner: EncodedResult,
}

#[wasm_bindgen]
impl JsExportResult {
    /// Encoded output as a Uint8Array (copies out of WASM memory).
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    /// Final raster width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Final raster height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Size of the encoded stream in bytes
    #[wasm_bindgen(getter)]
    pub fn byte_size(&self) -> usize {
        self.inner.byte_size
    }

    /// MIME type of the encoded stream
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.to_string()
    }

    /// Suggested download filename (source stem + format extension)
    #[wasm_bindgen(getter)]
    pub fn suggested_filename(&self) -> String {
        self.inner.suggested_filename.clone()
    }
}

impl JsExportResult {
    pub(crate) fn from_result(inner: EncodedResult) -> Self {
        Self { inner }
    }
}
