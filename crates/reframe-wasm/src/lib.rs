//! Reframe WASM - WebAssembly bindings for the Reframe pipeline
//!
//! This crate exposes the reframe-core export pipeline to the
//! JavaScript/TypeScript UI.
//!
//! # Module Structure
//!
//! - `types` - WASM-compatible wrapper types (surfaces, export results)
//! - `decode` - Decode bindings for preview rendering
//! - `pipeline` - The one-call export binding
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, export_image } from '@reframe/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const surface = decode_image(bytes, file.type);
//! const result = export_image(bytes, null, 800, 600, "webp", 0.8, file.name);
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod pipeline;
mod types;

// Re-export public types
pub use decode::decode_image;
pub use pipeline::{export_image, export_image_from_surface};
pub use types::{JsExportResult, JsSurface};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    // Future: Set up panic hook for better error messages in browser console
    // when console_error_panic_hook feature is added
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
