//! Image decoding stage of the export pipeline.
//!
//! Turns opaque source bytes into an addressable RGBA raster surface. Any
//! format the `image` crate can decode with the enabled features is accepted:
//! JPEG, PNG, WebP, BMP, and GIF (first frame).
//!
//! # Architecture
//!
//! Decoding is designed to be driven from Web Workers via the WASM bindings.
//! All operations are synchronous and single-threaded within WASM; the
//! decoder holds no state between calls.

mod raster;
mod types;

pub use raster::decode;
pub use types::{DecodeError, Surface};
