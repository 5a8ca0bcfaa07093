//! Reframe Core - Image transform pipeline
//!
//! This crate implements the deterministic export pipeline behind Reframe:
//! decode source bytes to an RGBA surface, resolve crop/scale geometry,
//! resample to the target dimensions, and encode as JPEG, PNG, WebP, or a
//! single-page PDF.
//!
//! The interactive UI (crop handles, sliders, file picker, download link)
//! lives outside this crate and drives it through [`pipeline::export`]; the
//! pipeline itself is stateless and has no notion of a "current" image, so
//! concurrent or superseded invocations never interfere.

pub mod decode;
pub mod encode;
pub mod geometry;
pub mod pipeline;
pub mod resample;

pub use decode::{decode, DecodeError, Surface};
pub use encode::{encode, EncodeError, OutputFormat};
pub use geometry::{resolve, CropRect, GeometryError, ResolvedPlan, TargetDimensions};
pub use pipeline::{export, export_surface, EncodedResult, ExportError, ExportRequest};
pub use resample::{resample, ResampleError};
