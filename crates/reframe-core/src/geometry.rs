//! Crop and scale geometry resolution.
//!
//! Combines a requested crop rectangle (in source-pixel coordinates) and the
//! requested output dimensions into a single sampling plan for the resampler.
//!
//! # Clamp policy
//!
//! A crop rectangle extending past the source bounds is intersected with the
//! source — never expanded, never an error. Only a crop whose clamped area
//! collapses to nothing is rejected. Coordinates are snapped to the integer
//! pixel grid by rounding; the interactive crop handles on the caller's side
//! produce fractional values while dragging.
//!
//! Aspect ratio between crop and target is deliberately not enforced: the
//! horizontal and vertical scale factors are independent, and non-uniform
//! scaling is legal and expected when the user unlocks the aspect ratio.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from resolving crop/target geometry.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// The crop rectangle does not intersect the source image.
    #[error("Crop rectangle does not intersect the source image")]
    EmptyCrop,

    /// Target width or height is zero.
    #[error("Invalid target dimensions: {width}x{height} (both must be at least 1)")]
    InvalidTarget { width: u32, height: u32 },
}

/// A crop rectangle in source-pixel coordinates, top-left origin.
///
/// Fractional coordinates are accepted (crop handles report them while
/// dragging) and are snapped to the pixel grid during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// Requested output dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDimensions {
    pub width: u32,
    pub height: u32,
}

impl TargetDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A validated sampling plan: the clamped integer crop rectangle plus the
/// two independent scale factors. Passed opaquely to the resampler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPlan {
    /// Left edge of the crop in source pixels.
    pub crop_x: u32,
    /// Top edge of the crop in source pixels.
    pub crop_y: u32,
    /// Crop width in source pixels (>= 1).
    pub crop_width: u32,
    /// Crop height in source pixels (>= 1).
    pub crop_height: u32,
    /// Horizontal scale factor: target_width / crop_width.
    pub scale_x: f64,
    /// Vertical scale factor: target_height / crop_height.
    pub scale_y: f64,
    /// Output dimensions the resampler must produce.
    pub target: TargetDimensions,
}

impl ResolvedPlan {
    /// True when the plan covers the full source at identical dimensions.
    pub fn is_identity(&self, source_width: u32, source_height: u32) -> bool {
        self.crop_x == 0
            && self.crop_y == 0
            && self.crop_width == source_width
            && self.crop_height == source_height
            && self.target.width == source_width
            && self.target.height == source_height
    }

    /// True when no scaling is required (crop dimensions equal the target).
    pub fn is_crop_only(&self) -> bool {
        self.crop_width == self.target.width && self.crop_height == self.target.height
    }
}

/// Resolve a crop rectangle and target dimensions against the source bounds.
///
/// An absent crop means the full source rectangle.
///
/// # Errors
///
/// * `GeometryError::InvalidTarget` if either target dimension is zero.
/// * `GeometryError::EmptyCrop` if the clamped crop has no area (including
///   crops entirely outside the source and non-finite coordinates).
pub fn resolve(
    source_width: u32,
    source_height: u32,
    crop: Option<CropRect>,
    target: TargetDimensions,
) -> Result<ResolvedPlan, GeometryError> {
    if target.width == 0 || target.height == 0 {
        return Err(GeometryError::InvalidTarget {
            width: target.width,
            height: target.height,
        });
    }

    let (crop_x, crop_y, crop_width, crop_height) = match crop {
        None => (0, 0, source_width, source_height),
        Some(rect) => {
            if !rect.is_finite() {
                return Err(GeometryError::EmptyCrop);
            }

            let src_w = f64::from(source_width);
            let src_h = f64::from(source_height);

            // Intersect with source bounds, then snap edges to the pixel grid.
            let left = rect.x.max(0.0).min(src_w);
            let top = rect.y.max(0.0).min(src_h);
            let right = (rect.x + rect.width).max(0.0).min(src_w);
            let bottom = (rect.y + rect.height).max(0.0).min(src_h);

            let left = left.round() as u32;
            let top = top.round() as u32;
            let right = right.round() as u32;
            let bottom = bottom.round() as u32;

            if right <= left || bottom <= top {
                return Err(GeometryError::EmptyCrop);
            }

            (left, top, right - left, bottom - top)
        }
    };

    if crop_width == 0 || crop_height == 0 {
        return Err(GeometryError::EmptyCrop);
    }

    Ok(ResolvedPlan {
        crop_x,
        crop_y,
        crop_width,
        crop_height,
        scale_x: f64::from(target.width) / f64::from(crop_width),
        scale_y: f64::from(target.height) / f64::from(crop_height),
        target,
    })
}


// ============================================================================
// Property-Based Tests
// ============================================================================
