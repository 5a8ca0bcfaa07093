//! Resampling stage: draws the cropped region at the target dimensions.
//!
//! # Algorithm
//!
//! Separable inverse mapping. For each destination pixel the sampler maps
//! back into crop space via the plan's scale factors and accumulates a
//! weighted sum of source pixels:
//!
//! - **Upscaling** (per axis): bilinear interpolation between the two
//!   nearest source samples.
//! - **Downscaling** (per axis): area averaging over the full source
//!   footprint of the destination pixel, with partial weights at the
//!   window edges.
//!
//! All filtering happens in premultiplied-alpha space so that the color of
//! transparent pixels cannot bleed into their opaque neighbors (edge
//! fringing); alpha runs through exactly the same filter as the color
//! channels. The computation is pure f32 arithmetic over fixed tap tables
//! and is fully deterministic.
//!
//! Crop-only plans (scale exactly 1) and identity plans skip the filter and
//! copy rows directly, so they are byte-exact.

use thiserror::Error;

use crate::decode::Surface;
use crate::geometry::ResolvedPlan;

/// Errors from the resampling stage.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ResampleError {
    /// An output or intermediate buffer could not be allocated.
    #[error("Out of memory allocating resample buffers")]
    OutOfMemory,
}

/// One axis worth of filter taps: for each destination index, the
/// contributing crop-space indices and their normalized weights.
type AxisTaps = Vec<Vec<(usize, f32)>>;

/// Resample the planned crop region of `source` into a new surface with
/// exactly the plan's target dimensions.
///
/// # Errors
///
/// Returns `ResampleError::OutOfMemory` if a buffer allocation fails. There
/// are no other failure modes; the plan is already validated geometry.
pub fn resample(source: &Surface, plan: &ResolvedPlan) -> Result<Surface, ResampleError> {
    // Fast path: nothing to do at all.
    if plan.is_identity(source.width, source.height) {
        let pixels = try_copy(&source.pixels)?;
        return Ok(Surface::new(source.width, source.height, pixels));
    }

    // Fast path: pure crop, byte-exact row copies.
    if plan.is_crop_only() {
        return extract_crop(source, plan);
    }

    let out_w = plan.target.width as usize;
    let out_h = plan.target.height as usize;
    let out_bytes = out_w
        .checked_mul(out_h)
        .and_then(|n| n.checked_mul(4))
        .ok_or(ResampleError::OutOfMemory)?;

    let mut output: Vec<u8> = Vec::new();
    output
        .try_reserve_exact(out_bytes)
        .map_err(|_| ResampleError::OutOfMemory)?;

    let premultiplied = premultiplied_crop(source, plan)?;

    let x_taps = axis_taps(plan.crop_width as usize, out_w);
    let y_taps = axis_taps(plan.crop_height as usize, out_h);
    let crop_stride = plan.crop_width as usize * 4;

    for taps_y in &y_taps {
        for taps_x in &x_taps {
            let mut acc = [0.0f32; 4];
            for &(sy, wy) in taps_y {
                let row = sy * crop_stride;
                for &(sx, wx) in taps_x {
                    let idx = row + sx * 4;
                    let w = wy * wx;
                    acc[0] += premultiplied[idx] * w;
                    acc[1] += premultiplied[idx + 1] * w;
                    acc[2] += premultiplied[idx + 2] * w;
                    acc[3] += premultiplied[idx + 3] * w;
                }
            }
            let [r, g, b, a] = unpremultiply(acc);
            output.extend_from_slice(&[r, g, b, a]);
        }
    }

    Ok(Surface::new(plan.target.width, plan.target.height, output))
}

/// Copy the crop region row by row without filtering.
fn extract_crop(source: &Surface, plan: &ResolvedPlan) -> Result<Surface, ResampleError> {
    let crop_w = plan.crop_width as usize;
    let crop_h = plan.crop_height as usize;
    let src_stride = source.width as usize * 4;
    let row_bytes = crop_w * 4;

    let mut output: Vec<u8> = Vec::new();
    output
        .try_reserve_exact(crop_h * row_bytes)
        .map_err(|_| ResampleError::OutOfMemory)?;

    for y in 0..crop_h {
        let src_y = plan.crop_y as usize + y;
        let start = src_y * src_stride + plan.crop_x as usize * 4;
        output.extend_from_slice(&source.pixels[start..start + row_bytes]);
    }

    Ok(Surface::new(plan.crop_width, plan.crop_height, output))
}

/// Extract the crop region as a premultiplied f32 buffer.
fn premultiplied_crop(source: &Surface, plan: &ResolvedPlan) -> Result<Vec<f32>, ResampleError> {
    let crop_w = plan.crop_width as usize;
    let crop_h = plan.crop_height as usize;
    let src_stride = source.width as usize * 4;

    let mut buffer: Vec<f32> = Vec::new();
    buffer
        .try_reserve_exact(crop_w * crop_h * 4)
        .map_err(|_| ResampleError::OutOfMemory)?;

    for y in 0..crop_h {
        let src_y = plan.crop_y as usize + y;
        let start = src_y * src_stride + plan.crop_x as usize * 4;
        for px in source.pixels[start..start + crop_w * 4].chunks_exact(4) {
            let a = f32::from(px[3]) / 255.0;
            buffer.push(f32::from(px[0]) * a);
            buffer.push(f32::from(px[1]) * a);
            buffer.push(f32::from(px[2]) * a);
            buffer.push(f32::from(px[3]));
        }
    }

    Ok(buffer)
}

/// Convert an accumulated premultiplied sample back to straight RGBA8.
#[inline]
fn unpremultiply(acc: [f32; 4]) -> [u8; 4] {
    let a = acc[3];
    if a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let scale = 255.0 / a;
    [
        (acc[0] * scale).round().clamp(0.0, 255.0) as u8,
        (acc[1] * scale).round().clamp(0.0, 255.0) as u8,
        (acc[2] * scale).round().clamp(0.0, 255.0) as u8,
        a.round().clamp(0.0, 255.0) as u8,
    ]
}

/// Build the tap table for one axis.
///
/// `src_len` is the crop extent in source pixels, `dst_len` the output
/// extent. Upscaling produces two bilinear taps per destination index;
/// downscaling produces an area-average window with fractional edge
/// weights, normalized to sum to 1.
fn axis_taps(src_len: usize, dst_len: usize) -> AxisTaps {
    let mut taps = Vec::with_capacity(dst_len);
    let scale = src_len as f64 / dst_len as f64; // source pixels per output pixel

    if dst_len >= src_len {
        // Upscale: bilinear between the two nearest samples, centers aligned.
        for i in 0..dst_len {
            let src = ((i as f64 + 0.5) * scale - 0.5).clamp(0.0, (src_len - 1) as f64);
            let i0 = src.floor() as usize;
            let i1 = (i0 + 1).min(src_len - 1);
            let f = (src - i0 as f64) as f32;
            if i1 == i0 || f == 0.0 {
                taps.push(vec![(i0, 1.0)]);
            } else {
                taps.push(vec![(i0, 1.0 - f), (i1, f)]);
            }
        }
    } else {
        // Downscale: average the window [i*scale, (i+1)*scale).
        for i in 0..dst_len {
            let lo = i as f64 * scale;
            let hi = ((i + 1) as f64 * scale).min(src_len as f64);
            let first = lo.floor() as usize;
            let last = (hi.ceil() as usize).min(src_len);

            let mut window = Vec::with_capacity(last - first);
            let norm = (hi - lo) as f32;
            for j in first..last {
                let cell_lo = (j as f64).max(lo);
                let cell_hi = ((j + 1) as f64).min(hi);
                let overlap = (cell_hi - cell_lo) as f32;
                if overlap > 0.0 {
                    window.push((j, overlap / norm));
                }
            }
            taps.push(window);
        }
    }

    taps
}

fn try_copy(bytes: &[u8]) -> Result<Vec<u8>, ResampleError> {
    let mut out: Vec<u8> = Vec::new();
    out.try_reserve_exact(bytes.len())
        .map_err(|_| ResampleError::OutOfMemory)?;
    out.extend_from_slice(bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{resolve, CropRect, TargetDimensions};

    /// Create a test surface where each pixel encodes its position.
    fn test_surface(width: u32, height: u32) -> Surface {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Surface::new(width, height, pixels)
    }

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Surface {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            pixels.extend_from_slice(&rgba);
        }
        Surface::new(width, height, pixels)
    }

    #[test]
    fn test_identity_is_byte_exact() {
        let src = test_surface(16, 12);
        let plan = resolve(16, 12, None, TargetDimensions::new(16, 12)).unwrap();
        let out = resample(&src, &plan).unwrap();
        assert_eq!(out.pixels, src.pixels);
    }

    #[test]
    fn test_crop_only_is_byte_exact() {
        let src = test_surface(10, 10);
        let crop = CropRect::new(3.0, 3.0, 4.0, 4.0);
        let plan = resolve(10, 10, Some(crop), TargetDimensions::new(4, 4)).unwrap();
        let out = resample(&src, &plan).unwrap();

        assert_eq!(out.width, 4);
        assert_eq!(out.height, 4);
        // First pixel comes from (3, 3): value 33.
        assert_eq!(&out.pixels[0..4], &[33, 33, 33, 255]);
        // Last pixel comes from (6, 6): value 66.
        let last = out.pixels.len() - 4;
        assert_eq!(&out.pixels[last..], &[66, 66, 66, 255]);
    }

    #[test]
    fn test_output_dimensions_exact() {
        let src = test_surface(37, 23);
        for (tw, th) in [(1, 1), (5, 80), (100, 3), (37, 23), (74, 46)] {
            let plan = resolve(37, 23, None, TargetDimensions::new(tw, th)).unwrap();
            let out = resample(&src, &plan).unwrap();
            assert_eq!(out.width, tw);
            assert_eq!(out.height, th);
            assert_eq!(out.pixels.len(), (tw * th * 4) as usize);
        }
    }

    #[test]
    fn test_upscale_solid_stays_solid() {
        let src = solid(4, 4, [40, 90, 200, 180]);
        let plan = resolve(4, 4, None, TargetDimensions::new(11, 7)).unwrap();
        let out = resample(&src, &plan).unwrap();
        for px in out.pixels.chunks_exact(4) {
            assert_eq!(px, &[40, 90, 200, 180]);
        }
    }

    #[test]
    fn test_downscale_averages_colors() {
        // 2x2 checkerboard of opaque red and blue reduced to a single pixel.
        let pixels = vec![
            255, 0, 0, 255, //
            0, 0, 255, 255, //
            0, 0, 255, 255, //
            255, 0, 0, 255,
        ];
        let src = Surface::new(2, 2, pixels);
        let plan = resolve(2, 2, None, TargetDimensions::new(1, 1)).unwrap();
        let out = resample(&src, &plan).unwrap();

        let px = &out.pixels[0..4];
        assert!(px[0] == 127 || px[0] == 128, "red {}", px[0]);
        assert_eq!(px[1], 0);
        assert!(px[2] == 127 || px[2] == 128, "blue {}", px[2]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_premultiplied_no_edge_fringe() {
        // Opaque red next to fully transparent green. Averaged without
        // premultiplication the green would bleed into the result; with it,
        // the color stays pure red at half coverage.
        let pixels = vec![
            255, 0, 0, 255, //
            0, 255, 0, 0,
        ];
        let src = Surface::new(2, 1, pixels);
        let plan = resolve(2, 1, None, TargetDimensions::new(1, 1)).unwrap();
        let out = resample(&src, &plan).unwrap();

        let px = &out.pixels[0..4];
        assert_eq!(px[0], 255);
        assert_eq!(px[1], 0);
        assert_eq!(px[2], 0);
        assert!(px[3] == 127 || px[3] == 128, "alpha {}", px[3]);
    }

    #[test]
    fn test_alpha_interpolated_like_color() {
        // Horizontal alpha gradient, upscaled: alpha must interpolate, not
        // snap to the nearest source value.
        let pixels = vec![
            100, 100, 100, 0, //
            100, 100, 100, 255,
        ];
        let src = Surface::new(2, 1, pixels);
        let plan = resolve(2, 1, None, TargetDimensions::new(4, 1)).unwrap();
        let out = resample(&src, &plan).unwrap();

        let alphas: Vec<u8> = out.pixels.chunks_exact(4).map(|p| p[3]).collect();
        assert_eq!(alphas.len(), 4);
        // Monotone ramp from low to high.
        assert!(alphas.windows(2).all(|w| w[0] <= w[1]), "{alphas:?}");
        assert!(alphas[0] < alphas[3]);
    }

    #[test]
    fn test_fully_transparent_output_is_zeroed() {
        let src = solid(4, 4, [200, 10, 30, 0]);
        let plan = resolve(4, 4, None, TargetDimensions::new(2, 2)).unwrap();
        let out = resample(&src, &plan).unwrap();
        for px in out.pixels.chunks_exact(4) {
            assert_eq!(px, &[0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_non_uniform_scale() {
        let src = test_surface(8, 8);
        let plan = resolve(8, 8, None, TargetDimensions::new(16, 2)).unwrap();
        let out = resample(&src, &plan).unwrap();
        assert_eq!(out.width, 16);
        assert_eq!(out.height, 2);
    }

    #[test]
    fn test_deterministic() {
        let src = test_surface(20, 20);
        let crop = CropRect::new(2.0, 2.0, 15.0, 15.0);
        let plan = resolve(20, 20, Some(crop), TargetDimensions::new(7, 13)).unwrap();
        let a = resample(&src, &plan).unwrap();
        let b = resample(&src, &plan).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn test_absurd_target_is_out_of_memory() {
        let src = test_surface(4, 4);
        let plan = resolve(4, 4, None, TargetDimensions::new(u32::MAX, u32::MAX)).unwrap();
        let result = resample(&src, &plan);
        assert_eq!(result.unwrap_err(), ResampleError::OutOfMemory);
    }

    #[test]
    fn test_axis_taps_downscale_weights_sum_to_one() {
        for (src, dst) in [(10, 3), (7, 2), (100, 99), (256, 1)] {
            for window in axis_taps(src, dst) {
                let sum: f32 = window.iter().map(|&(_, w)| w).sum();
                assert!((sum - 1.0).abs() < 1e-5, "{src}->{dst}: {sum}");
            }
        }
    }

    #[test]
    fn test_axis_taps_upscale_weights_sum_to_one() {
        for (src, dst) in [(3, 10), (2, 7), (99, 100), (1, 16)] {
            for window in axis_taps(src, dst) {
                let sum: f32 = window.iter().map(|&(_, w)| w).sum();
                assert!((sum - 1.0).abs() < 1e-5, "{src}->{dst}: {sum}");
            }
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
