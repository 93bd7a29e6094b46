//! Geometric operations: Digital Zoom, Resize, Translate, Alpha Blend.
//!
//! ## Axis Convention
//!
//! Grids are (height, width, channels). A crop rectangle is given by its
//! `top` row and `left` column plus a `width` (columns) and `height` (rows),
//! covering rows `top..top + height` and columns `left..left + width`.
//!
//! ## Resampling
//!
//! `resize_bilinear` maps pixel centers (`src = (dst + 0.5) * scale - 0.5`)
//! and clamps samples to the edge, so resizing to the same size is an exact
//! copy.

use ndarray::{s, Array3, ArrayView3, Zip};

use super::color_adjust::clamp;
use crate::error::{ensure_grid, FilterError, Result};

// ============================================================================
// Resize / Zoom
// ============================================================================

/// Resize to `out_height x out_width` with bilinear interpolation.
pub fn resize_bilinear(input: ArrayView3<f32>, out_height: usize, out_width: usize) -> Result<Array3<f32>> {
    let (in_h, in_w, channels) = input.dim();
    if in_h == 0 || in_w == 0 || out_height == 0 || out_width == 0 {
        return Err(FilterError::DegenerateInput(format!(
            "cannot resize {}x{} to {}x{}",
            in_h, in_w, out_height, out_width
        )));
    }
    let scale_y = in_h as f32 / out_height as f32;
    let scale_x = in_w as f32 / out_width as f32;
    let max_y = (in_h - 1) as f32;
    let max_x = (in_w - 1) as f32;

    let mut output = Array3::<f32>::zeros((out_height, out_width, channels));
    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let sy = ((y as f32 + 0.5) * scale_y - 0.5).clamp(0.0, max_y);
        let sx = ((x as f32 + 0.5) * scale_x - 0.5).clamp(0.0, max_x);

        let y0 = sy.floor() as usize;
        let x0 = sx.floor() as usize;
        let fy = sy - y0 as f32;
        let fx = sx - x0 as f32;
        let y1 = (y0 + 1).min(in_h - 1);
        let x1 = (x0 + 1).min(in_w - 1);

        let p00 = input[[y0, x0, c]];
        let p10 = input[[y0, x1, c]];
        let p01 = input[[y1, x0, c]];
        let p11 = input[[y1, x1, c]];
        *out = (1.0 - fx) * (1.0 - fy) * p00
            + fx * (1.0 - fy) * p10
            + (1.0 - fx) * fy * p01
            + fx * fy * p11;
    });

    Ok(output)
}

/// Crop a rectangle and resample it back to the input's (height, width).
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `top` - First row of the crop
/// * `left` - First column of the crop
/// * `width` - Number of columns in the crop
/// * `height` - Number of rows in the crop
///
/// # Returns
/// Zoomed image with the same shape as `input`
pub fn digital_zoom(
    input: ArrayView3<f32>,
    top: usize,
    left: usize,
    width: usize,
    height: usize,
) -> Result<Array3<f32>> {
    ensure_grid(input.dim())?;
    let (img_h, img_w, _) = input.dim();
    if width == 0 || height == 0 {
        return Err(FilterError::invalid(
            "zoom size",
            width.min(height) as f64,
            "a non-empty crop",
        ));
    }
    let Some(bottom) = top.checked_add(height).filter(|&end| end <= img_h) else {
        return Err(FilterError::invalid("top", top as f64, "a crop inside the image rows"));
    };
    let Some(right) = left.checked_add(width).filter(|&end| end <= img_w) else {
        return Err(FilterError::invalid("left", left as f64, "a crop inside the image columns"));
    };

    let cropped = input.slice(s![top..bottom, left..right, ..]);
    resize_bilinear(cropped, img_h, img_w)
}

/// Shift the image by `dy` rows and `dx` columns, filling with zeros.
pub fn translate(input: ArrayView3<f32>, dy: isize, dx: isize) -> Array3<f32> {
    let (height, width, _) = input.dim();
    let mut output = Array3::<f32>::zeros(input.dim());
    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let sy = y as isize - dy;
        let sx = x as isize - dx;
        if sy >= 0 && sx >= 0 && (sy as usize) < height && (sx as usize) < width {
            *out = input[[sy as usize, sx as usize, c]];
        }
    });
    output
}

// ============================================================================
// Alpha Blend
// ============================================================================

/// Composite `foreground` over `background` through `mask`.
///
/// `output = fg * mask + (1 - mask) * bg`. The mask must already be on the
/// [0, 1] scale; use `normalize_mask` for a 0-255 mask. A single-channel
/// mask is replicated across the image channels.
///
/// # Errors
/// * `DegenerateInput` - the foreground is empty or has neither 1 nor 3 channels
/// * `DimensionMismatch` - fg, bg and mask differ in (height, width), fg and
///   bg differ in channel count, or the mask has neither 1 channel nor the
///   image's channel count
/// * `InvalidParameter` - a mask value lies outside [0, 1]
pub fn alpha_blend(
    foreground: ArrayView3<f32>,
    background: ArrayView3<f32>,
    mask: ArrayView3<f32>,
) -> Result<Array3<f32>> {
    ensure_grid(foreground.dim())?;
    let (h, w, c) = foreground.dim();
    if background.dim() != (h, w, c) {
        return Err(FilterError::DimensionMismatch(format!(
            "foreground {:?} and background {:?} differ",
            foreground.dim(),
            background.dim()
        )));
    }
    let (mh, mw, mc) = mask.dim();
    if (mh, mw) != (h, w) {
        return Err(FilterError::DimensionMismatch(format!(
            "mask {}x{} does not match image {}x{}",
            mh, mw, h, w
        )));
    }
    if mc != 1 && mc != c {
        return Err(FilterError::DimensionMismatch(format!(
            "mask has {} channels, image has {}",
            mc, c
        )));
    }
    if let Some(&bad) = mask.iter().find(|v| !(0.0..=1.0).contains(*v)) {
        return Err(FilterError::invalid("mask", bad, "values in [0, 1]"));
    }

    let mut output = Array3::<f32>::zeros((h, w, c));
    Zip::indexed(&mut output).par_for_each(|(y, x, ch), out| {
        let m = mask[[y, x, if mc == 1 { 0 } else { ch }]];
        *out = foreground[[y, x, ch]] * m + (1.0 - m) * background[[y, x, ch]];
    });
    Ok(output)
}

/// Rescale a 0-255 mask to the [0, 1] scale `alpha_blend` expects.
pub fn normalize_mask(mask: ArrayView3<f32>) -> Array3<f32> {
    mask.mapv(|v| (v / 255.0).clamp(0.0, 1.0))
}

/// Binary 0/1 mask of the pixels at or above `lo` (and above zero).
pub fn binary_mask(intensity: ArrayView3<f32>, lo: f32) -> Array3<f32> {
    clamp(intensity, lo, 255.0).mapv(|v| if v > 0.0 { 1.0 } else { 0.0 })
}
