//! Pointwise adjustments: Contrast, Brightness, Clamp, Normalize.
//!
//! These are pixel-wise operations that don't require spatial context.
//! Values are on the 0-255 scale. Contrast and brightness do not clamp their
//! output; chain `clamp` when a bounded result is needed.

use log::debug;
use ndarray::{Array3, ArrayView3};

use crate::error::{ensure_range, Result};

// ============================================================================
// Contrast
// ============================================================================

/// Adjust image contrast.
///
/// The slope around mid-gray is `tan((contrast + 1) * π / 4)`, so 0.0 is the
/// identity, -1.0 flattens the image to mid-gray and values towards 1.0
/// approach a hard step.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `contrast` - Contrast adjustment in [-1.0, 1.0]
pub fn change_contrast(input: ArrayView3<f32>, contrast: f32) -> Result<Array3<f32>> {
    ensure_range("contrast", contrast, -1.0, 1.0, "a value in [-1, 1]")?;
    let scale = ((contrast + 1.0) * std::f32::consts::FRAC_PI_4).tan();
    Ok(input.mapv(|v| ((v / 255.0 - 0.5) * scale + 0.5) * 255.0))
}

// ============================================================================
// Brightness
// ============================================================================

/// Adjust image brightness by adding `brightness * channel_max`.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `brightness` - Brightness offset in [0.0, 1.0], 0.0 = no change
/// * `channel_max` - Maximum channel value (255.0 for 8-bit-scaled grids)
pub fn change_brightness(input: ArrayView3<f32>, brightness: f32, channel_max: f32) -> Result<Array3<f32>> {
    ensure_range("brightness", brightness, 0.0, 1.0, "a value in [0, 1]")?;
    let offset = brightness * channel_max;
    Ok(input.mapv(|v| v + offset))
}

// ============================================================================
// Clamp
// ============================================================================

/// Piecewise clamp: values below `lo` become 0, values above `hi` become
/// `hi`, everything else passes through unchanged.
///
/// Note the low branch maps to 0 rather than `lo`; with the default bounds
/// (0, 255) the two coincide.
pub fn clamp(input: ArrayView3<f32>, lo: f32, hi: f32) -> Array3<f32> {
    input.mapv(|v| {
        if v < lo {
            0.0
        } else if v > hi {
            hi
        } else {
            v
        }
    })
}

// ============================================================================
// Normalize
// ============================================================================

/// Stretch the value range of the whole grid to [0, 255].
///
/// A constant grid (max == min) has no range to stretch; it is returned
/// unchanged instead of dividing by zero. An empty grid is returned as-is.
pub fn normalize_image(input: ArrayView3<f32>) -> Array3<f32> {
    let Some((min, max)) = value_range(input) else {
        return input.to_owned();
    };
    let range = max - min;
    if range == 0.0 {
        debug!("normalize_image: constant grid ({}), returning input unchanged", min);
        return input.to_owned();
    }
    input.mapv(|v| 255.0 * (v - min) / range)
}

/// Minimum and maximum over every sample, ignoring NaN.
pub fn value_range(input: ArrayView3<f32>) -> Option<(f32, f32)> {
    input
        .iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
