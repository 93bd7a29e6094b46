//! Bilateral filter: edge-preserving smoothing.
//!
//! Each output sample is a weighted mean of its neighborhood in the same
//! channel. A neighbor's weight is the product of a spatial Gaussian on its
//! distance from the center and a range Gaussian on its value difference,
//! so pixels across a strong edge contribute almost nothing. The window
//! extends `ceil(3 * spatial_sigma)` pixels in every direction and samples
//! outside the grid replicate the nearest edge pixel.

use ndarray::{Array2, Array3, ArrayView3, Zip};

use super::core::BorderMode;
use crate::error::{ensure_grid, FilterError, Result};

/// Apply a bilateral filter.
///
/// # Arguments
/// * `input` - Image (height, width, channels), channels 1 or 3
/// * `spatial_sigma` - Standard deviation of the distance weight, in pixels
/// * `range_sigma` - Standard deviation of the value weight, in intensity units
///
/// # Returns
/// Smoothed image with the same shape as `input`.
///
/// # Errors
/// `InvalidParameter` when either sigma is not a positive finite number,
/// `DegenerateInput` for an empty grid or an unsupported channel count.
pub fn bilateral(input: ArrayView3<f32>, spatial_sigma: f32, range_sigma: f32) -> Result<Array3<f32>> {
    ensure_grid(input.dim())?;
    for (name, sigma) in [("spatial_sigma", spatial_sigma), ("range_sigma", range_sigma)] {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(FilterError::invalid(name, sigma, "a positive finite sigma"));
        }
    }

    let (img_h, img_w, _) = input.dim();
    let radius = (3.0 * spatial_sigma).ceil() as usize;
    let side = 2 * radius + 1;
    let spatial_coeff = -0.5 / (spatial_sigma * spatial_sigma);
    let range_coeff = -0.5 / (range_sigma * range_sigma);

    let spatial = Array2::from_shape_fn((side, side), |(j, i)| {
        let dy = j as f32 - radius as f32;
        let dx = i as f32 - radius as f32;
        ((dx * dx + dy * dy) * spatial_coeff).exp()
    });

    let mut output = Array3::<f32>::zeros(input.dim());
    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let center = input[[y, x, c]];
        let mut sum = 0.0f32;
        let mut weight_sum = 0.0f32;
        for j in 0..side {
            let Some(sy) = BorderMode::Replicate.resolve(y as isize + j as isize - radius as isize, img_h) else {
                continue;
            };
            for i in 0..side {
                let Some(sx) = BorderMode::Replicate.resolve(x as isize + i as isize - radius as isize, img_w)
                else {
                    continue;
                };
                let value = input[[sy, sx, c]];
                let diff = value - center;
                let weight = spatial[[j, i]] * (diff * diff * range_coeff).exp();
                sum += weight * value;
                weight_sum += weight;
            }
        }
        // The center tap always has weight 1
        *out = sum / weight_sum;
    });

    Ok(output)
}
