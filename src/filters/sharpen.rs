//! Sharpen filters: Unsharp Mask / High Boost.
//!
//! The blur is a Gaussian of `2 * radius + 1` taps with the sigma derived
//! from the window length, convolved with zero padding. Output is not
//! clamped; border pixels overshoot because the padded blur is darker there.

use ndarray::{Array3, ArrayView3, Zip};

use super::core::{convolve, Kernel};
use crate::error::{FilterError, Result};

/// Apply unsharp masking: `input + amount * (input - blur(input))`.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `radius` - Blur radius; the kernel is `2 * radius + 1` pixels square
/// * `amount` - 1.0 = classic unsharp mask, > 1.0 = high-boost, 0.0 = no-op
///
/// # Returns
/// Sharpened image with same shape
pub fn unsharp_mask(input: ArrayView3<f32>, radius: usize, amount: f32) -> Result<Array3<f32>> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(FilterError::invalid("amount", amount, "a finite value >= 0"));
    }
    let len = 2 * radius + 1;
    let kernel = Kernel::gaussian(len, len, None, None)?;
    let blur = convolve(input, &kernel);

    let mut output = input.to_owned();
    Zip::from(&mut output).and(&blur).par_for_each(|v, &b| {
        *v += amount * (*v - b);
    });
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_edge() -> Array3<f32> {
        let mut img = Array3::<f32>::zeros((9, 9, 1));
        for y in 0..9 {
            for x in 0..9 {
                img[[y, x, 0]] = if x < 4 { 50.0 } else { 200.0 };
            }
        }
        img
    }

    #[test]
    fn test_unsharp_amount_zero_is_identity() {
        let img = step_edge();
        assert_eq!(unsharp_mask(img.view(), 2, 0.0).unwrap(), img);
    }

    #[test]
    fn test_unsharp_boosts_edge_contrast() {
        let img = step_edge();
        let result = unsharp_mask(img.view(), 1, 1.0).unwrap();

        // Dark side of the edge gets darker, bright side brighter
        assert!(result[[4, 3, 0]] < 50.0);
        assert!(result[[4, 4, 0]] > 200.0);
        // Far from the edge (and the border) nothing changes
        assert!((result[[4, 1, 0]] - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_high_boost_is_stronger() {
        let img = step_edge();
        let usm = unsharp_mask(img.view(), 1, 1.0).unwrap();
        let boost = unsharp_mask(img.view(), 1, 2.5).unwrap();
        assert!(boost[[4, 4, 0]] > usm[[4, 4, 0]]);
    }

    #[test]
    fn test_unsharp_rejects_negative_amount() {
        let img = step_edge();
        assert!(unsharp_mask(img.view(), 1, -0.5).is_err());
    }
}
