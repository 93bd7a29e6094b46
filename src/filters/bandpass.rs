//! Band-pass filtering via difference of Gaussians.

use ndarray::{Array3, ArrayView3};

use super::color_adjust::normalize_image;
use super::core::{convolve, Kernel};
use crate::error::{FilterError, Result};

/// Difference of Gaussians: `blur(r1) - blur(r2)`, normalized to 0-255.
///
/// Each blur uses a `2r + 1` square Gaussian with the sigma derived from its
/// window length. `radius_small` must be strictly smaller than
/// `radius_large`. A flat input yields a constant difference, which
/// `normalize_image` returns unchanged.
pub fn difference_of_gaussians(
    input: ArrayView3<f32>,
    radius_small: usize,
    radius_large: usize,
) -> Result<Array3<f32>> {
    if radius_small >= radius_large {
        return Err(FilterError::invalid(
            "radius_small",
            radius_small as f64,
            "a radius smaller than radius_large",
        ));
    }
    let w1 = 2 * radius_small + 1;
    let w2 = 2 * radius_large + 1;
    let narrow = convolve(input, &Kernel::gaussian(w1, w1, None, None)?);
    let wide = convolve(input, &Kernel::gaussian(w2, w2, None, None)?);

    let band = narrow - wide;
    Ok(normalize_image(band.view()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dog_output_spans_full_range() {
        let mut img = Array3::<f32>::zeros((11, 11, 1));
        img[[5, 5, 0]] = 255.0;

        let result = difference_of_gaussians(img.view(), 1, 2).unwrap();

        let max = result.iter().cloned().fold(f32::MIN, f32::max);
        let min = result.iter().cloned().fold(f32::MAX, f32::min);
        assert!((max - 255.0).abs() < 1e-3);
        assert!(min.abs() < 1e-3);
        // The narrow blur dominates at the impulse
        assert!((result[[5, 5, 0]] - 255.0).abs() < 1e-3);
    }

    #[test]
    fn test_dog_requires_ordered_radii() {
        let img = Array3::<f32>::zeros((5, 5, 1));
        assert!(difference_of_gaussians(img.view(), 2, 2).is_err());
        assert!(difference_of_gaussians(img.view(), 3, 1).is_err());
    }
}
