//! Grayscale conversion.
//!
//! Uses ITU-R BT.709 luminosity coefficients. Edge detection, every
//! thresholding variant and emboss work on the single-channel result.

use ndarray::{Array3, ArrayView3, Axis, Zip};

use crate::error::{ensure_grid, Result};

/// ITU-R BT.709 luminosity coefficients
pub const LUMA_R: f32 = 0.2126;
pub const LUMA_G: f32 = 0.7152;
pub const LUMA_B: f32 = 0.0722;

/// Convert an image to a single luminance channel.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
///
/// # Returns
/// Array of shape (height, width, 1). Single-channel input is copied as-is.
pub fn to_grayscale(input: ArrayView3<f32>) -> Result<Array3<f32>> {
    ensure_grid(input.dim())?;
    let (height, width, channels) = input.dim();
    if channels == 1 {
        return Ok(input.to_owned());
    }

    let mut output = Array3::<f32>::zeros((height, width, 1));
    Zip::from(output.index_axis_mut(Axis(2), 0))
        .and(input.index_axis(Axis(2), 0))
        .and(input.index_axis(Axis(2), 1))
        .and(input.index_axis(Axis(2), 2))
        .par_for_each(|gray, &r, &g, &b| {
            *gray = LUMA_R * r + LUMA_G * g + LUMA_B * b;
        });

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grayscale_red() {
        let mut img = Array3::<f32>::zeros((1, 1, 3));
        img[[0, 0, 0]] = 255.0;

        let result = to_grayscale(img.view()).unwrap();

        assert_eq!(result.dim(), (1, 1, 1));
        // 0.2126 * 255 ≈ 54.2
        assert!((result[[0, 0, 0]] - 54.213).abs() < 0.01);
    }

    #[test]
    fn test_grayscale_white_stays_white() {
        let img = Array3::<f32>::from_elem((2, 3, 3), 255.0);
        let result = to_grayscale(img.view()).unwrap();
        assert!(result.iter().all(|&v| (v - 255.0).abs() < 1e-3));
    }

    #[test]
    fn test_grayscale_single_channel_passthrough() {
        let mut img = Array3::<f32>::zeros((2, 2, 1));
        img[[1, 0, 0]] = 17.0;
        let result = to_grayscale(img.view()).unwrap();
        assert_eq!(result, img);
    }

    #[test]
    fn test_grayscale_rejects_rgba() {
        let img = Array3::<f32>::zeros((2, 2, 4));
        assert!(to_grayscale(img.view()).is_err());
    }
}
