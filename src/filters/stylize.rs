//! Stylize filters: Emboss.
//!
//! Emboss shades the luminance surface of an image as if lit by a distant
//! light source, producing a raised relief.

use std::f32::consts::PI;

use log::warn;
use ndarray::{Array3, ArrayView3, Zip};

use super::core::{convolve_separable_with_border, BorderMode};
use super::grayscale::to_grayscale;
use crate::error::{ensure_range, Result};

/// Scale of the light vector; also the brightness of a flat, fully lit area.
const LIGHT_SCALE: f32 = 255.99;

/// Centered difference stencil `I(n - 1) - I(n + 1)` (convolution order).
const DIFFERENCE: [f32; 3] = [-1.0, 0.0, 1.0];

// ============================================================================
// Emboss
// ============================================================================

/// Apply emboss effect.
///
/// The surface normal at each pixel is `(gx, gy, 6 * 255 / depth)` where
/// `gx = I(x - 1) - I(x + 1)` and `gy = I(y - 1) - I(y + 1)` are centered
/// luminance differences, so a slope is lit from its downhill side.
/// The output is the normal's projection onto the light vector, or 0 where
/// the surface faces away from the light.
///
/// A `depth` outside [1, 100] leaves the image untouched.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `azimuth` - Light direction in the image plane, degrees in [0, 360]
/// * `elevation` - Light angle above the image plane, degrees in [0, 180]
/// * `depth` - Relief strength in [1, 100]
///
/// # Returns
/// Shaded single-channel image (height, width, 1)
pub fn emboss(input: ArrayView3<f32>, azimuth: f32, elevation: f32, depth: f32) -> Result<Array3<f32>> {
    if !(1.0..=100.0).contains(&depth) {
        warn!("emboss: depth {} outside [1, 100], returning input unchanged", depth);
        return Ok(input.to_owned());
    }
    ensure_range("azimuth", azimuth, 0.0, 360.0, "degrees in [0, 360]")?;
    ensure_range("elevation", elevation, 0.0, 180.0, "degrees in [0, 180]")?;

    let gray = to_grayscale(input)?;
    let border = BorderMode::Replicate;
    let gx = convolve_separable_with_border(gray.view(), &[1.0], &DIFFERENCE, border);
    let gy = convolve_separable_with_border(gray.view(), &DIFFERENCE, &[1.0], border);

    let phi = elevation * PI / 180.0;
    let theta = azimuth * PI / 180.0;
    let lx = phi.cos() * theta.cos() * LIGHT_SCALE;
    let ly = phi.cos() * theta.sin() * LIGHT_SCALE;
    let lz = phi.sin() * LIGHT_SCALE;
    let pixel_z = 6.0 * 255.0 / depth;

    let mut output = Array3::<f32>::zeros(gray.dim());
    Zip::from(&mut output)
        .and(&gx)
        .and(&gy)
        .par_for_each(|out, &x, &y| {
            let dot = x * lx + y * ly + pixel_z * lz;
            *out = if dot < 0.0 {
                0.0
            } else {
                dot / (x * x + y * y + pixel_z * pixel_z).sqrt()
            };
        });

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Array3<f32> {
        let mut img = Array3::<f32>::zeros((5, 6, 1));
        for y in 0..5 {
            for x in 0..6 {
                img[[y, x, 0]] = 10.0 * x as f32;
            }
        }
        img
    }

    #[test]
    fn test_flat_image_gets_light_intensity() {
        let img = Array3::<f32>::from_elem((4, 4, 3), 90.0);

        let overhead = emboss(img.view(), 0.0, 90.0, 10.0).unwrap();
        assert_eq!(overhead.dim(), (4, 4, 1));
        assert!(overhead.iter().all(|&v| (v - 255.99).abs() < 1e-2));

        let low = emboss(img.view(), 45.0, 30.0, 10.0).unwrap();
        assert!(low.iter().all(|&v| (v - 127.995).abs() < 1e-2));
    }

    #[test]
    fn test_slope_lit_from_its_downhill_side() {
        // Rises toward +x, so its normal leans toward -x
        let img = ramp();
        let lit = emboss(img.view(), 180.0, 0.0, 50.0).unwrap();
        let shaded = emboss(img.view(), 0.0, 0.0, 50.0).unwrap();

        // Interior gx = -20; light in the image plane along -x / +x
        assert!(lit[[2, 2, 0]] > 0.0);
        assert_eq!(shaded[[2, 2, 0]], 0.0);
        let pixel_z = 6.0 * 255.0 / 50.0;
        let expected = 20.0 * 255.99 / (20.0f32 * 20.0 + pixel_z * pixel_z).sqrt();
        assert!((lit[[2, 2, 0]] - expected).abs() < 1e-2);
    }

    #[test]
    fn test_vertical_slope_follows_row_axis() {
        let mut img = Array3::<f32>::zeros((6, 5, 1));
        for y in 0..6 {
            for x in 0..5 {
                img[[y, x, 0]] = 10.0 * y as f32;
            }
        }
        // Rises toward +y: lit from azimuth 270 (ly < 0), dark from 90
        let lit = emboss(img.view(), 270.0, 0.0, 50.0).unwrap();
        let shaded = emboss(img.view(), 90.0, 0.0, 50.0).unwrap();
        assert!(lit[[2, 2, 0]] > 100.0);
        assert_eq!(shaded[[2, 2, 0]], 0.0);
    }

    #[test]
    fn test_depth_out_of_range_is_identity() {
        let img = Array3::<f32>::from_elem((3, 3, 3), 42.0);
        assert_eq!(emboss(img.view(), 30.0, 45.0, 0.5).unwrap(), img);
        assert_eq!(emboss(img.view(), 30.0, 45.0, 101.0).unwrap(), img);
    }

    #[test]
    fn test_invalid_angles_rejected() {
        let img = ramp();
        assert!(emboss(img.view(), 361.0, 45.0, 10.0).is_err());
        assert!(emboss(img.view(), 90.0, -1.0, 10.0).is_err());
    }
}
