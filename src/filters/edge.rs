//! Edge detection: Prewitt, Sobel.
//!
//! Both operators are separable 3x3 stencils: a smoothing tap triple along
//! one axis and a difference triple along the other, scaled so that a unit
//! step produces a unit-order response. Multi-channel input is converted to
//! BT.709 luminance first.
//!
//! Output is a gradient magnitude (`hypot(gx, gy)`) and a direction
//! (`atan2(gy, gx)`, radians) map, both single-channel. Where both gradients
//! vanish the direction is 0.
//!
//! Borders replicate the edge pixel, so a flat image has zero magnitude
//! everywhere, including the outermost rows and columns.

use ndarray::{Array3, ArrayView3, Zip};

use super::core::{convolve_separable_with_border, BorderMode};
use super::grayscale::to_grayscale;
use crate::error::Result;

/// A separable 3x3 gradient stencil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientOperator {
    pub smoothing: [f32; 3],
    pub difference: [f32; 3],
    pub scale: f32,
}

impl GradientOperator {
    pub const PREWITT: GradientOperator = GradientOperator {
        smoothing: [1.0, 1.0, 1.0],
        difference: [-1.0, 0.0, 1.0],
        scale: 1.0 / 6.0,
    };

    pub const SOBEL: GradientOperator = GradientOperator {
        smoothing: [1.0, 2.0, 1.0],
        difference: [1.0, 0.0, -1.0],
        scale: 1.0 / 8.0,
    };

    /// Horizontal (`gx`, across columns) and vertical (`gy`, down rows)
    /// gradients of every channel of `input`.
    pub fn gradients(&self, input: ArrayView3<f32>) -> (Array3<f32>, Array3<f32>) {
        let border = BorderMode::Replicate;
        let mut gx = convolve_separable_with_border(input, &self.smoothing, &self.difference, border);
        let mut gy = convolve_separable_with_border(input, &self.difference, &self.smoothing, border);
        gx.mapv_inplace(|v| v * self.scale);
        gy.mapv_inplace(|v| v * self.scale);
        (gx, gy)
    }
}

/// Gradient magnitude and direction maps, shape (height, width, 1).
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMap {
    pub magnitude: Array3<f32>,
    pub direction: Array3<f32>,
}

/// Detect edges with the given stencil.
pub fn detect_edges(input: ArrayView3<f32>, operator: &GradientOperator) -> Result<EdgeMap> {
    let gray = to_grayscale(input)?;
    let (gx, gy) = operator.gradients(gray.view());

    let mut magnitude = Array3::<f32>::zeros(gray.dim());
    let mut direction = Array3::<f32>::zeros(gray.dim());
    Zip::from(&mut magnitude)
        .and(&mut direction)
        .and(&gx)
        .and(&gy)
        .par_for_each(|m, d, &x, &y| {
            *m = x.hypot(y);
            *d = if x == 0.0 && y == 0.0 { 0.0 } else { y.atan2(x) };
        });

    Ok(EdgeMap { magnitude, direction })
}

/// Prewitt edge detection.
pub fn prewitt(input: ArrayView3<f32>) -> Result<EdgeMap> {
    detect_edges(input, &GradientOperator::PREWITT)
}

/// Sobel edge detection.
pub fn sobel(input: ArrayView3<f32>) -> Result<EdgeMap> {
    detect_edges(input, &GradientOperator::SOBEL)
}
