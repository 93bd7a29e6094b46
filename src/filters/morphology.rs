//! Morphology filters: Erode, Dilate, Boundary.
//!
//! Grayscale morphology with an arbitrary boolean structuring element. The
//! element is anchored at its center cell (`rows / 2`, `cols / 2`) and every
//! channel is processed independently.
//!
//! Footprint cells that fall outside the image are skipped, so borders are
//! not darkened by erosion nor brightened by dilation.

use ndarray::{Array2, Array3, ArrayView3, Zip};

use super::color_adjust::normalize_image;
use crate::error::{FilterError, Result};

// ============================================================================
// Structuring Element
// ============================================================================

/// Boolean footprint of a morphological operator.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuringElement {
    footprint: Array2<bool>,
}

impl StructuringElement {
    /// Wrap a footprint. At least one cell must be set.
    pub fn new(footprint: Array2<bool>) -> Result<Self> {
        if !footprint.iter().any(|&on| on) {
            return Err(FilterError::DegenerateInput(
                "structuring element has no active cells".to_string(),
            ));
        }
        Ok(Self { footprint })
    }

    /// Full `size x size` square.
    pub fn square(size: usize) -> Result<Self> {
        Self::rect(size, size)
    }

    /// Full rectangle, `width` columns by `height` rows.
    pub fn rect(width: usize, height: usize) -> Result<Self> {
        Self::new(Array2::from_elem((height, width), true))
    }

    /// Disk of the given radius (cells whose center lies within `radius`).
    pub fn disk(radius: f32) -> Result<Self> {
        if radius.is_nan() || radius < 0.0 {
            return Err(FilterError::invalid("radius", radius, "a radius >= 0"));
        }
        let r_ceil = radius.ceil() as usize;
        let r_sq = radius * radius;
        let size = 2 * r_ceil + 1;
        let footprint = Array2::from_shape_fn((size, size), |(y, x)| {
            let dy = y as f32 - r_ceil as f32;
            let dx = x as f32 - r_ceil as f32;
            dx * dx + dy * dy <= r_sq
        });
        Self::new(footprint)
    }

    pub fn footprint(&self) -> &Array2<bool> {
        &self.footprint
    }

    /// Active cells as offsets relative to the anchor.
    fn offsets(&self) -> Vec<(isize, isize)> {
        let (rows, cols) = self.footprint.dim();
        let (ay, ax) = ((rows / 2) as isize, (cols / 2) as isize);
        self.footprint
            .indexed_iter()
            .filter(|(_, on)| **on)
            .map(|((y, x), _)| (y as isize - ay, x as isize - ax))
            .collect()
    }
}

// ============================================================================
// Erode / Dilate
// ============================================================================

/// Apply erosion to image.
///
/// Erode takes the minimum value in the neighborhood,
/// making dark regions grow and bright regions shrink.
///
/// # Arguments
/// * `input` - Image (height, width, channels)
/// * `element` - Footprint of the neighborhood
///
/// # Returns
/// Eroded image with same shape
pub fn erode(input: ArrayView3<f32>, element: &StructuringElement) -> Array3<f32> {
    extremum(input, element, f32::INFINITY, f32::min)
}

/// Apply dilation to image.
///
/// Dilate takes the maximum value in the neighborhood,
/// making bright regions grow and dark regions shrink.
pub fn dilate(input: ArrayView3<f32>, element: &StructuringElement) -> Array3<f32> {
    extremum(input, element, f32::NEG_INFINITY, f32::max)
}

fn extremum<F>(input: ArrayView3<f32>, element: &StructuringElement, init: f32, pick: F) -> Array3<f32>
where
    F: Fn(f32, f32) -> f32 + Sync + Send,
{
    let (height, width, _) = input.dim();
    let offsets = element.offsets();

    let mut output = Array3::<f32>::zeros(input.dim());
    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let mut acc = init;
        let mut seen = false;
        for &(dy, dx) in &offsets {
            let sy = y as isize + dy;
            let sx = x as isize + dx;
            if sy < 0 || sx < 0 || sy >= height as isize || sx >= width as isize {
                continue;
            }
            acc = pick(acc, input[[sy as usize, sx as usize, c]]);
            seen = true;
        }
        *out = if seen { acc } else { input[[y, x, c]] };
    });
    output
}

// ============================================================================
// Boundary
// ============================================================================

/// Morphological boundary: `normalize(input - erode(input))`.
///
/// Larger elements give thicker boundaries. A flat image has no boundary
/// and comes back as all zeros.
pub fn boundary(input: ArrayView3<f32>, element: &StructuringElement) -> Array3<f32> {
    let eroded = erode(input, element);
    let difference = &input - &eroded;
    normalize_image(difference.view())
}
