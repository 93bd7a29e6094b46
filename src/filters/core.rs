//! Core convolution utilities shared by multiple filters.
//!
//! This module provides:
//! - The `ImageGrid` alias and the border policy used by windowed filters
//! - Kernel value objects (Gaussian, box, separable outer products)
//! - Generic 2D and separable convolution
//!
//! ## Convolution Semantics
//!
//! `convolve` is a true convolution (the kernel is flipped), anchored at
//! `(rows / 2, cols / 2)`. The output has the same shape as the input and
//! every channel is filtered independently.
//!
//! ## Border Policy
//!
//! Convolution pads with zeros by default (`BorderMode::Zero`). A border
//! pixel of a constant image blurred with a normalized kernel is therefore
//! darker than the interior.

use ndarray::{Array2, Array3, ArrayView3, Zip};

use crate::error::{FilterError, Result};

/// Dense (height, width, channels) float image, nominal range 0-255.
pub type ImageGrid = Array3<f32>;

/// How windowed operators read samples that fall outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Out-of-bounds samples read as 0.0.
    #[default]
    Zero,
    /// Out-of-bounds samples read the nearest edge pixel.
    Replicate,
}

impl BorderMode {
    /// Map a possibly out-of-range coordinate onto the grid.
    ///
    /// Returns `None` when the sample should read as zero.
    #[inline]
    pub fn resolve(self, index: isize, len: usize) -> Option<usize> {
        if index >= 0 && (index as usize) < len {
            return Some(index as usize);
        }
        match self {
            BorderMode::Zero => None,
            BorderMode::Replicate => Some(index.clamp(0, len as isize - 1) as usize),
        }
    }
}

// ============================================================================
// Kernels
// ============================================================================

/// Immutable 2D filter kernel (rows = height, cols = width).
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<f32>,
}

impl Kernel {
    /// Wrap an explicit weight grid. Empty grids are rejected.
    pub fn new(weights: Array2<f32>) -> Result<Self> {
        if weights.is_empty() {
            return Err(FilterError::DegenerateInput("empty kernel".into()));
        }
        Ok(Kernel { weights })
    }

    /// Outer product `column ⊗ row` of two 1D kernels.
    pub fn separable(column: &[f32], row: &[f32]) -> Result<Self> {
        let weights = Array2::from_shape_fn((column.len(), row.len()), |(i, j)| column[i] * row[j]);
        Kernel::new(weights)
    }

    /// Normalized `width x height` box kernel (every weight `1 / (w * h)`).
    pub fn box_mean(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::invalid("window", 0.0f32, "at least 1x1"));
        }
        let area = (width * height) as f32;
        Kernel::new(Array2::from_elem((height, width), 1.0 / area))
    }

    /// Normalized separable Gaussian sampled over a `width x height` support.
    ///
    /// A missing (or non-positive) sigma is derived from the window length
    /// as `0.25 * len + 0.75`.
    pub fn gaussian(
        width: usize,
        height: usize,
        sigma_x: Option<f32>,
        sigma_y: Option<f32>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(FilterError::invalid("kernel size", 0.0f32, "at least 1x1"));
        }
        let column = gaussian_kernel_1d(height, sigma_y);
        let row = gaussian_kernel_1d(width, sigma_x);
        Kernel::separable(&column, &row)
    }

    pub fn weights(&self) -> &Array2<f32> {
        &self.weights
    }

    pub fn width(&self) -> usize {
        self.weights.ncols()
    }

    pub fn height(&self) -> usize {
        self.weights.nrows()
    }

    pub fn sum(&self) -> f32 {
        self.weights.sum()
    }
}

/// Generate a normalized 1D Gaussian of `len` taps centered at `len / 2`.
pub fn gaussian_kernel_1d(len: usize, sigma: Option<f32>) -> Vec<f32> {
    if len == 0 {
        return Vec::new();
    }
    let sigma = match sigma {
        Some(s) if s > 0.0 => s,
        _ => 0.25 * len as f32 + 0.75,
    };
    let half = (len / 2) as f32;

    let mut kernel: Vec<f32> = (0..len)
        .map(|i| {
            let x = i as f32 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

// ============================================================================
// Convolution
// ============================================================================

/// Convolve every channel with `kernel`, zero-padding at the borders.
pub fn convolve(input: ArrayView3<f32>, kernel: &Kernel) -> Array3<f32> {
    convolve_with_border(input, kernel, BorderMode::Zero)
}

/// Convolve every channel with `kernel` using an explicit border policy.
pub fn convolve_with_border(input: ArrayView3<f32>, kernel: &Kernel, border: BorderMode) -> Array3<f32> {
    let (height, width, _) = input.dim();
    let weights = kernel.weights();
    let (k_rows, k_cols) = weights.dim();
    let anchor_y = (k_rows / 2) as isize;
    let anchor_x = (k_cols / 2) as isize;

    let mut output = Array3::<f32>::zeros(input.dim());
    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let mut sum = 0.0f32;
        for ky in 0..k_rows {
            let Some(sy) = border.resolve(y as isize + anchor_y - ky as isize, height) else {
                continue;
            };
            for kx in 0..k_cols {
                let Some(sx) = border.resolve(x as isize + anchor_x - kx as isize, width) else {
                    continue;
                };
                sum += weights[[ky, kx]] * input[[sy, sx, c]];
            }
        }
        *out = sum;
    });

    output
}

/// Separable convolution: `column` runs down the rows, `row` across the
/// columns. Equivalent to `convolve` with `Kernel::separable(column, row)`.
pub fn convolve_separable(input: ArrayView3<f32>, column: &[f32], row: &[f32]) -> Array3<f32> {
    convolve_separable_with_border(input, column, row, BorderMode::Zero)
}

/// Separable convolution with an explicit border policy.
pub fn convolve_separable_with_border(
    input: ArrayView3<f32>,
    column: &[f32],
    row: &[f32],
    border: BorderMode,
) -> Array3<f32> {
    let (height, width, _) = input.dim();
    let col_anchor = (column.len() / 2) as isize;
    let row_anchor = (row.len() / 2) as isize;

    // Horizontal pass
    let mut temp = Array3::<f32>::zeros(input.dim());
    Zip::indexed(&mut temp).par_for_each(|(y, x, c), out| {
        let mut sum = 0.0f32;
        for (k, &kv) in row.iter().enumerate() {
            if let Some(sx) = border.resolve(x as isize + row_anchor - k as isize, width) {
                sum += kv * input[[y, sx, c]];
            }
        }
        *out = sum;
    });

    // Vertical pass
    let mut output = Array3::<f32>::zeros(input.dim());
    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let mut sum = 0.0f32;
        for (k, &kv) in column.iter().enumerate() {
            if let Some(sy) = border.resolve(y as isize + col_anchor - k as isize, height) {
                sum += kv * temp[[sy, x, c]];
            }
        }
        *out = sum;
    });

    output
}

/// Normalized box mean over a `window x window` neighborhood (zero-padded).
pub fn box_mean(input: ArrayView3<f32>, window: usize) -> Result<Array3<f32>> {
    let kernel = Kernel::box_mean(window, window)?;
    Ok(convolve(input, &kernel))
}

/// Gaussian blur with an explicit window and sigma.
pub fn gaussian_blur(
    input: ArrayView3<f32>,
    window_width: usize,
    window_height: usize,
    sigma: f32,
) -> Result<Array3<f32>> {
    let kernel = Kernel::gaussian(window_width, window_height, Some(sigma), Some(sigma))?;
    Ok(convolve(input, &kernel))
}
