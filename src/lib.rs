//! ImageEdit Rust
//!
//! Image transform algorithms over dense float grids: tonal adjustment,
//! convolution, sharpening, zoom and compositing, noise synthesis, edge
//! detection, band-pass and order-statistic filtering, morphology,
//! thresholding and emboss. Python bindings via PyO3 and WASM bindings
//! for JavaScript are available behind features.
//!
//! ## Image Format
//! Filters operate on `f32` arrays of shape (height, width, channels):
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels
//!
//! Values are nominally 0-255. Every filter borrows its input and returns a
//! new array; failures are reported as `FilterError`.
//!
//! ## Chaining
//! `recipe::Recipe` loads a chain of filters from JSON and runs it with a
//! caller-supplied random source.

pub mod error;
pub mod filters;
pub mod recipe;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{FilterError, Result};
pub use filters::core::{BorderMode, ImageGrid, Kernel};
pub use recipe::{Recipe, Step};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::filters::bandpass;
    use crate::filters::bilateral as bilateral_mod;
    use crate::filters::color_adjust;
    use crate::filters::core::{self, Kernel};
    use crate::filters::edge;
    use crate::filters::geometry;
    use crate::filters::grayscale;
    use crate::filters::morphology::{self, StructuringElement};
    use crate::filters::noise as noise_mod;
    use crate::filters::order_statistic;
    use crate::filters::sharpen as sharpen_mod;
    use crate::filters::stylize;
    use crate::filters::threshold::{self as threshold_mod, AdaptiveKind};
    use crate::recipe::Recipe;

    type PyImage<'py> = Bound<'py, PyArray3<f32>>;

    // ========================================================================
    // Grayscale / Pointwise
    // ========================================================================

    /// Convert to a single BT.709 luminance channel.
    #[pyfunction]
    pub fn to_grayscale<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, f32>) -> PyResult<PyImage<'py>> {
        let result = grayscale::to_grayscale(image.as_array())?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    pub fn contrast<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        amount: f32,
    ) -> PyResult<PyImage<'py>> {
        let result = color_adjust::change_contrast(image.as_array(), amount)?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, amount, channel_max=255.0))]
    pub fn brightness<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        amount: f32,
        channel_max: f32,
    ) -> PyResult<PyImage<'py>> {
        let result = color_adjust::change_brightness(image.as_array(), amount, channel_max)?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, lo=0.0, hi=255.0))]
    pub fn clamp<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, f32>, lo: f32, hi: f32) -> PyImage<'py> {
        color_adjust::clamp(image.as_array(), lo, hi).into_pyarray(py)
    }

    #[pyfunction]
    pub fn normalize<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, f32>) -> PyImage<'py> {
        color_adjust::normalize_image(image.as_array()).into_pyarray(py)
    }

    // ========================================================================
    // Convolution / Sharpen / Band-pass
    // ========================================================================

    /// Convolve every channel with a 2D kernel (zero padding).
    #[pyfunction]
    pub fn convolve<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        kernel: PyReadonlyArray2<'py, f32>,
    ) -> PyResult<PyImage<'py>> {
        let kernel = Kernel::new(kernel.as_array().to_owned())?;
        Ok(core::convolve(image.as_array(), &kernel).into_pyarray(py))
    }

    #[pyfunction]
    pub fn gaussian_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        window: usize,
        sigma: f32,
    ) -> PyResult<PyImage<'py>> {
        let result = core::gaussian_blur(image.as_array(), window, window, sigma)?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, radius, amount=1.0))]
    pub fn unsharp_mask<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        radius: usize,
        amount: f32,
    ) -> PyResult<PyImage<'py>> {
        let result = sharpen_mod::unsharp_mask(image.as_array(), radius, amount)?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    pub fn difference_of_gaussians<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        radius_small: usize,
        radius_large: usize,
    ) -> PyResult<PyImage<'py>> {
        let result = bandpass::difference_of_gaussians(image.as_array(), radius_small, radius_large)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    #[pyfunction]
    pub fn digital_zoom<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        top: usize,
        left: usize,
        width: usize,
        height: usize,
    ) -> PyResult<PyImage<'py>> {
        let result = geometry::digital_zoom(image.as_array(), top, left, width, height)?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    pub fn alpha_blend<'py>(
        py: Python<'py>,
        foreground: PyReadonlyArray3<'py, f32>,
        background: PyReadonlyArray3<'py, f32>,
        mask: PyReadonlyArray3<'py, f32>,
    ) -> PyResult<PyImage<'py>> {
        let result = geometry::alpha_blend(foreground.as_array(), background.as_array(), mask.as_array())?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Noise
    // ========================================================================

    #[pyfunction]
    #[pyo3(signature = (image, percent, repeats=1, seed=0))]
    pub fn hurl<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        percent: f32,
        repeats: usize,
        seed: u64,
    ) -> PyResult<PyImage<'py>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = noise_mod::hurl(image.as_array(), percent, repeats, &mut rng)?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, window_width, window_height, seed=0))]
    pub fn spread<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        window_width: usize,
        window_height: usize,
        seed: u64,
    ) -> PyResult<PyImage<'py>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = noise_mod::spread(image.as_array(), window_width, window_height, &mut rng)?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, percent, repeats=1, seed=0))]
    pub fn pick<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        percent: f32,
        repeats: usize,
        seed: u64,
    ) -> PyResult<PyImage<'py>> {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = noise_mod::pick(image.as_array(), percent, repeats, &mut rng)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Edge Detection
    // ========================================================================

    /// Returns `(magnitude, direction)`.
    #[pyfunction]
    pub fn prewitt<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
    ) -> PyResult<(PyImage<'py>, PyImage<'py>)> {
        let edges = edge::prewitt(image.as_array())?;
        Ok((edges.magnitude.into_pyarray(py), edges.direction.into_pyarray(py)))
    }

    /// Returns `(magnitude, direction)`.
    #[pyfunction]
    pub fn sobel<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
    ) -> PyResult<(PyImage<'py>, PyImage<'py>)> {
        let edges = edge::sobel(image.as_array())?;
        Ok((edges.magnitude.into_pyarray(py), edges.direction.into_pyarray(py)))
    }

    // ========================================================================
    // Order Statistic / Morphology
    // ========================================================================

    #[pyfunction]
    pub fn median<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        width: usize,
        height: usize,
    ) -> PyResult<PyImage<'py>> {
        let result = order_statistic::median_filter(image.as_array(), width, height)?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    pub fn min_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        width: usize,
        height: usize,
    ) -> PyResult<PyImage<'py>> {
        let result = order_statistic::min_filter(image.as_array(), width, height)?;
        Ok(result.into_pyarray(py))
    }

    #[pyfunction]
    pub fn max_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        width: usize,
        height: usize,
    ) -> PyResult<PyImage<'py>> {
        let result = order_statistic::max_filter(image.as_array(), width, height)?;
        Ok(result.into_pyarray(py))
    }

    /// Edge-preserving smoothing.
    #[pyfunction]
    pub fn bilateral<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        spatial_sigma: f32,
        range_sigma: f32,
    ) -> PyResult<PyImage<'py>> {
        let result = bilateral_mod::bilateral(image.as_array(), spatial_sigma, range_sigma)?;
        Ok(result.into_pyarray(py))
    }

    /// Erosion with a disk of the given radius.
    #[pyfunction]
    pub fn erode<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, f32>, radius: f32) -> PyResult<PyImage<'py>> {
        let element = StructuringElement::disk(radius)?;
        Ok(morphology::erode(image.as_array(), &element).into_pyarray(py))
    }

    /// Dilation with a disk of the given radius.
    #[pyfunction]
    pub fn dilate<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, f32>, radius: f32) -> PyResult<PyImage<'py>> {
        let element = StructuringElement::disk(radius)?;
        Ok(morphology::dilate(image.as_array(), &element).into_pyarray(py))
    }

    /// Boundary extraction with a `size x size` square element.
    #[pyfunction]
    #[pyo3(signature = (image, size=3))]
    pub fn boundary<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, f32>, size: usize) -> PyResult<PyImage<'py>> {
        let element = StructuringElement::square(size)?;
        Ok(morphology::boundary(image.as_array(), &element).into_pyarray(py))
    }

    // ========================================================================
    // Threshold / Stylize
    // ========================================================================

    #[pyfunction]
    pub fn threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        level: f32,
    ) -> PyResult<PyImage<'py>> {
        let result = threshold_mod::threshold(image.as_array(), level)?;
        Ok(result.into_pyarray(py))
    }

    /// Returns `(binary_image, level)`.
    #[pyfunction]
    pub fn otsu<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, f32>) -> PyResult<(PyImage<'py>, f32)> {
        let seg = threshold_mod::otsu(image.as_array())?;
        Ok((seg.image.into_pyarray(py), seg.level))
    }

    /// `kind` is one of "mean", "median", "min_max_avg".
    #[pyfunction]
    #[pyo3(signature = (image, kind, window=3, bias=0.0))]
    pub fn adaptive_threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        kind: &str,
        window: usize,
        bias: f32,
    ) -> PyResult<PyImage<'py>> {
        let kind = match kind {
            "mean" => AdaptiveKind::Mean,
            "median" => AdaptiveKind::Median,
            "min_max_avg" => AdaptiveKind::MinMaxAvg,
            other => {
                return Err(PyValueError::new_err(format!(
                    "unknown adaptive kind '{}', expected mean, median or min_max_avg",
                    other
                )))
            }
        };
        let result = threshold_mod::adaptive_threshold(image.as_array(), kind, window, bias)?;
        Ok(result.into_pyarray(py))
    }

    /// Returns `(binary_image, level, converged)`.
    #[pyfunction]
    #[pyo3(signature = (image, max_iterations=threshold_mod::DEFAULT_MAX_ITERATIONS))]
    pub fn iterative_threshold<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        max_iterations: usize,
    ) -> PyResult<(PyImage<'py>, f32, bool)> {
        let outcome = threshold_mod::iterative_threshold(image.as_array(), max_iterations)?;
        let level = outcome.segmentation.level;
        Ok((outcome.segmentation.image.into_pyarray(py), level, outcome.converged))
    }

    #[pyfunction]
    pub fn emboss<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        azimuth: f32,
        elevation: f32,
        depth: f32,
    ) -> PyResult<PyImage<'py>> {
        let result = stylize::emboss(image.as_array(), azimuth, elevation, depth)?;
        Ok(result.into_pyarray(py))
    }

    // ========================================================================
    // Recipes
    // ========================================================================

    /// Run a JSON recipe on an image.
    #[pyfunction]
    #[pyo3(signature = (image, recipe_json, seed=0))]
    pub fn run_recipe<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, f32>,
        recipe_json: &str,
        seed: u64,
    ) -> PyResult<PyImage<'py>> {
        let recipe = Recipe::from_json(recipe_json)?;
        let mut rng = StdRng::seed_from_u64(seed);
        Ok(recipe.run(image.as_array(), &mut rng)?.into_pyarray(py))
    }

    /// ImageEdit Rust extension module
    #[pymodule]
    pub fn imageedit_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Pointwise
        m.add_function(wrap_pyfunction!(to_grayscale, m)?)?;
        m.add_function(wrap_pyfunction!(contrast, m)?)?;
        m.add_function(wrap_pyfunction!(brightness, m)?)?;
        m.add_function(wrap_pyfunction!(clamp, m)?)?;
        m.add_function(wrap_pyfunction!(normalize, m)?)?;

        // Convolution
        m.add_function(wrap_pyfunction!(convolve, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(unsharp_mask, m)?)?;
        m.add_function(wrap_pyfunction!(difference_of_gaussians, m)?)?;

        // Geometry
        m.add_function(wrap_pyfunction!(digital_zoom, m)?)?;
        m.add_function(wrap_pyfunction!(alpha_blend, m)?)?;

        // Noise
        m.add_function(wrap_pyfunction!(hurl, m)?)?;
        m.add_function(wrap_pyfunction!(spread, m)?)?;
        m.add_function(wrap_pyfunction!(pick, m)?)?;

        // Edge detection
        m.add_function(wrap_pyfunction!(prewitt, m)?)?;
        m.add_function(wrap_pyfunction!(sobel, m)?)?;

        // Order statistic / morphology
        m.add_function(wrap_pyfunction!(median, m)?)?;
        m.add_function(wrap_pyfunction!(min_filter, m)?)?;
        m.add_function(wrap_pyfunction!(max_filter, m)?)?;
        m.add_function(wrap_pyfunction!(bilateral, m)?)?;
        m.add_function(wrap_pyfunction!(erode, m)?)?;
        m.add_function(wrap_pyfunction!(dilate, m)?)?;
        m.add_function(wrap_pyfunction!(boundary, m)?)?;

        // Threshold / stylize
        m.add_function(wrap_pyfunction!(threshold, m)?)?;
        m.add_function(wrap_pyfunction!(otsu, m)?)?;
        m.add_function(wrap_pyfunction!(adaptive_threshold, m)?)?;
        m.add_function(wrap_pyfunction!(iterative_threshold, m)?)?;
        m.add_function(wrap_pyfunction!(emboss, m)?)?;

        m.add_function(wrap_pyfunction!(run_recipe, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::imageedit_rust;
