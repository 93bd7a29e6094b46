//! Filter modules for image processing.
//!
//! ## Supported Formats
//!
//! All filters work on `f32` grids of shape (height, width, channels):
//!
//! | Format | Shape | Description |
//! |--------|-------|-------------|
//! | Grayscale | (H, W, 1) | Single luminance channel, nominally 0-255 |
//! | RGB | (H, W, 3) | Red, green, blue, nominally 0-255 |
//!
//! Values are not clamped between steps; intermediate results may leave
//! the 0-255 range until `clamp` or `normalize_image` is applied.
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Pure** - Inputs are borrowed views, outputs are new arrays
//! - **Validated** - Out-of-range parameters return a `FilterError`
//! - **Thread-safe** - Per-pixel work runs on rayon through `Zip::par_for_each`
//! - **Seeded randomness** - Stochastic filters take the RNG as an argument
//!
//! ## Filter Categories
//!
//! - **Pixel-wise**: contrast, brightness, clamp, normalize
//! - **Convolution**: convolve, gaussian kernels, box mean, gaussian blur
//! - **Sharpen / band-pass**: unsharp mask, difference of gaussians
//! - **Geometry**: digital zoom, resize, translate, alpha blend
//! - **Noise**: hurl, spread, pick
//! - **Edge detection**: prewitt, sobel
//! - **Order statistic**: median, min, max
//! - **Edge-preserving smoothing**: bilateral
//! - **Morphology**: erode, dilate, boundary
//! - **Threshold**: fixed, otsu, adaptive, isodata
//! - **Stylize**: emboss

pub mod core;
pub mod grayscale;
pub mod color_adjust;
pub mod sharpen;
pub mod bandpass;
pub mod geometry;
pub mod noise;
pub mod edge;
pub mod order_statistic;
pub mod bilateral;
pub mod morphology;
pub mod threshold;
pub mod stylize;
