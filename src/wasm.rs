//! WebAssembly exports for ImageEdit filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images cross the boundary as flat `f32` buffers in row-major
//! (height, width, channels) order with `channels` 1 or 3. Errors are
//! raised as JavaScript exceptions carrying the error message.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::error::FilterError;
use crate::filters::color_adjust::{change_brightness, change_contrast};
use crate::filters::edge::sobel;
use crate::filters::stylize::emboss;
use crate::filters::threshold::{otsu, threshold};

fn to_js(err: FilterError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn grid(data: &[f32], width: usize, height: usize, channels: usize) -> Result<Array3<f32>, JsValue> {
    Array3::from_shape_vec((height, width, channels), data.to_vec()).map_err(|_| {
        JsValue::from_str(&format!(
            "buffer of {} values does not hold a {}x{}x{} image",
            data.len(),
            height,
            width,
            channels
        ))
    })
}

fn flat(image: Array3<f32>) -> Vec<f32> {
    image.into_raw_vec_and_offset().0
}

// ============================================================================
// Pointwise
// ============================================================================

/// Adjust contrast, `amount` in [-1, 1].
///
/// # Arguments
/// * `data` - Flat array of floats (length = width * height * channels)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - 1 or 3
#[wasm_bindgen]
pub fn contrast_wasm(data: &[f32], width: usize, height: usize, channels: usize, amount: f32) -> Result<Vec<f32>, JsValue> {
    let input = grid(data, width, height, channels)?;
    change_contrast(input.view(), amount).map(flat).map_err(to_js)
}

/// Raise brightness by `amount * 255`, `amount` in [0, 1].
#[wasm_bindgen]
pub fn brightness_wasm(data: &[f32], width: usize, height: usize, channels: usize, amount: f32) -> Result<Vec<f32>, JsValue> {
    let input = grid(data, width, height, channels)?;
    change_brightness(input.view(), amount, 255.0).map(flat).map_err(to_js)
}

// ============================================================================
// Edge / Threshold / Emboss
// ============================================================================

/// Sobel gradient magnitude (single channel).
#[wasm_bindgen]
pub fn sobel_magnitude_wasm(data: &[f32], width: usize, height: usize, channels: usize) -> Result<Vec<f32>, JsValue> {
    let input = grid(data, width, height, channels)?;
    sobel(input.view()).map(|edges| flat(edges.magnitude)).map_err(to_js)
}

/// Binarize at `level` (single channel, 0 or 255).
#[wasm_bindgen]
pub fn threshold_wasm(data: &[f32], width: usize, height: usize, channels: usize, level: f32) -> Result<Vec<f32>, JsValue> {
    let input = grid(data, width, height, channels)?;
    threshold(input.view(), level).map(flat).map_err(to_js)
}

/// Otsu binarization (single channel, 0 or 255).
#[wasm_bindgen]
pub fn otsu_wasm(data: &[f32], width: usize, height: usize, channels: usize) -> Result<Vec<f32>, JsValue> {
    let input = grid(data, width, height, channels)?;
    otsu(input.view()).map(|seg| flat(seg.image)).map_err(to_js)
}

/// Emboss with a light at `azimuth` / `elevation` degrees.
#[wasm_bindgen]
pub fn emboss_wasm(
    data: &[f32],
    width: usize,
    height: usize,
    channels: usize,
    azimuth: f32,
    elevation: f32,
    depth: f32,
) -> Result<Vec<f32>, JsValue> {
    let input = grid(data, width, height, channels)?;
    emboss(input.view(), azimuth, elevation, depth).map(flat).map_err(to_js)
}
