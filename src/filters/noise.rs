//! Noise synthesis: Hurl, Spread, Pick.
//!
//! All three replace pixels at random. Hurl introduces new random colors;
//! Spread and Pick only move existing colors around by copying from a
//! randomly chosen neighbor.
//!
//! ## Randomness
//!
//! Every operator takes the random source as an argument. Seed a
//! `rand::rngs::StdRng` for reproducible output.
//!
//! ## Random Neighbor Gather
//!
//! Neighbor sampling is split into two stages: `neighbor_coordinates`
//! draws clamped source coordinates for every pixel, `gather` copies pixels
//! from those coordinates. The coordinate stage never looks at pixel values.

use log::debug;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Zip};
use rand::Rng;

use crate::error::{ensure_grid, ensure_range, FilterError, Result};

/// Number of pixels a `percent` replacement touches, rounded to nearest.
pub fn affected_pixel_count(height: usize, width: usize, percent: f32) -> usize {
    (percent / 100.0 * (height * width) as f32).round() as usize
}

/// Draw `count` flat pixel indices uniformly with replacement.
fn draw_pixel_indices<R: Rng + ?Sized>(rng: &mut R, pixels: usize, count: usize) -> Vec<usize> {
    (0..count).map(|_| rng.gen_range(0..pixels)).collect()
}

// ============================================================================
// Hurl
// ============================================================================

/// Replace a random subset of pixels with random colors.
///
/// Each of the `repeats` passes draws `round(percent / 100 * H * W)` pixel
/// indices with replacement and sets every channel of those pixels to an
/// independent uniform value in [0, 255). Passes run on the previous pass's
/// output.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels (height, width, channels)
/// * `percent` - Share of pixels hit per pass, 0.0-100.0
/// * `repeats` - Number of sequential passes
/// * `rng` - Random source
pub fn hurl<R: Rng + ?Sized>(
    input: ArrayView3<f32>,
    percent: f32,
    repeats: usize,
    rng: &mut R,
) -> Result<Array3<f32>> {
    ensure_grid(input.dim())?;
    ensure_range("percent", percent, 0.0, 100.0, "a percentage in [0, 100]")?;
    let (height, width, channels) = input.dim();
    let count = affected_pixel_count(height, width, percent);

    let mut output = input.to_owned();
    for pass in 0..repeats {
        let indices = draw_pixel_indices(rng, height * width, count);
        for idx in indices {
            let (y, x) = (idx / width, idx % width);
            for c in 0..channels {
                output[[y, x, c]] = 255.0 * rng.gen::<f32>();
            }
        }
        debug!("hurl pass {}: replaced {} pixels", pass, count);
    }

    Ok(output)
}

// ============================================================================
// Random Neighbor
// ============================================================================

/// Draw one source coordinate per pixel.
///
/// Offsets are independent uniform integers in `[-window_height,
/// window_height]` (rows) and `[-window_width, window_width]` (columns),
/// clamped to the grid. Each axis gets its own draw, so offsets cover the
/// whole window box rather than the line traced by a single draw scaled by
/// both window sizes. The result has shape `(height, width)` and holds
/// `(row, col)` pairs.
pub fn neighbor_coordinates<R: Rng + ?Sized>(
    height: usize,
    width: usize,
    window_width: usize,
    window_height: usize,
    rng: &mut R,
) -> Array2<(usize, usize)> {
    let wh = window_height as isize;
    let ww = window_width as isize;
    let max_y = height as isize - 1;
    let max_x = width as isize - 1;

    Array2::from_shape_fn((height, width), |(y, x)| {
        let dy = rng.gen_range(-wh..=wh);
        let dx = rng.gen_range(-ww..=ww);
        (
            (y as isize + dy).clamp(0, max_y) as usize,
            (x as isize + dx).clamp(0, max_x) as usize,
        )
    })
}

/// Copy every pixel from its source coordinate.
///
/// `coords` must have the same (height, width) as `input` and every
/// coordinate must lie inside the grid.
pub fn gather(input: ArrayView3<f32>, coords: ArrayView2<(usize, usize)>) -> Result<Array3<f32>> {
    let (height, width, _) = input.dim();
    if coords.dim() != (height, width) {
        return Err(FilterError::DimensionMismatch(format!(
            "coordinate field {:?} does not match image {}x{}",
            coords.dim(),
            height,
            width
        )));
    }
    if let Some(&(sy, sx)) = coords.iter().find(|&&(sy, sx)| sy >= height || sx >= width) {
        return Err(FilterError::DimensionMismatch(format!(
            "source coordinate ({}, {}) outside {}x{} grid",
            sy, sx, height, width
        )));
    }

    let mut output = Array3::<f32>::zeros(input.dim());
    Zip::indexed(&mut output).par_for_each(|(y, x, c), v| {
        let (sy, sx) = coords[[y, x]];
        *v = input[[sy, sx, c]];
    });
    Ok(output)
}

/// Replace every pixel by a random pixel from its neighborhood window.
pub fn get_random_neighbor<R: Rng + ?Sized>(
    input: ArrayView3<f32>,
    window_width: usize,
    window_height: usize,
    rng: &mut R,
) -> Result<Array3<f32>> {
    ensure_grid(input.dim())?;
    let (height, width, _) = input.dim();
    let coords = neighbor_coordinates(height, width, window_width, window_height, rng);
    gather(input, coords.view())
}

// ============================================================================
// Spread / Pick
// ============================================================================

/// Spread: full-image random neighbor replacement. Introduces no new colors.
pub fn spread<R: Rng + ?Sized>(
    input: ArrayView3<f32>,
    window_width: usize,
    window_height: usize,
    rng: &mut R,
) -> Result<Array3<f32>> {
    get_random_neighbor(input, window_width, window_height, rng)
}

/// Pick: replace a random subset of pixels with a random pixel in its 3x3
/// neighborhood. The draw includes the pixel itself.
///
/// Each pass draws the same number of pixel indices as `hurl`, builds a
/// 1x1-window neighbor field of the running output and overwrites only the
/// selected pixels with their swapped neighbor. Unselected pixels keep
/// their previous values.
pub fn pick<R: Rng + ?Sized>(
    input: ArrayView3<f32>,
    percent: f32,
    repeats: usize,
    rng: &mut R,
) -> Result<Array3<f32>> {
    ensure_grid(input.dim())?;
    ensure_range("percent", percent, 0.0, 100.0, "a percentage in [0, 100]")?;
    let (height, width, channels) = input.dim();
    let count = affected_pixel_count(height, width, percent);

    let mut output = input.to_owned();
    for _ in 0..repeats {
        let indices = draw_pixel_indices(rng, height * width, count);
        let swapped = get_random_neighbor(output.view(), 1, 1, rng)?;
        for idx in indices {
            let (y, x) = (idx / width, idx % width);
            for c in 0..channels {
                output[[y, x, c]] = swapped[[y, x, c]];
            }
        }
    }

    Ok(output)
}
