//! Order-statistic filters: Median, Min, Max.
//!
//! Sliding-window rank filters applied independently to every channel.
//! Windows are `width` columns by `height` rows centered on the pixel; for
//! even sizes the extra tap lies after the center. Samples outside the grid
//! replicate the nearest edge pixel, so a flat image stays flat all the way
//! to its borders.

use ndarray::{Array3, ArrayView3, Zip};

use super::core::BorderMode;
use crate::error::{FilterError, Result};

/// Apply a median filter.
///
/// Removes salt-and-pepper noise while preserving edges. For windows with
/// an even tap count the upper median is taken.
pub fn median_filter(input: ArrayView3<f32>, width: usize, height: usize) -> Result<Array3<f32>> {
    rank_filter(input, width, height, |values| {
        let mid = values.len() / 2;
        let (_, median, _) = values.select_nth_unstable_by(mid, f32::total_cmp);
        *median
    })
}

/// Sliding-window minimum.
pub fn min_filter(input: ArrayView3<f32>, width: usize, height: usize) -> Result<Array3<f32>> {
    rank_filter(input, width, height, |values| {
        values.iter().copied().fold(f32::INFINITY, f32::min)
    })
}

/// Sliding-window maximum.
pub fn max_filter(input: ArrayView3<f32>, width: usize, height: usize) -> Result<Array3<f32>> {
    rank_filter(input, width, height, |values| {
        values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    })
}

fn rank_filter<F>(input: ArrayView3<f32>, width: usize, height: usize, select: F) -> Result<Array3<f32>>
where
    F: Fn(&mut [f32]) -> f32 + Sync + Send,
{
    if width == 0 || height == 0 {
        return Err(FilterError::invalid(
            "window",
            width.min(height) as f64,
            "a window of at least 1x1",
        ));
    }
    let (img_h, img_w, _) = input.dim();
    let y_start = -(((height - 1) / 2) as isize);
    let x_start = -(((width - 1) / 2) as isize);

    let mut output = Array3::<f32>::zeros(input.dim());
    Zip::indexed(&mut output).par_for_each(|(y, x, c), out| {
        let mut values: Vec<f32> = Vec::with_capacity(width * height);
        for dy in 0..height as isize {
            let Some(sy) = BorderMode::Replicate.resolve(y as isize + y_start + dy, img_h) else {
                continue;
            };
            for dx in 0..width as isize {
                let Some(sx) = BorderMode::Replicate.resolve(x as isize + x_start + dx, img_w) else {
                    continue;
                };
                values.push(input[[sy, sx, c]]);
            }
        }
        *out = select(&mut values);
    });

    Ok(output)
}
