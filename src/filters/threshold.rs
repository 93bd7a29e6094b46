//! Segmentation thresholds: Fixed, Otsu, Adaptive, Iterative (isodata).
//!
//! Every variant converts the input to a single BT.709 luminance channel and
//! produces a binary (height, width, 1) image holding 0 or 255.
//!
//! ## Tie Policy
//!
//! A pixel equal to the threshold maps to 0. Only pixels strictly above the
//! threshold become 255.

use log::{debug, warn};
use ndarray::{Array3, ArrayView3, Zip};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::core::box_mean;
use super::grayscale::to_grayscale;
use super::order_statistic::{max_filter, median_filter, min_filter};
use crate::error::{FilterError, Result};

/// Iteration cap of the isodata loop unless the caller picks another.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Isodata stops once the level moves less than this between iterations.
pub const ISODATA_TOLERANCE: f32 = 0.01;

/// A binary image together with the level that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub image: Array3<f32>,
    pub level: f32,
}

// ============================================================================
// Fixed Threshold
// ============================================================================

/// Binarize at a fixed level: 255 where `pixel > level`, else 0.
pub fn threshold(input: ArrayView3<f32>, level: f32) -> Result<Array3<f32>> {
    let gray = to_grayscale(input)?;
    Ok(binarize(gray.view(), level))
}

fn binarize(gray: ArrayView3<f32>, level: f32) -> Array3<f32> {
    let mut output = Array3::<f32>::zeros(gray.dim());
    Zip::from(&mut output).and(&gray).par_for_each(|out, &v| {
        *out = if v > level { 255.0 } else { 0.0 };
    });
    output
}

// ============================================================================
// Otsu
// ============================================================================

/// 256-bin histogram of a single-channel grid.
///
/// Samples are clamped to [0, 255] and floored into their bin. NaN samples
/// are not counted.
pub fn histogram(gray: ArrayView3<f32>) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for &v in gray.iter().filter(|v| !v.is_nan()) {
        hist[v.clamp(0.0, 255.0) as usize] += 1;
    }
    hist
}

/// Level maximizing Otsu's between-class variance.
///
/// When several levels share the maximum, the level halfway between the
/// smallest and the largest of them is returned. A histogram with a single
/// occupied bin has no split; its bin is returned.
pub fn otsu_level(hist: &[u64; 256]) -> f32 {
    let total: u64 = hist.iter().sum();
    let sum_all: f64 = hist.iter().enumerate().map(|(k, &n)| k as f64 * n as f64).sum();

    let mut weight_below = 0u64;
    let mut sum_below = 0.0f64;
    let mut best = 0.0f64;
    let mut first_best: Option<usize> = None;
    let mut last_best = 0usize;

    for (k, &count) in hist.iter().enumerate() {
        weight_below += count;
        sum_below += k as f64 * count as f64;
        let weight_above = total - weight_below;
        if weight_below == 0 || weight_above == 0 {
            continue;
        }

        let mean_below = sum_below / weight_below as f64;
        let mean_above = (sum_all - sum_below) / weight_above as f64;
        let diff = mean_below - mean_above;
        let variance = weight_below as f64 * weight_above as f64 * diff * diff;

        if first_best.is_none() || variance > best {
            best = variance;
            first_best = Some(k);
            last_best = k;
        } else if variance == best {
            last_best = k;
        }
    }

    match first_best {
        Some(first) => (first + last_best) as f32 / 2.0,
        None => {
            let occupied = hist.iter().position(|&n| n > 0).unwrap_or(0);
            debug!("otsu_level: single occupied bin {}, no split", occupied);
            occupied as f32
        }
    }
}

/// Otsu's global threshold.
pub fn otsu(input: ArrayView3<f32>) -> Result<Segmentation> {
    let gray = to_grayscale(input)?;
    let level = otsu_level(&histogram(gray.view()));
    debug!("otsu: level {}", level);
    Ok(Segmentation {
        image: binarize(gray.view(), level),
        level,
    })
}

// ============================================================================
// Adaptive Threshold
// ============================================================================

/// Local statistic an adaptive threshold compares each pixel against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptiveKind {
    /// Zero-padded box mean.
    Mean,
    Median,
    /// Midpoint of the local minimum and maximum.
    MinMaxAvg,
}

/// Threshold each pixel against a statistic of its `window x window`
/// neighborhood.
///
/// With `diff = local - pixel`, pixels where `diff < bias` come out 255 and
/// all others 0, i.e. pixels noticeably darker than their surroundings
/// become the black foreground.
///
/// # Arguments
/// * `input` - Image with 1 or 3 channels
/// * `kind` - Local statistic
/// * `window` - Side length of the square neighborhood (>= 1)
/// * `bias` - Minimum darkening for a pixel to count as foreground
pub fn adaptive_threshold(
    input: ArrayView3<f32>,
    kind: AdaptiveKind,
    window: usize,
    bias: f32,
) -> Result<Array3<f32>> {
    if bias.is_nan() {
        return Err(FilterError::invalid("bias", bias, "a finite bias"));
    }
    let gray = to_grayscale(input)?;
    let local = match kind {
        AdaptiveKind::Mean => box_mean(gray.view(), window)?,
        AdaptiveKind::Median => median_filter(gray.view(), window, window)?,
        AdaptiveKind::MinMaxAvg => {
            let lo = min_filter(gray.view(), window, window)?;
            let hi = max_filter(gray.view(), window, window)?;
            (lo + hi) * 0.5
        }
    };

    let mut output = Array3::<f32>::zeros(gray.dim());
    Zip::from(&mut output)
        .and(&gray)
        .and(&local)
        .par_for_each(|out, &v, &m| {
            let marked = if m - v < bias { 0.0 } else { 255.0 };
            // inverted polarity
            *out = 255.0 - marked;
        });
    Ok(output)
}

// ============================================================================
// Iterative Threshold (isodata)
// ============================================================================

/// Result of the isodata loop.
#[derive(Debug, Clone, PartialEq)]
pub struct IsodataOutcome {
    pub segmentation: Segmentation,
    /// Iterations run, including the converging one.
    pub iterations: usize,
    pub converged: bool,
}

impl IsodataOutcome {
    /// The segmentation, or `NonConvergence` carrying the best estimate
    /// when the cap was hit.
    pub fn into_converged(self) -> Result<Segmentation> {
        if self.converged {
            Ok(self.segmentation)
        } else {
            Err(FilterError::NonConvergence {
                iterations: self.iterations,
                best_estimate: self.segmentation.level,
            })
        }
    }
}

/// Mean of the samples above `level` and of the samples at or below it.
/// An empty side has mean 0.
fn region_means(samples: &[f32], level: f32) -> (f32, f32) {
    let (sum_hi, n_hi, sum_lo, n_lo) = samples
        .par_iter()
        .fold(
            || (0.0f64, 0usize, 0.0f64, 0usize),
            |(sh, nh, sl, nl), &v| {
                if v > level {
                    (sh + v as f64, nh + 1, sl, nl)
                } else {
                    (sh, nh, sl + v as f64, nl + 1)
                }
            },
        )
        .reduce(
            || (0.0, 0, 0.0, 0),
            |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2, a.3 + b.3),
        );
    let mean = |sum: f64, n: usize| if n == 0 { 0.0 } else { (sum / n as f64) as f32 };
    (mean(sum_hi, n_hi), mean(sum_lo, n_lo))
}

/// Isodata threshold.
///
/// Starts at the global mean and repeatedly moves the level to the average
/// of the two region means until it moves less than `ISODATA_TOLERANCE`.
/// After `max_iterations` without converging the current level is used and
/// the outcome is flagged as not converged.
pub fn iterative_threshold(input: ArrayView3<f32>, max_iterations: usize) -> Result<IsodataOutcome> {
    if max_iterations == 0 {
        return Err(FilterError::invalid(
            "max_iterations",
            max_iterations as f64,
            "at least one iteration",
        ));
    }
    let gray = to_grayscale(input)?;
    let samples: Vec<f32> = gray.iter().copied().collect();
    let mut level = gray.mean().unwrap_or(0.0);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < max_iterations {
        iterations += 1;
        let (above, below) = region_means(&samples, level);
        let next = (above + below) / 2.0;
        let step = (next - level).abs();
        level = next;
        if step < ISODATA_TOLERANCE {
            converged = true;
            break;
        }
    }

    if converged {
        debug!("iterative_threshold: level {} after {} iterations", level, iterations);
    } else {
        warn!(
            "iterative_threshold: no convergence after {} iterations, using level {}",
            iterations, level
        );
    }

    Ok(IsodataOutcome {
        segmentation: Segmentation {
            image: binarize(gray.view(), level),
            level,
        },
        iterations,
        converged,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level(h: usize, w: usize, dark_rows: usize, dark: f32, bright: f32) -> Array3<f32> {
        let mut img = Array3::<f32>::from_elem((h, w, 1), bright);
        for y in 0..dark_rows {
            for x in 0..w {
                img[[y, x, 0]] = dark;
            }
        }
        img
    }

    #[test]
    fn test_threshold_tie_goes_low() {
        let img = Array3::from_shape_vec((1, 3, 1), vec![99.0, 100.0, 101.0]).unwrap();
        let result = threshold(img.view(), 100.0).unwrap();
        assert_eq!(result.into_raw_vec_and_offset().0, vec![0.0, 0.0, 255.0]);
    }

    #[test]
    fn test_threshold_converts_rgb() {
        let img = Array3::<f32>::from_elem((2, 2, 3), 200.0);
        let result = threshold(img.view(), 128.0).unwrap();
        assert_eq!(result.dim(), (2, 2, 1));
        assert!(result.iter().all(|&v| v == 255.0));
    }

    #[test]
    fn test_otsu_bimodal_bisects_plateau() {
        // 40% at level 30, 60% at level 220
        let img = two_level(10, 10, 4, 30.0, 220.0);
        let seg = otsu(img.view()).unwrap();

        // Every split in [30, 219] separates the clusters identically
        assert_eq!(seg.level, 124.5);
        assert_eq!(seg.image[[0, 0, 0]], 0.0);
        assert_eq!(seg.image[[9, 9, 0]], 255.0);

        let again = threshold(seg.image.view(), seg.level).unwrap();
        assert_eq!(again, seg.image);
    }

    #[test]
    fn test_otsu_single_bin() {
        let img = Array3::<f32>::from_elem((3, 3, 1), 77.0);
        let seg = otsu(img.view()).unwrap();
        assert_eq!(seg.level, 77.0);
        assert!(seg.image.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_histogram_clamps() {
        let img = Array3::from_shape_vec((1, 4, 1), vec![-5.0, 0.5, 254.9, 300.0]).unwrap();
        let hist = histogram(img.view());
        assert_eq!(hist[0], 2);
        assert_eq!(hist[254], 1);
        assert_eq!(hist[255], 1);
    }

    #[test]
    fn test_adaptive_marks_dark_spot() {
        let mut img = Array3::<f32>::from_elem((5, 5, 1), 200.0);
        img[[2, 2, 0]] = 20.0;

        for kind in [AdaptiveKind::Mean, AdaptiveKind::Median, AdaptiveKind::MinMaxAvg] {
            let result = adaptive_threshold(img.view(), kind, 3, 5.0).unwrap();
            assert_eq!(result[[2, 2, 0]], 0.0, "{:?}", kind);
            // Pixels next to the spot are not darker than their surroundings
            assert_eq!(result[[0, 4, 0]], 255.0, "{:?}", kind);
        }
    }

    #[test]
    fn test_adaptive_rejects_empty_window() {
        let img = Array3::<f32>::zeros((3, 3, 1));
        assert!(adaptive_threshold(img.view(), AdaptiveKind::Median, 0, 0.0).is_err());
    }

    #[test]
    fn test_isodata_converges_to_midpoint() {
        let img = two_level(8, 8, 2, 50.0, 150.0);
        let outcome = iterative_threshold(img.view(), DEFAULT_MAX_ITERATIONS).unwrap();

        assert!(outcome.converged);
        assert!(outcome.iterations <= 3);
        assert!((outcome.segmentation.level - 100.0).abs() < 1e-3);
        assert_eq!(outcome.segmentation.image[[0, 0, 0]], 0.0);
        assert_eq!(outcome.segmentation.image[[7, 7, 0]], 255.0);
    }

    #[test]
    fn test_isodata_cap_reports_best_estimate() {
        let img = two_level(8, 8, 2, 50.0, 150.0);
        let outcome = iterative_threshold(img.view(), 1).unwrap();
        assert!(!outcome.converged);

        match outcome.into_converged() {
            Err(FilterError::NonConvergence { iterations, best_estimate }) => {
                assert_eq!(iterations, 1);
                assert!((best_estimate - 100.0).abs() < 1e-3);
            }
            other => panic!("expected NonConvergence, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_is_degenerate() {
        let img = Array3::<f32>::zeros((0, 4, 1));
        assert!(matches!(threshold(img.view(), 1.0), Err(FilterError::DegenerateInput(_))));
        assert!(matches!(otsu(img.view()), Err(FilterError::DegenerateInput(_))));
        assert!(iterative_threshold(img.view(), 10).is_err());
    }
}
