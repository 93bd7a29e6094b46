//! Filter recipes: a JSON-configured chain of filters.
//!
//! ```json
//! {
//!   "name": "denoise and segment",
//!   "steps": [
//!     { "op": "median", "width": 3, "height": 3 },
//!     { "op": "contrast", "contrast": 0.2 },
//!     { "op": "otsu" }
//!   ]
//! }
//! ```
//!
//! Steps run in order, each consuming the previous step's output. Omitted
//! fields take the defaults documented on each variant.

use std::fs;
use std::path::Path;

use log::debug;
use ndarray::{Array3, ArrayView3};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{FilterError, Result};
use crate::filters::bandpass::difference_of_gaussians;
use crate::filters::bilateral::bilateral;
use crate::filters::color_adjust::{change_brightness, change_contrast, clamp, normalize_image};
use crate::filters::core::gaussian_blur;
use crate::filters::edge::{prewitt, sobel};
use crate::filters::geometry::{digital_zoom, translate};
use crate::filters::grayscale::to_grayscale;
use crate::filters::morphology::{boundary, dilate, erode, StructuringElement};
use crate::filters::noise::{hurl, pick, spread};
use crate::filters::order_statistic::{max_filter, median_filter, min_filter};
use crate::filters::sharpen::unsharp_mask;
use crate::filters::stylize::emboss;
use crate::filters::threshold::{
    adaptive_threshold, iterative_threshold, otsu, threshold, AdaptiveKind, DEFAULT_MAX_ITERATIONS,
};

fn channel_max() -> f32 {
    255.0
}

fn one() -> f32 {
    1.0
}

fn one_pass() -> usize {
    1
}

fn three() -> usize {
    3
}

fn max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

/// Structuring element description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ElementSpec {
    Square { size: usize },
    Rect { width: usize, height: usize },
    Disk { radius: f32 },
}

impl Default for ElementSpec {
    fn default() -> Self {
        ElementSpec::Square { size: 3 }
    }
}

impl ElementSpec {
    pub fn build(&self) -> Result<StructuringElement> {
        match *self {
            ElementSpec::Square { size } => StructuringElement::square(size),
            ElementSpec::Rect { width, height } => StructuringElement::rect(width, height),
            ElementSpec::Disk { radius } => StructuringElement::disk(radius),
        }
    }
}

/// One filter invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Contrast {
        contrast: f32,
    },
    /// `channel_max` defaults to 255.
    Brightness {
        brightness: f32,
        #[serde(default = "channel_max")]
        channel_max: f32,
    },
    /// Bounds default to (0, 255).
    Clamp {
        #[serde(default)]
        lo: f32,
        #[serde(default = "channel_max")]
        hi: f32,
    },
    Normalize,
    Grayscale,
    GaussianBlur {
        window: usize,
        sigma: f32,
    },
    /// `amount` defaults to 1 (classic unsharp mask).
    UnsharpMask {
        radius: usize,
        #[serde(default = "one")]
        amount: f32,
    },
    DifferenceOfGaussians {
        radius_small: usize,
        radius_large: usize,
    },
    DigitalZoom {
        top: usize,
        left: usize,
        width: usize,
        height: usize,
    },
    Translate {
        dy: isize,
        dx: isize,
    },
    Hurl {
        percent: f32,
        #[serde(default = "one_pass")]
        repeats: usize,
    },
    Spread {
        window_width: usize,
        window_height: usize,
    },
    Pick {
        percent: f32,
        #[serde(default = "one_pass")]
        repeats: usize,
    },
    /// Gradient magnitude.
    Prewitt,
    /// Gradient magnitude.
    Sobel,
    Median {
        #[serde(default = "three")]
        width: usize,
        #[serde(default = "three")]
        height: usize,
    },
    Min {
        #[serde(default = "three")]
        width: usize,
        #[serde(default = "three")]
        height: usize,
    },
    Max {
        #[serde(default = "three")]
        width: usize,
        #[serde(default = "three")]
        height: usize,
    },
    Bilateral {
        spatial_sigma: f32,
        range_sigma: f32,
    },
    /// Element defaults to a 3x3 square.
    Erode {
        #[serde(default)]
        element: ElementSpec,
    },
    Dilate {
        #[serde(default)]
        element: ElementSpec,
    },
    Boundary {
        #[serde(default)]
        element: ElementSpec,
    },
    Threshold {
        level: f32,
    },
    Otsu,
    Adaptive {
        kind: AdaptiveKind,
        #[serde(default = "three")]
        window: usize,
        #[serde(default)]
        bias: f32,
    },
    /// Falls back to the best estimate when the cap is hit.
    Isodata {
        #[serde(default = "max_iterations")]
        max_iterations: usize,
    },
    Emboss {
        azimuth: f32,
        elevation: f32,
        depth: f32,
    },
}

impl Step {
    /// Run this step on `input`.
    pub fn apply<R: Rng + ?Sized>(&self, input: ArrayView3<f32>, rng: &mut R) -> Result<Array3<f32>> {
        match self {
            Step::Contrast { contrast } => change_contrast(input, *contrast),
            Step::Brightness {
                brightness,
                channel_max,
            } => change_brightness(input, *brightness, *channel_max),
            Step::Clamp { lo, hi } => Ok(clamp(input, *lo, *hi)),
            Step::Normalize => Ok(normalize_image(input)),
            Step::Grayscale => to_grayscale(input),
            Step::GaussianBlur { window, sigma } => gaussian_blur(input, *window, *window, *sigma),
            Step::UnsharpMask { radius, amount } => unsharp_mask(input, *radius, *amount),
            Step::DifferenceOfGaussians {
                radius_small,
                radius_large,
            } => difference_of_gaussians(input, *radius_small, *radius_large),
            Step::DigitalZoom {
                top,
                left,
                width,
                height,
            } => digital_zoom(input, *top, *left, *width, *height),
            Step::Translate { dy, dx } => Ok(translate(input, *dy, *dx)),
            Step::Hurl { percent, repeats } => hurl(input, *percent, *repeats, rng),
            Step::Spread {
                window_width,
                window_height,
            } => spread(input, *window_width, *window_height, rng),
            Step::Pick { percent, repeats } => pick(input, *percent, *repeats, rng),
            Step::Prewitt => Ok(prewitt(input)?.magnitude),
            Step::Sobel => Ok(sobel(input)?.magnitude),
            Step::Median { width, height } => median_filter(input, *width, *height),
            Step::Min { width, height } => min_filter(input, *width, *height),
            Step::Max { width, height } => max_filter(input, *width, *height),
            Step::Bilateral {
                spatial_sigma,
                range_sigma,
            } => bilateral(input, *spatial_sigma, *range_sigma),
            Step::Erode { element } => Ok(erode(input, &element.build()?)),
            Step::Dilate { element } => Ok(dilate(input, &element.build()?)),
            Step::Boundary { element } => Ok(boundary(input, &element.build()?)),
            Step::Threshold { level } => threshold(input, *level),
            Step::Otsu => Ok(otsu(input)?.image),
            Step::Adaptive { kind, window, bias } => adaptive_threshold(input, *kind, *window, *bias),
            Step::Isodata { max_iterations } => {
                Ok(iterative_threshold(input, *max_iterations)?.segmentation.image)
            }
            Step::Emboss {
                azimuth,
                elevation,
                depth,
            } => emboss(input, *azimuth, *elevation, *depth),
        }
    }
}

/// An ordered chain of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub name: Option<String>,
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| FilterError::Config(format!("failed to parse recipe: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| FilterError::Config(format!("failed to read recipe {}: {e}", path.display())))?;
        Self::from_json(&data)
    }

    /// Run every step in order. Stops at the first failing step.
    pub fn run<R: Rng + ?Sized>(&self, input: ArrayView3<f32>, rng: &mut R) -> Result<Array3<f32>> {
        let mut current = input.to_owned();
        for (index, step) in self.steps.iter().enumerate() {
            debug!("recipe step {}: {:?}", index, step);
            current = step.apply(current.view(), rng)?;
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_with_defaults() {
        let recipe = Recipe::from_json(
            r#"{
                "steps": [
                    { "op": "brightness", "brightness": 0.1 },
                    { "op": "median" },
                    { "op": "boundary", "element": { "shape": "disk", "radius": 2.0 } },
                    { "op": "adaptive", "kind": "min_max_avg" },
                    { "op": "isodata" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(recipe.name, None);
        assert_eq!(
            recipe.steps,
            vec![
                Step::Brightness {
                    brightness: 0.1,
                    channel_max: 255.0
                },
                Step::Median { width: 3, height: 3 },
                Step::Boundary {
                    element: ElementSpec::Disk { radius: 2.0 }
                },
                Step::Adaptive {
                    kind: AdaptiveKind::MinMaxAvg,
                    window: 3,
                    bias: 0.0
                },
                Step::Isodata { max_iterations: 100 },
            ]
        );
    }

    #[test]
    fn test_unknown_op_is_config_error() {
        let err = Recipe::from_json(r#"{ "steps": [ { "op": "swirl" } ] }"#).unwrap_err();
        assert!(matches!(err, FilterError::Config(_)));
    }

    #[test]
    fn test_load_reads_recipe_file() {
        let path = std::env::temp_dir().join(format!("imageedit_recipe_{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{ "name": "denoise", "steps": [ { "op": "bilateral", "spatial_sigma": 3.0, "range_sigma": 40.0 } ] }"#,
        )
        .unwrap();

        let loaded = Recipe::load(&path);
        fs::remove_file(&path).unwrap();

        let recipe = loaded.unwrap();
        assert_eq!(recipe.name.as_deref(), Some("denoise"));
        assert_eq!(
            recipe.steps,
            vec![Step::Bilateral {
                spatial_sigma: 3.0,
                range_sigma: 40.0
            }]
        );
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let path = std::env::temp_dir().join("imageedit_recipe_does_not_exist.json");
        assert!(matches!(Recipe::load(&path), Err(FilterError::Config(_))));
    }

    #[test]
    fn test_run_chains_steps() {
        let recipe = Recipe {
            name: Some("brighten then threshold".to_string()),
            steps: vec![
                Step::Brightness {
                    brightness: 0.2,
                    channel_max: 255.0,
                },
                Step::Threshold { level: 100.0 },
            ],
        };
        let img = Array3::<f32>::from_elem((2, 3, 1), 60.0);
        let mut rng = StdRng::seed_from_u64(1);

        // 60 + 51 = 111 > 100
        let result = recipe.run(img.view(), &mut rng).unwrap();
        assert!(result.iter().all(|&v| v == 255.0));
    }

    #[test]
    fn test_run_stops_at_failing_step() {
        let recipe = Recipe {
            name: None,
            steps: vec![Step::Contrast { contrast: 2.0 }, Step::Normalize],
        };
        let img = Array3::<f32>::zeros((2, 2, 1));
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            recipe.run(img.view(), &mut rng),
            Err(FilterError::InvalidParameter { name: "contrast", .. })
        ));
    }

    #[test]
    fn test_empty_recipe_is_identity() {
        let img = Array3::<f32>::from_elem((2, 2, 3), 9.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(Recipe::default().run(img.view(), &mut rng).unwrap(), img);
    }
}
