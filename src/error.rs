//! Error type shared by all operators.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FilterError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    /// A scalar argument is outside its documented range.
    #[error("invalid parameter `{name}` = {value}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The input carries no information the operator can work with
    /// (zero-sized grid, unsupported channel count).
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    #[error("no convergence after {iterations} iterations (best estimate {best_estimate})")]
    NonConvergence { iterations: usize, best_estimate: f32 },

    /// A recipe could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl FilterError {
    pub(crate) fn invalid(name: &'static str, value: impl Into<f64>, expected: &'static str) -> Self {
        FilterError::InvalidParameter {
            name,
            value: value.into(),
            expected,
        }
    }
}

/// Reject ranges like `[lo, hi]` for a named scalar.
pub(crate) fn ensure_range(
    name: &'static str,
    value: f32,
    lo: f32,
    hi: f32,
    expected: &'static str,
) -> Result<()> {
    if value.is_nan() || value < lo || value > hi {
        return Err(FilterError::invalid(name, value, expected));
    }
    Ok(())
}

/// Reject zero-sized grids and channel counts other than 1 or 3.
pub(crate) fn ensure_grid(dim: (usize, usize, usize)) -> Result<()> {
    let (height, width, channels) = dim;
    if height == 0 || width == 0 {
        return Err(FilterError::DegenerateInput(format!(
            "empty grid {}x{}",
            height, width
        )));
    }
    if channels != 1 && channels != 3 {
        return Err(FilterError::DegenerateInput(format!(
            "expected 1 or 3 channels, got {}",
            channels
        )));
    }
    Ok(())
}

#[cfg(feature = "python")]
impl From<FilterError> for pyo3::PyErr {
    fn from(err: FilterError) -> Self {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_range_bounds_inclusive() {
        assert!(ensure_range("c", -1.0, -1.0, 1.0, "[-1, 1]").is_ok());
        assert!(ensure_range("c", 1.0, -1.0, 1.0, "[-1, 1]").is_ok());
        assert!(ensure_range("c", 1.01, -1.0, 1.0, "[-1, 1]").is_err());
        assert!(ensure_range("c", f32::NAN, -1.0, 1.0, "[-1, 1]").is_err());
    }

    #[test]
    fn test_ensure_grid_rejects_empty_and_rgba() {
        assert!(ensure_grid((0, 4, 1)).is_err());
        assert!(ensure_grid((4, 4, 4)).is_err());
        assert!(ensure_grid((4, 4, 3)).is_ok());
    }

    #[test]
    fn test_error_message_names_parameter() {
        let err = FilterError::invalid("depth", 0.5f32, "[1, 100]");
        assert_eq!(
            err.to_string(),
            "invalid parameter `depth` = 0.5: expected [1, 100]"
        );
    }
}
