//! Mathematical utility functions and constants shared by the estimators.
//!
//! Moments, percentiles, log-spaced grids and guarded floating-point helpers.

use crate::errors::{ChaosMetricsError, ChaosResult};

/// Numerical constants used across the crate.
pub mod constants {
    /// Absolute tolerance under which a series standard deviation counts as zero
    pub const ZERO_STD_TOLERANCE: f64 = 1e-8;

    /// Minimum spread of regression predictors before the design is singular
    pub const MIN_PREDICTOR_SPREAD: f64 = 1e-15;

    /// Minimum positive value for log operations
    pub const MIN_LOG_VALUE: f64 = 1e-300;
}

/// Safe floating point comparison functions
pub mod float_ops {
    /// Check if a floating point number is approximately zero with custom epsilon
    #[inline]
    pub fn approx_zero_eps(x: f64, epsilon: f64) -> bool {
        x.abs() < epsilon
    }

    /// Base-10 logarithm that rejects non-positive and non-finite arguments
    pub fn safe_log10(x: f64) -> Option<f64> {
        if x > super::constants::MIN_LOG_VALUE && x.is_finite() {
            Some(x.log10())
        } else {
            None
        }
    }
}

/// Safe comparison for floating point values (NaN sorts last)
pub fn float_total_cmp(a: &f64, b: &f64) -> std::cmp::Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => std::cmp::Ordering::Equal,
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal),
    }
}

/// Arithmetic mean; NaN for empty input.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance (ddof = 1) using Welford's single-pass update.
///
/// Returns 0.0 for fewer than two values.
///
/// ```rust
/// use chaos_metrics::math_utils::calculate_variance;
///
/// let variance = calculate_variance(&[1.0, 2.0, 3.0, 4.0, 5.0]);
/// assert!((variance - 2.5).abs() < 1e-12);
/// ```
pub fn calculate_variance(data: &[f64]) -> f64 {
    let (count, m2) = welford(data);
    if count < 2 {
        return 0.0;
    }
    (m2 / (count - 1) as f64).max(0.0)
}

/// Population standard deviation (ddof = 0).
pub fn population_std_dev(data: &[f64]) -> f64 {
    let (count, m2) = welford(data);
    if count == 0 {
        return 0.0;
    }
    (m2 / count as f64).max(0.0).sqrt()
}

/// Whether a series is numerically constant (population std within tolerance of zero).
///
/// The std is taken on the rescaled series, so magnitudes near `f64::MAX`
/// do not overflow the squared deviations.
pub fn has_negligible_spread(data: &[f64]) -> bool {
    let scale = magnitude_scale(data);
    let spread = population_std_dev(&rescale_to_unit_magnitude(data));
    spread * scale <= constants::ZERO_STD_TOLERANCE
}

/// Power of two that brings the largest magnitude in `data` near 1.
///
/// Division by a power of two is exact, so scale-free statistics computed on
/// the rescaled series match the original while squares stay representable.
/// Returns 1.0 for empty, all-zero or non-finite input.
pub fn magnitude_scale(data: &[f64]) -> f64 {
    let max_abs = data.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
    if max_abs > 0.0 && max_abs.is_finite() {
        let exponent = (max_abs.log2().floor() as i32).clamp(-1022, 1023);
        2f64.powi(exponent)
    } else {
        1.0
    }
}

/// `data` divided by its [`magnitude_scale`].
///
/// ```rust
/// use chaos_metrics::math_utils::rescale_to_unit_magnitude;
///
/// assert_eq!(rescale_to_unit_magnitude(&[6.0, -3.0, 1.5]), vec![1.5, -0.75, 0.375]);
/// ```
pub fn rescale_to_unit_magnitude(data: &[f64]) -> Vec<f64> {
    let scale = magnitude_scale(data);
    data.iter().map(|x| x / scale).collect()
}

fn welford(data: &[f64]) -> (usize, f64) {
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (i, &value) in data.iter().enumerate() {
        let count = (i + 1) as f64;
        let delta = value - mean;
        mean += delta / count;
        m2 += delta * (value - mean);
    }
    (data.len(), m2)
}

/// Percentile of already-sorted data using linear interpolation.
///
/// `p` is a fraction in `[0, 1]`; the interpolation index is `p * (n - 1)`.
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return f64::NAN;
    }
    if p <= 0.0 {
        return sorted_data[0];
    }
    if p >= 1.0 {
        return sorted_data[sorted_data.len() - 1];
    }

    let index = p * (sorted_data.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted_data[lower]
    } else {
        let weight = index - lower as f64;
        sorted_data[lower] * (1.0 - weight) + sorted_data[upper] * weight
    }
}

/// `num` logarithmically spaced values between `start` and `end` (inclusive).
///
/// Both endpoints are returned exactly; interior points are
/// `10^(log10(start) + k * step)`. Bounds must be positive and finite.
///
/// ```rust
/// use chaos_metrics::math_utils::logspace;
///
/// let grid = logspace(1.0, 100.0, 3).unwrap();
/// assert_eq!(grid.len(), 3);
/// assert!((grid[1] - 10.0).abs() < 1e-9);
/// ```
pub fn logspace(start: f64, end: f64, num: usize) -> ChaosResult<Vec<f64>> {
    if !(start > 0.0 && end > 0.0 && start.is_finite() && end.is_finite()) {
        return Err(ChaosMetricsError::InvalidParameter {
            parameter: "logspace bounds".to_string(),
            value: if start > 0.0 { end } else { start },
            constraint: "positive and finite".to_string(),
        });
    }

    match num {
        0 => Ok(Vec::new()),
        1 => Ok(vec![start]),
        _ => {
            let log_start = start.log10();
            let step = (end.log10() - log_start) / (num - 1) as f64;
            let mut grid: Vec<f64> = (0..num)
                .map(|k| 10f64.powf(log_start + k as f64 * step))
                .collect();
            grid[0] = start;
            grid[num - 1] = end;
            Ok(grid)
        }
    }
}
