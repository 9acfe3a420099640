//! Hurst exponent estimation by rescaled-range (R/S) analysis.
//!
//! The series is cut into non-overlapping segments at a log-spaced set of
//! window sizes. For each segment the range of the cumulative mean deviation
//! is divided by the segment's sample standard deviation; the mean R/S per
//! window is regressed against the window size in log10-log10 space and the
//! slope is H.
//!
//! ## Validity
//!
//! The estimator returns [`EstimatorOutcome::Invalid`] (point value 0.5) when
//! the series is shorter than the configured minimum, has negligible spread,
//! or fewer than three window sizes yield a usable mean R/S. Otherwise the
//! fitted slope is returned as-is: values outside [0, 1] are not clamped and
//! should be judged through the regression R².

use crate::{
    config::HurstConfig,
    errors::{validate_all_finite, ChaosResult},
    math_utils::{
        calculate_variance, float_ops, has_negligible_spread, logspace, mean,
        rescale_to_unit_magnitude,
    },
    results::{Degeneracy, EstimatorOutcome, HurstEstimate, HurstOutcome, ScalingRegression},
};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Points a log-log regression needs before its slope is reported
pub const MIN_SCALING_POINTS: usize = 3;

/// A window contributes only if the series holds at least this many full segments
const MIN_SEGMENTS_PER_WINDOW: usize = 2;

// ============================================================================
// RESCALED RANGE (R/S) ANALYSIS
// ============================================================================

/// Point estimate of the Hurst exponent with default settings.
///
/// Returns 0.5 when the series is too short, constant, or yields too few
/// usable scales.
///
/// ```rust
/// use chaos_metrics::hurst_rs;
///
/// assert_eq!(hurst_rs(&[0.0; 100]).unwrap(), 0.5);
/// assert_eq!(hurst_rs(&[1.0, 2.0, 3.0]).unwrap(), 0.5);
/// ```
pub fn hurst_rs(data: &[f64]) -> ChaosResult<f64> {
    Ok(hurst_rs_details(data, &HurstConfig::default())?.point_estimate())
}

/// R/S Hurst estimate with its regression diagnostics.
///
/// # Errors
/// Only for malformed calls: non-finite values in `data` or an invalid
/// `config`. Short, constant or otherwise degenerate series produce
/// `Ok(EstimatorOutcome::Invalid(..))`.
pub fn hurst_rs_details(data: &[f64], config: &HurstConfig) -> ChaosResult<HurstOutcome> {
    config.validate()?;
    validate_all_finite(data, "R/S input series")?;

    let n = data.len();
    if n < config.min_series_length {
        return Ok(invalid(Degeneracy::TooShort {
            required: config.min_series_length,
            actual: n,
        }));
    }
    if has_negligible_spread(data) {
        return Ok(invalid(Degeneracy::ZeroVariance));
    }
    let data = &rescale_to_unit_magnitude(data);

    let window_sizes = generate_window_sizes(n, config)?;
    let mut used_windows = Vec::with_capacity(window_sizes.len());
    let mut log_scales = Vec::with_capacity(window_sizes.len());
    let mut log_values = Vec::with_capacity(window_sizes.len());

    for &window_size in &window_sizes {
        if n / window_size < MIN_SEGMENTS_PER_WINDOW {
            continue;
        }

        let rs_values = calculate_rs_statistics(data, window_size);
        if rs_values.is_empty() {
            continue;
        }

        if let Some(log_rs) = float_ops::safe_log10(mean(&rs_values)) {
            used_windows.push(window_size);
            log_scales.push((window_size as f64).log10());
            log_values.push(log_rs);
        }
    }

    if used_windows.len() < MIN_SCALING_POINTS {
        return Ok(invalid(Degeneracy::TooFewScales {
            found: used_windows.len(),
            required: MIN_SCALING_POINTS,
        }));
    }

    let fit = config.fit_method.fit(&log_scales, &log_values)?;

    Ok(EstimatorOutcome::Valid(HurstEstimate {
        hurst: fit.slope,
        window_sizes: used_windows,
        regression: ScalingRegression {
            log_scales,
            log_values,
            fit,
        },
    }))
}

/// Candidate R/S window sizes for a series of length `n`.
///
/// `num_scales` log-spaced values between `min_window` and
/// `max(min_window + 1, n / max_window_divisor)`, floored to integers,
/// deduplicated and filtered to `>= min_window`.
pub fn generate_window_sizes(n: usize, config: &HurstConfig) -> ChaosResult<Vec<usize>> {
    let max_window = (n / config.max_window_divisor).max(config.min_window.saturating_add(1));
    let grid = logspace(config.min_window as f64, max_window as f64, config.num_scales)?;

    let mut sizes: Vec<usize> = grid
        .into_iter()
        .map(|size| size.floor() as usize)
        .filter(|&size| size >= config.min_window)
        .collect();
    sizes.sort_unstable();
    sizes.dedup();
    Ok(sizes)
}

/// R/S values of the full non-overlapping segments of `data`.
///
/// The trailing remainder shorter than `window_size` is discarded, as are
/// segments with zero sample standard deviation.
fn calculate_rs_statistics(data: &[f64], window_size: usize) -> Vec<f64> {
    data.chunks_exact(window_size)
        .filter_map(rescaled_range)
        .collect()
}

/// Rescaled range of one segment, or `None` if its sample std is zero.
///
/// R is the range of the cumulative sum of deviations from the segment mean;
/// S is the sample standard deviation (ddof = 1).
pub fn rescaled_range(segment: &[f64]) -> Option<f64> {
    if segment.len() < 2 {
        return None;
    }

    let std_dev = calculate_variance(segment).sqrt();
    if !(std_dev > 0.0) {
        return None;
    }

    let segment_mean = mean(segment);
    let (_, min_dev, max_dev) = segment.iter().fold(
        (0.0, f64::INFINITY, f64::NEG_INFINITY),
        |(cumsum, lo, hi), &value| {
            let cumsum = cumsum + (value - segment_mean);
            (cumsum, lo.min(cumsum), hi.max(cumsum))
        },
    );

    Some((max_dev - min_dev) / std_dev)
}

fn invalid(reason: Degeneracy) -> HurstOutcome {
    log::debug!("R/S Hurst estimate unavailable: {}", reason);
    EstimatorOutcome::Invalid(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::{generate_benchmark_series, BenchmarkSeriesType, GeneratorConfig};
    use crate::regression::FitMethod;
    use assert_approx_eq::assert_approx_eq;

    fn white_noise(length: usize, seed: u64) -> Vec<f64> {
        let config = GeneratorConfig {
            length,
            seed: Some(seed),
        };
        generate_benchmark_series(BenchmarkSeriesType::WhiteNoise, &config).unwrap()
    }

    #[test]
    fn test_rescaled_range_of_known_segment() {
        // deviations -1.5, -0.5, 0.5, 1.5 -> cumsum -1.5, -2, -1.5, 0 -> R = 2
        let rs = rescaled_range(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_approx_eq!(rs, 2.0 / (5.0f64 / 3.0).sqrt(), 1e-12);
        assert!(rescaled_range(&[3.0; 8]).is_none());
        assert!(rescaled_range(&[3.0]).is_none());
    }

    #[test]
    fn test_window_grid_is_unique_and_bounded() {
        let config = HurstConfig::default();
        let sizes = generate_window_sizes(2048, &config).unwrap();
        assert_eq!(sizes.first(), Some(&8));
        assert_eq!(sizes.last(), Some(&512));
        assert!(sizes.windows(2).all(|w| w[1] > w[0]));
        assert!(sizes.len() <= 20);

        // Short series collapse to min_window..=min_window+1 at worst
        let sizes = generate_window_sizes(20, &config).unwrap();
        assert_eq!(sizes, vec![8, 9]);
    }

    #[test]
    fn test_segments_skip_trailing_remainder() {
        let data: Vec<f64> = (0..21).map(|i| (i % 5) as f64).collect();
        assert_eq!(calculate_rs_statistics(&data, 10).len(), 2);
        assert_eq!(calculate_rs_statistics(&data, 7).len(), 3);
    }

    #[test]
    fn test_minimum_length_boundary() {
        let config = HurstConfig::default();
        let data = white_noise(64, 3);

        let outcome = hurst_rs_details(&data, &config).unwrap();
        assert!(outcome.is_valid());

        let outcome = hurst_rs_details(&data[..63], &config).unwrap();
        assert_eq!(
            outcome.degeneracy(),
            Some(&Degeneracy::TooShort {
                required: 64,
                actual: 63
            })
        );
        assert_eq!(outcome.point_estimate(), 0.5);
    }

    #[test]
    fn test_constant_series_is_invalid() {
        let outcome = hurst_rs_details(&[7.0; 500], &HurstConfig::default()).unwrap();
        assert_eq!(outcome.degeneracy(), Some(&Degeneracy::ZeroVariance));
        assert_eq!(outcome.point_estimate(), 0.5);
    }

    #[test]
    fn test_too_few_usable_scales() {
        // Index 65 of a 67-point series lies inside a full segment only for
        // window 11 (66 covered points); every other segment is constant.
        let mut data = vec![0.0; 67];
        data[65] = 1.0;
        let outcome = hurst_rs_details(&data, &HurstConfig::default()).unwrap();
        assert_eq!(
            outcome.degeneracy(),
            Some(&Degeneracy::TooFewScales {
                found: 1,
                required: 3
            })
        );
        assert_eq!(outcome.point_estimate(), 0.5);
    }

    #[test]
    fn test_estimate_is_scale_free_near_overflow() {
        let data = white_noise(1024, 11);
        let huge: Vec<f64> = data.iter().map(|x| x * 1.5e154).collect();

        let config = HurstConfig::default();
        let reference = hurst_rs_details(&data, &config).unwrap();
        let scaled = hurst_rs_details(&huge, &config).unwrap();
        assert!(scaled.is_valid());
        assert_approx_eq!(scaled.point_estimate(), reference.point_estimate(), 1e-9);
    }

    #[test]
    fn test_oversized_min_window_has_no_usable_scales() {
        let config = HurstConfig::default().with_min_window(usize::MAX);
        let sizes = generate_window_sizes(2048, &config).unwrap();
        assert_eq!(sizes, vec![usize::MAX]);

        let outcome = hurst_rs_details(&white_noise(2048, 5), &config).unwrap();
        assert_eq!(
            outcome.degeneracy(),
            Some(&Degeneracy::TooFewScales {
                found: 0,
                required: 3
            })
        );
    }

    #[test]
    fn test_diagnostics_are_consistent() {
        let data = white_noise(1024, 11);
        let outcome = hurst_rs_details(&data, &HurstConfig::default()).unwrap();
        let estimate = outcome.as_valid().unwrap();

        assert_eq!(estimate.hurst, estimate.regression.fit.slope);
        assert_eq!(estimate.window_sizes.len(), estimate.regression.log_scales.len());
        assert_eq!(
            estimate.regression.log_scales.len(),
            estimate.regression.log_values.len()
        );
        assert_approx_eq!(
            estimate.regression.log_scales[0],
            (estimate.window_sizes[0] as f64).log10(),
            1e-12
        );
        assert!(estimate.regression.fit.r_squared > 0.8);
    }

    #[test]
    fn test_qr_fitter_matches_closed_form() {
        let data = white_noise(2048, 5);
        let closed = hurst_rs_details(&data, &HurstConfig::default()).unwrap();
        let qr_config = HurstConfig {
            fit_method: FitMethod::Qr,
            ..HurstConfig::default()
        };
        let qr = hurst_rs_details(&data, &qr_config).unwrap();

        let (h_closed, h_qr) = (closed.point_estimate(), qr.point_estimate());
        assert!(((h_closed - h_qr) / h_closed).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_input_is_an_error() {
        let mut data = white_noise(128, 1);
        data[17] = f64::NAN;
        assert!(hurst_rs_details(&data, &HurstConfig::default()).is_err());
    }
}
