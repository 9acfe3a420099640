//! Correlation dimension (D2) by the Grassberger–Procaccia method.
//!
//! The series is delay-embedded, the pairwise Euclidean distances of the
//! embedded cloud are collected, and the correlation integral
//! `C(r) = #{d < r} / #pairs` is evaluated on a log-spaced radius grid. The
//! slope of log10 C(r) against log10 r over the non-saturated radii is D2.
//!
//! Estimation goes through a [`CorrelationDimensionStrategy`]. The manual
//! [`GrassbergerProcaccia`] strategy is always compiled in and always used as
//! the last resort. With the `std-scaled-correlation-sum` feature, a
//! rayon-backed `StdScaledCorrelationSum` strategy is tried first; when it
//! errors or declines, the manual estimator runs and the caller sees no
//! difference apart from the [`CorrelationStrategyKind`] recorded in the
//! estimate. The std-scaled radius grid covers smaller scales than the
//! percentile grid, so enabling the feature changes the reported D2.
//!
//! The series is rescaled by a power of two before embedding. D2 does not
//! depend on scale, and the squared coordinate differences stay finite for
//! magnitudes up to `f64::MAX`.

use crate::{
    config::{CorrelationDimensionConfig, StrategyPreference},
    embedding::{delay_embedding, DelayEmbedding},
    errors::{validate_all_finite, ChaosResult},
    hurst_estimators::MIN_SCALING_POINTS,
    math_utils::{
        float_total_cmp, has_negligible_spread, logspace, percentile, rescale_to_unit_magnitude,
    },
    results::{
        CorrelationDimensionEstimate, CorrelationDimensionOutcome, CorrelationStrategyKind,
        Degeneracy, EstimatorOutcome, ScalingRegression,
    },
};

/// A way of turning a (pre-screened) series into a D2 outcome.
///
/// Implementations receive series that already passed the length, variance
/// and finiteness checks, and must honour the configured embedding.
pub trait CorrelationDimensionStrategy {
    /// Which strategy this is, for reporting
    fn kind(&self) -> CorrelationStrategyKind;

    /// Estimate D2 for `data`.
    fn estimate(
        &self,
        data: &[f64],
        config: &CorrelationDimensionConfig,
    ) -> ChaosResult<CorrelationDimensionOutcome>;
}

/// Point estimate of the correlation dimension with default settings.
///
/// Returns 0.0 when the series is shorter than 128 points, constant, or the
/// radius grid yields too few usable points.
///
/// ```rust
/// use chaos_metrics::correlation_dimension;
///
/// assert_eq!(correlation_dimension(&[0.0; 500]).unwrap(), 0.0);
/// assert_eq!(correlation_dimension(&[1.0; 10]).unwrap(), 0.0);
/// ```
pub fn correlation_dimension(data: &[f64]) -> ChaosResult<f64> {
    Ok(correlation_dimension_details(data, &CorrelationDimensionConfig::default())?.point_estimate())
}

/// Correlation dimension with regression diagnostics.
///
/// # Errors
/// Only for malformed calls: non-finite values, an invalid `config`, or a
/// series too short for a single embedded point under the configured
/// embedding. Data-quality problems are reported as
/// `Ok(EstimatorOutcome::Invalid(..))`.
pub fn correlation_dimension_details(
    data: &[f64],
    config: &CorrelationDimensionConfig,
) -> ChaosResult<CorrelationDimensionOutcome> {
    let accelerated = accelerated_strategy(config.strategy);
    correlation_dimension_with_strategy(data, config, accelerated.as_deref())
}

/// [`correlation_dimension_details`] with an explicit strategy tried ahead of
/// manual Grassberger–Procaccia.
///
/// `config.strategy` is not consulted. When `accelerated` returns an error or
/// an invalid outcome, the manual estimator runs instead; `None` runs only
/// the manual estimator.
pub fn correlation_dimension_with_strategy(
    data: &[f64],
    config: &CorrelationDimensionConfig,
    accelerated: Option<&dyn CorrelationDimensionStrategy>,
) -> ChaosResult<CorrelationDimensionOutcome> {
    config.validate()?;
    validate_all_finite(data, "correlation dimension input series")?;

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

    if let Some(strategy) = accelerated {
        match strategy.estimate(data, config) {
            Ok(outcome @ EstimatorOutcome::Valid(_)) => return Ok(outcome),
            Ok(EstimatorOutcome::Invalid(reason)) => {
                log::debug!(
                    "{:?} declined ({}); falling back to manual Grassberger-Procaccia",
                    strategy.kind(),
                    reason
                );
            }
            Err(err) => {
                log::warn!(
                    "{:?} failed ({}); falling back to manual Grassberger-Procaccia",
                    strategy.kind(),
                    err
                );
            }
        }
    }

    GrassbergerProcaccia.estimate(data, config)
}

#[cfg(feature = "std-scaled-correlation-sum")]
fn accelerated_strategy(
    preference: StrategyPreference,
) -> Option<Box<dyn CorrelationDimensionStrategy>> {
    match preference {
        StrategyPreference::Auto => Some(Box::new(std_scaled::StdScaledCorrelationSum)),
        StrategyPreference::ManualOnly => None,
    }
}

#[cfg(not(feature = "std-scaled-correlation-sum"))]
fn accelerated_strategy(
    _preference: StrategyPreference,
) -> Option<Box<dyn CorrelationDimensionStrategy>> {
    None
}

#[cfg(feature = "std-scaled-correlation-sum")]
pub use std_scaled::StdScaledCorrelationSum;

// ============================================================================
// MANUAL GRASSBERGER-PROCACCIA
// ============================================================================

/// Manual GP estimator with a percentile-bounded radius grid.
///
/// Radii run log-spaced between the configured lower and upper percentiles
/// (5th and 80th by default) of the positive pairwise distances. Returns the
/// full log-log regression.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrassbergerProcaccia;

impl CorrelationDimensionStrategy for GrassbergerProcaccia {
    fn kind(&self) -> CorrelationStrategyKind {
        CorrelationStrategyKind::GrassbergerProcaccia
    }

    fn estimate(
        &self,
        data: &[f64],
        config: &CorrelationDimensionConfig,
    ) -> ChaosResult<CorrelationDimensionOutcome> {
        let embedding = delay_embedding(data, config.delay, config.embedding_dimension)?
            .subsample_evenly(config.max_points);

        let distances = sorted_pairwise_distances(&embedding);
        if distances.is_empty() {
            return Ok(invalid(Degeneracy::NoPositiveDistances));
        }

        let (lower, upper) = match radius_bounds(&distances, config) {
            Ok(bounds) => bounds,
            Err(reason) => return Ok(invalid(reason)),
        };

        let radii = logspace(lower, upper, config.num_radii)?;
        let (log_scales, log_values) = correlation_integral(&distances, &radii);
        if log_scales.len() < MIN_SCALING_POINTS {
            return Ok(invalid(Degeneracy::TooFewRadii {
                found: log_scales.len(),
                required: MIN_SCALING_POINTS,
            }));
        }

        let fit = config.fit_method.fit(&log_scales, &log_values)?;
        Ok(EstimatorOutcome::Valid(CorrelationDimensionEstimate {
            dimension: fit.slope,
            regression: Some(ScalingRegression {
                log_scales,
                log_values,
                fit,
            }),
            strategy: self.kind(),
        }))
    }
}

/// Upper-triangle Euclidean distances, zeros dropped, sorted ascending.
fn sorted_pairwise_distances(embedding: &DelayEmbedding) -> Vec<f64> {
    let n = embedding.len();
    let mut distances = Vec::with_capacity(n.saturating_mul(n.saturating_sub(1)) / 2);
    for i in 0..n {
        let p = embedding.point(i);
        for j in (i + 1)..n {
            let d = euclidean(p, embedding.point(j));
            if d > 0.0 {
                distances.push(d);
            }
        }
    }
    distances.sort_unstable_by(float_total_cmp);
    distances
}

/// Percentile radius bounds; collapsed or non-finite bounds are degenerate.
fn radius_bounds(
    distances: &[f64],
    config: &CorrelationDimensionConfig,
) -> Result<(f64, f64), Degeneracy> {
    let lower = percentile(distances, config.lower_percentile);
    let upper = percentile(distances, config.upper_percentile);
    if lower > 0.0 && upper.is_finite() && upper > lower {
        Ok((lower, upper))
    } else {
        Err(Degeneracy::CollapsedRadiusBounds { lower, upper })
    }
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// log10 r and log10 C(r) for the radii with 0 < C(r) < 1.
///
/// `distances` must be sorted ascending so that the count of distances
/// strictly below `r` is a partition point.
fn correlation_integral(distances: &[f64], radii: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let total = distances.len() as f64;
    radii
        .iter()
        .filter_map(|&r| {
            let below = distances.partition_point(|&d| d < r);
            let c = below as f64 / total;
            (c > 0.0 && c < 1.0).then(|| (r.log10(), c.log10()))
        })
        .unzip()
}

fn invalid(reason: Degeneracy) -> CorrelationDimensionOutcome {
    log::debug!("Correlation dimension unavailable: {}", reason);
    EstimatorOutcome::Invalid(reason)
}

// ============================================================================
// STD-SCALED CORRELATION SUM
// ============================================================================

#[cfg(feature = "std-scaled-correlation-sum")]
mod std_scaled {
    use super::*;
    use crate::math_utils::population_std_dev;
    use rayon::prelude::*;

    /// Lower end of the radius grid as a multiple of the series std
    const MIN_RADIUS_FACTOR: f64 = 0.1;
    /// Upper end of the radius grid as a multiple of the series std
    const MAX_RADIUS_FACTOR: f64 = 0.5;

    /// Correlation sum over radii scaled by the series standard deviation.
    ///
    /// Distances are computed across threads with rayon. Radii run log-spaced
    /// from 0.1·σ to 0.5·σ. Only the point estimate is reported; the
    /// regression diagnostics are left empty.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct StdScaledCorrelationSum;

    impl CorrelationDimensionStrategy for StdScaledCorrelationSum {
        fn kind(&self) -> CorrelationStrategyKind {
            CorrelationStrategyKind::StdScaledCorrelationSum
        }

        fn estimate(
            &self,
            data: &[f64],
            config: &CorrelationDimensionConfig,
        ) -> ChaosResult<CorrelationDimensionOutcome> {
            let embedding = delay_embedding(data, config.delay, config.embedding_dimension)?
                .subsample_evenly(config.max_points);

            let sigma = population_std_dev(data);
            let radii = logspace(
                MIN_RADIUS_FACTOR * sigma,
                MAX_RADIUS_FACTOR * sigma,
                config.num_radii,
            )?;

            let distances = par_sorted_pairwise_distances(&embedding);
            if distances.is_empty() {
                return Ok(EstimatorOutcome::Invalid(Degeneracy::NoPositiveDistances));
            }

            let (log_scales, log_values) = correlation_integral(&distances, &radii);
            if log_scales.len() < MIN_SCALING_POINTS {
                return Ok(EstimatorOutcome::Invalid(Degeneracy::TooFewRadii {
                    found: log_scales.len(),
                    required: MIN_SCALING_POINTS,
                }));
            }

            let fit = config.fit_method.fit(&log_scales, &log_values)?;
            Ok(EstimatorOutcome::Valid(CorrelationDimensionEstimate {
                dimension: fit.slope,
                regression: None,
                strategy: self.kind(),
            }))
        }
    }

    fn par_sorted_pairwise_distances(embedding: &DelayEmbedding) -> Vec<f64> {
        let n = embedding.len();
        let mut distances: Vec<f64> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                let p = embedding.point(i);
                ((i + 1)..n)
                    .map(move |j| euclidean(p, embedding.point(j)))
                    .filter(|&d| d > 0.0)
            })
            .collect();
        distances.par_sort_unstable_by(float_total_cmp);
        distances
    }

}
