//! # Estimator Configuration
//!
//! Tunable parameters for the Hurst and correlation-dimension estimators. The
//! grid sizes (window-scale count, radius count) are empirical defaults, not
//! invariants, so every one of them is a field here.

use crate::{
    errors::{validate_min_count, validate_parameter, ChaosMetricsError, ChaosResult},
    regression::FitMethod,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default minimum R/S window size
pub const DEFAULT_MIN_WINDOW: usize = 8;
/// Default number of log-spaced candidate window sizes
pub const DEFAULT_NUM_SCALES: usize = 20;
/// Series shorter than this are not analysed by R/S
pub const DEFAULT_HURST_MIN_LENGTH: usize = 64;
/// Default number of log-spaced radii for the correlation integral
pub const DEFAULT_NUM_RADII: usize = 15;
/// Cap on embedded points entering the O(N²) distance computation
pub const DEFAULT_MAX_EMBEDDED_POINTS: usize = 2000;
/// Series shorter than this are not analysed by Grassberger–Procaccia
pub const DEFAULT_CORRELATION_MIN_LENGTH: usize = 128;

/// Configuration for the rescaled-range Hurst estimator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HurstConfig {
    /// Smallest window size considered
    pub min_window: usize,
    /// Number of log-spaced candidates before deduplication
    pub num_scales: usize,
    /// Largest window is `n / max_window_divisor`
    pub max_window_divisor: usize,
    /// Minimum series length for a valid estimate
    pub min_series_length: usize,
    /// Fitter for the log-log regression
    pub fit_method: FitMethod,
}

impl Default for HurstConfig {
    fn default() -> Self {
        Self {
            min_window: DEFAULT_MIN_WINDOW,
            num_scales: DEFAULT_NUM_SCALES,
            max_window_divisor: 4,
            min_series_length: DEFAULT_HURST_MIN_LENGTH,
            fit_method: FitMethod::default(),
        }
    }
}

impl HurstConfig {
    /// Override the minimum window size
    pub fn with_min_window(mut self, min_window: usize) -> Self {
        self.min_window = min_window;
        self
    }

    /// Override the number of candidate scales
    pub fn with_num_scales(mut self, num_scales: usize) -> Self {
        self.num_scales = num_scales;
        self
    }

    /// Check parameter constraints.
    pub fn validate(&self) -> ChaosResult<()> {
        // A sample standard deviation needs two points per segment
        validate_min_count(self.min_window, 2, "min_window")?;
        validate_min_count(self.num_scales, 3, "num_scales")?;
        validate_min_count(self.max_window_divisor, 2, "max_window_divisor")?;
        validate_min_count(self.min_series_length, 1, "min_series_length")
    }
}

/// Which correlation-dimension strategies may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StrategyPreference {
    /// Try the accelerated strategy when compiled in, fall back to manual GP
    #[default]
    Auto,
    /// Always run the manual Grassberger–Procaccia estimator
    ManualOnly,
}

/// Configuration for the correlation-dimension estimator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorrelationDimensionConfig {
    /// Embedding dimension m
    pub embedding_dimension: usize,
    /// Delay between embedding coordinates
    pub delay: usize,
    /// Number of log-spaced radii
    pub num_radii: usize,
    /// Embedded points beyond this are evenly subsampled
    pub max_points: usize,
    /// Percentile (fraction) of pairwise distances used as the smallest radius
    pub lower_percentile: f64,
    /// Percentile (fraction) of pairwise distances used as the largest radius
    pub upper_percentile: f64,
    /// Minimum series length for a valid estimate
    pub min_series_length: usize,
    /// Fitter for the log-log regression
    pub fit_method: FitMethod,
    /// Strategy selection
    pub strategy: StrategyPreference,
}

impl Default for CorrelationDimensionConfig {
    fn default() -> Self {
        Self {
            embedding_dimension: 2,
            delay: 1,
            num_radii: DEFAULT_NUM_RADII,
            max_points: DEFAULT_MAX_EMBEDDED_POINTS,
            lower_percentile: 0.05,
            upper_percentile: 0.80,
            min_series_length: DEFAULT_CORRELATION_MIN_LENGTH,
            fit_method: FitMethod::default(),
            strategy: StrategyPreference::default(),
        }
    }
}

impl CorrelationDimensionConfig {
    /// Override the embedding geometry
    pub fn with_embedding(mut self, embedding_dimension: usize, delay: usize) -> Self {
        self.embedding_dimension = embedding_dimension;
        self.delay = delay;
        self
    }

    /// Override the number of radii
    pub fn with_num_radii(mut self, num_radii: usize) -> Self {
        self.num_radii = num_radii;
        self
    }

    /// Check parameter constraints.
    pub fn validate(&self) -> ChaosResult<()> {
        validate_min_count(self.embedding_dimension, 1, "embedding_dimension")?;
        validate_min_count(self.delay, 1, "delay")?;
        validate_min_count(self.num_radii, 3, "num_radii")?;
        validate_min_count(self.max_points, 2, "max_points")?;
        validate_min_count(self.min_series_length, 1, "min_series_length")?;
        validate_parameter(self.lower_percentile, 0.0, 1.0, "lower_percentile")?;
        validate_parameter(self.upper_percentile, 0.0, 1.0, "upper_percentile")?;
        if self.upper_percentile <= self.lower_percentile {
            return Err(ChaosMetricsError::InvalidParameter {
                parameter: "upper_percentile".to_string(),
                value: self.upper_percentile,
                constraint: format!("> lower_percentile ({})", self.lower_percentile),
            });
        }
        Ok(())
    }
}

/// Combined configuration used by the metrics façade.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChaosConfig {
    /// Hurst estimator settings
    pub hurst: HurstConfig,
    /// Correlation-dimension estimator settings
    pub correlation: CorrelationDimensionConfig,
}

impl ChaosConfig {
    /// Use the same fitter for both estimators
    pub fn with_fit_method(mut self, fit_method: FitMethod) -> Self {
        self.hurst.fit_method = fit_method;
        self.correlation.fit_method = fit_method;
        self
    }

    /// Check both estimator configurations.
    pub fn validate(&self) -> ChaosResult<()> {
        self.hurst.validate()?;
        self.correlation.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ChaosConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hurst.min_window, 8);
        assert_eq!(config.hurst.num_scales, 20);
        assert_eq!(config.correlation.num_radii, 15);
        assert_eq!(config.correlation.max_points, 2000);
        assert_eq!(config.correlation.strategy, StrategyPreference::Auto);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(HurstConfig::default().with_min_window(1).validate().is_err());
        assert!(HurstConfig::default().with_num_scales(2).validate().is_err());
        assert!(CorrelationDimensionConfig::default()
            .with_embedding(2, 0)
            .validate()
            .is_err());
        assert!(CorrelationDimensionConfig::default()
            .with_num_radii(2)
            .validate()
            .is_err());

        let inverted = CorrelationDimensionConfig {
            lower_percentile: 0.8,
            upper_percentile: 0.05,
            ..Default::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ChaosMetricsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_fit_method_applies_to_both() {
        let config = ChaosConfig::default().with_fit_method(FitMethod::Qr);
        assert_eq!(config.hurst.fit_method, FitMethod::Qr);
        assert_eq!(config.correlation.fit_method, FitMethod::Qr);
    }
}
