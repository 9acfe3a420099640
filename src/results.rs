//! # Estimator Results
//!
//! Every estimator returns an [`EstimatorOutcome`]: either `Valid` with the
//! estimate and its diagnostics, or `Invalid` with the [`Degeneracy`] that
//! prevented a fit. Callers branch on validity explicitly; the point form
//! ([`EstimatorOutcome::point_estimate`]) maps `Invalid` to the documented
//! sentinel (0.5 for H, 0.0 for D2).

use crate::regression::LinearFit;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hurst exponent reported when no estimate could be formed (Brownian default)
pub const HURST_SENTINEL: f64 = 0.5;

/// Correlation dimension reported when no estimate could be formed
pub const CORRELATION_DIMENSION_SENTINEL: f64 = 0.0;

/// Data-quality reason an estimator could not produce a fit.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Degeneracy {
    /// Series shorter than the estimator minimum
    TooShort {
        /// Minimum length
        required: usize,
        /// Actual length
        actual: usize,
    },
    /// Series standard deviation is numerically zero
    ZeroVariance,
    /// Fewer usable window sizes than a regression needs
    TooFewScales {
        /// Usable scales found
        found: usize,
        /// Scales required
        required: usize,
    },
    /// No strictly positive pairwise distance in the embedded cloud
    NoPositiveDistances,
    /// Percentile bounds for the radius grid collapsed or inverted
    CollapsedRadiusBounds {
        /// Lower radius bound
        lower: f64,
        /// Upper radius bound
        upper: f64,
    },
    /// Fewer radii with 0 < C(r) < 1 than a regression needs
    TooFewRadii {
        /// Usable radii found
        found: usize,
        /// Radii required
        required: usize,
    },
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degeneracy::TooShort { required, actual } => {
                write!(f, "series too short: need {}, got {}", required, actual)
            }
            Degeneracy::ZeroVariance => write!(f, "series has zero variance"),
            Degeneracy::TooFewScales { found, required } => {
                write!(f, "only {} usable scales, need {}", found, required)
            }
            Degeneracy::NoPositiveDistances => write!(f, "no positive pairwise distances"),
            Degeneracy::CollapsedRadiusBounds { lower, upper } => {
                write!(f, "radius bounds collapsed: [{:.3e}, {:.3e}]", lower, upper)
            }
            Degeneracy::TooFewRadii { found, required } => {
                write!(f, "only {} usable radii, need {}", found, required)
            }
        }
    }
}

/// Log-log regression data behind a scaling estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScalingRegression {
    /// log10 of the scales (window sizes or radii)
    pub log_scales: Vec<f64>,
    /// log10 of the measured quantity (mean R/S or C(r))
    pub log_values: Vec<f64>,
    /// Fitted line; its slope is the estimate
    pub fit: LinearFit,
}

/// An estimate with a scalar point value and a sentinel for invalid outcomes.
pub trait PointEstimate {
    /// Value reported for invalid outcomes
    const SENTINEL: f64;

    /// The scalar estimate
    fn value(&self) -> f64;

    /// Regression diagnostics, when the computing path produced them
    fn regression(&self) -> Option<&ScalingRegression>;
}

/// R/S Hurst exponent estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HurstEstimate {
    /// Hurst exponent H (not clamped)
    pub hurst: f64,
    /// Window sizes that contributed a mean R/S value
    pub window_sizes: Vec<usize>,
    /// log10(window) vs log10(mean R/S)
    pub regression: ScalingRegression,
}

impl PointEstimate for HurstEstimate {
    const SENTINEL: f64 = HURST_SENTINEL;

    fn value(&self) -> f64 {
        self.hurst
    }

    fn regression(&self) -> Option<&ScalingRegression> {
        Some(&self.regression)
    }
}

/// Which strategy produced a correlation-dimension estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CorrelationStrategyKind {
    /// Manual Grassberger–Procaccia with percentile radius grid
    GrassbergerProcaccia,
    /// Parallel correlation sum with std-scaled radii (feature
    /// `std-scaled-correlation-sum`); its D2 is not comparable with the
    /// percentile-grid estimate
    StdScaledCorrelationSum,
}

/// Correlation dimension D2 estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CorrelationDimensionEstimate {
    /// Correlation dimension D2 (not clamped)
    pub dimension: f64,
    /// log10(r) vs log10(C(r)); absent when an accelerated strategy produced the estimate
    pub regression: Option<ScalingRegression>,
    /// Strategy that produced the estimate
    pub strategy: CorrelationStrategyKind,
}

impl PointEstimate for CorrelationDimensionEstimate {
    const SENTINEL: f64 = CORRELATION_DIMENSION_SENTINEL;

    fn value(&self) -> f64 {
        self.dimension
    }

    fn regression(&self) -> Option<&ScalingRegression> {
        self.regression.as_ref()
    }
}

/// Outcome of one estimator call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EstimatorOutcome<T> {
    /// Not enough usable data for a fit
    Invalid(Degeneracy),
    /// A computed estimate; judge its quality through R²
    Valid(T),
}

impl<T> EstimatorOutcome<T> {
    /// Whether a fit was computed
    pub fn is_valid(&self) -> bool {
        matches!(self, EstimatorOutcome::Valid(_))
    }

    /// The estimate, if valid
    pub fn as_valid(&self) -> Option<&T> {
        match self {
            EstimatorOutcome::Valid(estimate) => Some(estimate),
            EstimatorOutcome::Invalid(_) => None,
        }
    }

    /// The degeneracy, if invalid
    pub fn degeneracy(&self) -> Option<&Degeneracy> {
        match self {
            EstimatorOutcome::Invalid(reason) => Some(reason),
            EstimatorOutcome::Valid(_) => None,
        }
    }
}

impl<T: PointEstimate> EstimatorOutcome<T> {
    /// Point estimate, or the sentinel for invalid outcomes
    pub fn point_estimate(&self) -> f64 {
        match self {
            EstimatorOutcome::Valid(estimate) => estimate.value(),
            EstimatorOutcome::Invalid(_) => T::SENTINEL,
        }
    }

    /// R² of the scaling regression when available
    pub fn r_squared(&self) -> Option<f64> {
        self.as_valid()
            .and_then(|estimate| estimate.regression())
            .map(|regression| regression.fit.r_squared)
    }
}

/// Outcome of the R/S Hurst estimator
pub type HurstOutcome = EstimatorOutcome<HurstEstimate>;

/// Outcome of the correlation-dimension estimator
pub type CorrelationDimensionOutcome = EstimatorOutcome<CorrelationDimensionEstimate>;

/// Point estimates returned by the metrics façade.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChaosMetrics {
    /// Hurst exponent (0.5 when invalid)
    pub hurst: f64,
    /// Correlation dimension (0.0 when invalid)
    pub d2: f64,
}

/// Detailed outcomes of both estimators for one series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChaosReport {
    /// R/S Hurst outcome
    pub hurst: HurstOutcome,
    /// Correlation-dimension outcome
    pub correlation_dimension: CorrelationDimensionOutcome,
}

impl ChaosReport {
    /// Collapse to point estimates
    pub fn metrics(&self) -> ChaosMetrics {
        ChaosMetrics {
            hurst: self.hurst.point_estimate(),
            d2: self.correlation_dimension.point_estimate(),
        }
    }
}
