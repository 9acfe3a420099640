//! Straight-line fits in log-log space.
//!
//! Every scaling estimate in this crate is the slope of an ordinary least
//! squares line. Two interchangeable fitters implement [`LinearFitter`]:
//!
//! - [`ClosedFormFitter`]: centered-sum normal equations (the degree-1
//!   polynomial fit).
//! - [`QrFitter`]: the same problem posed as a two-column design matrix and
//!   solved by Householder QR.
//!
//! Both report R² = 1 − SS_res/SS_tot, with R² defined as exactly 0.0 when the
//! response is constant.

use crate::{
    errors::{validate_all_finite, validate_data_length, ChaosMetricsError, ChaosResult},
    linear_algebra::economy_qr_solve,
    math_utils::{constants, float_ops},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of a straight-line fit `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearFit {
    /// Fitted slope; the scientific estimate for scaling regressions
    pub slope: f64,
    /// Fitted intercept (diagnostic only)
    pub intercept: f64,
    /// Coefficient of determination; 0.0 for constant responses
    pub r_squared: f64,
}

/// A least-squares line fitter.
pub trait LinearFitter {
    /// Fit `y` on `x`. Inputs must have equal length ≥ 2, be finite, and `x`
    /// must not be constant.
    fn fit(&self, x: &[f64], y: &[f64]) -> ChaosResult<LinearFit>;
}

/// Which fitter an estimator uses for its log-log regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FitMethod {
    /// Closed-form normal equations
    #[default]
    ClosedForm,
    /// Householder QR on the design matrix `[1, x]`
    Qr,
}

impl FitMethod {
    /// Fit `y` on `x` with the selected fitter.
    pub fn fit(&self, x: &[f64], y: &[f64]) -> ChaosResult<LinearFit> {
        match self {
            FitMethod::ClosedForm => ClosedFormFitter.fit(x, y),
            FitMethod::Qr => QrFitter.fit(x, y),
        }
    }
}

/// Ordinary least squares through centered sums.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClosedFormFitter;

impl LinearFitter for ClosedFormFitter {
    fn fit(&self, x: &[f64], y: &[f64]) -> ChaosResult<LinearFit> {
        validate_regression_input(x, y)?;

        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;

        // Centering first avoids cancellation when x is large with small spread
        let (sxy, sxx) = x.iter().zip(y).fold((0.0, 0.0), |(sxy, sxx), (xi, yi)| {
            let dx = xi - mean_x;
            (sxy + dx * (yi - mean_y), sxx + dx * dx)
        });

        if float_ops::approx_zero_eps(sxx, constants::MIN_PREDICTOR_SPREAD) {
            return Err(singular_design(sxx / n));
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        finish_fit(x, y, slope, intercept)
    }
}

/// Least squares by Householder QR of the design matrix `[1, x]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrFitter;

impl LinearFitter for QrFitter {
    fn fit(&self, x: &[f64], y: &[f64]) -> ChaosResult<LinearFit> {
        validate_regression_input(x, y)?;

        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let sxx: f64 = x.iter().map(|xi| (xi - mean_x) * (xi - mean_x)).sum();
        if float_ops::approx_zero_eps(sxx, constants::MIN_PREDICTOR_SPREAD) {
            return Err(singular_design(sxx / n));
        }

        let design: Vec<Vec<f64>> = x.iter().map(|&xi| vec![1.0, xi]).collect();
        let beta = economy_qr_solve(&design, y)?;
        finish_fit(x, y, beta[1], beta[0])
    }
}

fn validate_regression_input(x: &[f64], y: &[f64]) -> ChaosResult<()> {
    if x.len() != y.len() {
        return Err(ChaosMetricsError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    validate_data_length(x, 2, "linear_fit")?;
    validate_all_finite(x, "regression predictor")?;
    validate_all_finite(y, "regression response")
}

fn singular_design(variance: f64) -> ChaosMetricsError {
    ChaosMetricsError::NumericalError {
        reason: format!(
            "Predictor variable has zero variance (constant values). X variance: {:.2e}",
            variance
        ),
        operation: Some("linear_fit".to_string()),
    }
}

fn finish_fit(x: &[f64], y: &[f64], slope: f64, intercept: f64) -> ChaosResult<LinearFit> {
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(ChaosMetricsError::NumericalError {
            reason: "Non-finite regression coefficients computed".to_string(),
            operation: Some("linear_fit".to_string()),
        });
    }
    Ok(LinearFit {
        slope,
        intercept,
        r_squared: r_squared(x, y, slope, intercept),
    })
}

/// Coefficient of determination of the line `intercept + slope * x`.
///
/// A constant response has no variance to explain; R² is then 0.0 exactly.
pub fn r_squared(x: &[f64], y: &[f64], slope: f64, intercept: f64) -> f64 {
    let Some(&first) = y.first() else {
        return 0.0;
    };
    if y.iter().all(|&v| v == first) {
        return 0.0;
    }

    let mean_y = y.iter().sum::<f64>() / y.len() as f64;
    let ss_tot: f64 = y.iter().map(|v| (v - mean_y) * (v - mean_y)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = x
        .iter()
        .zip(y)
        .map(|(xi, yi)| {
            let residual = yi - (intercept + slope * xi);
            residual * residual
        })
        .sum();
    1.0 - ss_res / ss_tot
}
