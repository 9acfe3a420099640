//! Error types and validation functions for chaos-metric estimation.
//!
//! Only contract violations are errors here: non-finite input, mismatched
//! regression inputs, invalid tuning parameters, or an embedding requested from
//! a series that cannot hold a single delay vector. Data-quality degeneracies
//! (short or constant series, too few usable scales) are not errors; the
//! estimators report them through [`crate::results::EstimatorOutcome::Invalid`].

use thiserror::Error;

/// Error types for chaos-metric operations.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ChaosMetricsError {
    /// Insufficient data for the requested operation.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Numerical computation error (non-finite input, singular design, ...).
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
        /// Operation that failed
        operation: Option<String>,
    },

    /// Two inputs that must share a length do not.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },
}

/// Result type for chaos-metric operations.
pub type ChaosResult<T> = Result<T, ChaosMetricsError>;

/// Validates that data has sufficient length.
///
/// # Example
/// ```rust
/// use chaos_metrics::errors::validate_data_length;
///
/// let data = vec![1.0, 2.0, 3.0];
/// assert!(validate_data_length(&data, 2, "test").is_ok());
/// assert!(validate_data_length(&data, 5, "test").is_err());
/// ```
pub fn validate_data_length(
    data: &[f64],
    min_required: usize,
    _operation: &str,
) -> ChaosResult<()> {
    if data.len() < min_required {
        Err(ChaosMetricsError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter is within inclusive bounds.
///
/// # Example
/// ```rust
/// use chaos_metrics::errors::validate_parameter;
///
/// assert!(validate_parameter(0.05, 0.0, 1.0, "lower_percentile").is_ok());
/// assert!(validate_parameter(1.5, 0.0, 1.0, "lower_percentile").is_err());
/// ```
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> ChaosResult<()> {
    if value.is_nan() {
        return Err(ChaosMetricsError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if min.is_nan() || max.is_nan() || min > max {
        return Err(ChaosMetricsError::NumericalError {
            reason: format!(
                "Invalid bounds for parameter {}: min={}, max={}",
                name, min, max
            ),
            operation: None,
        });
    }

    if value < min || value > max {
        Err(ChaosMetricsError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("[{}, {}]", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates that an integer tuning parameter is at least `min`.
pub fn validate_min_count(value: usize, min: usize, name: &str) -> ChaosResult<()> {
    if value < min {
        Err(ChaosMetricsError::InvalidParameter {
            parameter: name.to_string(),
            value: value as f64,
            constraint: format!(">= {}", min),
        })
    } else {
        Ok(())
    }
}

/// Validates that a value is finite and not NaN.
pub fn validate_finite(value: f64, name: &str) -> ChaosResult<()> {
    if !value.is_finite() {
        Err(ChaosMetricsError::NumericalError {
            reason: format!("{} is not finite: {}", name, value),
            operation: None,
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// Returns on the first non-finite value, reporting its index.
///
/// # Example
/// ```rust
/// use chaos_metrics::errors::validate_all_finite;
///
/// assert!(validate_all_finite(&[1.0, 2.0, 3.0], "series").is_ok());
/// assert!(validate_all_finite(&[1.0, f64::NAN, 3.0], "series").is_err());
/// ```
pub fn validate_all_finite(data: &[f64], name: &str) -> ChaosResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        let value_desc = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };

        return Err(ChaosMetricsError::NumericalError {
            reason: format!(
                "{} contains non-finite value at index {}: {}",
                name, i, value_desc
            ),
            operation: None,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_data_length() {
        let data = vec![1.0; 10];
        assert!(validate_data_length(&data, 10, "test").is_ok());

        match validate_data_length(&data, 64, "test") {
            Err(ChaosMetricsError::InsufficientData { required, actual }) => {
                assert_eq!(required, 64);
                assert_eq!(actual, 10);
            }
            other => panic!("Expected InsufficientData, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_parameter_ranges() {
        assert!(validate_parameter(0.8, 0.0, 1.0, "upper").is_ok());
        assert!(validate_parameter(0.0, 0.0, 1.0, "upper").is_ok());
        assert!(validate_parameter(1.0, 0.0, 1.0, "upper").is_ok());
        assert!(matches!(
            validate_parameter(-0.1, 0.0, 1.0, "upper"),
            Err(ChaosMetricsError::InvalidParameter { .. })
        ));
        assert!(matches!(
            validate_parameter(f64::NAN, 0.0, 1.0, "upper"),
            Err(ChaosMetricsError::InvalidParameter { .. })
        ));
        assert!(matches!(
            validate_parameter(0.5, 1.0, 0.0, "upper"),
            Err(ChaosMetricsError::NumericalError { .. })
        ));
    }

    #[test]
    fn test_validate_min_count() {
        assert!(validate_min_count(2, 1, "delay").is_ok());
        assert!(validate_min_count(0, 1, "delay").is_err());
    }

    #[test]
    fn test_validate_all_finite_reports_index() {
        let err = validate_all_finite(&[1.0, 2.0, f64::NEG_INFINITY], "series").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("index 2"));
        assert!(message.contains("-Infinity"));
        assert!(validate_all_finite(&[], "series").is_ok());
    }

    #[test]
    fn test_error_display_formatting() {
        let err = ChaosMetricsError::InvalidParameter {
            parameter: "num_radii".to_string(),
            value: 1.0,
            constraint: ">= 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameter: num_radii = 1, expected >= 3"
        );

        let err = ChaosMetricsError::DimensionMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Dimension mismatch: expected 4, got 3");
    }
}
