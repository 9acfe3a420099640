//! # Chaos Metrics Façade
//!
//! Entry points that run both estimators on a series, plus the demand
//! analysis that prepares the daytime hourly and daily series from raw sales
//! observations and reports on both.
//!
//! ## Usage Example
//!
//! ```rust
//! use chaos_metrics::compute_chaos_metrics;
//!
//! # fn main() -> Result<(), chaos_metrics::ChaosMetricsError> {
//! // Too short for either estimator: the documented defaults come back
//! let metrics = compute_chaos_metrics(&[1.0, 4.0, 2.0, 8.0])?;
//! assert_eq!(metrics.hurst, 0.5);
//! assert_eq!(metrics.d2, 0.0);
//! # Ok(())
//! # }
//! ```

use crate::{
    config::ChaosConfig,
    correlation_dimension::correlation_dimension_details,
    errors::ChaosResult,
    hurst_estimators::hurst_rs_details,
    preprocessing::{
        aggregate_daily, filter_daytime_hours, impute_stockouts, validate_hour_window,
        DemandObservation,
    },
    results::{ChaosMetrics, ChaosReport, EstimatorOutcome, PointEstimate},
};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hurst exponent and correlation dimension of `data` with default settings.
///
/// Degenerate series yield 0.5 and 0.0 respectively.
///
/// # Errors
/// Only when `data` contains NaN or infinite values.
pub fn compute_chaos_metrics(data: &[f64]) -> ChaosResult<ChaosMetrics> {
    compute_chaos_metrics_with_config(data, &ChaosConfig::default())
}

/// [`compute_chaos_metrics`] with explicit estimator settings.
pub fn compute_chaos_metrics_with_config(
    data: &[f64],
    config: &ChaosConfig,
) -> ChaosResult<ChaosMetrics> {
    Ok(compute_chaos_report(data, config)?.metrics())
}

/// Detailed outcomes of both estimators for `data`.
pub fn compute_chaos_report(data: &[f64], config: &ChaosConfig) -> ChaosResult<ChaosReport> {
    config.validate()?;
    Ok(ChaosReport {
        hurst: hurst_rs_details(data, &config.hurst)?,
        correlation_dimension: correlation_dimension_details(data, &config.correlation)?,
    })
}

// ============================================================================
// DEMAND ANALYSIS
// ============================================================================

/// Settings for [`analyze_demand`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DemandAnalysisConfig {
    /// First hour of the trading window (inclusive)
    pub start_hour: u8,
    /// Last hour of the trading window (inclusive)
    pub end_hour: u8,
    /// Replace zero-sales hours by imputed demand before analysis
    pub impute_stockouts: bool,
    /// Estimator settings applied to both series
    pub chaos: ChaosConfig,
}

impl Default for DemandAnalysisConfig {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 22,
            impute_stockouts: false,
            chaos: ChaosConfig::default(),
        }
    }
}

/// Chaos metrics of the daytime hourly and daily demand series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DemandChaosAnalysis {
    /// Metrics of the hourly series within the trading window
    pub hourly: ChaosReport,
    /// Metrics of the per-day totals over the trading window
    pub daily: ChaosReport,
    /// Length of the hourly series
    pub n_hourly: usize,
    /// Length of the daily series
    pub n_daily: usize,
    /// First hour of the trading window
    pub start_hour: u8,
    /// Last hour of the trading window
    pub end_hour: u8,
}

/// Run both estimators on the daytime hourly and daily demand series.
///
/// Observations are taken in the order given; the daily series is ordered by
/// day.
///
/// # Errors
/// `InvalidParameter` for a bad hour window or estimator config, and
/// `NumericalError` for non-finite sales (unless imputed).
pub fn analyze_demand(
    observations: &[DemandObservation],
    config: &DemandAnalysisConfig,
) -> ChaosResult<DemandChaosAnalysis> {
    validate_hour_window(config.start_hour, config.end_hour)?;
    config.chaos.validate()?;

    let mut daytime = filter_daytime_hours(observations, config.start_hour, config.end_hour)?;
    if config.impute_stockouts {
        let sales: Vec<f64> = daytime.iter().map(|obs| obs.sales).collect();
        for (obs, imputed) in daytime.iter_mut().zip(impute_stockouts(&sales)) {
            obs.sales = imputed;
        }
    }

    let hourly_series: Vec<f64> = daytime.iter().map(|obs| obs.sales).collect();
    let daily_series: Vec<f64> = aggregate_daily(&daytime)
        .into_iter()
        .map(|(_, total)| total)
        .collect();

    log::debug!(
        "Demand analysis over {:02}:00-{:02}:00: {} hourly, {} daily points",
        config.start_hour,
        config.end_hour,
        hourly_series.len(),
        daily_series.len()
    );

    Ok(DemandChaosAnalysis {
        hourly: compute_chaos_report(&hourly_series, &config.chaos)?,
        daily: compute_chaos_report(&daily_series, &config.chaos)?,
        n_hourly: hourly_series.len(),
        n_daily: daily_series.len(),
        start_hour: config.start_hour,
        end_hour: config.end_hour,
    })
}

fn write_outcome<T: PointEstimate>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    outcome: &EstimatorOutcome<T>,
) -> fmt::Result {
    writeln!(f, "  {}: {:.4}", label, outcome.point_estimate())?;
    match (outcome, outcome.r_squared()) {
        (EstimatorOutcome::Invalid(reason), _) => writeln!(f, "  {} R2: n/a ({})", label, reason),
        (EstimatorOutcome::Valid(_), Some(r2)) => writeln!(f, "  {} R2: {:.4}", label, r2),
        (EstimatorOutcome::Valid(_), None) => writeln!(f, "  {} R2: n/a", label),
    }
}

fn write_report(f: &mut fmt::Formatter<'_>, title: &str, report: &ChaosReport) -> fmt::Result {
    writeln!(f, "{}:", title)?;
    write_outcome(f, "Hurst (R/S)", &report.hurst)?;
    write_outcome(f, "Correlation dimension D2", &report.correlation_dimension)
}

impl fmt::Display for DemandChaosAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Chaos Metrics Analysis")?;
        writeln!(
            f,
            "Daytime window: {:02}:00-{:02}:00",
            self.start_hour, self.end_hour
        )?;
        writeln!(f, "Hourly samples: {}", self.n_hourly)?;
        writeln!(f, "Daily samples: {}", self.n_daily)?;
        writeln!(f)?;
        write_report(f, "Daytime hourly metrics", &self.hourly)?;
        writeln!(f)?;
        write_report(f, "Daytime daily metrics", &self.daily)
    }
}

// ============================================================================
// COMPARISON
// ============================================================================

/// Change of the point estimates between two runs on the same series.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricsDelta {
    /// Baseline point estimates
    pub baseline: ChaosMetrics,
    /// Candidate point estimates
    pub candidate: ChaosMetrics,
}

impl MetricsDelta {
    /// Candidate minus baseline Hurst exponent
    pub fn hurst_delta(&self) -> f64 {
        self.candidate.hurst - self.baseline.hurst
    }

    /// Candidate minus baseline correlation dimension
    pub fn d2_delta(&self) -> f64 {
        self.candidate.d2 - self.baseline.d2
    }
}

/// Side-by-side view of two demand analyses, e.g. two fitters or two configs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnalysisComparison {
    /// Hourly series
    pub hourly: MetricsDelta,
    /// Daily series
    pub daily: MetricsDelta,
}

/// Compare the point estimates of two demand analyses.
pub fn compare_analyses(
    baseline: &DemandChaosAnalysis,
    candidate: &DemandChaosAnalysis,
) -> AnalysisComparison {
    AnalysisComparison {
        hourly: MetricsDelta {
            baseline: baseline.hourly.metrics(),
            candidate: candidate.hourly.metrics(),
        },
        daily: MetricsDelta {
            baseline: baseline.daily.metrics(),
            candidate: candidate.daily.metrics(),
        },
    }
}

impl fmt::Display for AnalysisComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Hourly Hurst", self.hourly.baseline.hurst, self.hourly.candidate.hurst, self.hourly.hurst_delta()),
            ("Daily Hurst", self.daily.baseline.hurst, self.daily.candidate.hurst, self.daily.hurst_delta()),
            ("Hourly D2", self.hourly.baseline.d2, self.hourly.candidate.d2, self.hourly.d2_delta()),
            ("Daily D2", self.daily.baseline.d2, self.daily.candidate.d2, self.daily.d2_delta()),
        ];
        for (label, before, after, delta) in rows {
            writeln!(f, "{}: {:.4} -> {:.4} (delta={:.4})", label, before, after, delta)?;
        }
        Ok(())
    }
}
