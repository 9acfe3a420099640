//! # Demand Chaos Metrics
//!
//! Nonlinear diagnostics for retail demand series, with companion inventory
//! control models.
//!
//! The core estimates two scaling exponents from a single finite series and
//! returns, next to each point estimate, the log-log regression it came from:
//!
//! - **Hurst exponent** by rescaled-range (R/S) analysis over log-spaced
//!   window sizes
//! - **Correlation dimension D2** by Grassberger–Procaccia on a time-delay
//!   embedding
//!
//! Every estimator distinguishes two failure kinds. Data-quality problems
//! (short series, constant series, too few usable scales) are not errors:
//! they come back as [`EstimatorOutcome::Invalid`], whose point form is a
//! documented default (0.5 for H, 0.0 for D2). Malformed calls (non-finite
//! values, invalid parameters, an embedding longer than the series) return
//! [`ChaosMetricsError`].
//!
//! ## Quick Start
//!
//! ```rust
//! use chaos_metrics::generators::{generate_benchmark_series, BenchmarkSeriesType, GeneratorConfig};
//! use chaos_metrics::{compute_chaos_report, ChaosConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GeneratorConfig { length: 1024, seed: Some(7) };
//!     let demand = generate_benchmark_series(BenchmarkSeriesType::WhiteNoise, &config)?;
//!
//!     let report = compute_chaos_report(&demand, &ChaosConfig::default())?;
//!     if let Some(estimate) = report.hurst.as_valid() {
//!         println!(
//!             "H = {:.3} (R2 {:.3}, {} windows)",
//!             estimate.hurst,
//!             estimate.regression.fit.r_squared,
//!             estimate.window_sizes.len()
//!         );
//!     }
//!     println!("D2 = {:.3}", report.correlation_dimension.point_estimate());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for configs and results
//! - `std-scaled-correlation-sum`: rayon-backed correlation sum over radii
//!   of 0.1σ to 0.5σ, tried before the manual Grassberger–Procaccia
//!   estimator. It covers smaller scales than the percentile grid, so D2
//!   changes for every caller in the build (about 1.97 instead of 1.64 on
//!   Gaussian noise); leave it off when results must match across crates
//!
//! ## Control Models
//!
//! [`inventory_dynamics`] integrates the nonlinear spoilage and replenishment
//! ODEs and classifies their equilibrium; [`linear_control`] provides the
//! integrator transfer function used for the linear view of the same plant.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod analyzer;
pub mod config;
pub mod errors;
pub mod linear_algebra;
pub mod math_utils;
pub mod preprocessing;
pub mod regression;
pub mod results;

// Estimators
pub mod correlation_dimension;
pub mod embedding;
pub mod hurst_estimators;

// Control models
pub mod inventory_dynamics;
pub mod linear_control;

// Synthetic data
pub mod generators;

// Re-exports for convenience - main public API
pub use analyzer::*;
pub use config::{ChaosConfig, CorrelationDimensionConfig, HurstConfig, StrategyPreference};
pub use errors::{ChaosMetricsError, ChaosResult};
pub use results::{
    ChaosMetrics, ChaosReport, CorrelationDimensionEstimate, CorrelationDimensionOutcome,
    CorrelationStrategyKind, Degeneracy, EstimatorOutcome, HurstEstimate, HurstOutcome,
    PointEstimate, ScalingRegression,
};

// Estimator exports
pub use correlation_dimension::{
    correlation_dimension, correlation_dimension_details, correlation_dimension_with_strategy,
    CorrelationDimensionStrategy, GrassbergerProcaccia,
};
#[cfg(feature = "std-scaled-correlation-sum")]
#[cfg_attr(docsrs, doc(cfg(feature = "std-scaled-correlation-sum")))]
pub use correlation_dimension::StdScaledCorrelationSum;
pub use embedding::{delay_embedding, DelayEmbedding};
pub use hurst_estimators::{hurst_rs, hurst_rs_details};
pub use regression::{ClosedFormFitter, FitMethod, LinearFit, LinearFitter, QrFitter};

// Preprocessing exports
pub use preprocessing::{
    aggregate_daily, expand_hourly_sales, filter_daytime_hours, impute_stockouts,
    DailySalesRecord, DemandObservation,
};

// Control model exports
pub use inventory_dynamics::{
    integrate_inventory, integrate_inventory_system, EquilibriumClassification, EquilibriumKind,
    IntegrationMethod, InventoryParams,
};
pub use linear_control::IntegratorTransferFunction;
