//! Integration tests for the two failure kinds: degenerate data resolves to
//! `Invalid` outcomes, malformed calls return errors.

use chaos_metrics::generators::{generate_benchmark_series, BenchmarkSeriesType, GeneratorConfig};
use chaos_metrics::{
    compute_chaos_metrics, compute_chaos_metrics_with_config, compute_chaos_report,
    correlation_dimension_details, hurst_rs_details, ChaosConfig, ChaosMetrics,
    ChaosMetricsError, CorrelationDimensionConfig, Degeneracy, HurstConfig,
};

fn noise(length: usize) -> Vec<f64> {
    let config = GeneratorConfig {
        length,
        seed: Some(77),
    };
    generate_benchmark_series(BenchmarkSeriesType::WhiteNoise, &config).unwrap()
}

/// Test scenario: degenerate series never raise
///
/// A retail series made of stockout hours (all zeros) or a handful of points
/// still produces the documented defaults.
#[test]
fn test_degenerate_series_resolve_to_defaults() {
    let defaults = ChaosMetrics { hurst: 0.5, d2: 0.0 };
    for data in [vec![], vec![0.0; 24], vec![0.0; 5000], noise(40)] {
        assert_eq!(compute_chaos_metrics(&data).unwrap(), defaults);
    }

    let report = compute_chaos_report(&[2.0; 300], &ChaosConfig::default()).unwrap();
    assert_eq!(report.hurst.degeneracy(), Some(&Degeneracy::ZeroVariance));
    assert_eq!(
        report.correlation_dimension.degeneracy(),
        Some(&Degeneracy::ZeroVariance)
    );
}

/// Test scenario: finite values near the overflow threshold
///
/// Squared differences of values around 1e154 exceed `f64::MAX`; both
/// estimators are scale-free and must match the unscaled series.
#[test]
fn test_huge_magnitudes_match_unscaled_series() {
    let data = noise(1500);
    let huge: Vec<f64> = data.iter().map(|x| x * 1.5e154).collect();
    assert!(huge.iter().all(|x| x.is_finite()));

    let reference = compute_chaos_metrics(&data).unwrap();
    let metrics = compute_chaos_metrics(&huge).unwrap();
    assert!((metrics.hurst - reference.hurst).abs() < 1e-9);
    assert!((metrics.d2 - reference.d2).abs() < 1e-6);

    let report = compute_chaos_report(&huge, &ChaosConfig::default()).unwrap();
    assert!(report.hurst.is_valid());
    assert!(report.correlation_dimension.is_valid());
}

/// Test scenario: series long enough for H but not for D2
#[test]
fn test_mixed_validity_between_estimators() {
    let report = compute_chaos_report(&noise(100), &ChaosConfig::default()).unwrap();
    assert!(report.hurst.is_valid());
    assert_eq!(
        report.correlation_dimension.degeneracy(),
        Some(&Degeneracy::TooShort {
            required: 128,
            actual: 100
        })
    );
    assert_eq!(report.metrics().d2, 0.0);
}

/// Test scenario: non-finite values are a contract violation
#[test]
fn test_non_finite_values_are_rejected() {
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let mut data = noise(256);
        data[100] = bad;

        let error = compute_chaos_metrics(&data).unwrap_err();
        match error {
            ChaosMetricsError::NumericalError { reason, .. } => {
                assert!(reason.contains("index 100"), "unexpected reason: {}", reason)
            }
            other => panic!("Expected NumericalError, got {:?}", other),
        }
    }

    // Short series are still checked: NaN is never a data-quality default
    assert!(hurst_rs_details(&[f64::NAN], &HurstConfig::default()).is_err());
}

/// Test scenario: invalid tuning parameters
#[test]
fn test_invalid_configuration_is_rejected() {
    let data = noise(512);

    let config = ChaosConfig {
        hurst: HurstConfig::default().with_min_window(1),
        ..Default::default()
    };
    assert!(matches!(
        compute_chaos_metrics_with_config(&data, &config),
        Err(ChaosMetricsError::InvalidParameter { .. })
    ));

    let config = CorrelationDimensionConfig::default().with_embedding(0, 1);
    assert!(matches!(
        correlation_dimension_details(&data, &config),
        Err(ChaosMetricsError::InvalidParameter { .. })
    ));
}

/// Test scenario: an embedding that cannot fit a single point is a length error
#[test]
fn test_oversized_embedding_is_a_length_error() {
    let data = noise(300);
    let config = CorrelationDimensionConfig::default().with_embedding(4, 120);
    match correlation_dimension_details(&data, &config) {
        Err(ChaosMetricsError::InsufficientData { required, actual }) => {
            assert_eq!(required, 361);
            assert_eq!(actual, 300);
        }
        other => panic!("Expected InsufficientData, got {:?}", other),
    }
}

/// Test scenario: a two-level series (on/off demand) has a single positive
/// pairwise distance, so the radius grid collapses
#[test]
fn test_two_level_series_collapses_radius_grid() {
    let data: Vec<f64> = (0..400).map(|i| if i % 2 == 0 { 0.0 } else { 12.0 }).collect();
    let config = CorrelationDimensionConfig {
        strategy: chaos_metrics::StrategyPreference::ManualOnly,
        ..Default::default()
    };
    let outcome = correlation_dimension_details(&data, &config).unwrap();
    assert!(matches!(
        outcome.degeneracy(),
        Some(Degeneracy::CollapsedRadiusBounds { .. })
    ));
    assert_eq!(outcome.point_estimate(), 0.0);
}
