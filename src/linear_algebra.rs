//! Householder QR least squares.
//!
//! Backs the alternative regression fitter in [`crate::regression`]: the design
//! matrix is factored column by column with Householder reflectors applied to
//! the response in place, so `Q` is never materialised.

use crate::errors::{ChaosMetricsError, ChaosResult};

fn ensure_finite(values: impl IntoIterator<Item = f64>, operation: &str) -> ChaosResult<()> {
    if let Some((i, val)) = values.into_iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ChaosMetricsError::NumericalError {
            reason: format!("Non-finite value ({}) at flat position {}", val, i),
            operation: Some(operation.to_string()),
        });
    }
    Ok(())
}

/// Validates that a row-major matrix is rectangular and non-empty.
fn ensure_rectangular_matrix(a: &[Vec<f64>]) -> ChaosResult<(usize, usize)> {
    let cols = a.first().map(Vec::len).unwrap_or(0);
    if a.is_empty() || cols == 0 {
        return Err(ChaosMetricsError::NumericalError {
            reason: "Empty matrix provided".to_string(),
            operation: Some("matrix_validation".to_string()),
        });
    }
    if let Some(row) = a.iter().find(|row| row.len() != cols) {
        return Err(ChaosMetricsError::DimensionMismatch {
            expected: cols,
            actual: row.len(),
        });
    }
    Ok((a.len(), cols))
}

/// Solve the least-squares problem `min ||A x - b||` by economy QR.
///
/// `a` is row-major with `m` rows (observations) and `n` columns
/// (predictors), `m >= n`. Columns whose reflected norm falls under an
/// adaptive rank tolerance are treated as rank deficient and their
/// coefficient is set to zero.
pub fn economy_qr_solve(a: &[Vec<f64>], b: &[f64]) -> ChaosResult<Vec<f64>> {
    let (m, n) = ensure_rectangular_matrix(a)?;
    ensure_finite(a.iter().flatten().copied(), "economy_qr_solve")?;
    ensure_finite(b.iter().copied(), "economy_qr_solve")?;

    if m != b.len() {
        return Err(ChaosMetricsError::DimensionMismatch {
            expected: m,
            actual: b.len(),
        });
    }
    if n > m {
        return Err(ChaosMetricsError::InsufficientData {
            required: n,
            actual: m,
        });
    }

    let mut r = a.to_vec();
    let mut y = b.to_vec();

    let frobenius = r.iter().flatten().map(|v| v * v).sum::<f64>().sqrt();
    let rank_tol = 100.0 * f64::EPSILON * (m.max(n) as f64) * frobenius.max(1.0);

    for k in 0..n.min(m.saturating_sub(1)) {
        let mut v: Vec<f64> = (k..m).map(|i| r[i][k]).collect();
        let norm_v = v.iter().map(|vi| vi * vi).sum::<f64>().sqrt();
        if norm_v < rank_tol {
            (k..m).for_each(|i| r[i][k] = 0.0);
            continue;
        }

        v[0] += norm_v.copysign(v[0]);
        let norm_reflector = v.iter().map(|vi| vi * vi).sum::<f64>().sqrt();
        if norm_reflector < rank_tol {
            continue;
        }
        v.iter_mut().for_each(|vi| *vi /= norm_reflector);

        for j in k..n {
            let dot: f64 = (k..m).map(|i| v[i - k] * r[i][j]).sum();
            (k..m).for_each(|i| r[i][j] -= 2.0 * v[i - k] * dot);
        }
        let dot_y: f64 = (k..m).map(|i| v[i - k] * y[i]).sum();
        (k..m).for_each(|i| y[i] -= 2.0 * v[i - k] * dot_y);
    }

    // Back-substitution on the upper triangle R x = Q'b
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        if r[i][i].abs() < rank_tol {
            continue;
        }
        let tail: f64 = (i + 1..n).map(|j| r[i][j] * x[j]).sum();
        x[i] = (y[i] - tail) / r[i][i];
    }

    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_qr_solves_exact_line() {
        // y = 1 + 2x
        let design: Vec<Vec<f64>> = (0..5).map(|i| vec![1.0, i as f64]).collect();
        let y: Vec<f64> = (0..5).map(|i| 1.0 + 2.0 * i as f64).collect();
        let beta = economy_qr_solve(&design, &y).unwrap();
        assert_approx_eq!(beta[0], 1.0, 1e-10);
        assert_approx_eq!(beta[1], 2.0, 1e-10);
    }

    #[test]
    fn test_qr_rejects_malformed_input() {
        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(matches!(
            economy_qr_solve(&ragged, &[1.0, 2.0]),
            Err(ChaosMetricsError::DimensionMismatch { .. })
        ));

        let design = vec![vec![1.0, 0.0], vec![1.0, 1.0]];
        assert!(economy_qr_solve(&design, &[1.0]).is_err());
        assert!(economy_qr_solve(&design, &[1.0, f64::NAN]).is_err());

        let wide = vec![vec![1.0, 2.0, 3.0]];
        assert!(economy_qr_solve(&wide, &[1.0]).is_err());
        assert!(economy_qr_solve(&[], &[]).is_err());
    }
}
