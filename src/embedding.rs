//! Time-delay (Takens) embedding of a scalar series.
//!
//! Row `i` of an embedding with delay τ and dimension m is
//! `[x[i], x[i+τ], …, x[i+(m−1)τ]]`. Rows are stored contiguously in a
//! single row-major buffer.

use crate::errors::{validate_min_count, ChaosMetricsError, ChaosResult};

/// Reconstructed phase-space trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayEmbedding {
    dimension: usize,
    delay: usize,
    coords: Vec<f64>,
}

impl DelayEmbedding {
    /// Embedding dimension m
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Delay τ between coordinates
    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Number of embedded points
    pub fn len(&self) -> usize {
        self.coords.len() / self.dimension
    }

    /// Whether the embedding holds no points
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The `i`-th embedded point. Panics if `i >= len()`.
    pub fn point(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Iterate over embedded points in time order
    pub fn points(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.coords.chunks_exact(self.dimension)
    }

    /// Copy into one `Vec` per point
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.points().map(<[f64]>::to_vec).collect()
    }

    /// Keep at most `cap` points chosen at evenly spaced indices.
    ///
    /// Index `k` of the result is point `floor(k·(N−1)/(cap−1))`, so the first
    /// and last points are always kept. Embeddings already within the cap are
    /// returned unchanged.
    pub fn subsample_evenly(self, cap: usize) -> DelayEmbedding {
        let n = self.len();
        if n <= cap || cap < 2 {
            return self;
        }

        let step = (n - 1) as f64 / (cap - 1) as f64;
        let mut coords = Vec::with_capacity(cap * self.dimension);
        for k in 0..cap {
            let index = ((k as f64 * step).floor() as usize).min(n - 1);
            coords.extend_from_slice(self.point(index));
        }

        DelayEmbedding { coords, ..self }
    }
}

/// Number of points a series of length `n` yields, or `None` if it is too short.
pub fn embedded_len(n: usize, delay: usize, dimension: usize) -> Option<usize> {
    let span = dimension.checked_sub(1)?.checked_mul(delay)?;
    n.checked_sub(span).filter(|&points| points > 0)
}

/// Build the delay embedding of `data`.
///
/// # Errors
/// - `InvalidParameter` if `delay` or `dimension` is zero
/// - `InsufficientData` if `data.len() < (dimension − 1)·delay + 1`
///
/// # Example
/// ```rust
/// use chaos_metrics::embedding::delay_embedding;
///
/// let series: Vec<f64> = (0..10).map(f64::from).collect();
/// let embedding = delay_embedding(&series, 1, 2).unwrap();
/// assert_eq!(embedding.len(), 9);
/// assert_eq!(embedding.point(0), &[0.0, 1.0]);
/// ```
pub fn delay_embedding(data: &[f64], delay: usize, dimension: usize) -> ChaosResult<DelayEmbedding> {
    validate_min_count(delay, 1, "delay")?;
    validate_min_count(dimension, 1, "embedding_dimension")?;

    let points = embedded_len(data.len(), delay, dimension).ok_or_else(|| {
        ChaosMetricsError::InsufficientData {
            required: (dimension - 1).saturating_mul(delay).saturating_add(1),
            actual: data.len(),
        }
    })?;

    let mut coords = Vec::with_capacity(points * dimension);
    for i in 0..points {
        coords.extend((0..dimension).map(|j| data[i + j * delay]));
    }

    Ok(DelayEmbedding {
        dimension,
        delay,
        coords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn test_two_dimensional_unit_delay() {
        let embedding = delay_embedding(&ramp(10), 1, 2).unwrap();
        let expected: Vec<Vec<f64>> = (0..9).map(|i| vec![i as f64, (i + 1) as f64]).collect();
        assert_eq!(embedding.to_rows(), expected);
        assert_eq!(embedding.dimension(), 2);
        assert_eq!(embedding.delay(), 1);
    }

    #[test]
    fn test_longer_delay_row_layout() {
        let embedding = delay_embedding(&ramp(10), 3, 3).unwrap();
        assert_eq!(embedding.len(), 4);
        assert_eq!(embedding.point(0), &[0.0, 3.0, 6.0]);
        assert_eq!(embedding.point(3), &[3.0, 6.0, 9.0]);
    }

    #[test]
    fn test_length_error_only_when_too_short() {
        assert!(delay_embedding(&ramp(3), 1, 3).is_ok());
        assert_eq!(delay_embedding(&ramp(3), 1, 3).unwrap().len(), 1);

        match delay_embedding(&ramp(2), 1, 3) {
            Err(ChaosMetricsError::InsufficientData { required, actual }) => {
                assert_eq!(required, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("Expected InsufficientData, got {:?}", other),
        }
        assert!(delay_embedding(&[], 1, 1).is_err());
    }

    #[test]
    fn test_zero_parameters_rejected() {
        assert!(matches!(
            delay_embedding(&ramp(10), 0, 2),
            Err(ChaosMetricsError::InvalidParameter { .. })
        ));
        assert!(matches!(
            delay_embedding(&ramp(10), 1, 0),
            Err(ChaosMetricsError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_dimension_one_is_the_series() {
        let embedding = delay_embedding(&ramp(5), 4, 1).unwrap();
        assert_eq!(embedding.len(), 5);
        assert_eq!(embedding.point(4), &[4.0]);
    }

    #[test]
    fn test_even_subsampling_keeps_endpoints() {
        let embedding = delay_embedding(&ramp(101), 1, 2).unwrap();
        assert_eq!(embedding.len(), 100);

        let sampled = embedding.clone().subsample_evenly(10);
        assert_eq!(sampled.len(), 10);
        assert_eq!(sampled.point(0), embedding.point(0));
        assert_eq!(sampled.point(9), embedding.point(99));
        // floor(1 * 99 / 9) = 11
        assert_eq!(sampled.point(1), embedding.point(11));

        let untouched = embedding.clone().subsample_evenly(500);
        assert_eq!(untouched, embedding);
    }
}
