//! Demand-series preparation ahead of chaos analysis.
//!
//! Hourly sales arrive as one record per day holding the 24 hourly values.
//! They are expanded into [`DemandObservation`]s, restricted to trading hours,
//! and optionally summed per day. Stockouts (recorded as zero or missing
//! sales) can be imputed so they do not masquerade as demand collapses.

use crate::errors::{ChaosMetricsError, ChaosResult};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Last valid hour of the day
pub const MAX_HOUR: u8 = 23;

/// One hourly sales observation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DemandObservation {
    /// Day ordinal (any monotone day index)
    pub day: u32,
    /// Hour of day, 0..=23
    pub hour: u8,
    /// Units sold during the hour
    pub sales: f64,
}

/// A day of sales with one entry per hour, as delivered by the source data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailySalesRecord {
    /// Day ordinal
    pub day: u32,
    /// Hourly sales, index = hour of day
    pub hourly_sales: Vec<f64>,
}

/// Expand per-day records into hourly observations, in record order.
///
/// # Errors
/// `InvalidParameter` if a record carries more than 24 hourly values.
pub fn expand_hourly_sales(records: &[DailySalesRecord]) -> ChaosResult<Vec<DemandObservation>> {
    let mut observations = Vec::with_capacity(records.len() * 24);
    for record in records {
        if record.hourly_sales.len() > usize::from(MAX_HOUR) + 1 {
            return Err(ChaosMetricsError::InvalidParameter {
                parameter: "hourly_sales".to_string(),
                value: record.hourly_sales.len() as f64,
                constraint: format!("at most 24 values per day (day {})", record.day),
            });
        }
        observations.extend(record.hourly_sales.iter().enumerate().map(|(hour, &sales)| {
            DemandObservation {
                day: record.day,
                hour: hour as u8,
                sales,
            }
        }));
    }
    Ok(observations)
}

/// Replace stockouts with imputed demand.
///
/// Zero and NaN entries count as stockouts. Gaps between two observed values
/// are filled by linear interpolation, trailing gaps repeat the last observed
/// value, and leading gaps (before any observation) become 0.
///
/// ```rust
/// use chaos_metrics::preprocessing::impute_stockouts;
///
/// let filled = impute_stockouts(&[0.0, 10.0, f64::NAN, 6.0, 0.0]);
/// assert_eq!(filled, vec![0.0, 10.0, 8.0, 6.0, 6.0]);
/// ```
pub fn impute_stockouts(series: &[f64]) -> Vec<f64> {
    let is_observed = |v: f64| !v.is_nan() && v != 0.0;
    let mut out = series.to_vec();
    let mut last_observed: Option<usize> = None;

    for (i, &value) in series.iter().enumerate() {
        if !is_observed(value) {
            continue;
        }
        if let Some(prev) = last_observed {
            let span = (i - prev) as f64;
            let (start, end) = (series[prev], value);
            for (k, slot) in out[prev + 1..i].iter_mut().enumerate() {
                let weight = (k + 1) as f64 / span;
                *slot = start + (end - start) * weight;
            }
        } else {
            out[..i].iter_mut().for_each(|slot| *slot = 0.0);
        }
        last_observed = Some(i);
    }

    match last_observed {
        Some(last) => {
            let fill = series[last];
            out[last + 1..].iter_mut().for_each(|slot| *slot = fill);
        }
        None => out.iter_mut().for_each(|slot| *slot = 0.0),
    }
    out
}

/// Keep observations whose hour lies in `start_hour..=end_hour`.
///
/// # Errors
/// `InvalidParameter` unless `start_hour <= end_hour <= 23`.
pub fn filter_daytime_hours(
    observations: &[DemandObservation],
    start_hour: u8,
    end_hour: u8,
) -> ChaosResult<Vec<DemandObservation>> {
    validate_hour_window(start_hour, end_hour)?;
    Ok(observations
        .iter()
        .filter(|obs| (start_hour..=end_hour).contains(&obs.hour))
        .copied()
        .collect())
}

/// Total sales per day, ordered by day.
pub fn aggregate_daily(observations: &[DemandObservation]) -> Vec<(u32, f64)> {
    let mut totals: BTreeMap<u32, f64> = BTreeMap::new();
    for obs in observations {
        *totals.entry(obs.day).or_insert(0.0) += obs.sales;
    }
    totals.into_iter().collect()
}

pub(crate) fn validate_hour_window(start_hour: u8, end_hour: u8) -> ChaosResult<()> {
    if end_hour > MAX_HOUR {
        return Err(ChaosMetricsError::InvalidParameter {
            parameter: "end_hour".to_string(),
            value: f64::from(end_hour),
            constraint: format!("<= {}", MAX_HOUR),
        });
    }
    if start_hour > end_hour {
        return Err(ChaosMetricsError::InvalidParameter {
            parameter: "start_hour".to_string(),
            value: f64::from(start_hour),
            constraint: format!("<= end_hour ({})", end_hour),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(day: u32, hour: u8, sales: f64) -> DemandObservation {
        DemandObservation { day, hour, sales }
    }

    #[test]
    fn test_expand_hourly_sales() {
        let records = vec![
            DailySalesRecord {
                day: 1,
                hourly_sales: vec![1.0, 2.0],
            },
            DailySalesRecord {
                day: 2,
                hourly_sales: vec![3.0],
            },
        ];
        let expanded = expand_hourly_sales(&records).unwrap();
        assert_eq!(
            expanded,
            vec![obs(1, 0, 1.0), obs(1, 1, 2.0), obs(2, 0, 3.0)]
        );

        let too_long = vec![DailySalesRecord {
            day: 3,
            hourly_sales: vec![0.0; 25],
        }];
        assert!(expand_hourly_sales(&too_long).is_err());
    }

    #[test]
    fn test_impute_stockouts_fills_every_gap() {
        let filled = impute_stockouts(&[10.0, 0.0, f64::NAN, 5.0]);
        assert!(filled.iter().all(|v| v.is_finite()));
        assert!((filled[1] - 25.0 / 3.0).abs() < 1e-12);
        assert!((filled[2] - 20.0 / 3.0).abs() < 1e-12);

        assert_eq!(impute_stockouts(&[0.0, f64::NAN]), vec![0.0, 0.0]);
        assert_eq!(impute_stockouts(&[]), Vec::<f64>::new());
        assert_eq!(impute_stockouts(&[2.0, 3.0]), vec![2.0, 3.0]);
    }

    #[test]
    fn test_daytime_filter_is_inclusive() {
        let data: Vec<DemandObservation> = (0..24).map(|h| obs(0, h, f64::from(h))).collect();
        let filtered = filter_daytime_hours(&data, 8, 22).unwrap();
        assert_eq!(filtered.len(), 15);
        assert_eq!(filtered.first().map(|o| o.hour), Some(8));
        assert_eq!(filtered.last().map(|o| o.hour), Some(22));

        assert!(filter_daytime_hours(&data, 9, 8).is_err());
        assert!(filter_daytime_hours(&data, 0, 24).is_err());
    }

    #[test]
    fn test_aggregate_daily_orders_by_day() {
        let data = vec![obs(3, 9, 1.0), obs(1, 9, 2.0), obs(3, 10, 4.0), obs(1, 12, 0.5)];
        assert_eq!(aggregate_daily(&data), vec![(1, 2.5), (3, 5.0)]);
    }
}
