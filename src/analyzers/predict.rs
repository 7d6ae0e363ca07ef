//! Trailing moving average over a bucketed visitor series.
//!
//! The "prediction" is a causal smoothing of the observed series: each point
//! gets the mean of itself and up to `window_size` points before it. Nothing
//! is projected beyond the last observed bucket.

use crate::analyzers::types::{AggregatedPoint, Granularity, PredictedPoint};
use crate::analyzers::utility::mean;

/// Computes the trailing average for every point of `sorted_points`.
///
/// `sorted_points` must already be in ascending chronological order. The
/// window for index `i` spans `max(0, i - window_size)..=i`, with
/// `window_size` taken from `granularity` (7 daily, 4 weekly, 3 monthly).
pub fn predict(
    sorted_points: &[AggregatedPoint],
    granularity: Granularity,
) -> Vec<PredictedPoint> {
    let window_size = granularity.window_size();
    let totals: Vec<u64> = sorted_points.iter().map(|p| p.total_visitors).collect();

    sorted_points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let window = &totals[i.saturating_sub(window_size)..=i];
            let predicted_value = if window.is_empty() {
                point.total_visitors as f64
            } else {
                mean(window)
            };

            PredictedPoint {
                bucket: point.bucket.clone(),
                total_visitors: point.total_visitors,
                predicted_value,
            }
        })
        .collect()
}
