use crate::analyzers::aggregate::{aggregate_by_bucket, aggregate_by_category, aggregate_trend};
use crate::analyzers::bucket::sort_chronologically;
use crate::analyzers::predict::predict;
use crate::analyzers::types::{Dashboard, PredictedPoint, VisitorRecord};
use crate::config::DashboardConfig;
use crate::parser::ParsedRecords;
use crate::stats::DatasetSummary;
use tracing::{debug, info};

/// Builds every dashboard view for one parsed upload and configuration.
///
/// This never fails: missing data shows up as empty series.
#[tracing::instrument(skip_all, fields(records = parsed.records.len()))]
pub fn build_dashboard(parsed: &ParsedRecords, config: &DashboardConfig) -> Dashboard {
    let summary = DatasetSummary::from_parsed(parsed);
    if parsed.is_empty() {
        info!("No data uploaded yet");
    }

    let trend = aggregate_trend(
        &parsed.records,
        config.trend_granularity,
        config.reference_year,
    );
    let categories = aggregate_by_category(&parsed.records);
    let prediction = prediction_series(&parsed.records, config);

    debug!(
        trend = trend.len(),
        categories = categories.len(),
        prediction = prediction.len(),
        "Dashboard built"
    );

    Dashboard {
        config: config.clone(),
        summary,
        trend,
        categories,
        prediction,
    }
}

/// Weather-filtered totals with their trailing average, in time order.
pub fn prediction_series(
    records: &[VisitorRecord],
    config: &DashboardConfig,
) -> Vec<PredictedPoint> {
    let granularity = config.prediction_granularity;
    let mut points = aggregate_by_bucket(records, granularity, &config.weather_filter);
    sort_chronologically(&mut points, granularity);

    let prediction = predict(&points, granularity);
    if prediction.is_empty() {
        info!(weather = ?config.weather_filter, %granularity, "No prediction data available");
    }
    prediction
}
