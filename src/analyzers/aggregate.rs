use crate::analyzers::bucket::{bucket_key, month_key, month_label, sort_chronologically};
use crate::analyzers::types::{
    AggregatedPoint, CategoryAggregatedPoint, Granularity, VisitorRecord, VisitorType,
    WeatherFilter,
};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Sums visitors per time bucket.
///
/// Records are first narrowed by `weather`, then grouped by their bucket key
/// under `granularity`. Records without a valid key are left out. Totals
/// saturate at `u64::MAX`. The output order is unspecified; use
/// [`sort_chronologically`] before display or prediction.
pub fn aggregate_by_bucket(
    records: &[VisitorRecord],
    granularity: Granularity,
    weather: &WeatherFilter,
) -> Vec<AggregatedPoint> {
    let mut totals: HashMap<String, u64> = HashMap::new();
    let mut without_key = 0usize;

    for record in records.iter().filter(|r| weather.matches(r)) {
        let Some(key) = record
            .date
            .as_deref()
            .and_then(|d| bucket_key(d, granularity))
        else {
            without_key += 1;
            continue;
        };

        let total = totals.entry(key).or_default();
        *total = total.saturating_add(record.num_visitors);
    }

    if without_key > 0 {
        debug!(%granularity, without_key, "Records without a bucket key were skipped");
    }

    totals
        .into_iter()
        .map(|(bucket, total_visitors)| AggregatedPoint {
            bucket,
            total_visitors,
        })
        .collect()
}

/// Monthly totals split into one-day, camping and RV center visitors.
///
/// Other visitor types count toward no column. The result is ordered by month.
pub fn aggregate_by_category(records: &[VisitorRecord]) -> Vec<CategoryAggregatedPoint> {
    let mut months: BTreeMap<String, CategoryAggregatedPoint> = BTreeMap::new();

    for record in records {
        let Some(month) = record.date.as_deref().and_then(month_key) else {
            continue;
        };

        let point = months
            .entry(month)
            .or_insert_with_key(|month| CategoryAggregatedPoint {
                month: month.clone(),
                ..Default::default()
            });

        let column = match record.visitor_type {
            Some(VisitorType::OneDayVisit) => &mut point.one_day,
            Some(VisitorType::Camping) => &mut point.camping,
            Some(VisitorType::RvCenter) => &mut point.rv_center,
            Some(VisitorType::Other(_)) | None => continue,
        };
        *column = column.saturating_add(record.num_visitors);
    }

    months.into_values().collect()
}

/// Unfiltered, chronologically sorted totals for the trend view.
///
/// For monthly granularity the series is exactly the twelve months of
/// `reference_year`, with zero totals where there is no data; months from
/// other years are dropped. Empty input yields an empty series.
pub fn aggregate_trend(
    records: &[VisitorRecord],
    granularity: Granularity,
    reference_year: i32,
) -> Vec<AggregatedPoint> {
    let mut points = aggregate_by_bucket(records, granularity, &WeatherFilter::All);
    if points.is_empty() {
        return points;
    }

    if granularity == Granularity::Monthly {
        let totals: HashMap<String, u64> = points
            .into_iter()
            .map(|p| (p.bucket, p.total_visitors))
            .collect();

        return (1..=12)
            .map(|month| {
                let bucket = month_label(reference_year, month);
                let total_visitors = totals.get(&bucket).copied().unwrap_or(0);
                AggregatedPoint {
                    bucket,
                    total_visitors,
                }
            })
            .collect();
    }

    sort_chronologically(&mut points, granularity);
    points
}
