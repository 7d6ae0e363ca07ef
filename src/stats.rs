use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analyzers::bucket::parse_date;
use crate::analyzers::types::{ALL_WEATHER, VisitorType};
use crate::analyzers::utility::pct;
use crate::parser::ParsedRecords;

/// Label used for rows with no visitor type.
const UNKNOWN_TYPE: &str = "(unknown)";

#[derive(Debug, Default, Clone, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub total_visitors: u64,

    // date range over parseable dates
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub undated_records: usize,

    pub visitors_by_type: BTreeMap<String, u64>,
    pub weather_options: Vec<String>,
    pub missing_columns: Vec<String>,
}

impl DatasetSummary {
    pub fn from_parsed(parsed: &ParsedRecords) -> Self {
        let mut s = DatasetSummary {
            total_records: parsed.records.len(),
            rows_read: parsed.rows_read,
            rows_skipped: parsed.rows_skipped,
            missing_columns: parsed.missing_columns.iter().map(|c| c.to_string()).collect(),
            weather_options: vec![ALL_WEATHER.to_string()],
            ..Default::default()
        };

        let mut first: Option<NaiveDate> = None;
        let mut last: Option<NaiveDate> = None;

        for r in &parsed.records {
            s.total_visitors = s.total_visitors.saturating_add(r.num_visitors);

            match r.date.as_deref().and_then(parse_date) {
                Some(d) => {
                    first = Some(first.map_or(d, |f| d.min(f)));
                    last = Some(last.map_or(d, |l| d.max(l)));
                }
                None => s.undated_records += 1,
            }

            let type_label = r
                .visitor_type
                .as_ref()
                .map(VisitorType::label)
                .unwrap_or(UNKNOWN_TYPE);
            let by_type = s.visitors_by_type.entry(type_label.to_string()).or_default();
            *by_type = by_type.saturating_add(r.num_visitors);

            if let Some(weather) = &r.weather
                && !s.weather_options.contains(weather)
            {
                s.weather_options.push(weather.clone());
            }
        }

        s.first_date = first.map(|d| d.format("%Y-%m-%d").to_string());
        s.last_date = last.map(|d| d.format("%Y-%m-%d").to_string());

        s
    }

    /// Percentage of all visitors that belong to `visitor_type`.
    pub fn share_pct(&self, visitor_type: &VisitorType) -> f64 {
        let part = self
            .visitors_by_type
            .get(visitor_type.label())
            .copied()
            .unwrap_or(0);
        pct(part, self.total_visitors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::VisitorRecord;

    fn record(date: Option<&str>, t: Option<&str>, n: u64, weather: Option<&str>) -> VisitorRecord {
        VisitorRecord {
            date: date.map(str::to_string),
            visitor_type: t.map(VisitorType::from),
            num_visitors: n,
            weather: weather.map(str::to_string),
        }
    }

    fn parsed(records: Vec<VisitorRecord>) -> ParsedRecords {
        ParsedRecords {
            rows_read: records.len(),
            records,
            ..Default::default()
        }
    }

    #[test]
    fn test_summary_empty() {
        let s = DatasetSummary::from_parsed(&ParsedRecords::default());

        assert_eq!(s.total_records, 0);
        assert_eq!(s.total_visitors, 0);
        assert_eq!(s.first_date, None);
        assert_eq!(s.weather_options, vec!["All"]);
        assert_eq!(s.share_pct(&VisitorType::Camping), 0.0);
    }

    #[test]
    fn test_summary_totals_and_range() {
        let s = DatasetSummary::from_parsed(&parsed(vec![
            record(Some("2024-03-02"), Some("Camping"), 30, Some("Sunny")),
            record(Some("2024-01-15"), Some("One-day visit"), 50, Some("Rainy")),
            record(Some("bad"), Some("Glamping"), 20, Some("Sunny")),
            record(None, None, 0, None),
        ]));

        assert_eq!(s.total_records, 4);
        assert_eq!(s.rows_read, 4);
        assert_eq!(s.total_visitors, 100);
        assert_eq!(s.first_date.as_deref(), Some("2024-01-15"));
        assert_eq!(s.last_date.as_deref(), Some("2024-03-02"));
        assert_eq!(s.undated_records, 2);
        assert_eq!(s.visitors_by_type.get("Glamping"), Some(&20));
        assert_eq!(s.visitors_by_type.get(UNKNOWN_TYPE), Some(&0));
        assert_eq!(s.share_pct(&VisitorType::OneDayVisit), 50.0);
        assert_eq!(s.share_pct(&VisitorType::RvCenter), 0.0);
    }

    #[test]
    fn test_weather_options_first_seen_order() {
        let s = DatasetSummary::from_parsed(&parsed(vec![
            record(Some("2024-01-01"), None, 1, Some("Snowy")),
            record(Some("2024-01-02"), None, 1, Some("Sunny")),
            record(Some("2024-01-03"), None, 1, Some("Snowy")),
            record(Some("2024-01-04"), None, 1, None),
        ]));

        assert_eq!(s.weather_options, vec!["All", "Snowy", "Sunny"]);
    }

    #[test]
    fn test_summary_totals_saturate() {
        let s = DatasetSummary::from_parsed(&parsed(vec![
            record(Some("2024-01-05"), Some("Camping"), u64::MAX, Some("Sunny")),
            record(Some("2024-01-06"), Some("Camping"), 1, Some("Sunny")),
        ]));

        assert_eq!(s.total_visitors, u64::MAX);
        assert_eq!(s.visitors_by_type.get("Camping"), Some(&u64::MAX));
        assert_eq!(s.share_pct(&VisitorType::Camping), 100.0);
    }

    #[test]
    fn test_summary_row_counts_come_from_parser() {
        let input = ParsedRecords {
            records: vec![record(Some("2024-01-05"), None, 1, None)],
            rows_read: 3,
            rows_skipped: 2,
            missing_columns: vec!["Weather Condition"],
        };
        let s = DatasetSummary::from_parsed(&input);

        assert_eq!(s.total_records, 1);
        assert_eq!(s.rows_read, 3);
        assert_eq!(s.rows_skipped, 2);
        assert_eq!(s.missing_columns, vec!["Weather Condition"]);
    }
}
