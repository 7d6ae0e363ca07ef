//! Data types used by the aggregation pipeline.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::config::DashboardConfig;
use crate::stats::DatasetSummary;

/// A single visitor row parsed from the uploaded CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorRecord {
    pub date: Option<String>,
    pub visitor_type: Option<VisitorType>,
    pub num_visitors: u64,
    pub weather: Option<String>,
}

/// Visitor category. The set is open: unknown labels are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VisitorType {
    OneDayVisit,
    Camping,
    RvCenter,
    Other(String),
}

impl VisitorType {
    pub fn label(&self) -> &str {
        match self {
            VisitorType::OneDayVisit => "One-day visit",
            VisitorType::Camping => "Camping",
            VisitorType::RvCenter => "RV Center",
            VisitorType::Other(label) => label,
        }
    }
}

impl From<&str> for VisitorType {
    fn from(label: &str) -> Self {
        match label {
            "One-day visit" => VisitorType::OneDayVisit,
            "Camping" => VisitorType::Camping,
            "RV Center" => VisitorType::RvCenter,
            other => VisitorType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for VisitorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for VisitorType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Time bucket size used for grouping and for the smoothing window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// Number of prior buckets included in the trailing average.
    pub fn window_size(self) -> usize {
        match self {
            Granularity::Daily => 7,
            Granularity::Weekly => 4,
            Granularity::Monthly => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Weekly => "weekly",
            Granularity::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Granularity::Daily),
            "weekly" => Ok(Granularity::Weekly),
            "monthly" => Ok(Granularity::Monthly),
            other => {
                anyhow::bail!("unknown granularity '{other}' (expected daily, weekly or monthly)")
            }
        }
    }
}

/// Weather selection for the prediction view. `"All"` disables filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeatherFilter {
    #[default]
    All,
    Only(String),
}

/// Sentinel label offered alongside the real weather values.
pub const ALL_WEATHER: &str = "All";

impl WeatherFilter {
    pub fn matches(&self, record: &VisitorRecord) -> bool {
        match self {
            WeatherFilter::All => true,
            WeatherFilter::Only(wanted) => record.weather.as_deref() == Some(wanted.as_str()),
        }
    }
}

impl From<String> for WeatherFilter {
    fn from(value: String) -> Self {
        if value == ALL_WEATHER {
            WeatherFilter::All
        } else {
            WeatherFilter::Only(value)
        }
    }
}

impl From<&str> for WeatherFilter {
    fn from(value: &str) -> Self {
        WeatherFilter::from(value.to_string())
    }
}

impl From<WeatherFilter> for String {
    fn from(value: WeatherFilter) -> Self {
        match value {
            WeatherFilter::All => ALL_WEATHER.to_string(),
            WeatherFilter::Only(label) => label,
        }
    }
}

/// Total visitors for one time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AggregatedPoint {
    pub bucket: String,
    pub total_visitors: u64,
}

/// Monthly totals split into the three tracked visitor types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryAggregatedPoint {
    pub month: String,
    pub one_day: u64,
    pub camping: u64,
    pub rv_center: u64,
}

/// A bucket total paired with its trailing moving average.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictedPoint {
    pub bucket: String,
    pub total_visitors: u64,
    pub predicted_value: f64,
}

/// Everything the presentation layer needs for one input and configuration.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub config: DashboardConfig,
    pub summary: DatasetSummary,
    pub trend: Vec<AggregatedPoint>,
    pub categories: Vec<CategoryAggregatedPoint>,
    pub prediction: Vec<PredictedPoint>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.summary.total_records == 0
    }
}
