use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analyzers::types::{Granularity, WeatherFilter};

/// Year whose twelve months are always shown in the monthly trend.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2024;

/// View selection for one dashboard run.
///
/// Stored as a plain JSON object on disk; every field is optional:
/// ```json
/// {
///   "trend_granularity": "monthly",
///   "prediction_granularity": "weekly",
///   "weather_filter": "Sunny",
///   "reference_year": 2024
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub trend_granularity: Granularity,
    pub prediction_granularity: Granularity,
    pub weather_filter: WeatherFilter,
    pub reference_year: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            trend_granularity: Granularity::Daily,
            prediction_granularity: Granularity::Daily,
            weather_filter: WeatherFilter::All,
            reference_year: DEFAULT_REFERENCE_YEAR,
        }
    }
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        Self::from_json(&content).with_context(|| format!("invalid config file {path}"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        trend_granularity: Option<Granularity>,
        prediction_granularity: Option<Granularity>,
        weather_filter: Option<WeatherFilter>,
        reference_year: Option<i32>,
    ) -> Self {
        if let Some(g) = trend_granularity {
            self.trend_granularity = g;
        }
        if let Some(g) = prediction_granularity {
            self.prediction_granularity = g;
        }
        if let Some(w) = weather_filter {
            self.weather_filter = w;
        }
        if let Some(y) = reference_year {
            self.reference_year = y;
        }
        self
    }
}
