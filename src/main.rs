//! CLI entry point for the park visitor statistics tool.
//!
//! Loads a visitor CSV from a file or URL and prints the requested view as
//! JSON: dataset summary, visitor trend, monthly visitor-type split, trend
//! prediction, or the full dashboard report.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use park_visitor_stats::analyzers::aggregate::{aggregate_by_category, aggregate_trend};
use park_visitor_stats::analyzers::analyzer::{build_dashboard, prediction_series};
use park_visitor_stats::analyzers::types::{Granularity, WeatherFilter};
use park_visitor_stats::{
    config::{DEFAULT_REFERENCE_YEAR, DashboardConfig},
    fetch::load_source,
    output::{emit_json, print_pretty, write_csv},
    parser::{ParsedRecords, parse_upload},
    stats::DatasetSummary,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "park_visitor_stats")]
#[command(about = "Aggregate and smooth park visitor CSV data", long_about = None)]
struct Cli {
    /// Write JSON output to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Also export the selected series as CSV
    #[arg(long, global = true)]
    csv: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArg {
    /// Path to CSV file (optionally gzip-compressed) or URL to fetch
    #[arg(value_name = "FILE_OR_URL")]
    source: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show record counts, date range, visitor types and weather options
    Summary(SourceArg),
    /// Unfiltered visitor totals per day, week or month
    Trend {
        #[command(flatten)]
        source: SourceArg,

        /// Bucket size
        #[arg(short, long, default_value = "daily")]
        granularity: Granularity,

        /// Year whose twelve months always appear in the monthly trend
        #[arg(long)]
        reference_year: Option<i32>,
    },
    /// Monthly visitor totals split by visitor type
    Categories(SourceArg),
    /// Weather-filtered totals with their trailing moving average
    Predict {
        #[command(flatten)]
        source: SourceArg,

        /// Bucket size (also selects the averaging window: 7, 4 or 3 buckets)
        #[arg(short, long, default_value = "daily")]
        granularity: Granularity,

        /// Weather condition to keep, or "All"
        #[arg(short, long, default_value = "All")]
        weather: String,
    },
    /// Every view at once, driven by an optional JSON config file
    Report {
        #[command(flatten)]
        source: SourceArg,

        /// JSON file with dashboard settings
        #[arg(short, long)]
        config: Option<String>,

        /// Override the trend bucket size
        #[arg(long)]
        trend_granularity: Option<Granularity>,

        /// Override the prediction bucket size
        #[arg(long)]
        prediction_granularity: Option<Granularity>,

        /// Override the prediction weather filter
        #[arg(short, long)]
        weather: Option<String>,

        /// Override the monthly trend reference year
        #[arg(long)]
        reference_year: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/park_visitor_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("park_visitor_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %e, "Command failed");
        return Err(e);
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let output = cli.output.as_deref();
    let csv = cli.csv.as_deref();

    match cli.command {
        Commands::Summary(SourceArg { source }) => {
            let parsed = load(&source).await?;
            let summary = DatasetSummary::from_parsed(&parsed);
            print_pretty(&summary);
            emit_json(output, &summary)?;
        }
        Commands::Trend {
            source: SourceArg { source },
            granularity,
            reference_year,
        } => {
            let parsed = load(&source).await?;
            let reference_year = reference_year.unwrap_or(DEFAULT_REFERENCE_YEAR);
            let trend = aggregate_trend(&parsed.records, granularity, reference_year);
            info!(%granularity, buckets = trend.len(), "Trend computed");

            if let Some(path) = csv {
                write_csv(path, &trend)?;
            }
            emit_json(output, &trend)?;
        }
        Commands::Categories(SourceArg { source }) => {
            let parsed = load(&source).await?;
            let categories = aggregate_by_category(&parsed.records);
            info!(months = categories.len(), "Visitor types split by month");

            if let Some(path) = csv {
                write_csv(path, &categories)?;
            }
            emit_json(output, &categories)?;
        }
        Commands::Predict {
            source: SourceArg { source },
            granularity,
            weather,
        } => {
            let parsed = load(&source).await?;
            let config = DashboardConfig::default().with_overrides(
                None,
                Some(granularity),
                Some(WeatherFilter::from(weather)),
                None,
            );
            let prediction = prediction_series(&parsed.records, &config);

            if let Some(path) = csv {
                write_csv(path, &prediction)?;
            }
            emit_json(output, &prediction)?;
        }
        Commands::Report {
            source: SourceArg { source },
            config,
            trend_granularity,
            prediction_granularity,
            weather,
            reference_year,
        } => {
            let config = match config {
                Some(path) => DashboardConfig::load(&path)?,
                None => DashboardConfig::default(),
            }
            .with_overrides(
                trend_granularity,
                prediction_granularity,
                weather.map(WeatherFilter::from),
                reference_year,
            );

            let parsed = load(&source).await?;
            let dashboard = build_dashboard(&parsed, &config);

            if let Some(path) = csv {
                write_csv(path, &dashboard.prediction)?;
            }
            emit_json(output, &dashboard)?;
        }
    }

    Ok(())
}

/// Loads and parses an upload.
async fn load(source: &str) -> Result<ParsedRecords> {
    let bytes = load_source(source).await?;
    parse_upload(&bytes)
}
