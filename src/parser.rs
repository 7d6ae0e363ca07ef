//! CSV parser for park visitor uploads.
//!
//! Parsing is best-effort: a bad row degrades or gets skipped, it never
//! fails the batch. Only input that cannot be read at all is an error.

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::GzDecoder;
use std::io::Read;
use tracing::{debug, info, warn};

use crate::analyzers::types::{VisitorRecord, VisitorType};

pub const DATE_COLUMN: &str = "Date";
pub const VISITOR_TYPE_COLUMN: &str = "Visitor Type";
pub const VISITORS_COLUMN: &str = "Number of Visitors";
pub const WEATHER_COLUMN: &str = "Weather Condition";

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Records parsed from one upload, plus row bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct ParsedRecords {
    pub records: Vec<VisitorRecord>,
    /// Data rows seen after the header, excluding blank lines.
    pub rows_read: usize,
    /// Rows dropped because the CSV reader could not decode them.
    pub rows_skipped: usize,
    /// Required header names absent from the input.
    pub missing_columns: Vec<&'static str>,
}

impl ParsedRecords {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Header positions of the required columns.
struct ColumnMap {
    date: Option<usize>,
    visitor_type: Option<usize>,
    visitors: Option<usize>,
    weather: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Self {
            date: find(DATE_COLUMN),
            visitor_type: find(VISITOR_TYPE_COLUMN),
            visitors: find(VISITORS_COLUMN),
            weather: find(WEATHER_COLUMN),
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        [
            (self.date, DATE_COLUMN),
            (self.visitor_type, VISITOR_TYPE_COLUMN),
            (self.visitors, VISITORS_COLUMN),
            (self.weather, WEATHER_COLUMN),
        ]
        .into_iter()
        .filter_map(|(idx, name)| idx.is_none().then_some(name))
        .collect()
    }
}

/// Parses an uploaded buffer, decompressing it first if it is gzip data.
///
/// # Errors
///
/// Returns an error if the gzip stream is corrupt or the header row cannot
/// be read.
pub fn parse_upload(bytes: &[u8]) -> Result<ParsedRecords> {
    if bytes.starts_with(&GZIP_MAGIC) {
        let mut text = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut text)
            .context("failed to decompress gzip upload")?;
        debug!(compressed = bytes.len(), decompressed = text.len(), "Gzip upload decompressed");
        parse_records(text.as_slice())
    } else {
        parse_records(bytes)
    }
}

/// Parses visitor records from CSV text with a header row.
///
/// # Errors
///
/// Returns an error if the header row cannot be read.
pub fn parse_records<R: Read>(reader: R) -> Result<ParsedRecords> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("failed to read CSV header row")?.clone();
    if headers.is_empty() {
        debug!("Upload has no header row");
        return Ok(ParsedRecords::default());
    }

    let columns = ColumnMap::from_headers(&headers);
    let mut parsed = ParsedRecords {
        missing_columns: columns.missing(),
        ..Default::default()
    };
    if !parsed.missing_columns.is_empty() {
        warn!(missing = ?parsed.missing_columns, "Upload is missing required columns");
    }

    for (idx, result) in rdr.records().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                parsed.rows_read += 1;
                parsed.rows_skipped += 1;
                warn!(row = idx + 1, error = %e, "Skipping unreadable CSV row");
                continue;
            }
        };

        if row.iter().all(str::is_empty) {
            continue;
        }

        parsed.rows_read += 1;
        parsed.records.push(to_record(&row, &columns));
    }

    info!(
        records = parsed.records.len(),
        rows_read = parsed.rows_read,
        rows_skipped = parsed.rows_skipped,
        "CSV upload parsed"
    );

    Ok(parsed)
}

fn to_record(row: &StringRecord, columns: &ColumnMap) -> VisitorRecord {
    let field = |idx: Option<usize>| {
        idx.and_then(|i| row.get(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    VisitorRecord {
        date: field(columns.date),
        visitor_type: field(columns.visitor_type).map(|t| VisitorType::from(t.as_str())),
        num_visitors: columns
            .visitors
            .and_then(|i| row.get(i))
            .map(parse_visitor_count)
            .unwrap_or(0),
        weather: field(columns.weather),
    }
}

/// Coerces a visitor count from text.
///
/// Fractional values are rounded; blank, non-numeric, negative or
/// non-finite values become 0.
pub fn parse_visitor_count(raw: &str) -> u64 {
    if let Ok(n) = raw.parse::<u64>() {
        return n;
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => n.round() as u64,
        _ => {
            if !raw.is_empty() {
                debug!(value = raw, "Visitor count is not a non-negative number, using 0");
            }
            0
        }
    }
}
