//! Output formatting and export for dashboard data.
//!
//! Supports pretty-printing, JSON serialization to stdout or a file, and CSV
//! export of series.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Serializes a value as pretty-printed JSON into `writer`.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes a value as pretty-printed JSON to `path`, or to stdout when `path` is `None`.
pub fn emit_json(path: Option<&str>, value: &impl Serialize) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
            write_json(file, value)?;
            info!(path, "JSON written");
        }
        None => write_json(std::io::stdout().lock(), value)?,
    }
    Ok(())
}

/// Writes rows to a CSV file at `path`, replacing any previous contents.
///
/// The header row is derived from the row type's field names.
pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing CSV export");

    let file = File::create(path).with_context(|| format!("failed to create {path}"))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path, rows = rows.len(), "CSV export written");
    Ok(())
}
