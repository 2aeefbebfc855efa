//! File output for both pipelines.

use crate::csv;
use crate::report::MappingReport;
use chrono::Local;
use domscout_common::record::TableRecord;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No data to save")]
    Empty,
    #[error("Record {row_index} has keys {found:?}, expected {expected:?}")]
    KeyMismatch {
        row_index: usize,
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize data: {0}")]
    Json(#[from] serde_json::Error),
}

pub const MAPPING_PREFIX: &str = "ecommerce_mapping_results";
pub const TABLE_PREFIX: &str = "challenge_dom_data";

/// `<prefix>_YYYYmmdd_HHMMSS.<extension>` using local time.
pub fn timestamped_filename(prefix: &str, extension: &str) -> String {
    format!(
        "{}_{}.{}",
        prefix,
        Local::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}

/// Serialize as 2-space indented JSON. Non-ASCII is written as UTF-8.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn write_report_json(path: &Path, report: &MappingReport<'_>) -> Result<(), ExportError> {
    write_file(path, &to_pretty_json(report)?)?;
    info!(path = %path.display(), "mapping report saved");
    Ok(())
}

pub fn write_records_json(path: &Path, records: &[TableRecord]) -> Result<(), ExportError> {
    if records.is_empty() {
        return Err(ExportError::Empty);
    }
    write_file(path, &to_pretty_json(records)?)?;
    info!(path = %path.display(), records = records.len(), "table JSON saved");
    Ok(())
}

pub fn write_records_csv(path: &Path, records: &[TableRecord]) -> Result<(), ExportError> {
    let text = records_to_csv(records)?;
    write_file(path, &text)?;
    info!(path = %path.display(), records = records.len(), "table CSV saved");
    Ok(())
}

/// Render records as comma-separated text. The header is the first
/// record's serialized key order; every record must carry the same keys.
pub fn records_to_csv(records: &[TableRecord]) -> Result<String, ExportError> {
    let first = records.first().ok_or(ExportError::Empty)?;
    let header: Vec<String> = serialized_fields(first)?.keys().cloned().collect();

    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let fields = serialized_fields(record)?;
        let same_keys =
            fields.len() == header.len() && header.iter().all(|k| fields.contains_key(k));
        if !same_keys {
            return Err(ExportError::KeyMismatch {
                row_index: record.row_index,
                expected: header,
                found: fields.keys().cloned().collect(),
            });
        }
        rows.push(header.iter().map(|k| cell(&fields[k])).collect());
    }

    Ok(csv::to_string(&header, &rows, csv::COMMA))
}

fn serialized_fields(record: &TableRecord) -> Result<Map<String, Value>, ExportError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        // TableRecord is a struct, so this never happens.
        other => Ok(Map::from_iter([("value".to_string(), other)])),
    }
}

/// Text form of one CSV cell.
pub fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

/// Path of a new timestamped file inside `dir`.
pub fn output_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    dir.join(timestamped_filename(prefix, extension))
}
