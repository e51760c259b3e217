//! CSV export of the log and silhouette stores.
//!
//! Column names match the stored row shape so spreadsheets and charting
//! scripts can read the export directly.

use std::io::Write;
use thiserror::Error;

use crate::models::{
  measurement::MEASUREMENT_COLUMNS, set_log::LOG_COLUMNS, BodyMeasurementEntry, SetLogEntry,
  DATE_FORMAT,
};

#[derive(Debug, Error)]
pub enum ExportError {
  #[error("Failed to write export: {0}")]
  WriteFailed(String),
}

/// Export every logged set, header first. An empty log exports the header only.
pub fn export_log_csv(entries: &[SetLogEntry]) -> Result<String, ExportError> {
  let mut output = Vec::new();

  writeln!(output, "{}", LOG_COLUMNS.join(","))
    .map_err(|e| ExportError::WriteFailed(e.to_string()))?;

  for entry in entries {
    writeln!(
      output,
      "{},{},{},{},{}",
      entry.date.format(DATE_FORMAT),
      escape_field(&entry.exercise),
      format_number(entry.weight),
      entry.reps,
      format_number(entry.rpe),
    )
    .map_err(|e| ExportError::WriteFailed(e.to_string()))?;
  }

  String::from_utf8(output).map_err(|e| ExportError::WriteFailed(e.to_string()))
}

/// Export silhouette snapshots; missing optional measurements are empty cells
pub fn export_measurements_csv(entries: &[BodyMeasurementEntry]) -> Result<String, ExportError> {
  let mut output = Vec::new();

  writeln!(output, "{}", MEASUREMENT_COLUMNS.join(","))
    .map_err(|e| ExportError::WriteFailed(e.to_string()))?;

  for entry in entries {
    writeln!(
      output,
      "{},{},{},{},{}",
      entry.date.format(DATE_FORMAT),
      format_number(entry.waist),
      format_number(entry.hips),
      entry.thigh.map_or(String::new(), format_number),
      entry.body_weight.map_or(String::new(), format_number),
    )
    .map_err(|e| ExportError::WriteFailed(e.to_string()))?;
  }

  String::from_utf8(output).map_err(|e| ExportError::WriteFailed(e.to_string()))
}

/// Floats keep one decimal when whole (160.0) so the column reads as numeric
fn format_number(value: f64) -> String {
  if value.fract() == 0.0 {
    format!("{:.1}", value)
  } else {
    value.to_string()
  }
}

/// Quote fields containing separators, quotes or line breaks
fn escape_field(value: &str) -> String {
  if value.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", value.replace('"', "\"\""))
  } else {
    value.to_string()
  }
}
