use super::AppState;
use crate::export::{export_log_csv, export_measurements_csv};
use crate::store::{LogStore, MeasurementStore};

/// Full log as CSV
pub async fn export_log(state: &AppState) -> Result<String, String> {
  let entries = state
    .store
    .read_all_sets()
    .await
    .map_err(|e| format!("Failed to fetch log: {}", e))?;
  export_log_csv(&entries).map_err(|e| e.to_string())
}

pub async fn export_measurements(state: &AppState) -> Result<String, String> {
  let entries = state
    .store
    .read_all_measurements()
    .await
    .map_err(|e| format!("Failed to fetch measurements: {}", e))?;
  export_measurements_csv(&entries).map_err(|e| e.to_string())
}
