//! Silhouette tracker

use chrono::NaiveDate;
use tracing::info;

use super::AppState;
use crate::models::BodyMeasurementEntry;
use crate::store::{retry_once_if_transient, MeasurementStore};

pub async fn record_measurement(
  state: &AppState,
  today: NaiveDate,
  waist: f64,
  hips: f64,
  thigh: Option<f64>,
  body_weight: Option<f64>,
) -> Result<BodyMeasurementEntry, String> {
  let entry = BodyMeasurementEntry::new(today, waist, hips, thigh, body_weight)
    .map_err(|e| e.to_string())?;

  retry_once_if_transient("Save measurement", || state.store.append_measurement(&entry))
    .await
    .map_err(|e| format!("Failed to save measurement: {}", e))?;

  info!("Saved silhouette snapshot for {}", entry.date);
  Ok(entry)
}

pub async fn get_measurements(state: &AppState) -> Result<Vec<BodyMeasurementEntry>, String> {
  state
    .store
    .read_all_measurements()
    .await
    .map_err(|e| format!("Failed to fetch measurements: {}", e))
}

pub async fn delete_last_measurement(state: &AppState) -> Result<bool, String> {
  state
    .store
    .delete_most_recent_measurement()
    .await
    .map_err(|e| format!("Failed to delete last measurement: {}", e))
}
