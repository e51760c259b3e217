//! Set logging and the analytics page

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::info;

use super::session::get_target;
use super::AppState;
use crate::analytics::{weight_series, SeriesPoint};
use crate::models::SetLogEntry;
use crate::store::{retry_once_if_transient, LogStore};

/// Record one set dated `today`. A missing weight means "lift the target".
/// Failures are returned to the caller; a set must never vanish silently.
pub async fn log_set(
  state: &AppState,
  today: NaiveDate,
  exercise: &str,
  weight: Option<f64>,
  reps: i64,
  rpe: f64,
) -> Result<SetLogEntry, String> {
  let weight = match weight {
    Some(w) => w,
    None => get_target(state, exercise.trim()).await.target_weight,
  };
  let entry = SetLogEntry::new(today, exercise, weight, reps, rpe).map_err(|e| e.to_string())?;

  retry_once_if_transient("Log set", || state.store.append_set(&entry))
    .await
    .map_err(|e| format!("Failed to log set: {}", e))?;

  info!(
    "Logged {} {} lbs x {} @ RPE {}",
    entry.exercise, entry.weight, entry.reps, entry.rpe
  );
  Ok(entry)
}

/// Sets recorded on `today`, for the live summary under the log form
pub async fn get_sets_on(state: &AppState, today: NaiveDate) -> Result<Vec<SetLogEntry>, String> {
  state
    .store
    .read_sets_on(today)
    .await
    .map_err(|e| format!("Failed to fetch today's sets: {}", e))
}

pub async fn get_all_sets(state: &AppState) -> Result<Vec<SetLogEntry>, String> {
  state
    .store
    .read_all_sets()
    .await
    .map_err(|e| format!("Failed to fetch log: {}", e))
}

/// Remove the chronologically-last set across every exercise
pub async fn delete_last_set(state: &AppState) -> Result<bool, String> {
  let deleted = state
    .store
    .delete_most_recent_set()
    .await
    .map_err(|e| format!("Failed to delete last entry: {}", e))?;
  if deleted {
    info!("Deleted most recent log entry");
  }
  Ok(deleted)
}

/// Chart data: weight over date for each exercise
pub async fn get_weight_series(
  state: &AppState,
) -> Result<BTreeMap<String, Vec<SeriesPoint>>, String> {
  let history = get_all_sets(state).await?;
  Ok(weight_series(&history))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::*;

  #[tokio::test]
  async fn test_log_set_appends_and_moves_target() {
    let pool = setup_test_db().await;
    let state = test_state(&pool);
    let today = date_days_ago(0);

    let entry = log_set(&state, today, "Back Squat", Some(160.0), 8, 7.0)
      .await
      .expect("Should log set");
    assert_eq!(entry.weight, 160.0);

    let target = get_target(&state, "Back Squat").await;
    assert_eq!(target.target_weight, 165.0);

    let todays = get_sets_on(&state, today).await.unwrap();
    assert_eq!(todays, vec![entry]);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_log_set_defaults_weight_to_target() {
    let pool = setup_test_db().await;
    seed_test_sets(&pool).await;
    let state = test_state(&pool);

    let entry = log_set(&state, date_days_ago(0), "Deadlift", None, 5, 8.0)
      .await
      .unwrap();
    assert_eq!(entry.weight, 207.5);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_log_set_rejects_invalid_input() {
    let pool = setup_test_db().await;
    let state = test_state(&pool);

    let err = log_set(&state, date_days_ago(0), "Back Squat", Some(160.0), 8, 11.0)
      .await
      .unwrap_err();
    assert!(err.contains("RPE"), "{}", err);

    let err = log_set(&state, date_days_ago(0), "   ", Some(160.0), 8, 8.0)
      .await
      .unwrap_err();
    assert!(err.contains("Exercise name"), "{}", err);

    assert!(get_all_sets(&state).await.unwrap().is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_log_set_surfaces_write_failure() {
    let pool = setup_test_db().await;
    let state = test_state(&pool);
    pool.close().await;

    let err = log_set(&state, date_days_ago(0), "Back Squat", Some(160.0), 8, 8.0)
      .await
      .unwrap_err();
    assert!(err.starts_with("Failed to log set"), "{}", err);
  }

  #[tokio::test]
  async fn test_delete_last_set_is_global() {
    let pool = setup_test_db().await;
    seed_test_sets(&pool).await;
    let state = test_state(&pool);

    assert!(delete_last_set(&state).await.unwrap());

    let remaining = get_all_sets(&state).await.unwrap();
    assert_eq!(remaining.len(), 4);
    assert!(get_sets_on(&state, date_days_ago(0)).await.unwrap().is_empty());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_weight_series_groups_exercises() {
    let pool = setup_test_db().await;
    seed_test_sets(&pool).await;
    let state = test_state(&pool);

    let series = get_weight_series(&state).await.unwrap();
    assert_eq!(series.len(), 4);
    let squat: Vec<f64> = series["Back Squat"].iter().map(|p| p.weight).collect();
    assert_eq!(squat, vec![155.0, 160.0]);

    teardown_test_db(pool).await;
  }
}
