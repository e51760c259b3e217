//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Mock data factories
//! - Helper assertions

use crate::commands::AppState;
use crate::config::AppConfig;
use crate::models::{BodyMeasurementEntry, SetLogEntry};
use crate::store::{SqliteStore, StoreBackend};
use chrono::{Duration, Local, NaiveDate};
use sqlx::SqlitePool;

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// App state over the given pool with default configuration
pub fn test_state(pool: &SqlitePool) -> AppState {
  AppState {
    store: StoreBackend::Sqlite(SqliteStore::new(pool.clone())),
    config: AppConfig::default(),
  }
}

/// Seed the log with the demo week plus one set today:
/// - 7 days ago: Back Squat 155x8 @7, Hip Thrust 190x10 @6.5,
///   Bench 110x8 @8, Deadlift 205x5 @9
/// - today: Back Squat 160x8 @9.5
pub async fn seed_test_sets(pool: &SqlitePool) -> Vec<SetLogEntry> {
  let entries = vec![
    mock_set("Back Squat", 155.0, 8, 7.0, 7),
    mock_set("Barbell Hip Thrust", 190.0, 10, 6.5, 7),
    mock_set("Bench Press", 110.0, 8, 8.0, 7),
    mock_set("Deadlift", 205.0, 5, 9.0, 7),
    mock_set("Back Squat", 160.0, 8, 9.5, 0),
  ];

  for entry in &entries {
    sqlx::query("INSERT INTO logs (date, exercise, weight, reps, rpe) VALUES (?1, ?2, ?3, ?4, ?5)")
      .bind(entry.date)
      .bind(&entry.exercise)
      .bind(entry.weight)
      .bind(entry.reps)
      .bind(entry.rpe)
      .execute(pool)
      .await
      .expect("Failed to insert test set");
  }

  entries
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Build a log entry dated `days_ago` days before today. Skips validation so
/// tests can use half-point RPEs outside the logging slider.
pub fn mock_set(exercise: &str, weight: f64, reps: i64, rpe: f64, days_ago: i64) -> SetLogEntry {
  SetLogEntry {
    date: date_days_ago(days_ago),
    exercise: exercise.to_string(),
    weight,
    reps,
    rpe,
  }
}

pub fn mock_measurement(
  waist: f64,
  hips: f64,
  thigh: Option<f64>,
  body_weight: Option<f64>,
  days_ago: i64,
) -> BodyMeasurementEntry {
  BodyMeasurementEntry {
    date: date_days_ago(days_ago),
    waist,
    hips,
    thigh,
    body_weight,
  }
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Local calendar date N days ago
pub fn date_days_ago(days: i64) -> NaiveDate {
  Local::now().date_naive() - Duration::days(days)
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('logs', 'silhouette')",
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected logs and silhouette tables");

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_sets_returns_inserted_rows() {
    let pool = setup_test_db().await;

    let seeded = seed_test_sets(&pool).await;
    assert_eq!(seeded.len(), 5);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM logs")
      .fetch_one(&pool)
      .await
      .expect("Failed to count logs");
    assert_eq!(count, 5);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_date_helpers_produce_correct_dates() {
    let diff = date_days_ago(0) - date_days_ago(7);
    assert_eq!(diff.num_days(), 7);
  }
}
