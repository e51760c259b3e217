use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, Row};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::{latest_index, LogStore, MeasurementStore, StoreError};
use crate::models::{BodyMeasurementEntry, SetLogEntry};

pub type DbPool = SqlitePool;

/// Local file-backed store
#[derive(Clone)]
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  /// Wrap an existing pool. Migrations must already have run.
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  /// Open (creating if needed) the database file and run migrations
  pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
      fs::create_dir_all(parent)?;
    }
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    debug!("Initializing database at: {}", db_path.display());

    let pool = SqlitePoolOptions::new()
      .max_connections(5)
      .connect(&db_url)
      .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(Self { pool })
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }
}

/// Decode rows one by one, dropping any that do not decode cleanly
fn decode_sets(rows: Vec<SqliteRow>) -> Vec<SetLogEntry> {
  rows
    .iter()
    .filter_map(|row| match SetLogEntry::from_row(row) {
      Ok(entry) if entry.is_usable() => Some(entry),
      Ok(entry) => {
        warn!("Skipping unusable log row: {:?}", entry);
        None
      }
      Err(e) => {
        warn!("Skipping malformed log row: {}", e);
        None
      }
    })
    .collect()
}

fn decode_measurement(row: &SqliteRow) -> Option<BodyMeasurementEntry> {
  BodyMeasurementEntry::from_row(row)
    .map_err(|e| warn!("Skipping malformed silhouette row: {}", e))
    .ok()
}

/// rowid of the chronologically-last row that decodes. `rows` must be in
/// rowid order so ties on date go to the later insert. Rows that do not
/// decode are invisible to readers and are never picked.
fn latest_rowid<T>(
  rows: &[SqliteRow],
  decode: impl Fn(&SqliteRow) -> Option<T>,
  date_of: impl Fn(&T) -> chrono::NaiveDate,
) -> Option<i64> {
  let decoded: Vec<(i64, T)> = rows
    .iter()
    .filter_map(|row| {
      let rowid: i64 = row.try_get("rowid").ok()?;
      decode(row).map(|entry| (rowid, entry))
    })
    .collect();

  latest_index(&decoded, |(_, entry)| date_of(entry)).map(|idx| decoded[idx].0)
}

impl LogStore for SqliteStore {
  async fn append_set(&self, entry: &SetLogEntry) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO logs (date, exercise, weight, reps, rpe) VALUES (?1, ?2, ?3, ?4, ?5)")
      .bind(entry.date)
      .bind(&entry.exercise)
      .bind(entry.weight)
      .bind(entry.reps)
      .bind(entry.rpe)
      .execute(&self.pool)
      .await?;

    Ok(())
  }

  async fn read_all_sets(&self) -> Result<Vec<SetLogEntry>, StoreError> {
    let rows = sqlx::query(
      "SELECT date, exercise, weight, reps, rpe FROM logs ORDER BY date ASC, rowid ASC",
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(decode_sets(rows))
  }

  async fn delete_most_recent_set(&self) -> Result<bool, StoreError> {
    let rows = sqlx::query(
      "SELECT rowid, date, exercise, weight, reps, rpe FROM logs ORDER BY rowid ASC",
    )
    .fetch_all(&self.pool)
    .await?;

    let decode = |row: &SqliteRow| {
      SetLogEntry::from_row(row)
        .ok()
        .filter(|entry| entry.is_usable())
    };
    let Some(rowid) = latest_rowid(&rows, decode, |e: &SetLogEntry| e.date) else {
      return Ok(false);
    };

    let result = sqlx::query("DELETE FROM logs WHERE rowid = ?1")
      .bind(rowid)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }

  async fn read_sets_for_exercise(&self, exercise: &str) -> Result<Vec<SetLogEntry>, StoreError> {
    let rows = sqlx::query(
      r#"
      SELECT date, exercise, weight, reps, rpe FROM logs
      WHERE exercise = ?1
      ORDER BY date ASC, rowid ASC
      "#,
    )
    .bind(exercise)
    .fetch_all(&self.pool)
    .await?;

    Ok(decode_sets(rows))
  }

  async fn read_sets_on(&self, date: chrono::NaiveDate) -> Result<Vec<SetLogEntry>, StoreError> {
    let rows = sqlx::query(
      "SELECT date, exercise, weight, reps, rpe FROM logs WHERE date = ?1 ORDER BY rowid ASC",
    )
    .bind(date)
    .fetch_all(&self.pool)
    .await?;

    Ok(decode_sets(rows))
  }
}

impl MeasurementStore for SqliteStore {
  async fn append_measurement(&self, entry: &BodyMeasurementEntry) -> Result<(), StoreError> {
    sqlx::query(
      "INSERT INTO silhouette (date, waist, hips, thigh, body_weight) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(entry.date)
    .bind(entry.waist)
    .bind(entry.hips)
    .bind(entry.thigh)
    .bind(entry.body_weight)
    .execute(&self.pool)
    .await?;

    Ok(())
  }

  async fn read_all_measurements(&self) -> Result<Vec<BodyMeasurementEntry>, StoreError> {
    let rows = sqlx::query(
      "SELECT date, waist, hips, thigh, body_weight FROM silhouette ORDER BY date ASC, rowid ASC",
    )
    .fetch_all(&self.pool)
    .await?;

    Ok(rows.iter().filter_map(decode_measurement).collect())
  }

  async fn delete_most_recent_measurement(&self) -> Result<bool, StoreError> {
    let rows = sqlx::query(
      "SELECT rowid, date, waist, hips, thigh, body_weight FROM silhouette ORDER BY rowid ASC",
    )
    .fetch_all(&self.pool)
    .await?;

    let Some(rowid) = latest_rowid(&rows, decode_measurement, |e: &BodyMeasurementEntry| e.date)
    else {
      return Ok(false);
    };

    let result = sqlx::query("DELETE FROM silhouette WHERE rowid = ?1")
      .bind(rowid)
      .execute(&self.pool)
      .await?;

    Ok(result.rows_affected() > 0)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
