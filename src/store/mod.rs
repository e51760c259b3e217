//! Log and measurement persistence
//!
//! The host picks one backend at startup (`StoreBackend::connect`) and hands
//! it to every command. Nothing downstream branches on which backend it got.

pub mod sheets;
pub mod sqlite;

use std::future::Future;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{AppConfig, StoreKind};
use crate::models::{BodyMeasurementEntry, SetLogEntry};

pub use sheets::{SheetsConfig, SheetsStore};
pub use sqlite::SqliteStore;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Remote store returned {status}: {body}")]
  Remote { status: u16, body: String },

  #[error("Invalid store URL: {0}")]
  InvalidUrl(String),

  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

impl StoreError {
  /// Failures worth one more attempt: the request may succeed unchanged.
  pub fn is_transient(&self) -> bool {
    match self {
      Self::Database(sqlx::Error::PoolTimedOut) | Self::Database(sqlx::Error::Io(_)) => true,
      Self::Database(sqlx::Error::Database(db)) => {
        // SQLITE_BUSY / SQLITE_LOCKED
        matches!(db.code().as_deref(), Some("5") | Some("6"))
      }
      Self::Request(e) => e.is_timeout() || e.is_connect(),
      Self::Remote { status, .. } => *status == 429 || *status >= 500,
      Self::Io(_) => true,
      _ => false,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Store Capabilities
/// ---------------------------------------------------------------------------

/// Append-only training log
#[allow(async_fn_in_trait)]
pub trait LogStore {
  async fn append_set(&self, entry: &SetLogEntry) -> Result<(), StoreError>;

  /// Every readable row, oldest first (date, then insertion order)
  async fn read_all_sets(&self) -> Result<Vec<SetLogEntry>, StoreError>;

  /// Remove the chronologically-last row across all exercises.
  /// Returns false when the log was already empty.
  async fn delete_most_recent_set(&self) -> Result<bool, StoreError>;

  async fn read_sets_for_exercise(&self, exercise: &str) -> Result<Vec<SetLogEntry>, StoreError> {
    let all = self.read_all_sets().await?;
    Ok(all.into_iter().filter(|e| e.exercise == exercise).collect())
  }

  async fn read_sets_on(&self, date: NaiveDate) -> Result<Vec<SetLogEntry>, StoreError> {
    let all = self.read_all_sets().await?;
    Ok(all.into_iter().filter(|e| e.date == date).collect())
  }
}

/// Append-only silhouette log
#[allow(async_fn_in_trait)]
pub trait MeasurementStore {
  async fn append_measurement(&self, entry: &BodyMeasurementEntry) -> Result<(), StoreError>;

  async fn read_all_measurements(&self) -> Result<Vec<BodyMeasurementEntry>, StoreError>;

  async fn delete_most_recent_measurement(&self) -> Result<bool, StoreError>;
}

/// Index of the chronologically-last item: latest date, and among equal
/// dates the one stored last.
pub fn latest_index<T>(items: &[T], date_of: impl Fn(&T) -> NaiveDate) -> Option<usize> {
  items
    .iter()
    .enumerate()
    .max_by_key(|&(idx, item)| (date_of(item), idx))
    .map(|(idx, _)| idx)
}

/// Run a write, retrying exactly once if the first failure looks transient.
pub async fn retry_once_if_transient<T, F, Fut>(what: &str, mut op: F) -> Result<T, StoreError>
where
  F: FnMut() -> Fut,
  Fut: Future<Output = Result<T, StoreError>>,
{
  match op().await {
    Err(e) if e.is_transient() => {
      warn!("{} failed ({}), retrying once", what, e);
      op().await
    }
    other => other,
  }
}

/// ---------------------------------------------------------------------------
/// Backend Selection
/// ---------------------------------------------------------------------------

/// The store chosen for this process
pub enum StoreBackend {
  Sqlite(SqliteStore),
  Sheets(SheetsStore),
}

impl StoreBackend {
  /// Select and open the backend once. A sheets selection without credentials
  /// falls back to the local database.
  pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
    let backend = match (config.store, &config.sheets) {
      (StoreKind::Sheets, Some(sheets)) => Self::Sheets(SheetsStore::new(sheets.clone())),
      (StoreKind::Sheets, None) => {
        warn!("Sheets store selected but not configured, running in local mode");
        Self::Sqlite(SqliteStore::open(&config.db_path).await?)
      }
      (StoreKind::Sqlite, _) => Self::Sqlite(SqliteStore::open(&config.db_path).await?),
    };

    info!("Storage mode: {}", backend.mode());
    Ok(backend)
  }

  /// "local" or "cloud", as shown in the host's caption
  pub fn mode(&self) -> &'static str {
    match self {
      Self::Sqlite(_) => "local",
      Self::Sheets(_) => "cloud",
    }
  }
}

impl LogStore for StoreBackend {
  async fn append_set(&self, entry: &SetLogEntry) -> Result<(), StoreError> {
    match self {
      Self::Sqlite(s) => s.append_set(entry).await,
      Self::Sheets(s) => s.append_set(entry).await,
    }
  }

  async fn read_all_sets(&self) -> Result<Vec<SetLogEntry>, StoreError> {
    match self {
      Self::Sqlite(s) => s.read_all_sets().await,
      Self::Sheets(s) => s.read_all_sets().await,
    }
  }

  async fn delete_most_recent_set(&self) -> Result<bool, StoreError> {
    match self {
      Self::Sqlite(s) => s.delete_most_recent_set().await,
      Self::Sheets(s) => s.delete_most_recent_set().await,
    }
  }

  async fn read_sets_for_exercise(&self, exercise: &str) -> Result<Vec<SetLogEntry>, StoreError> {
    match self {
      Self::Sqlite(s) => s.read_sets_for_exercise(exercise).await,
      Self::Sheets(s) => s.read_sets_for_exercise(exercise).await,
    }
  }

  async fn read_sets_on(&self, date: NaiveDate) -> Result<Vec<SetLogEntry>, StoreError> {
    match self {
      Self::Sqlite(s) => s.read_sets_on(date).await,
      Self::Sheets(s) => s.read_sets_on(date).await,
    }
  }
}

impl MeasurementStore for StoreBackend {
  async fn append_measurement(&self, entry: &BodyMeasurementEntry) -> Result<(), StoreError> {
    match self {
      Self::Sqlite(s) => s.append_measurement(entry).await,
      Self::Sheets(s) => s.append_measurement(entry).await,
    }
  }

  async fn read_all_measurements(&self) -> Result<Vec<BodyMeasurementEntry>, StoreError> {
    match self {
      Self::Sqlite(s) => s.read_all_measurements().await,
      Self::Sheets(s) => s.read_all_measurements().await,
    }
  }

  async fn delete_most_recent_measurement(&self) -> Result<bool, StoreError> {
    match self {
      Self::Sqlite(s) => s.delete_most_recent_measurement().await,
      Self::Sheets(s) => s.delete_most_recent_measurement().await,
    }
  }
}
