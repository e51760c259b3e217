//! Host-facing operations
//!
//! Each function is one user action. Errors come back as display-ready
//! strings; the host shows them as-is.

pub mod export;
pub mod log;
pub mod measurement;
pub mod session;

use tracing::warn;

use crate::config::AppConfig;
use crate::models::SetLogEntry;
use crate::store::{LogStore, StoreBackend};

/// Application state shared by every command
pub struct AppState {
  pub store: StoreBackend,
  pub config: AppConfig,
}

impl AppState {
  /// Choose and open the store once for the life of the process
  pub async fn initialize(config: AppConfig) -> Result<Self, String> {
    let store = StoreBackend::connect(&config)
      .await
      .map_err(|e| format!("Failed to open store: {}", e))?;
    Ok(Self { store, config })
  }
}

/// Full log for views that only need a best-effort picture
async fn history_or_empty(state: &AppState) -> Vec<SetLogEntry> {
  state.store.read_all_sets().await.unwrap_or_else(|e| {
    warn!("Log store unavailable, showing starting weights: {}", e);
    Vec::new()
  })
}
