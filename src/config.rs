//! Environment configuration
//!
//! Values come from the process environment, after `.env` has been loaded by
//! the binary. CLI flags override individual fields afterwards.

use chrono::NaiveDate;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::DATE_FORMAT;
use crate::store::SheetsConfig;

/// Start of the current 16-week block
pub const DEFAULT_PROGRAM_START: &str = "2025-12-19";
pub const DEFAULT_DB_PATH: &str = "power_sculpt_v2.db";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
  #[error("Missing configuration: {0}")]
  Missing(String),

  #[error("Invalid value for {key}: {value}")]
  Invalid { key: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreKind {
  /// Local SQLite file
  Sqlite,
  /// Google Sheets spreadsheet
  Sheets,
}

impl std::str::FromStr for StoreKind {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "sqlite" | "local" => Ok(Self::Sqlite),
      "sheets" | "gsheets" | "cloud" => Ok(Self::Sheets),
      _ => Err(format!("Unknown store: {}", s)),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub program_start: NaiveDate,
  pub store: StoreKind,
  pub db_path: PathBuf,
  /// Present only when the sheet credentials are all set
  pub sheets: Option<SheetsConfig>,
}

impl AppConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    let program_start = match env::var("POWER_SCULPT_PROGRAM_START") {
      Ok(value) => parse_date(&value).ok_or(ConfigError::Invalid {
        key: "POWER_SCULPT_PROGRAM_START".into(),
        value,
      })?,
      Err(_) => default_program_start(),
    };

    let store = match env::var("POWER_SCULPT_STORE") {
      Ok(value) => value.parse::<StoreKind>().map_err(|_| ConfigError::Invalid {
        key: "POWER_SCULPT_STORE".into(),
        value,
      })?,
      Err(_) => StoreKind::Sqlite,
    };

    let db_path = env::var("POWER_SCULPT_DB_PATH")
      .map(PathBuf::from)
      .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH));

    Ok(Self {
      program_start,
      store,
      db_path,
      sheets: SheetsConfig::from_env().ok(),
    })
  }
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      program_start: default_program_start(),
      store: StoreKind::Sqlite,
      db_path: PathBuf::from(DEFAULT_DB_PATH),
      sheets: None,
    }
  }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn default_program_start() -> NaiveDate {
  NaiveDate::from_ymd_opt(2025, 12, 19).unwrap_or_default()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
