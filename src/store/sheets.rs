//! Remote tabular store backed by a Google Sheets spreadsheet
//!
//! Each store is one worksheet whose first row is the column header. Reads go
//! through the values API, appends use `values:append`, and deleting the most
//! recent row rewrites the whole worksheet in a single update.

use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::env;
use tracing::{debug, warn};
use url::Url;

use super::{latest_index, LogStore, MeasurementStore, StoreError};
use crate::config::ConfigError;
use crate::models::{
  measurement::MEASUREMENT_COLUMNS, set_log::LOG_COLUMNS, BodyMeasurementEntry, SetLogEntry,
  DATE_FORMAT,
};

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
const LOG_RANGE: &str = "logs!A:E";
const MEASUREMENT_RANGE: &str = "silhouette!A:E";

#[derive(Debug, Clone)]
pub struct SheetsConfig {
  pub api_base: String,
  pub spreadsheet_id: String,
  pub access_token: String,
}

impl SheetsConfig {
  pub fn from_env() -> Result<Self, ConfigError> {
    Ok(Self {
      api_base: env::var("SHEETS_API_BASE").unwrap_or_else(|_| DEFAULT_SHEETS_API_BASE.into()),
      spreadsheet_id: env::var("SHEETS_SPREADSHEET_ID")
        .map_err(|_| ConfigError::Missing("SHEETS_SPREADSHEET_ID".into()))?,
      access_token: env::var("SHEETS_ACCESS_TOKEN")
        .map_err(|_| ConfigError::Missing("SHEETS_ACCESS_TOKEN".into()))?,
    })
  }
}

/// ---------------------------------------------------------------------------
/// Values API Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ValueRange {
  #[serde(default)]
  values: Vec<Vec<Value>>,
}

#[derive(Debug, Serialize)]
struct ValueRangeBody<'a> {
  range: &'a str,
  #[serde(rename = "majorDimension")]
  major_dimension: &'a str,
  values: Vec<Vec<Value>>,
}

/// ---------------------------------------------------------------------------
/// Store
/// ---------------------------------------------------------------------------

pub struct SheetsStore {
  client: Client,
  config: SheetsConfig,
}

impl SheetsStore {
  pub fn new(config: SheetsConfig) -> Self {
    Self {
      client: Client::new(),
      config,
    }
  }

  /// `{base}/v4/spreadsheets/{id}/values/{range}{suffix}`
  fn values_url(&self, range: &str, suffix: &str) -> Result<Url, StoreError> {
    let mut url =
      Url::parse(&self.config.api_base).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
    let target = format!("{}{}", range, suffix);
    url
      .path_segments_mut()
      .map_err(|_| StoreError::InvalidUrl(self.config.api_base.clone()))?
      .pop_if_empty()
      .extend([
        "v4",
        "spreadsheets",
        self.config.spreadsheet_id.as_str(),
        "values",
        target.as_str(),
      ]);
    Ok(url)
  }

  async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(StoreError::Remote {
      status: status.as_u16(),
      body,
    })
  }

  /// Data rows of a worksheet, header row removed
  async fn fetch_rows(&self, range: &str) -> Result<Vec<Vec<Value>>, StoreError> {
    let url = self.values_url(range, "")?;
    debug!("GET {}", url);

    let response = self
      .client
      .get(url)
      .bearer_auth(&self.config.access_token)
      .send()
      .await?;
    let mut rows = Self::check(response).await?.json::<ValueRange>().await?.values;

    if rows
      .first()
      .and_then(|r| r.first())
      .is_some_and(|cell| cell_text(cell).eq_ignore_ascii_case("date"))
    {
      rows.remove(0);
    }
    Ok(rows)
  }

  async fn append_row(&self, range: &str, row: Vec<Value>) -> Result<(), StoreError> {
    let url = self.values_url(range, ":append")?;
    debug!("POST {}", url);

    let body = ValueRangeBody {
      range,
      major_dimension: "ROWS",
      values: vec![row],
    };
    let response = self
      .client
      .post(url)
      .bearer_auth(&self.config.access_token)
      .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
      .json(&body)
      .send()
      .await?;
    Self::check(response).await?;
    Ok(())
  }

  /// Overwrite the worksheet with `header` followed by `rows` in one update.
  /// A trailing blank row covers the line vacated by a removed row. Rows are
  /// padded to the header width so shifted short rows leave no stale cells.
  async fn rewrite(&self, range: &str, header: &[&str], rows: Vec<Vec<Value>>) -> Result<(), StoreError> {
    let width = header.len();
    let pad = |mut row: Vec<Value>| {
      if row.len() < width {
        row.resize(width, json!(""));
      }
      row
    };

    let mut values: Vec<Vec<Value>> = Vec::with_capacity(rows.len() + 2);
    values.push(header.iter().map(|h| json!(h)).collect());
    values.extend(rows.into_iter().map(pad));
    values.push(vec![json!(""); width]);

    let url = self.values_url(range, "")?;
    debug!("PUT {}", url);

    let body = ValueRangeBody {
      range,
      major_dimension: "ROWS",
      values,
    };
    let response = self
      .client
      .put(url)
      .bearer_auth(&self.config.access_token)
      .query(&[("valueInputOption", "RAW")])
      .json(&body)
      .send()
      .await?;
    Self::check(response).await?;
    Ok(())
  }

  /// Drop the chronologically-last parseable row and write the rest back.
  /// Rows that do not parse keep their place untouched.
  async fn delete_latest<T>(
    &self,
    range: &str,
    header: &[&str],
    parse: impl Fn(&[Value]) -> Option<T>,
    date_of: impl Fn(&T) -> NaiveDate,
  ) -> Result<bool, StoreError> {
    let mut rows = self.fetch_rows(range).await?;

    let parsed: Vec<(usize, T)> = rows
      .iter()
      .enumerate()
      .filter_map(|(idx, row)| parse(row).map(|entry| (idx, entry)))
      .collect();
    let Some(latest) = latest_index(&parsed, |(_, entry)| date_of(entry)) else {
      return Ok(false);
    };

    rows.remove(parsed[latest].0);
    self.rewrite(range, header, rows).await?;
    Ok(true)
  }
}

/// ---------------------------------------------------------------------------
/// Row Conversion
/// ---------------------------------------------------------------------------

fn cell_text(cell: &Value) -> String {
  match cell {
    Value::String(s) => s.trim().to_string(),
    Value::Number(n) => n.to_string(),
    Value::Bool(b) => b.to_string(),
    _ => String::new(),
  }
}

fn cell_f64(cell: Option<&Value>) -> Option<f64> {
  let value = match cell? {
    Value::Number(n) => n.as_f64(),
    other => cell_text(other).parse::<f64>().ok(),
  };
  value.filter(|v| v.is_finite())
}

fn cell_date(cell: Option<&Value>) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(&cell_text(cell?), DATE_FORMAT).ok()
}

fn parse_set_row(row: &[Value]) -> Option<SetLogEntry> {
  let exercise = cell_text(row.get(1)?);
  if exercise.is_empty() {
    return None;
  }
  let reps = cell_f64(row.get(3)).filter(|r| r.fract() == 0.0)? as i64;

  let entry = SetLogEntry {
    date: cell_date(row.first())?,
    exercise,
    weight: cell_f64(row.get(2))?,
    reps,
    rpe: cell_f64(row.get(4))?,
  };
  entry.is_usable().then_some(entry)
}

fn set_row(entry: &SetLogEntry) -> Vec<Value> {
  vec![
    json!(entry.date.format(DATE_FORMAT).to_string()),
    json!(entry.exercise),
    json!(entry.weight),
    json!(entry.reps),
    json!(entry.rpe),
  ]
}

fn parse_measurement_row(row: &[Value]) -> Option<BodyMeasurementEntry> {
  Some(BodyMeasurementEntry {
    date: cell_date(row.first())?,
    waist: cell_f64(row.get(1))?,
    hips: cell_f64(row.get(2))?,
    thigh: cell_f64(row.get(3)),
    body_weight: cell_f64(row.get(4)),
  })
}

fn measurement_row(entry: &BodyMeasurementEntry) -> Vec<Value> {
  let optional = |v: Option<f64>| v.map_or(json!(""), |v| json!(v));
  vec![
    json!(entry.date.format(DATE_FORMAT).to_string()),
    json!(entry.waist),
    json!(entry.hips),
    optional(entry.thigh),
    optional(entry.body_weight),
  ]
}

fn parse_rows<T>(rows: &[Vec<Value>], parse: impl Fn(&[Value]) -> Option<T>, what: &str) -> Vec<T> {
  rows
    .iter()
    .filter_map(|row| {
      let parsed = parse(row);
      if parsed.is_none() {
        warn!("Skipping malformed {} row: {:?}", what, row);
      }
      parsed
    })
    .collect()
}

/// Stable sort: equal dates keep sheet order
fn sort_chronologically<T>(items: &mut [T], date_of: impl Fn(&T) -> NaiveDate) {
  items.sort_by_key(|item| date_of(item));
}

impl LogStore for SheetsStore {
  async fn append_set(&self, entry: &SetLogEntry) -> Result<(), StoreError> {
    self.append_row(LOG_RANGE, set_row(entry)).await
  }

  async fn read_all_sets(&self) -> Result<Vec<SetLogEntry>, StoreError> {
    let rows = self.fetch_rows(LOG_RANGE).await?;
    let mut entries = parse_rows(&rows, parse_set_row, "log");
    sort_chronologically(&mut entries, |e: &SetLogEntry| e.date);
    Ok(entries)
  }

  async fn delete_most_recent_set(&self) -> Result<bool, StoreError> {
    self
      .delete_latest(LOG_RANGE, &LOG_COLUMNS, parse_set_row, |e: &SetLogEntry| e.date)
      .await
  }
}

impl MeasurementStore for SheetsStore {
  async fn append_measurement(&self, entry: &BodyMeasurementEntry) -> Result<(), StoreError> {
    self.append_row(MEASUREMENT_RANGE, measurement_row(entry)).await
  }

  async fn read_all_measurements(&self) -> Result<Vec<BodyMeasurementEntry>, StoreError> {
    let rows = self.fetch_rows(MEASUREMENT_RANGE).await?;
    let mut entries = parse_rows(&rows, parse_measurement_row, "silhouette");
    sort_chronologically(&mut entries, |e: &BodyMeasurementEntry| e.date);
    Ok(entries)
  }

  async fn delete_most_recent_measurement(&self) -> Result<bool, StoreError> {
    self
      .delete_latest(
        MEASUREMENT_RANGE,
        &MEASUREMENT_COLUMNS,
        parse_measurement_row,
        |e: &BodyMeasurementEntry| e.date,
      )
      .await
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use mockito::Matcher;

  const LOG_PATH: &str = "/v4/spreadsheets/sheet-123/values/logs!A:E";

  fn store_for(server: &mockito::ServerGuard) -> SheetsStore {
    SheetsStore::new(SheetsConfig {
      api_base: server.url(),
      spreadsheet_id: "sheet-123".into(),
      access_token: "test-token".into(),
    })
  }

  fn log_sheet_body() -> String {
    json!({
      "range": "logs!A1:E5",
      "majorDimension": "ROWS",
      "values": [
        ["date", "exercise", "weight", "reps", "rpe"],
        ["2026-01-10", "Back Squat", "165", "8", "8"],
        ["2026-01-03", "Back Squat", "160", "8", "7"],
        ["2026-01-10", "Bench Press", "oops", "8", "8"],
        ["2026-01-10", "Deadlift", "215", "5", "9.5"]
      ]
    })
    .to_string()
  }

  #[tokio::test]
  async fn test_read_all_sets_skips_header_and_junk() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", LOG_PATH)
      .match_header("authorization", "Bearer test-token")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(log_sheet_body())
      .create_async()
      .await;

    let entries = store_for(&server).read_all_sets().await.unwrap();

    mock.assert_async().await;
    assert_eq!(entries.len(), 3);
    // Sorted by date; same-day rows keep sheet order
    assert_eq!(entries[0].weight, 160.0);
    assert_eq!(entries[1].exercise, "Back Squat");
    assert_eq!(entries[2].exercise, "Deadlift");
    assert_eq!(entries[2].rpe, 9.5);
  }

  #[tokio::test]
  async fn test_read_sets_for_exercise_filters() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", LOG_PATH)
      .with_status(200)
      .with_body(log_sheet_body())
      .create_async()
      .await;

    let squats = store_for(&server)
      .read_sets_for_exercise("Back Squat")
      .await
      .unwrap();
    assert_eq!(squats.len(), 2);
  }

  #[tokio::test]
  async fn test_empty_sheet_reads_as_empty_log() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", LOG_PATH)
      .with_status(200)
      .with_body(r#"{"range": "logs!A1:E1", "majorDimension": "ROWS"}"#)
      .create_async()
      .await;

    assert!(store_for(&server).read_all_sets().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_append_set_posts_one_raw_row() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/v4/spreadsheets/sheet-123/values/logs!A:E:append")
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()),
        Matcher::UrlEncoded("insertDataOption".into(), "INSERT_ROWS".into()),
      ]))
      .match_body(Matcher::PartialJson(json!({
        "values": [["2026-01-10", "Back Squat", 165.0, 8, 8.0]]
      })))
      .with_status(200)
      .with_body("{}")
      .create_async()
      .await;

    let entry = SetLogEntry::new(
      NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
      "Back Squat",
      165.0,
      8,
      8.0,
    )
    .unwrap();
    store_for(&server).append_set(&entry).await.unwrap();

    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_append_failure_is_reported() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/v4/spreadsheets/sheet-123/values/logs!A:E:append")
      .match_query(Matcher::Any)
      .with_status(403)
      .with_body(r#"{"error": {"message": "The caller does not have permission"}}"#)
      .create_async()
      .await;

    let entry = SetLogEntry::new(
      NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
      "Back Squat",
      165.0,
      8,
      8.0,
    )
    .unwrap();
    let err = store_for(&server).append_set(&entry).await.unwrap_err();

    match err {
      StoreError::Remote { status, ref body } => {
        assert_eq!(status, 403);
        assert!(body.contains("permission"));
      }
      other => panic!("Unexpected error: {}", other),
    }
    assert!(!err.is_transient());
  }

  #[tokio::test]
  async fn test_delete_most_recent_rewrites_sheet_without_latest_row() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", LOG_PATH)
      .with_status(200)
      .with_body(log_sheet_body())
      .create_async()
      .await;
    let clear = server
      .mock("POST", "/v4/spreadsheets/sheet-123/values/logs!A:E:clear")
      .expect(0)
      .create_async()
      .await;
    // Deadlift (last 2026-01-10 row) goes; the junk Bench Press row stays and
    // the vacated last line is blanked
    let update = server
      .mock("PUT", LOG_PATH)
      .match_query(Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()))
      .match_body(Matcher::PartialJson(json!({
        "values": [
          ["date", "exercise", "weight", "reps", "rpe"],
          ["2026-01-10", "Back Squat", "165", "8", "8"],
          ["2026-01-03", "Back Squat", "160", "8", "7"],
          ["2026-01-10", "Bench Press", "oops", "8", "8"],
          ["", "", "", "", ""]
        ]
      })))
      .with_status(200)
      .with_body("{}")
      .create_async()
      .await;

    assert!(store_for(&server).delete_most_recent_set().await.unwrap());

    clear.assert_async().await;
    update.assert_async().await;
  }

  #[tokio::test]
  async fn test_failed_delete_leaves_sheet_intact() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", LOG_PATH)
      .with_status(200)
      .with_body(log_sheet_body())
      .create_async()
      .await;
    let clear = server
      .mock("POST", "/v4/spreadsheets/sheet-123/values/logs!A:E:clear")
      .expect(0)
      .create_async()
      .await;
    let update = server
      .mock("PUT", LOG_PATH)
      .match_query(Matcher::Any)
      .with_status(503)
      .with_body("backend error")
      .create_async()
      .await;

    let err = store_for(&server).delete_most_recent_set().await.unwrap_err();
    assert!(matches!(err, StoreError::Remote { status: 503, .. }));

    // The only request that touched the sheet was the failed update
    update.assert_async().await;
    clear.assert_async().await;
  }

  #[test]
  fn test_parse_set_row_rejects_out_of_range_rpe() {
    let row = vec![json!("2026-01-10"), json!("Back Squat"), json!(160), json!(8), json!(42)];
    assert!(parse_set_row(&row).is_none());
  }

  #[tokio::test]
  async fn test_delete_most_recent_on_empty_sheet() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", LOG_PATH)
      .with_status(200)
      .with_body(r#"{"values": [["date", "exercise", "weight", "reps", "rpe"]]}"#)
      .create_async()
      .await;
    let clear = server
      .mock("POST", "/v4/spreadsheets/sheet-123/values/logs!A:E:clear")
      .expect(0)
      .create_async()
      .await;

    assert!(!store_for(&server).delete_most_recent_set().await.unwrap());
    clear.assert_async().await;
  }

  #[tokio::test]
  async fn test_measurements_parse_optional_cells() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/v4/spreadsheets/sheet-123/values/silhouette!A:E")
      .with_status(200)
      .with_body(
        json!({
          "values": [
            ["date", "waist", "hips", "thigh", "body_weight"],
            ["2026-01-10", "28.5", "38", "", ""],
            ["2026-01-03", 29.0, 38.5, 22.0, 146.0]
          ]
        })
        .to_string(),
      )
      .create_async()
      .await;

    let entries = store_for(&server).read_all_measurements().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].thigh, Some(22.0));
    assert_eq!(entries[1].waist, 28.5);
    assert_eq!(entries[1].thigh, None);
    assert_eq!(entries[1].body_weight, None);
  }

  #[test]
  fn test_parse_set_row_rejects_fractional_reps() {
    let row = vec![json!("2026-01-10"), json!("Back Squat"), json!(160), json!(8.5), json!(7)];
    assert!(parse_set_row(&row).is_none());

    let row = vec![json!("2026-01-10"), json!("Back Squat"), json!(160), json!(8), json!(7)];
    assert_eq!(parse_set_row(&row).unwrap().reps, 8);
  }
}
