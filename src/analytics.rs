//! History aggregations: all-time maxima, chart series, daily summary

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::SetLogEntry;

/// Heaviest weight ever logged, keyed by exercise name
pub fn all_time_max(history: &[SetLogEntry]) -> BTreeMap<String, f64> {
  let mut maxima: BTreeMap<String, f64> = BTreeMap::new();
  for entry in history.iter().filter(|e| e.is_usable()) {
    maxima
      .entry(entry.exercise.clone())
      .and_modify(|max| *max = max.max(entry.weight))
      .or_insert(entry.weight);
  }
  maxima
}

/// A target at or above the all-time max is on personal-record pace.
/// With nothing logged there is no record to chase.
pub fn is_pr_pace(target_weight: f64, all_time_max: Option<f64>) -> bool {
  all_time_max.is_some_and(|max| target_weight >= max)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
  pub date: NaiveDate,
  pub weight: f64,
}

/// Weight-over-time lines for the progress chart, one per exercise
pub fn weight_series(history: &[SetLogEntry]) -> BTreeMap<String, Vec<SeriesPoint>> {
  let mut series: BTreeMap<String, Vec<SeriesPoint>> = BTreeMap::new();
  for entry in history.iter().filter(|e| e.is_usable()) {
    series
      .entry(entry.exercise.clone())
      .or_default()
      .push(SeriesPoint {
        date: entry.date,
        weight: entry.weight,
      });
  }
  for points in series.values_mut() {
    points.sort_by_key(|p| p.date);
  }
  series
}

/// Sets logged on `date`, in logging order
pub fn sets_on(history: &[SetLogEntry], date: NaiveDate) -> Vec<&SetLogEntry> {
  history.iter().filter(|e| e.date == date).collect()
}
