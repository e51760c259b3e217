use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntryError;

/// Column order shared by the database table, the remote sheet and CSV export
pub const LOG_COLUMNS: [&str; 5] = ["date", "exercise", "weight", "reps", "rpe"];

/// RPE values offered when logging a set
pub const RPE_OPTIONS: [f64; 9] = [5.0, 6.0, 7.0, 7.5, 8.0, 8.5, 9.0, 9.5, 10.0];

const RPE_MIN: f64 = 5.0;
const RPE_MAX: f64 = 10.0;

/// One completed working set. Rows are append-only; nothing edits them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SetLogEntry {
  pub date: NaiveDate,
  pub exercise: String,
  /// Pounds
  pub weight: f64,
  pub reps: i64,
  pub rpe: f64,
}

impl SetLogEntry {
  /// Build a validated entry for appending to the log
  pub fn new(
    date: NaiveDate,
    exercise: &str,
    weight: f64,
    reps: i64,
    rpe: f64,
  ) -> Result<Self, EntryError> {
    let exercise = exercise.trim();
    if exercise.is_empty() {
      return Err(EntryError::EmptyExercise);
    }
    if !weight.is_finite() || weight <= 0.0 {
      return Err(EntryError::InvalidWeight(weight));
    }
    if reps <= 0 {
      return Err(EntryError::InvalidReps(reps));
    }
    if !RPE_OPTIONS.contains(&rpe) {
      return Err(EntryError::InvalidRpe(rpe));
    }

    Ok(Self {
      date,
      exercise: exercise.to_string(),
      weight,
      reps,
      rpe,
    })
  }

  /// Whether a stored row can feed the overload rule.
  /// Rows written by hand into the remote sheet may carry junk; RPE must sit
  /// on the 5-10 scale even when it is not one of the logging options.
  pub fn is_usable(&self) -> bool {
    self.weight.is_finite() && self.weight > 0.0 && (RPE_MIN..=RPE_MAX).contains(&self.rpe)
  }
}
