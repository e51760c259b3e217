pub mod measurement;
pub mod set_log;

pub use measurement::BodyMeasurementEntry;
pub use set_log::{SetLogEntry, RPE_OPTIONS};

use thiserror::Error;

/// Storage and export format for every date column (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rejected user input for a new log or measurement row
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
  #[error("Exercise name must not be empty")]
  EmptyExercise,

  #[error("Weight must be a positive number of pounds, got {0}")]
  InvalidWeight(f64),

  #[error("Reps must be a positive whole number, got {0}")]
  InvalidReps(i64),

  #[error("RPE must be one of 5, 6, 7, 7.5, 8, 8.5, 9, 9.5, 10, got {0}")]
  InvalidRpe(f64),

  #[error("{field} must be a positive measurement, got {value}")]
  InvalidMeasurement { field: &'static str, value: f64 },
}
