use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntryError;

pub const MEASUREMENT_COLUMNS: [&str; 5] = ["date", "waist", "hips", "thigh", "body_weight"];

/// Silhouette snapshot, inches for girths and pounds for body weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BodyMeasurementEntry {
  pub date: NaiveDate,
  pub waist: f64,
  pub hips: f64,
  pub thigh: Option<f64>,
  pub body_weight: Option<f64>,
}

impl BodyMeasurementEntry {
  pub fn new(
    date: NaiveDate,
    waist: f64,
    hips: f64,
    thigh: Option<f64>,
    body_weight: Option<f64>,
  ) -> Result<Self, EntryError> {
    check_positive("waist", waist)?;
    check_positive("hips", hips)?;
    if let Some(value) = thigh {
      check_positive("thigh", value)?;
    }
    if let Some(value) = body_weight {
      check_positive("body_weight", value)?;
    }

    Ok(Self {
      date,
      waist,
      hips,
      thigh,
      body_weight,
    })
  }

  /// Waist-to-hip ratio, the number the silhouette page tracks over time
  pub fn waist_to_hip_ratio(&self) -> f64 {
    self.waist / self.hips
  }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), EntryError> {
  if value.is_finite() && value > 0.0 {
    Ok(())
  } else {
    Err(EntryError::InvalidMeasurement { field, value })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_optional_fields_validated_when_present() {
    let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    assert!(BodyMeasurementEntry::new(date, 28.5, 38.0, None, None).is_ok());

    let err = BodyMeasurementEntry::new(date, 28.5, 38.0, Some(0.0), None).unwrap_err();
    assert_eq!(
      err,
      EntryError::InvalidMeasurement {
        field: "thigh",
        value: 0.0
      }
    );
  }

  #[test]
  fn test_waist_to_hip_ratio() {
    let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    let entry = BodyMeasurementEntry::new(date, 28.5, 38.0, Some(22.0), Some(145.0)).unwrap();
    crate::assert_approx_eq!(entry.waist_to_hip_ratio(), 0.75, 1e-9);
  }
}
