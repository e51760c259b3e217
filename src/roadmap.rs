//! 16-week roadmap view
//!
//! Combines the phase window, the weekly routine and per-exercise targets,
//! flagging targets that match or beat the heaviest weight ever logged.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::analytics::{all_time_max, is_pr_pace};
use crate::models::SetLogEntry;
use crate::phase::{current_phase, PhaseWindow, PROGRAM_LENGTH_WEEKS};
use crate::progression::{target_weight, StartingWeights};
use crate::routine::{exercises_for, is_rest_day, WEEK};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapEntry {
  pub exercise: String,
  pub target_weight: f64,
  pub all_time_max: Option<f64>,
  pub pr_pace: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadmapDay {
  pub day: Weekday,
  pub is_today: bool,
  pub rest: bool,
  pub entries: Vec<RoadmapEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Roadmap {
  pub window: PhaseWindow,
  pub total_weeks: u32,
  pub days: Vec<RoadmapDay>,
}

impl Roadmap {
  pub fn build(
    program_start: NaiveDate,
    today: NaiveDate,
    history: &[SetLogEntry],
    defaults: &StartingWeights,
  ) -> Self {
    let window = current_phase(program_start, today);
    let maxima = all_time_max(history);

    let days = WEEK
      .iter()
      .map(|&day| {
        let rest = is_rest_day(day);
        let entries = if rest {
          Vec::new()
        } else {
          exercises_for(day)
            .iter()
            .map(|exercise| {
              let target = target_weight(exercise, history, defaults);
              let max = maxima.get(*exercise).copied();
              RoadmapEntry {
                exercise: exercise.to_string(),
                target_weight: target,
                all_time_max: max,
                pr_pace: is_pr_pace(target, max),
              }
            })
            .collect()
        };

        RoadmapDay {
          day,
          is_today: day == today.weekday(),
          rest,
          entries,
        }
      })
      .collect();

    Self {
      window,
      total_weeks: PROGRAM_LENGTH_WEEKS,
      days,
    }
  }

  /// "Week 5 of 16"
  pub fn headline(&self) -> String {
    format!("Week {} of {}", self.window.week_number, self.total_weeks)
  }
}
