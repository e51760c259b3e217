//! Today's session, targets and the program roadmap

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::{history_or_empty, AppState};
use crate::phase::{current_phase, PhaseWindow};
use crate::progression::{recommend, recommend_from_store, StartingWeights, TargetRecommendation};
use crate::roadmap::Roadmap;
use crate::routine::{exercises_for, is_rest_day, variants_for};

#[derive(Debug, Clone, Serialize)]
pub struct PlannedExercise {
  pub scheduled: String,
  pub variants: Vec<String>,
  pub recommendation: TargetRecommendation,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionPlan {
  pub day: Weekday,
  pub window: PhaseWindow,
  pub rest: bool,
  pub exercises: Vec<PlannedExercise>,
}

/// Phase for `today`, recomputed on every call
pub fn get_phase(state: &AppState, today: NaiveDate) -> PhaseWindow {
  current_phase(state.config.program_start, today)
}

/// Target for one exercise. Never fails: store trouble yields the starting weight.
pub async fn get_target(state: &AppState, exercise: &str) -> TargetRecommendation {
  recommend_from_store(&state.store, exercise, &StartingWeights::default()).await
}

/// Scheduled movements for `day` with their targets and allowed variants.
/// `day` is normally `today`'s weekday; the host may preview another day.
pub async fn get_session_plan(
  state: &AppState,
  today: NaiveDate,
  day: Option<Weekday>,
) -> SessionPlan {
  let day = day.unwrap_or_else(|| today.weekday());
  let window = get_phase(state, today);
  let rest = is_rest_day(day);

  let exercises = if rest {
    Vec::new()
  } else {
    let history = history_or_empty(state).await;
    let defaults = StartingWeights::default();
    exercises_for(day)
      .iter()
      .map(|scheduled| PlannedExercise {
        scheduled: scheduled.to_string(),
        variants: variants_for(scheduled).into_iter().map(String::from).collect(),
        recommendation: recommend(scheduled, &history, &defaults),
      })
      .collect()
  };

  SessionPlan {
    day,
    window,
    rest,
    exercises,
  }
}

pub async fn get_roadmap(state: &AppState, today: NaiveDate) -> Roadmap {
  let history = history_or_empty(state).await;
  Roadmap::build(
    state.config.program_start,
    today,
    &history,
    &StartingWeights::default(),
  )
}
