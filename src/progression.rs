//! Last-Performance Progression Engine
//!
//! Suggests the next working weight for an exercise from the most recent
//! logged set:
//! - RPE <= 7: add a full 5 lb increment
//! - 7 < RPE <= 9: add a half 2.5 lb increment
//! - RPE > 9: repeat the weight
//!
//! Key principles:
//! - Advisory only, the lifter can always log a different weight
//! - Best-effort: a missing or unreadable history yields the starting weight
//! - "Most recent" is the latest date, ties broken by logging order

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::models::SetLogEntry;
use crate::store::{latest_index, LogStore};

/// Generic floor for an empty bar or an unlisted dumbbell movement
pub const DEFAULT_TARGET_WEIGHT: f64 = 45.0;

pub const FULL_INCREMENT: f64 = 5.0;
pub const HALF_INCREMENT: f64 = 2.5;

/// Upper bound (inclusive) of the "easy" band
const EASY_RPE_CEILING: f64 = 7.0;
/// Upper bound (inclusive) of the "appropriately hard" band
const HARD_RPE_CEILING: f64 = 9.0;

// ---------------------------------------------------------------------------
/// Overload Step: What the last set's RPE allows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverloadStep {
    /// Set felt easy
    FullIncrement,
    /// Set felt appropriately hard
    HalfIncrement,
    /// Set was near-maximal, consolidate before adding load
    Hold,
}

impl OverloadStep {
    pub fn from_rpe(rpe: f64) -> Self {
        if rpe <= EASY_RPE_CEILING {
            Self::FullIncrement
        } else if rpe <= HARD_RPE_CEILING {
            Self::HalfIncrement
        } else {
            Self::Hold
        }
    }

    pub fn increment(&self) -> f64 {
        match self {
            Self::FullIncrement => FULL_INCREMENT,
            Self::HalfIncrement => HALF_INCREMENT,
            Self::Hold => 0.0,
        }
    }

    pub fn apply(&self, weight: f64) -> f64 {
        weight + self.increment()
    }
}

impl std::fmt::Display for OverloadStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FullIncrement => write!(f, "+5 lbs (last set felt easy)"),
            Self::HalfIncrement => write!(f, "+2.5 lbs (last set was challenging)"),
            Self::Hold => write!(f, "hold (last set was near-maximal)"),
        }
    }
}

// ---------------------------------------------------------------------------
/// Starting Weights: Per-lift defaults for an empty history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartingWeights {
    weights: HashMap<String, f64>,
}

impl StartingWeights {
    pub fn empty() -> Self {
        Self {
            weights: HashMap::new(),
        }
    }

    pub fn with_weight(mut self, exercise: &str, weight: f64) -> Self {
        self.weights.insert(exercise.to_string(), weight);
        self
    }

    /// Tuned starting weight, or the 45 lb floor for anything unlisted
    pub fn get(&self, exercise: &str) -> f64 {
        self.weights
            .get(exercise)
            .copied()
            .unwrap_or(DEFAULT_TARGET_WEIGHT)
    }
}

impl Default for StartingWeights {
    fn default() -> Self {
        Self::empty()
            .with_weight("Back Squat", 160.0)
            .with_weight("Barbell Hip Thrust", 200.0)
            .with_weight("Bench Press", 115.0)
            .with_weight("Deadlift", 210.0)
            .with_weight("Barbell RDL", 135.0)
    }
}

// ---------------------------------------------------------------------------
/// Target Recommendation: Derived, never stored
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecommendation {
    pub exercise: String,
    pub target_weight: f64,
    /// None when the target is the starting weight
    pub last_set: Option<SetLogEntry>,
    pub step: Option<OverloadStep>,
}

impl TargetRecommendation {
    fn starting(exercise: &str, defaults: &StartingWeights) -> Self {
        Self {
            exercise: exercise.to_string(),
            target_weight: defaults.get(exercise),
            last_set: None,
            step: None,
        }
    }

    /// One-line explanation for display next to the target
    pub fn reason(&self) -> String {
        match (&self.last_set, self.step) {
            (Some(last), Some(step)) => format!(
                "Last: {} lbs x {} @ RPE {} on {} -> {}",
                last.weight, last.reps, last.rpe, last.date, step
            ),
            _ => "No history yet, starting weight".to_string(),
        }
    }
}

/// Most recent usable entry for `exercise`: latest date, later-logged wins ties.
/// `history` is in logging order.
pub fn most_recent<'a>(exercise: &str, history: &'a [SetLogEntry]) -> Option<&'a SetLogEntry> {
    let candidates: Vec<&SetLogEntry> = history
        .iter()
        .filter(|e| e.exercise == exercise && e.is_usable())
        .collect();
    latest_index(&candidates, |e| e.date).map(|idx| candidates[idx])
}

/// Full recommendation with the set it was derived from
pub fn recommend(
    exercise: &str,
    history: &[SetLogEntry],
    defaults: &StartingWeights,
) -> TargetRecommendation {
    match most_recent(exercise, history) {
        Some(last) => {
            let step = OverloadStep::from_rpe(last.rpe);
            TargetRecommendation {
                exercise: exercise.to_string(),
                target_weight: step.apply(last.weight),
                last_set: Some(last.clone()),
                step: Some(step),
            }
        }
        None => TargetRecommendation::starting(exercise, defaults),
    }
}

/// Suggested weight for the next session of `exercise`
pub fn target_weight(exercise: &str, history: &[SetLogEntry], defaults: &StartingWeights) -> f64 {
    recommend(exercise, history, defaults).target_weight
}

/// Read the exercise's history from the store and recommend. Store failures
/// are treated as an empty history; this never returns an error.
pub async fn recommend_from_store<S: LogStore>(
    store: &S,
    exercise: &str,
    defaults: &StartingWeights,
) -> TargetRecommendation {
    match store.read_sets_for_exercise(exercise).await {
        Ok(history) => recommend(exercise, &history, defaults),
        Err(e) => {
            warn!(
                "Could not read history for {}, using starting weight: {}",
                exercise, e
            );
            TargetRecommendation::starting(exercise, defaults)
        }
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
