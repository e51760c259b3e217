//! Periodization schedule
//!
//! Maps calendar time since the program start to a training phase:
//! - weeks 1-4: hypertrophy, 3 x 10-12
//! - weeks 5-12: strength, 3 x 6-8
//! - week 13 onward: peaking, 4 x 3-5
//!
//! Nothing here is cached. "Now" moves, so callers ask again on every view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Length of the program shown on the roadmap. Not enforced by the schedule:
/// week 17 and later stay in the peaking phase.
pub const PROGRAM_LENGTH_WEEKS: u32 = 16;

const HYPERTROPHY_LAST_WEEK: u32 = 4;
const STRENGTH_LAST_WEEK: u32 = 12;

// ---------------------------------------------------------------------------
/// Phase: Multi-week block with a fixed set/rep target
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Hypertrophy,
    Strength,
    Peaking,
}

impl Phase {
    pub fn for_week(week_number: u32) -> Self {
        if week_number <= HYPERTROPHY_LAST_WEEK {
            Self::Hypertrophy
        } else if week_number <= STRENGTH_LAST_WEEK {
            Self::Strength
        } else {
            Self::Peaking
        }
    }

    /// 1-based position in the program
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Hypertrophy => 1,
            Self::Strength => 2,
            Self::Peaking => 3,
        }
    }

    pub fn sets(&self) -> u8 {
        match self {
            Self::Hypertrophy | Self::Strength => 3,
            Self::Peaking => 4,
        }
    }

    pub fn rep_range(&self) -> RepRange {
        match self {
            Self::Hypertrophy => RepRange { min: 10, max: 12 },
            Self::Strength => RepRange { min: 6, max: 8 },
            Self::Peaking => RepRange { min: 3, max: 5 },
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hypertrophy => write!(f, "Hypertrophy"),
            Self::Strength => write!(f, "Strength"),
            Self::Peaking => write!(f, "Peaking"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub min: u8,
    pub max: u8,
}

impl std::fmt::Display for RepRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
/// Phase Window: Derived view of "where are we in the program"
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseWindow {
    pub week_number: u32,
    pub phase: Phase,
    pub sets: u8,
    pub rep_range: RepRange,
}

impl PhaseWindow {
    /// "Phase 2: Strength"
    pub fn title(&self) -> String {
        format!("Phase {}: {}", self.phase.ordinal(), self.phase)
    }

    /// "3 Sets x 6-8 Reps"
    pub fn rep_goal(&self) -> String {
        format!("{} Sets x {} Reps", self.sets, self.rep_range)
    }

    /// Fraction of the 16-week roadmap completed, capped at 1.0
    pub fn progress(&self) -> f64 {
        (self.week_number as f64 / PROGRAM_LENGTH_WEEKS as f64).min(1.0)
    }
}

/// Resolve the phase for `now`, counting whole weeks since `program_start`.
/// Dates before the start clamp to week 1.
pub fn current_phase(program_start: NaiveDate, now: NaiveDate) -> PhaseWindow {
    let days_in = (now - program_start).num_days();
    let week_number = (days_in.div_euclid(7) + 1).max(1);
    let week_number = u32::try_from(week_number).unwrap_or(u32::MAX);

    let phase = Phase::for_week(week_number);
    PhaseWindow {
        week_number,
        phase,
        sets: phase.sets(),
        rep_range: phase.rep_range(),
    }
}

// ---------------------------------------------------------------------------
/// Tests
// ---------------------------------------------------------------------------
