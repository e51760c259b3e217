//! Command-line host
//!
//! Parses arguments and renders each command's result as plain text.

use chrono::{Local, NaiveDate, Weekday};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

use crate::commands::{export, log, measurement, session, AppState};
use crate::config::{parse_date, AppConfig, StoreKind};
use crate::routine::parse_weekday;

#[derive(Debug, Parser)]
#[command(
  name = "power-sculpt",
  about = "Power-Sculpt 16-week training tracker",
  long_about = "Phase-aware session planner with RPE-driven progressive overload"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,

  /// SQLite file for the local store
  #[arg(long, global = true)]
  pub db_path: Option<PathBuf>,

  /// Storage backend
  #[arg(long, global = true, value_enum)]
  pub store: Option<StoreKind>,

  /// Act as if today were this date (YYYY-MM-DD)
  #[arg(long, global = true, value_parser = parse_date_arg)]
  pub on: Option<NaiveDate>,

  /// Enable debug logging
  #[arg(long, short = 'v', global = true)]
  pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// Today's session with targets
  Today {
    /// Preview another weekday
    #[arg(long, value_parser = parse_weekday)]
    day: Option<Weekday>,
  },
  /// Current phase and rep goal
  Phase,
  /// Target weight for one exercise
  Target { exercise: String },
  /// Record a set
  Log {
    exercise: String,
    /// Defaults to the current target
    #[arg(long)]
    weight: Option<f64>,
    #[arg(long)]
    reps: i64,
    #[arg(long)]
    rpe: f64,
  },
  /// Sets logged today
  Summary,
  /// Delete the most recent set
  Undo,
  /// Weekly roadmap with PR pace markers
  Roadmap,
  /// Silhouette measurements
  Measure {
    #[command(subcommand)]
    action: MeasureAction,
  },
  /// Full log, or one exercise's weight progression
  History {
    #[arg(long)]
    exercise: Option<String>,
  },
  /// Export as CSV
  Export {
    /// Export measurements instead of the set log
    #[arg(long)]
    measurements: bool,
    /// Write to a file instead of stdout
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
  },
}

#[derive(Debug, Subcommand)]
pub enum MeasureAction {
  Add {
    #[arg(long)]
    waist: f64,
    #[arg(long)]
    hips: f64,
    #[arg(long)]
    thigh: Option<f64>,
    #[arg(long)]
    body_weight: Option<f64>,
  },
  List,
  Undo,
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
  parse_date(value).ok_or_else(|| format!("Expected YYYY-MM-DD, got {}", value))
}

impl Cli {
  /// Flags win over environment values
  pub fn apply_overrides(&self, mut config: AppConfig) -> AppConfig {
    if let Some(path) = &self.db_path {
      config.db_path = path.clone();
    }
    if let Some(store) = self.store {
      config.store = store;
    }
    config
  }

  pub fn today(&self) -> NaiveDate {
    self.on.unwrap_or_else(|| Local::now().date_naive())
  }
}

fn emit(out: &mut impl Write, line: impl AsRef<str>) -> Result<(), String> {
  writeln!(out, "{}", line.as_ref()).map_err(|e| format!("Failed to write output: {}", e))
}

/// Run one command against an initialized state
pub async fn execute(
  state: &AppState,
  today: NaiveDate,
  command: &Command,
  out: &mut impl Write,
) -> Result<(), String> {
  match command {
    Command::Today { day } => {
      let plan = session::get_session_plan(state, today, *day).await;
      emit(out, format!("{} | Week {}", plan.window.title(), plan.window.week_number))?;
      emit(out, format!("Goal: {}", plan.window.rep_goal()))?;
      if plan.rest {
        emit(out, format!("{}: Rest Day", plan.day))?;
        return Ok(());
      }
      for planned in &plan.exercises {
        let rec = &planned.recommendation;
        emit(out, format!("{}: {} lbs", planned.scheduled, rec.target_weight))?;
        emit(out, format!("  {}", rec.reason()))?;
        if planned.variants.len() > 1 {
          emit(out, format!("  Variants: {}", planned.variants.join(", ")))?;
        }
      }
    }

    Command::Phase => {
      let window = session::get_phase(state, today);
      emit(out, window.title())?;
      emit(out, format!("Week {}: {}", window.week_number, window.rep_goal()))?;
      emit(out, format!("Progress: {:.0}%", window.progress() * 100.0))?;
    }

    Command::Target { exercise } => {
      let rec = session::get_target(state, exercise.trim()).await;
      emit(out, format!("{}: {} lbs", rec.exercise, rec.target_weight))?;
      emit(out, rec.reason())?;
    }

    Command::Log {
      exercise,
      weight,
      reps,
      rpe,
    } => {
      let entry = log::log_set(state, today, exercise, *weight, *reps, *rpe).await?;
      emit(
        out,
        format!(
          "Saved {} lbs x {} @ RPE {} for {}",
          entry.weight, entry.reps, entry.rpe, entry.exercise
        ),
      )?;
    }

    Command::Summary => {
      let sets = log::get_sets_on(state, today).await?;
      if sets.is_empty() {
        emit(out, "No sets logged today")?;
      }
      for set in sets {
        emit(
          out,
          format!("{}: {} lbs x {} @ RPE {}", set.exercise, set.weight, set.reps, set.rpe),
        )?;
      }
    }

    Command::Undo => {
      if log::delete_last_set(state).await? {
        emit(out, "Deleted last entry")?;
      } else {
        emit(out, "Log is empty")?;
      }
    }

    Command::Roadmap => {
      let roadmap = session::get_roadmap(state, today).await;
      let goal = roadmap.window.rep_goal();
      emit(out, format!("{} | {}", roadmap.headline(), roadmap.window.phase))?;
      emit(out, format!("Progress: {:.0}%", roadmap.window.progress() * 100.0))?;
      for day in &roadmap.days {
        let marker = if day.is_today { " (today)" } else { "" };
        if day.rest {
          emit(out, format!("{}{}: Rest Day", day.day, marker))?;
          continue;
        }
        emit(out, format!("{}{}", day.day, marker))?;
        for entry in &day.entries {
          let pace = if entry.pr_pace { " [PR pace]" } else { "" };
          emit(
            out,
            format!("  {}: {} lbs | {}{}", entry.exercise, entry.target_weight, goal, pace),
          )?;
        }
      }
    }

    Command::Measure { action } => match action {
      MeasureAction::Add {
        waist,
        hips,
        thigh,
        body_weight,
      } => {
        let entry =
          measurement::record_measurement(state, today, *waist, *hips, *thigh, *body_weight)
            .await?;
        emit(
          out,
          format!(
            "Saved silhouette for {} (waist/hip {:.2})",
            entry.date,
            entry.waist_to_hip_ratio()
          ),
        )?;
      }
      MeasureAction::List => {
        for entry in measurement::get_measurements(state).await? {
          let mut line = format!("{}: waist {} hips {}", entry.date, entry.waist, entry.hips);
          if let Some(thigh) = entry.thigh {
            line.push_str(&format!(" thigh {}", thigh));
          }
          if let Some(body_weight) = entry.body_weight {
            line.push_str(&format!(" weight {}", body_weight));
          }
          emit(out, line)?;
        }
      }
      MeasureAction::Undo => {
        if measurement::delete_last_measurement(state).await? {
          emit(out, "Deleted last measurement")?;
        } else {
          emit(out, "No measurements recorded")?;
        }
      }
    },

    Command::History { exercise } => match exercise {
      Some(name) => {
        let series = log::get_weight_series(state).await?;
        match series.get(name.trim()) {
          Some(points) => {
            for point in points {
              emit(out, format!("{}: {} lbs", point.date, point.weight))?;
            }
          }
          None => emit(out, format!("No history for {}", name.trim()))?,
        }
      }
      None => {
        for set in log::get_all_sets(state).await? {
          emit(
            out,
            format!(
              "{} {}: {} lbs x {} @ RPE {}",
              set.date, set.exercise, set.weight, set.reps, set.rpe
            ),
          )?;
        }
      }
    },

    Command::Export {
      measurements,
      output,
    } => {
      let csv = if *measurements {
        export::export_measurements(state).await?
      } else {
        export::export_log(state).await?
      };
      match output {
        Some(path) => {
          std::fs::write(path, csv)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
          emit(out, format!("Exported to {}", path.display()))?;
        }
        None => write!(out, "{}", csv).map_err(|e| format!("Failed to write output: {}", e))?,
      }
    }
  }

  Ok(())
}
