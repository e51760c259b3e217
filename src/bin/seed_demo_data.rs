//! Demo data seeder for the local store.
//!
//! Writes one week-old training day and a silhouette snapshot so the
//! targets, roadmap and charts have something to show.
//!
//! Usage:
//! ```bash
//! cargo run --bin seed-demo-data
//! cargo run --bin seed-demo-data -- --db-path /tmp/demo.db --days-ago 3
//! ```

use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

use power_sculpt_lib::config::DEFAULT_DB_PATH;
use power_sculpt_lib::models::{BodyMeasurementEntry, SetLogEntry};
use power_sculpt_lib::store::{LogStore, MeasurementStore, SqliteStore, StoreError};

#[derive(Parser)]
#[command(
  name = "seed-demo-data",
  about = "Power-Sculpt demo data seeder",
  long_about = "Populate the local database with a sample training day"
)]
struct SeedArgs {
  /// SQLite file to seed
  #[arg(long)]
  db_path: Option<PathBuf>,

  /// How far back the sample training day is dated
  #[arg(long, default_value = "7")]
  days_ago: i64,

  /// Skip the silhouette snapshot
  #[arg(long)]
  no_measurement: bool,
}

/// (exercise, weight, reps, rpe)
const DEMO_SETS: &[(&str, f64, i64, f64)] = &[
  ("Back Squat", 155.0, 8, 7.0),
  ("Barbell Hip Thrust", 190.0, 10, 6.5),
  ("Bench Press", 110.0, 8, 8.0),
  ("Deadlift", 205.0, 5, 9.0),
];

/// Built directly: 6.5 is a valid effort rating but not a logging option
fn demo_sets(date: NaiveDate) -> Vec<SetLogEntry> {
  DEMO_SETS
    .iter()
    .map(|&(exercise, weight, reps, rpe)| SetLogEntry {
      date,
      exercise: exercise.to_string(),
      weight,
      reps,
      rpe,
    })
    .collect()
}

#[derive(Debug, thiserror::Error)]
enum SeedError {
  #[error(transparent)]
  Store(#[from] StoreError),

  #[error(transparent)]
  Entry(#[from] power_sculpt_lib::models::EntryError),
}

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt().with_writer(std::io::stderr).init();

  let args = SeedArgs::parse();
  match seed(&args).await {
    Ok(count) => {
      info!("Seeded {} sets", count);
      ExitCode::SUCCESS
    }
    Err(e) => {
      error!("Seeding failed: {}", e);
      ExitCode::FAILURE
    }
  }
}

async fn seed(args: &SeedArgs) -> Result<usize, SeedError> {
  dotenvy::dotenv().ok();
  let db_path = args
    .db_path
    .clone()
    .or_else(|| std::env::var("POWER_SCULPT_DB_PATH").ok().map(PathBuf::from))
    .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

  info!("Seeding {}", db_path.display());
  let store = SqliteStore::open(&db_path).await?;
  let date = Local::now().date_naive() - Duration::days(args.days_ago);

  for entry in demo_sets(date) {
    store.append_set(&entry).await?;
  }

  if !args.no_measurement {
    let snapshot = BodyMeasurementEntry::new(date, 28.5, 38.0, Some(22.0), Some(145.0))?;
    store.append_measurement(&snapshot).await?;
  }

  Ok(DEMO_SETS.len())
}
