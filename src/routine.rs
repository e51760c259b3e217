//! Fixed weekly routine and exercise substitutions

use chrono::Weekday;

pub const REST_DAY: &str = "Rest Day";

/// Display order for the roadmap
pub const WEEK: [Weekday; 7] = [
  Weekday::Mon,
  Weekday::Tue,
  Weekday::Wed,
  Weekday::Thu,
  Weekday::Fri,
  Weekday::Sat,
  Weekday::Sun,
];

/// Scheduled movements for a day of the week
pub fn exercises_for(day: Weekday) -> &'static [&'static str] {
  match day {
    Weekday::Mon => &["Back Squat", "Barbell Hip Thrust", "Barbell RDL", "Ab Wheel"],
    Weekday::Tue => &[
      "Bench Press",
      "Walking Lunge",
      "Dumbbell Row",
      "Machine Hip Abduction",
    ],
    Weekday::Wed => &["Deadlift", "Barbell Hip Thrust", "Rear Lunge", "Ab Wheel"],
    Weekday::Thu => &["Weighted Rear Lunge", "Machine Hip Abduction", "Ab Wheel"],
    Weekday::Fri => &["Dumbbell Overhead Press", "Walking Lunge", "Ab Wheel"],
    Weekday::Sat => &["Barbell Hip Thrust", "Deficit Rear Lunge", "Machine Hip Abduction"],
    Weekday::Sun => &[REST_DAY],
  }
}

pub fn is_rest_day(day: Weekday) -> bool {
  exercises_for(day).contains(&REST_DAY)
}

/// Accepted variants for a scheduled movement, the movement itself first.
/// Movements without substitutes return just themselves.
pub fn variants_for(exercise: &str) -> Vec<&str> {
  let subs: &[&'static str] = match exercise {
    "Back Squat" => &["Back Squat", "Goblet Squat", "Leg Press"],
    "Barbell Hip Thrust" => &["Barbell Hip Thrust", "DB Hip Thrust", "Glute Bridge"],
    "Deadlift" => &["Deadlift", "Sumo Deadlift", "Trap Bar Deadlift"],
    "Bench Press" => &["Bench Press", "DB Chest Press"],
    "Walking Lunge" => &["Walking Lunge", "Split Squat", "Step Ups"],
    _ => return vec![exercise],
  };
  subs.to_vec()
}

/// Parse "monday", "Mon", "tue", ...
pub fn parse_weekday(value: &str) -> Result<Weekday, String> {
  value
    .trim()
    .parse::<Weekday>()
    .map_err(|_| format!("Unknown day of week: {}", value))
}
