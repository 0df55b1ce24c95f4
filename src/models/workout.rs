use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Weight Unit
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum WeightUnit {
  Kg,
  Lb,
}

impl std::fmt::Display for WeightUnit {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Kg => write!(f, "kg"),
      Self::Lb => write!(f, "lb"),
    }
  }
}

impl std::str::FromStr for WeightUnit {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "kg" => Ok(Self::Kg),
      "lb" => Ok(Self::Lb),
      _ => Err(format!("Unknown weight unit: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Workout
/// ---------------------------------------------------------------------------

/// One training session. `date_utc` is the session instant; `timezone` keeps
/// the IANA zone name the session was logged in so history can be grouped by
/// local day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Workout {
  pub id: String,
  pub date_utc: DateTime<Utc>,
  pub timezone: String,
  pub notes: Option<String>,
  pub created_at: i64,
  pub updated_at: i64,
  pub deleted_at: Option<i64>,
}

/// For inserting new workouts (without id and timestamps)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkout {
  pub date_utc: DateTime<Utc>,
  pub timezone: String,
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutPatch {
  pub date_utc: Option<DateTime<Utc>>,
  pub timezone: Option<String>,
  pub notes: Option<String>,
}

/// ---------------------------------------------------------------------------
/// Set Entry
/// ---------------------------------------------------------------------------

/// One performed set within a workout.
///
/// `workout_id` and `exercise_id` must exist at creation time, but no
/// cascading integrity is enforced afterward: a later-deleted exercise leaves
/// a dangling reference that callers render as "Unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SetEntry {
  pub id: String,
  pub workout_id: String,
  pub exercise_id: String,
  pub reps: i64,
  pub weight: Option<f64>,
  pub unit: Option<WeightUnit>,
  pub rpe: Option<f64>,
  pub rest_seconds: Option<i64>,
  pub created_at: i64,
  pub updated_at: i64,
  pub deleted_at: Option<i64>,
}

/// For inserting new sets (without id and timestamps)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSetEntry {
  pub workout_id: String,
  pub exercise_id: String,
  pub reps: i64,
  pub weight: Option<f64>,
  pub unit: Option<WeightUnit>,
  pub rpe: Option<f64>,
  pub rest_seconds: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetEntryPatch {
  pub reps: Option<i64>,
  pub weight: Option<f64>,
  pub unit: Option<WeightUnit>,
  pub rpe: Option<f64>,
  pub rest_seconds: Option<i64>,
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
