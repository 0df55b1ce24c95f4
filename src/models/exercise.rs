use serde::{Deserialize, Serialize};

/// A catalog entry describing a movement, either user-authored
/// (`is_custom = true`) or imported from the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Exercise {
  pub id: String,
  pub name: String,
  pub muscle_group: Option<String>,
  pub notes: Option<String>,
  pub is_custom: bool,
  pub created_at: i64,
  pub updated_at: i64,
  pub deleted_at: Option<i64>,
}

/// For inserting new exercises (without id and timestamps)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExercise {
  pub name: String,
  pub muscle_group: Option<String>,
  pub notes: Option<String>,
  pub is_custom: bool,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExercisePatch {
  pub name: Option<String>,
  pub muscle_group: Option<String>,
  pub notes: Option<String>,
}
