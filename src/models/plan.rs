use serde::{Deserialize, Serialize};

/// ---------------------------------------------------------------------------
/// Workout Plan
/// ---------------------------------------------------------------------------

/// A named, reusable ordered list of exercises.
///
/// `exercise_ids` is stored as a JSON array; referenced exercises may be
/// deleted later and display then falls back to "Unknown". Plans are
/// hard-deleted, not tombstoned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
  pub id: String,
  pub name: String,
  pub exercise_ids: Vec<String>,
  pub notes: Option<String>,
  pub created_at: i64,
  pub updated_at: i64,
}

/// For inserting new plans (without id and timestamps)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkoutPlan {
  pub name: String,
  pub exercise_ids: Vec<String>,
  pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutPlanPatch {
  pub name: Option<String>,
  pub exercise_ids: Option<Vec<String>>,
  pub notes: Option<String>,
}

/// ---------------------------------------------------------------------------
/// Template
/// ---------------------------------------------------------------------------

/// One entry of a template: an exercise with optional set/rep goals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateItem {
  pub exercise_id: String,
  pub target_sets: Option<i64>,
  pub target_reps: Option<i64>,
}

/// A named target-oriented exercise list. Same referential looseness as
/// `WorkoutPlan`; hard-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
  pub id: String,
  pub name: String,
  pub items: Vec<TemplateItem>,
  pub created_at: i64,
  pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTemplate {
  pub name: String,
  pub items: Vec<TemplateItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplatePatch {
  pub name: Option<String>,
  pub items: Option<Vec<TemplateItem>>,
}
