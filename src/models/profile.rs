use serde::{Deserialize, Serialize};

use super::workout::WeightUnit;

/// The profile table holds exactly one row, keyed by this id.
pub const PROFILE_ID: &str = "profile";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Theme {
  Light,
  Dark,
}

/// Singleton user preference record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
  pub id: String,
  pub units_pref: Option<WeightUnit>,
  pub theme: Option<Theme>,
  pub created_at: i64,
  pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfilePatch {
  pub units_pref: Option<WeightUnit>,
  pub theme: Option<Theme>,
}
