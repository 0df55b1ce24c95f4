//! Test utilities and helpers.
//!
//! Provides the in-memory store used by every persistence test plus mock
//! data factories for entities and remote catalog records.

use chrono::Utc;

use crate::catalog::CatalogExercise;
use crate::db::Store;
use crate::models::{NewExercise, NewSetEntry, NewWorkout, WeightUnit};
use crate::repo::exercises;

/// ---------------------------------------------------------------------------
/// Store Setup
/// ---------------------------------------------------------------------------

/// Create a migrated in-memory store.
pub async fn setup_test_db() -> Store {
  Store::open_in_memory("test-device")
    .await
    .expect("Failed to create in-memory store")
}

pub async fn teardown_test_db(store: Store) {
  store.close().await;
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn mock_new_exercise(name: &str) -> NewExercise {
  NewExercise {
    name: name.to_string(),
    muscle_group: None,
    notes: None,
    is_custom: true,
  }
}

pub fn mock_new_workout() -> NewWorkout {
  NewWorkout {
    date_utc: Utc::now(),
    timezone: "Europe/Berlin".to_string(),
    notes: None,
  }
}

pub fn mock_new_set(workout_id: &str, exercise_id: &str) -> NewSetEntry {
  NewSetEntry {
    workout_id: workout_id.to_string(),
    exercise_id: exercise_id.to_string(),
    reps: 8,
    weight: Some(60.0),
    unit: Some(WeightUnit::Kg),
    rpe: None,
    rest_seconds: Some(90),
  }
}

pub fn mock_catalog_exercise(name: &str, body_part: &str) -> CatalogExercise {
  CatalogExercise {
    id: "0001".to_string(),
    name: name.to_string(),
    body_part: body_part.to_string(),
    target: "pectorals".to_string(),
    equipment: "barbell".to_string(),
    secondary_muscles: vec!["triceps".to_string()],
    instructions: vec!["Set up under the bar.".to_string(), "Press.".to_string()],
  }
}

/// ---------------------------------------------------------------------------
/// Seeders
/// ---------------------------------------------------------------------------

/// Insert `count` custom exercises; returns their ids.
pub async fn seed_exercises(store: &Store, count: usize) -> Vec<String> {
  let mut ids = Vec::new();
  for i in 0..count {
    let exercise = exercises::create_exercise(store, mock_new_exercise(&format!("Exercise {}", i)))
      .await
      .expect("Failed to seed exercise");
    ids.push(exercise.id);
  }
  ids
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------
