//! Repository operations for the exercise library.

use crate::db::{new_id, now_ms, Store};
use crate::error::StoreError;
use crate::models::{Exercise, ExercisePatch, NewExercise, OutboxOp};
use crate::repo::{outbox, SortOrder};

const TABLE: &str = "exercises";

/// Listing filter. `muscle_group` matches case-insensitively; ordering is by
/// `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
  pub muscle_group: Option<String>,
  pub include_deleted: bool,
  pub order: SortOrder,
}

pub async fn create_exercise(store: &Store, new: NewExercise) -> Result<Exercise, StoreError> {
  let name = new.name.trim().to_string();
  if name.is_empty() {
    return Err(StoreError::Validation("exercise name must not be empty".into()));
  }
  let muscle_group = normalize_optional(new.muscle_group);

  let now = now_ms();
  let exercise = Exercise {
    id: new_id(),
    name,
    muscle_group,
    notes: new.notes,
    is_custom: new.is_custom,
    created_at: now,
    updated_at: now,
    deleted_at: None,
  };

  let mut tx = store.pool().begin().await?;
  sqlx::query(
    r#"
    INSERT INTO exercises (id, name, muscle_group, notes, is_custom, created_at, updated_at, deleted_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    "#,
  )
  .bind(&exercise.id)
  .bind(&exercise.name)
  .bind(&exercise.muscle_group)
  .bind(&exercise.notes)
  .bind(exercise.is_custom)
  .bind(exercise.created_at)
  .bind(exercise.updated_at)
  .bind(exercise.deleted_at)
  .execute(&mut *tx)
  .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&exercise)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(exercise)
}

pub async fn update_exercise(
  store: &Store,
  id: &str,
  patch: ExercisePatch,
) -> Result<Exercise, StoreError> {
  let mut exercise = get_exercise(store, id)
    .await?
    .ok_or_else(|| StoreError::not_found("Exercise", id))?;

  if let Some(name) = patch.name {
    let name = name.trim().to_string();
    if name.is_empty() {
      return Err(StoreError::Validation("exercise name must not be empty".into()));
    }
    exercise.name = name;
  }
  if let Some(muscle_group) = patch.muscle_group {
    // An empty string clears the field.
    exercise.muscle_group = normalize_optional(Some(muscle_group));
  }
  if let Some(notes) = patch.notes {
    exercise.notes = Some(notes);
  }
  // The clock may not have ticked since the last write.
  exercise.updated_at = now_ms().max(exercise.updated_at + 1);

  let mut tx = store.pool().begin().await?;
  sqlx::query(
    "UPDATE exercises SET name = ?1, muscle_group = ?2, notes = ?3, updated_at = ?4 WHERE id = ?5",
  )
  .bind(&exercise.name)
  .bind(&exercise.muscle_group)
  .bind(&exercise.notes)
  .bind(exercise.updated_at)
  .bind(id)
  .execute(&mut *tx)
  .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&exercise)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(exercise)
}

/// Tombstone an exercise. It disappears from default listings but stays
/// readable by id.
pub async fn soft_delete_exercise(store: &Store, id: &str) -> Result<(), StoreError> {
  get_exercise(store, id)
    .await?
    .ok_or_else(|| StoreError::not_found("Exercise", id))?;

  let mut tx = store.pool().begin().await?;
  sqlx::query("UPDATE exercises SET deleted_at = ?1 WHERE id = ?2")
    .bind(now_ms())
    .bind(id)
    .execute(&mut *tx)
    .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Delete,
    serde_json::json!({ "id": id }),
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(())
}

pub async fn get_exercise(store: &Store, id: &str) -> Result<Option<Exercise>, StoreError> {
  let exercise = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = ?1")
    .bind(id)
    .fetch_optional(store.pool())
    .await?;

  Ok(exercise)
}

pub async fn list_exercises(
  store: &Store,
  filter: ExerciseFilter,
) -> Result<Vec<Exercise>, StoreError> {
  let mut sql = String::from("SELECT * FROM exercises WHERE 1=1");
  if !filter.include_deleted {
    sql.push_str(" AND deleted_at IS NULL");
  }
  if filter.muscle_group.is_some() {
    sql.push_str(" AND LOWER(muscle_group) = LOWER(?1)");
  }
  sql.push_str(&format!(" ORDER BY updated_at {}", filter.order.as_sql()));

  let mut query = sqlx::query_as::<_, Exercise>(&sql);
  if let Some(muscle_group) = &filter.muscle_group {
    query = query.bind(muscle_group);
  }

  Ok(query.fetch_all(store.pool()).await?)
}

/// Exact-match lookup on the indexed name, used to guard duplicate imports.
/// Deliberately case-sensitive: "Squat" and "squat" are distinct entries.
pub async fn find_exercise_by_name(
  store: &Store,
  name: &str,
) -> Result<Option<Exercise>, StoreError> {
  let exercise = sqlx::query_as::<_, Exercise>(
    "SELECT * FROM exercises WHERE name = ?1 AND deleted_at IS NULL LIMIT 1",
  )
  .bind(name)
  .fetch_optional(store.pool())
  .await?;

  Ok(exercise)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
