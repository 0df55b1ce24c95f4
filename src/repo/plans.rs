//! Repository operations for reusable workout plans.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::{new_id, now_ms, Store};
use crate::error::StoreError;
use crate::models::{NewWorkoutPlan, OutboxOp, WorkoutPlan, WorkoutPlanPatch};
use crate::repo::{outbox, SortOrder};

const TABLE: &str = "workout_plans";

pub async fn create_plan(store: &Store, new: NewWorkoutPlan) -> Result<WorkoutPlan, StoreError> {
  let name = new.name.trim().to_string();
  if name.is_empty() {
    return Err(StoreError::Validation("plan name must not be empty".into()));
  }
  let exercise_ids = dedup_preserving_order(new.exercise_ids);
  if exercise_ids.is_empty() {
    return Err(StoreError::Validation("plan needs at least one exercise".into()));
  }

  let now = now_ms();
  let plan = WorkoutPlan {
    id: new_id(),
    name,
    exercise_ids,
    notes: new.notes,
    created_at: now,
    updated_at: now,
  };

  let mut tx = store.pool().begin().await?;
  sqlx::query(
    r#"
    INSERT INTO workout_plans (id, name, exercise_ids_json, notes, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
  )
  .bind(&plan.id)
  .bind(&plan.name)
  .bind(serde_json::to_string(&plan.exercise_ids)?)
  .bind(&plan.notes)
  .bind(plan.created_at)
  .bind(plan.updated_at)
  .execute(&mut *tx)
  .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&plan)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(plan)
}

pub async fn update_plan(
  store: &Store,
  id: &str,
  patch: WorkoutPlanPatch,
) -> Result<WorkoutPlan, StoreError> {
  let mut plan = get_plan(store, id)
    .await?
    .ok_or_else(|| StoreError::not_found("WorkoutPlan", id))?;

  if let Some(name) = patch.name {
    let name = name.trim().to_string();
    if name.is_empty() {
      return Err(StoreError::Validation("plan name must not be empty".into()));
    }
    plan.name = name;
  }
  if let Some(exercise_ids) = patch.exercise_ids {
    let exercise_ids = dedup_preserving_order(exercise_ids);
    if exercise_ids.is_empty() {
      return Err(StoreError::Validation("plan needs at least one exercise".into()));
    }
    plan.exercise_ids = exercise_ids;
  }
  if let Some(notes) = patch.notes {
    plan.notes = Some(notes);
  }
  plan.updated_at = now_ms().max(plan.updated_at + 1);

  let mut tx = store.pool().begin().await?;
  sqlx::query(
    "UPDATE workout_plans SET name = ?1, exercise_ids_json = ?2, notes = ?3, updated_at = ?4 WHERE id = ?5",
  )
  .bind(&plan.name)
  .bind(serde_json::to_string(&plan.exercise_ids)?)
  .bind(&plan.notes)
  .bind(plan.updated_at)
  .bind(id)
  .execute(&mut *tx)
  .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&plan)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(plan)
}

/// Plans carry no tombstone; deletion removes the row outright.
pub async fn delete_plan(store: &Store, id: &str) -> Result<(), StoreError> {
  get_plan(store, id)
    .await?
    .ok_or_else(|| StoreError::not_found("WorkoutPlan", id))?;

  let mut tx = store.pool().begin().await?;
  sqlx::query("DELETE FROM workout_plans WHERE id = ?1")
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

pub async fn get_plan(store: &Store, id: &str) -> Result<Option<WorkoutPlan>, StoreError> {
  let row = sqlx::query("SELECT * FROM workout_plans WHERE id = ?1")
    .bind(id)
    .fetch_optional(store.pool())
    .await?;

  row.map(plan_from_row).transpose()
}

pub async fn list_plans(store: &Store, order: SortOrder) -> Result<Vec<WorkoutPlan>, StoreError> {
  let sql = format!("SELECT * FROM workout_plans ORDER BY updated_at {}", order.as_sql());
  let rows = sqlx::query(&sql).fetch_all(store.pool()).await?;

  rows.into_iter().map(plan_from_row).collect()
}

fn plan_from_row(row: SqliteRow) -> Result<WorkoutPlan, StoreError> {
  let exercise_ids_json: String = row.get("exercise_ids_json");
  let exercise_ids: Vec<String> = serde_json::from_str(&exercise_ids_json)?;

  Ok(WorkoutPlan {
    id: row.get("id"),
    name: row.get("name"),
    exercise_ids,
    notes: row.get("notes"),
    created_at: row.get("created_at"),
    updated_at: row.get("updated_at"),
  })
}

fn dedup_preserving_order(ids: Vec<String>) -> Vec<String> {
  let mut seen = std::collections::HashSet::new();
  ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
