//! Repository operations for performed sets.

use crate::db::{new_id, now_ms, Store};
use crate::error::StoreError;
use crate::models::{NewSetEntry, OutboxOp, SetEntry, SetEntryPatch};
use crate::repo::{outbox, Page, PageRequest, SortOrder};

const TABLE: &str = "sets";

/// Listing filter. Sets are usually read per workout, oldest first, so the
/// default order is ascending `created_at`.
#[derive(Debug, Clone)]
pub struct SetFilter {
  pub workout_id: Option<String>,
  pub exercise_id: Option<String>,
  pub include_deleted: bool,
  pub order: SortOrder,
}

impl Default for SetFilter {
  fn default() -> Self {
    Self {
      workout_id: None,
      exercise_id: None,
      include_deleted: false,
      order: SortOrder::Asc,
    }
  }
}

pub async fn create_set(store: &Store, new: NewSetEntry) -> Result<SetEntry, StoreError> {
  if new.reps <= 0 {
    return Err(StoreError::Validation("reps must be positive".into()));
  }
  if let Some(weight) = new.weight {
    if weight < 0.0 {
      return Err(StoreError::Validation("weight must be non-negative".into()));
    }
  }

  // Both parents must exist at creation time. Integrity is not maintained
  // afterward; a later-deleted exercise leaves a dangling reference.
  let workout_exists: Option<(String,)> = sqlx::query_as("SELECT id FROM workouts WHERE id = ?1")
    .bind(&new.workout_id)
    .fetch_optional(store.pool())
    .await?;
  if workout_exists.is_none() {
    return Err(StoreError::not_found("Workout", &new.workout_id));
  }
  let exercise_exists: Option<(String,)> = sqlx::query_as("SELECT id FROM exercises WHERE id = ?1")
    .bind(&new.exercise_id)
    .fetch_optional(store.pool())
    .await?;
  if exercise_exists.is_none() {
    return Err(StoreError::not_found("Exercise", &new.exercise_id));
  }

  let now = now_ms();
  let set = SetEntry {
    id: new_id(),
    workout_id: new.workout_id,
    exercise_id: new.exercise_id,
    reps: new.reps,
    weight: new.weight,
    unit: new.unit,
    rpe: new.rpe,
    rest_seconds: new.rest_seconds,
    created_at: now,
    updated_at: now,
    deleted_at: None,
  };

  let mut tx = store.pool().begin().await?;
  sqlx::query(
    r#"
    INSERT INTO sets (id, workout_id, exercise_id, reps, weight, unit, rpe, rest_seconds,
                      created_at, updated_at, deleted_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
    "#,
  )
  .bind(&set.id)
  .bind(&set.workout_id)
  .bind(&set.exercise_id)
  .bind(set.reps)
  .bind(set.weight)
  .bind(set.unit)
  .bind(set.rpe)
  .bind(set.rest_seconds)
  .bind(set.created_at)
  .bind(set.updated_at)
  .bind(set.deleted_at)
  .execute(&mut *tx)
  .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&set)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(set)
}

pub async fn update_set(
  store: &Store,
  id: &str,
  patch: SetEntryPatch,
) -> Result<SetEntry, StoreError> {
  let mut set = get_set(store, id)
    .await?
    .ok_or_else(|| StoreError::not_found("SetEntry", id))?;

  if let Some(reps) = patch.reps {
    if reps <= 0 {
      return Err(StoreError::Validation("reps must be positive".into()));
    }
    set.reps = reps;
  }
  if let Some(weight) = patch.weight {
    if weight < 0.0 {
      return Err(StoreError::Validation("weight must be non-negative".into()));
    }
    set.weight = Some(weight);
  }
  if let Some(unit) = patch.unit {
    set.unit = Some(unit);
  }
  if let Some(rpe) = patch.rpe {
    set.rpe = Some(rpe);
  }
  if let Some(rest_seconds) = patch.rest_seconds {
    set.rest_seconds = Some(rest_seconds);
  }
  set.updated_at = now_ms().max(set.updated_at + 1);

  let mut tx = store.pool().begin().await?;
  sqlx::query(
    r#"
    UPDATE sets SET reps = ?1, weight = ?2, unit = ?3, rpe = ?4, rest_seconds = ?5, updated_at = ?6
    WHERE id = ?7
    "#,
  )
  .bind(set.reps)
  .bind(set.weight)
  .bind(set.unit)
  .bind(set.rpe)
  .bind(set.rest_seconds)
  .bind(set.updated_at)
  .bind(id)
  .execute(&mut *tx)
  .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&set)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(set)
}

pub async fn soft_delete_set(store: &Store, id: &str) -> Result<(), StoreError> {
  get_set(store, id)
    .await?
    .ok_or_else(|| StoreError::not_found("SetEntry", id))?;

  let mut tx = store.pool().begin().await?;
  sqlx::query("UPDATE sets SET deleted_at = ?1 WHERE id = ?2")
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

pub async fn get_set(store: &Store, id: &str) -> Result<Option<SetEntry>, StoreError> {
  let set = sqlx::query_as::<_, SetEntry>("SELECT * FROM sets WHERE id = ?1")
    .bind(id)
    .fetch_optional(store.pool())
    .await?;

  Ok(set)
}

/// Paginated listing, typically all sets of one workout in logging order.
pub async fn list_sets(
  store: &Store,
  filter: SetFilter,
  page: PageRequest,
) -> Result<Page<SetEntry>, StoreError> {
  let mut sql = String::from("SELECT * FROM sets WHERE 1=1");
  if !filter.include_deleted {
    sql.push_str(" AND deleted_at IS NULL");
  }
  if filter.workout_id.is_some() {
    sql.push_str(" AND workout_id = ?");
  }
  if filter.exercise_id.is_some() {
    sql.push_str(" AND exercise_id = ?");
  }
  sql.push_str(&format!(
    " ORDER BY created_at {}, rowid {} LIMIT ? OFFSET ?",
    filter.order.as_sql(),
    filter.order.as_sql()
  ));

  let mut query = sqlx::query_as::<_, SetEntry>(&sql);
  if let Some(workout_id) = &filter.workout_id {
    query = query.bind(workout_id);
  }
  if let Some(exercise_id) = &filter.exercise_id {
    query = query.bind(exercise_id);
  }
  query = query.bind(page.page_size as i64 + 1).bind(page.offset as i64);

  let rows = query.fetch_all(store.pool()).await?;
  Ok(Page::from_overfetch(rows, page.page_size))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
