//! Repository operations for workout sessions.

use chrono::{DateTime, Utc};

use crate::db::{new_id, now_ms, Store};
use crate::error::StoreError;
use crate::models::{NewWorkout, OutboxOp, Workout, WorkoutPatch};
use crate::repo::{outbox, Page, PageRequest, SortOrder};

const TABLE: &str = "workouts";

/// Listing filter: an optional closed `date_utc` range plus tombstone
/// visibility. Ordering is by `date_utc`, newest first by default.
#[derive(Debug, Clone, Default)]
pub struct WorkoutFilter {
  pub from: Option<DateTime<Utc>>,
  pub until: Option<DateTime<Utc>>,
  pub include_deleted: bool,
  pub order: SortOrder,
}

pub async fn create_workout(store: &Store, new: NewWorkout) -> Result<Workout, StoreError> {
  if new.timezone.trim().is_empty() {
    return Err(StoreError::Validation("workout timezone must not be empty".into()));
  }

  let now = now_ms();
  let workout = Workout {
    id: new_id(),
    date_utc: new.date_utc,
    timezone: new.timezone,
    notes: new.notes,
    created_at: now,
    updated_at: now,
    deleted_at: None,
  };

  let mut tx = store.pool().begin().await?;
  sqlx::query(
    r#"
    INSERT INTO workouts (id, date_utc, timezone, notes, created_at, updated_at, deleted_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
  )
  .bind(&workout.id)
  .bind(workout.date_utc)
  .bind(&workout.timezone)
  .bind(&workout.notes)
  .bind(workout.created_at)
  .bind(workout.updated_at)
  .bind(workout.deleted_at)
  .execute(&mut *tx)
  .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&workout)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(workout)
}

pub async fn update_workout(
  store: &Store,
  id: &str,
  patch: WorkoutPatch,
) -> Result<Workout, StoreError> {
  let mut workout = get_workout(store, id)
    .await?
    .ok_or_else(|| StoreError::not_found("Workout", id))?;

  if let Some(date_utc) = patch.date_utc {
    workout.date_utc = date_utc;
  }
  if let Some(timezone) = patch.timezone {
    if timezone.trim().is_empty() {
      return Err(StoreError::Validation("workout timezone must not be empty".into()));
    }
    workout.timezone = timezone;
  }
  if let Some(notes) = patch.notes {
    workout.notes = Some(notes);
  }
  workout.updated_at = now_ms().max(workout.updated_at + 1);

  let mut tx = store.pool().begin().await?;
  sqlx::query(
    "UPDATE workouts SET date_utc = ?1, timezone = ?2, notes = ?3, updated_at = ?4 WHERE id = ?5",
  )
  .bind(workout.date_utc)
  .bind(&workout.timezone)
  .bind(&workout.notes)
  .bind(workout.updated_at)
  .bind(id)
  .execute(&mut *tx)
  .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&workout)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(workout)
}

pub async fn soft_delete_workout(store: &Store, id: &str) -> Result<(), StoreError> {
  get_workout(store, id)
    .await?
    .ok_or_else(|| StoreError::not_found("Workout", id))?;

  let mut tx = store.pool().begin().await?;
  sqlx::query("UPDATE workouts SET deleted_at = ?1 WHERE id = ?2")
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

pub async fn get_workout(store: &Store, id: &str) -> Result<Option<Workout>, StoreError> {
  let workout = sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = ?1")
    .bind(id)
    .fetch_optional(store.pool())
    .await?;

  Ok(workout)
}

/// Chronological, paginated listing of sessions.
pub async fn list_workouts(
  store: &Store,
  filter: WorkoutFilter,
  page: PageRequest,
) -> Result<Page<Workout>, StoreError> {
  let mut sql = String::from("SELECT * FROM workouts WHERE 1=1");
  if !filter.include_deleted {
    sql.push_str(" AND deleted_at IS NULL");
  }
  if filter.from.is_some() {
    sql.push_str(" AND date_utc >= ?");
  }
  if filter.until.is_some() {
    sql.push_str(" AND date_utc <= ?");
  }
  sql.push_str(&format!(
    " ORDER BY date_utc {} LIMIT ? OFFSET ?",
    filter.order.as_sql()
  ));

  let mut query = sqlx::query_as::<_, Workout>(&sql);
  if let Some(from) = filter.from {
    query = query.bind(from);
  }
  if let Some(until) = filter.until {
    query = query.bind(until);
  }
  // One extra row decides has_more.
  query = query.bind(page.page_size as i64 + 1).bind(page.offset as i64);

  let rows = query.fetch_all(store.pool()).await?;
  Ok(Page::from_overfetch(rows, page.page_size))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;
  use crate::test_utils::{mock_new_workout, setup_test_db, teardown_test_db};

  fn workout_days_ago(days: i64) -> NewWorkout {
    NewWorkout {
      date_utc: Utc::now() - Duration::days(days),
      timezone: "Europe/Berlin".into(),
      notes: None,
    }
  }

  #[tokio::test]
  async fn test_create_then_get_roundtrips() {
    let store = setup_test_db().await;

    let created = create_workout(&store, mock_new_workout()).await.expect("create");
    let fetched = get_workout(&store, &created.id).await.expect("get").expect("present");

    assert_eq!(fetched, created);
    assert_eq!(fetched.created_at, fetched.updated_at);

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_create_rejects_empty_timezone() {
    let store = setup_test_db().await;

    let result = create_workout(
      &store,
      NewWorkout {
        date_utc: Utc::now(),
        timezone: "  ".into(),
        notes: None,
      },
    )
    .await;
    assert!(matches!(result, Err(StoreError::Validation(_))));

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_update_preserves_unpatched_fields() {
    let store = setup_test_db().await;

    let created = create_workout(
      &store,
      NewWorkout {
        date_utc: Utc::now(),
        timezone: "America/Chicago".into(),
        notes: Some("upper body".into()),
      },
    )
    .await
    .expect("create");

    let updated = update_workout(
      &store,
      &created.id,
      WorkoutPatch {
        notes: Some("upper body, short on time".into()),
        ..Default::default()
      },
    )
    .await
    .expect("update");

    assert_eq!(updated.timezone, "America/Chicago");
    assert_eq!(updated.date_utc, created.date_utc);
    assert!(updated.updated_at > created.updated_at);

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_list_newest_first_and_date_range() {
    let store = setup_test_db().await;

    let old = create_workout(&store, workout_days_ago(10)).await.expect("create");
    let recent = create_workout(&store, workout_days_ago(1)).await.expect("create");

    let page = list_workouts(&store, WorkoutFilter::default(), PageRequest::default())
      .await
      .expect("list");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, recent.id);
    assert!(!page.has_more);

    let ranged = list_workouts(
      &store,
      WorkoutFilter {
        from: Some(Utc::now() - Duration::days(5)),
        ..Default::default()
      },
      PageRequest::default(),
    )
    .await
    .expect("list ranged");
    assert_eq!(ranged.items.len(), 1);
    assert_eq!(ranged.items[0].id, recent.id);

    let _ = old;

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_pagination_reports_has_more() {
    let store = setup_test_db().await;

    for day in 0..5 {
      create_workout(&store, workout_days_ago(day)).await.expect("create");
    }

    let first = list_workouts(
      &store,
      WorkoutFilter::default(),
      PageRequest { offset: 0, page_size: 3 },
    )
    .await
    .expect("page 1");
    assert_eq!(first.items.len(), 3);
    assert!(first.has_more);

    let second = list_workouts(
      &store,
      WorkoutFilter::default(),
      PageRequest { offset: 3, page_size: 3 },
    )
    .await
    .expect("page 2");
    assert_eq!(second.items.len(), 2);
    assert!(!second.has_more);

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_soft_delete_excluded_by_default() {
    let store = setup_test_db().await;

    let created = create_workout(&store, mock_new_workout()).await.expect("create");
    soft_delete_workout(&store, &created.id).await.expect("soft delete");

    let page = list_workouts(&store, WorkoutFilter::default(), PageRequest::default())
      .await
      .expect("list");
    assert!(page.items.is_empty());

    let fetched = get_workout(&store, &created.id).await.expect("get").expect("present");
    assert!(fetched.deleted_at.is_some());

    teardown_test_db(store).await;
  }
}
