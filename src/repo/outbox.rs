//! The change log (outbox): a durable, replayable record of every mutation.
//!
//! Entries are appended inside the same transaction as the entity write they
//! describe. No sync engine consumes the log yet; `list_outbox` and
//! `increment_retry` are the surface one would use.

use sqlx::SqliteConnection;

use crate::db::{new_id, now_ms, Store};
use crate::error::StoreError;
use crate::models::{OutboxItem, OutboxOp};

/// Append one change-log entry on the given (transaction) connection.
///
/// `payload` is the full entity snapshot for an upsert, or `{"id": …}` for a
/// delete. Called by every mutating repository operation; not public API.
pub(crate) async fn append(
  conn: &mut SqliteConnection,
  table: &str,
  op: OutboxOp,
  payload: serde_json::Value,
  client_id: &str,
) -> Result<(), StoreError> {
  sqlx::query(
    r#"
    INSERT INTO outbox (id, "table", op, payload, client_id, ts, retry_count)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)
    "#,
  )
  .bind(new_id())
  .bind(table)
  .bind(op)
  .bind(payload.to_string())
  .bind(client_id)
  .bind(now_ms())
  .execute(conn)
  .await?;

  Ok(())
}

/// Read change-log entries in apply order, oldest first.
pub async fn list_outbox(store: &Store, limit: Option<u32>) -> Result<Vec<OutboxItem>, StoreError> {
  // rowid breaks ties between entries appended within the same millisecond.
  let items = match limit {
    Some(n) => {
      sqlx::query_as::<_, OutboxItem>("SELECT * FROM outbox ORDER BY ts, rowid LIMIT ?1")
        .bind(n as i64)
        .fetch_all(store.pool())
        .await?
    }
    None => {
      sqlx::query_as::<_, OutboxItem>("SELECT * FROM outbox ORDER BY ts, rowid")
        .fetch_all(store.pool())
        .await?
    }
  };

  Ok(items)
}

/// Bump `retry_count` after a failed delivery attempt. The only mutation an
/// outbox entry ever sees.
pub async fn increment_retry(store: &Store, id: &str) -> Result<(), StoreError> {
  let result = sqlx::query("UPDATE outbox SET retry_count = retry_count + 1 WHERE id = ?1")
    .bind(id)
    .execute(store.pool())
    .await?;

  if result.rows_affected() == 0 {
    return Err(StoreError::not_found("OutboxItem", id));
  }

  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{ExercisePatch, NewSetEntry, NewWorkoutPlan};
  use crate::repo::{exercises, plans, sets, workouts};
  use crate::test_utils::{
    mock_new_exercise, mock_new_workout, setup_test_db, teardown_test_db,
  };

  #[tokio::test]
  async fn test_every_mutation_appends_exactly_one_entry() {
    let store = setup_test_db().await;

    let exercise = exercises::create_exercise(&store, mock_new_exercise("Squat"))
      .await
      .expect("create exercise");
    let workout = workouts::create_workout(&store, mock_new_workout())
      .await
      .expect("create workout");
    let set = sets::create_set(
      &store,
      NewSetEntry {
        workout_id: workout.id.clone(),
        exercise_id: exercise.id.clone(),
        reps: 5,
        weight: Some(100.0),
        unit: None,
        rpe: None,
        rest_seconds: None,
      },
    )
    .await
    .expect("create set");
    let plan = plans::create_plan(
      &store,
      NewWorkoutPlan {
        name: "Leg Day".into(),
        exercise_ids: vec![exercise.id.clone()],
        notes: None,
      },
    )
    .await
    .expect("create plan");

    exercises::update_exercise(
      &store,
      &exercise.id,
      ExercisePatch {
        notes: Some("pause at the bottom".into()),
        ..Default::default()
      },
    )
    .await
    .expect("update exercise");

    sets::soft_delete_set(&store, &set.id).await.expect("soft delete set");
    plans::delete_plan(&store, &plan.id).await.expect("delete plan");

    let log = list_outbox(&store, None).await.expect("list outbox");
    assert_eq!(log.len(), 7, "one entry per mutation, got {}", log.len());

    let expected: Vec<(&str, OutboxOp)> = vec![
      ("exercises", OutboxOp::Upsert),
      ("workouts", OutboxOp::Upsert),
      ("sets", OutboxOp::Upsert),
      ("workout_plans", OutboxOp::Upsert),
      ("exercises", OutboxOp::Upsert),
      ("sets", OutboxOp::Delete),
      ("workout_plans", OutboxOp::Delete),
    ];
    let actual: Vec<(String, OutboxOp)> =
      log.iter().map(|e| (e.table.clone(), e.op)).collect();
    assert_eq!(
      actual,
      expected
        .into_iter()
        .map(|(t, op)| (t.to_string(), op))
        .collect::<Vec<_>>()
    );

    // Every entry carries the originating device id.
    assert!(log.iter().all(|e| e.client_id == store.client_id()));

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_delete_payload_is_id_only() {
    let store = setup_test_db().await;

    let exercise = exercises::create_exercise(&store, mock_new_exercise("Deadlift"))
      .await
      .expect("create");
    exercises::soft_delete_exercise(&store, &exercise.id)
      .await
      .expect("soft delete");

    let log = list_outbox(&store, None).await.expect("list");
    let delete_entry = log.iter().find(|e| e.op == OutboxOp::Delete).expect("delete entry");

    let payload: serde_json::Value =
      serde_json::from_str(&delete_entry.payload).expect("parse payload");
    assert_eq!(payload, serde_json::json!({ "id": exercise.id }));

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_upsert_payload_is_full_snapshot() {
    let store = setup_test_db().await;

    let exercise = exercises::create_exercise(&store, mock_new_exercise("Bench Press"))
      .await
      .expect("create");

    let log = list_outbox(&store, None).await.expect("list");
    let snapshot: serde_json::Value =
      serde_json::from_str(&log[0].payload).expect("parse payload");

    assert_eq!(snapshot["id"], serde_json::json!(exercise.id));
    assert_eq!(snapshot["name"], serde_json::json!("Bench Press"));
    assert_eq!(snapshot["is_custom"], serde_json::json!(true));

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_increment_retry() {
    let store = setup_test_db().await;

    exercises::create_exercise(&store, mock_new_exercise("Row"))
      .await
      .expect("create");

    let log = list_outbox(&store, None).await.expect("list");
    assert_eq!(log[0].retry_count, 0);

    increment_retry(&store, &log[0].id).await.expect("bump retry");

    let log = list_outbox(&store, None).await.expect("list");
    assert_eq!(log[0].retry_count, 1);

    // Other fields are untouched.
    assert_eq!(log[0].op, OutboxOp::Upsert);
    assert_eq!(log[0].table, "exercises");

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_increment_retry_unknown_id() {
    let store = setup_test_db().await;

    let result = increment_retry(&store, "no-such-id").await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));

    teardown_test_db(store).await;
  }

  #[tokio::test]
  async fn test_list_outbox_honors_limit() {
    let store = setup_test_db().await;

    for i in 0..5 {
      exercises::create_exercise(&store, mock_new_exercise(&format!("Exercise {}", i)))
        .await
        .expect("create");
    }

    let limited = list_outbox(&store, Some(3)).await.expect("list");
    assert_eq!(limited.len(), 3);

    teardown_test_db(store).await;
  }
}
