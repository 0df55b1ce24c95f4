use std::path::Path;

use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use uuid::Uuid;

use crate::error::StoreError;

/// A handle to the local persistent store.
///
/// Lifecycle: `open` (or `open_in_memory`) runs all pending migrations before
/// the handle is returned, so a `Store` you can hold is always at the current
/// schema version. `close` drains the pool. Every instance carries the
/// `client_id` stamped onto change-log entries, identifying the originating
/// device to a future sync engine.
pub struct Store {
  pool: SqlitePool,
  client_id: String,
}

impl Store {
  /// Open (creating if necessary) the database file at `path` and migrate it.
  pub async fn open(path: &Path, client_id: &str) -> Result<Self, StoreError> {
    let db_url = format!("sqlite://{}?mode=rwc", path.display());

    let pool = SqlitePoolOptions::new()
      .max_connections(5)
      .connect(&db_url)
      .await?;

    Self::from_pool(pool, client_id).await
  }

  /// Open an in-memory database, used by tests.
  ///
  /// Uses max_connections(1) to prevent multiple pool connections from
  /// creating isolated in-memory databases.
  pub async fn open_in_memory(client_id: &str) -> Result<Self, StoreError> {
    let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .connect("sqlite::memory:")
      .await?;

    Self::from_pool(pool, client_id).await
  }

  async fn from_pool(pool: SqlitePool, client_id: &str) -> Result<Self, StoreError> {
    let store = Self {
      pool,
      client_id: client_id.to_string(),
    };
    store.migrate().await?;

    log::debug!("store ready (client_id={})", store.client_id);
    Ok(store)
  }

  /// Bring the store to the latest schema version.
  ///
  /// Applies each pending version exactly once, in ascending order; a no-op
  /// on an already-current store. A failing step is fatal: the error must
  /// abort startup, not be retried.
  pub async fn migrate(&self) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    Ok(())
  }

  pub fn pool(&self) -> &SqlitePool {
    &self.pool
  }

  pub fn client_id(&self) -> &str {
    &self.client_id
  }

  pub async fn close(self) {
    self.pool.close().await;
  }
}

/// Generate a fresh entity id.
pub(crate) fn new_id() -> String {
  Uuid::new_v4().to_string()
}

/// Current wall-clock time in epoch milliseconds, the unit used by all
/// audit columns and change-log timestamps.
pub(crate) fn now_ms() -> i64 {
  Utc::now().timestamp_millis()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_open_in_memory_creates_schema() {
    let store = Store::open_in_memory("test-device").await.expect("open");

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table'
       AND name IN ('exercises', 'workouts', 'sets', 'templates', 'profile', 'outbox', 'workout_plans')",
    )
    .fetch_all(store.pool())
    .await
    .expect("query tables");

    assert_eq!(tables.len(), 7, "expected all 7 tables, got {}", tables.len());

    store.close().await;
  }

  #[tokio::test]
  async fn test_migrate_is_idempotent() {
    let store = Store::open_in_memory("test-device").await.expect("open");

    // Second run must be a no-op, leaving the schema identical.
    store.migrate().await.expect("second migrate");

    let before: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type IN ('table', 'index') ORDER BY name")
        .fetch_all(store.pool())
        .await
        .expect("schema listing");

    store.migrate().await.expect("third migrate");

    let after: Vec<(String,)> =
      sqlx::query_as("SELECT name FROM sqlite_master WHERE type IN ('table', 'index') ORDER BY name")
        .fetch_all(store.pool())
        .await
        .expect("schema listing");

    assert_eq!(before, after);

    store.close().await;
  }

  #[tokio::test]
  async fn test_exercise_name_index_exists() {
    // Version 3 adds the name lookup used by duplicate detection.
    let store = Store::open_in_memory("test-device").await.expect("open");

    let found: Option<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='index' AND name='idx_exercises_name'",
    )
    .fetch_optional(store.pool())
    .await
    .expect("query index");

    assert!(found.is_some());

    store.close().await;
  }

  #[test]
  fn test_new_ids_are_unique() {
    let a = new_id();
    let b = new_id();
    assert_ne!(a, b);
    assert_eq!(a.len(), 36);
  }
}
