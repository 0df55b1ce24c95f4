//! The singleton user preference record.

use crate::db::{now_ms, Store};
use crate::error::StoreError;
use crate::models::{OutboxOp, Profile, ProfilePatch, PROFILE_ID};
use crate::repo::outbox;

const TABLE: &str = "profile";

pub async fn get_profile(store: &Store) -> Result<Option<Profile>, StoreError> {
  let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profile WHERE id = ?1")
    .bind(PROFILE_ID)
    .fetch_optional(store.pool())
    .await?;

  Ok(profile)
}

/// Merge preferences into the singleton row, creating it on first write.
pub async fn upsert_profile(store: &Store, patch: ProfilePatch) -> Result<Profile, StoreError> {
  let now = now_ms();
  let profile = match get_profile(store).await? {
    Some(mut existing) => {
      if let Some(units_pref) = patch.units_pref {
        existing.units_pref = Some(units_pref);
      }
      if let Some(theme) = patch.theme {
        existing.theme = Some(theme);
      }
      existing.updated_at = now.max(existing.updated_at + 1);
      existing
    }
    None => Profile {
      id: PROFILE_ID.to_string(),
      units_pref: patch.units_pref,
      theme: patch.theme,
      created_at: now,
      updated_at: now,
    },
  };

  let mut tx = store.pool().begin().await?;
  sqlx::query(
    r#"
    INSERT INTO profile (id, units_pref, theme, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT(id) DO UPDATE SET
      units_pref = excluded.units_pref,
      theme = excluded.theme,
      updated_at = excluded.updated_at
    "#,
  )
  .bind(&profile.id)
  .bind(profile.units_pref)
  .bind(profile.theme)
  .bind(profile.created_at)
  .bind(profile.updated_at)
  .execute(&mut *tx)
  .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&profile)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(profile)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
