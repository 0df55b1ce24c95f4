//! Import flow: copy the remote catalog into the local exercise library.
//!
//! Records are committed one at a time, so an import that dies partway
//! leaves everything already written intact. Nothing here retries; a re-run
//! is the caller's decision and the duplicate guard makes it harmless.

use serde::Serialize;

use crate::catalog::{map_to_new_exercise, CatalogClient, CatalogExercise};
use crate::db::Store;
use crate::error::{ImportError, StoreError};
use crate::models::Exercise;
use crate::repo::exercises;

/// Result of importing a single catalog record.
#[derive(Debug)]
pub enum ImportOutcome {
  Imported(Exercise),
  /// An exercise of the exact same name already exists; nothing was written.
  DuplicateSkipped,
}

/// End-of-import report across all categories.
#[derive(Debug, Default, Serialize)]
pub struct ImportSummary {
  pub imported: usize,
  pub skipped: usize,
  pub categories: usize,
  pub failed_categories: usize,
}

/// Import one catalog record, skipping exact-name duplicates.
pub async fn import_exercise(
  store: &Store,
  remote: &CatalogExercise,
) -> Result<ImportOutcome, StoreError> {
  if exercises::find_exercise_by_name(store, &remote.name)
    .await?
    .is_some()
  {
    return Ok(ImportOutcome::DuplicateSkipped);
  }

  let created = exercises::create_exercise(store, map_to_new_exercise(remote)).await?;
  Ok(ImportOutcome::Imported(created))
}

/// Import every exercise of one body-part category.
/// Returns `(imported, skipped)` counts.
pub async fn import_body_part(
  store: &Store,
  client: &CatalogClient,
  body_part: &str,
) -> Result<(usize, usize), ImportError> {
  let remote_exercises = client.exercises_by_body_part(body_part).await?;

  let mut imported = 0;
  let mut skipped = 0;
  for remote in &remote_exercises {
    match import_exercise(store, remote).await? {
      ImportOutcome::Imported(_) => imported += 1,
      ImportOutcome::DuplicateSkipped => skipped += 1,
    }
  }

  log::debug!(
    "imported body part {}: {} new, {} skipped",
    body_part,
    imported,
    skipped
  );
  Ok((imported, skipped))
}

/// Import the whole catalog, category by category.
///
/// A category list failure aborts the import. A remote failure inside one
/// category is counted in `failed_categories` and the rest continue; a local
/// store failure aborts.
pub async fn import_catalog(
  store: &Store,
  client: &CatalogClient,
) -> Result<ImportSummary, ImportError> {
  let body_parts = client.body_part_list().await?;

  let mut summary = ImportSummary {
    categories: body_parts.len(),
    ..Default::default()
  };

  for body_part in &body_parts {
    match import_body_part(store, client, body_part).await {
      Ok((imported, skipped)) => {
        summary.imported += imported;
        summary.skipped += skipped;
      }
      Err(ImportError::Catalog(e)) => {
        log::warn!("skipping body part {}: {}", body_part, e);
        summary.failed_categories += 1;
      }
      Err(e @ ImportError::Store(_)) => return Err(e),
    }
  }

  log::info!(
    "catalog import complete: {} new, {} skipped, {} of {} categories failed",
    summary.imported,
    summary.skipped,
    summary.failed_categories,
    summary.categories
  );
  Ok(summary)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
