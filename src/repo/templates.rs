//! Repository operations for target-oriented templates.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::{new_id, now_ms, Store};
use crate::error::StoreError;
use crate::models::{NewTemplate, OutboxOp, Template, TemplateItem, TemplatePatch};
use crate::repo::{outbox, SortOrder};

const TABLE: &str = "templates";

pub async fn create_template(store: &Store, new: NewTemplate) -> Result<Template, StoreError> {
  let name = new.name.trim().to_string();
  if name.is_empty() {
    return Err(StoreError::Validation("template name must not be empty".into()));
  }
  validate_items(&new.items)?;

  let now = now_ms();
  let template = Template {
    id: new_id(),
    name,
    items: new.items,
    created_at: now,
    updated_at: now,
  };

  let mut tx = store.pool().begin().await?;
  sqlx::query(
    r#"
    INSERT INTO templates (id, name, items_json, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(&template.id)
  .bind(&template.name)
  .bind(serde_json::to_string(&template.items)?)
  .bind(template.created_at)
  .bind(template.updated_at)
  .execute(&mut *tx)
  .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&template)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(template)
}

pub async fn update_template(
  store: &Store,
  id: &str,
  patch: TemplatePatch,
) -> Result<Template, StoreError> {
  let mut template = get_template(store, id)
    .await?
    .ok_or_else(|| StoreError::not_found("Template", id))?;

  if let Some(name) = patch.name {
    let name = name.trim().to_string();
    if name.is_empty() {
      return Err(StoreError::Validation("template name must not be empty".into()));
    }
    template.name = name;
  }
  if let Some(items) = patch.items {
    validate_items(&items)?;
    template.items = items;
  }
  template.updated_at = now_ms().max(template.updated_at + 1);

  let mut tx = store.pool().begin().await?;
  sqlx::query("UPDATE templates SET name = ?1, items_json = ?2, updated_at = ?3 WHERE id = ?4")
    .bind(&template.name)
    .bind(serde_json::to_string(&template.items)?)
    .bind(template.updated_at)
    .bind(id)
    .execute(&mut *tx)
    .await?;
  outbox::append(
    &mut tx,
    TABLE,
    OutboxOp::Upsert,
    serde_json::to_value(&template)?,
    store.client_id(),
  )
  .await?;
  tx.commit().await?;

  Ok(template)
}

/// Templates carry no tombstone; deletion removes the row outright.
pub async fn delete_template(store: &Store, id: &str) -> Result<(), StoreError> {
  get_template(store, id)
    .await?
    .ok_or_else(|| StoreError::not_found("Template", id))?;

  let mut tx = store.pool().begin().await?;
  sqlx::query("DELETE FROM templates WHERE id = ?1")
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

pub async fn get_template(store: &Store, id: &str) -> Result<Option<Template>, StoreError> {
  let row = sqlx::query("SELECT * FROM templates WHERE id = ?1")
    .bind(id)
    .fetch_optional(store.pool())
    .await?;

  row.map(template_from_row).transpose()
}

pub async fn list_templates(store: &Store, order: SortOrder) -> Result<Vec<Template>, StoreError> {
  let sql = format!("SELECT * FROM templates ORDER BY updated_at {}", order.as_sql());
  let rows = sqlx::query(&sql).fetch_all(store.pool()).await?;

  rows.into_iter().map(template_from_row).collect()
}

fn template_from_row(row: SqliteRow) -> Result<Template, StoreError> {
  let items_json: String = row.get("items_json");
  let items: Vec<TemplateItem> = serde_json::from_str(&items_json)?;

  Ok(Template {
    id: row.get("id"),
    name: row.get("name"),
    items,
    created_at: row.get("created_at"),
    updated_at: row.get("updated_at"),
  })
}

fn validate_items(items: &[TemplateItem]) -> Result<(), StoreError> {
  for item in items {
    if item.target_sets.is_some_and(|s| s <= 0) {
      return Err(StoreError::Validation("target_sets must be positive".into()));
    }
    if item.target_reps.is_some_and(|r| r <= 0) {
      return Err(StoreError::Validation("target_reps must be positive".into()));
    }
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
