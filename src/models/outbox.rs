use serde::{Deserialize, Serialize};

/// Mutation kind recorded in the change log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum OutboxOp {
  Upsert,
  Delete,
}

impl std::fmt::Display for OutboxOp {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Upsert => write!(f, "upsert"),
      Self::Delete => write!(f, "delete"),
    }
  }
}

/// One durable record of a mutation, kept for future sync propagation.
///
/// `payload` is the full entity snapshot as JSON for an upsert, or
/// `{"id": "..."}` for a delete. Entries are append-only; only `retry_count`
/// may be bumped afterward, by a sync engine that does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OutboxItem {
  pub id: String,
  pub table: String,
  pub op: OutboxOp,
  pub payload: String,
  pub client_id: String,
  pub ts: i64,
  pub retry_count: i64,
}
