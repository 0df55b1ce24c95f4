//! Error taxonomy for the store, the remote catalog, and the import flow.

/// ---------------------------------------------------------------------------
/// Store Errors
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// A required-field constraint was violated (empty name, zero reps, ...)
  #[error("Validation failed: {0}")]
  Validation(String),

  /// The operation targeted an id that does not exist
  #[error("{kind} not found: {id}")]
  NotFound { kind: &'static str, id: String },

  /// A schema migration step failed; the store must not be used
  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl StoreError {
  pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
    Self::NotFound {
      kind,
      id: id.to_string(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Remote Catalog Errors
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
  /// The caller-supplied credential is absent
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  /// The catalog could not be reached
  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Invalid catalog URL: {0}")]
  InvalidUrl(#[from] url::ParseError),

  /// The catalog rejected the credential
  #[error("Catalog rejected credential (HTTP {0})")]
  Unauthorized(u16),

  /// The catalog answered with a non-success status
  #[error("Catalog returned HTTP {status}: {body}")]
  Api { status: u16, body: String },
}

/// ---------------------------------------------------------------------------
/// Import Errors
/// ---------------------------------------------------------------------------

/// A whole-catalog import can fail on either side of the wire. Remote
/// failures inside a single category are caught and aggregated instead.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
  #[error(transparent)]
  Catalog(#[from] CatalogError),

  #[error(transparent)]
  Store(#[from] StoreError),
}
