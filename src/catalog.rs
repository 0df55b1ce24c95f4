//! ExerciseDB catalog integration.
//!
//! A read-only HTTP collaborator offering body-part categories, the
//! exercises within a category, and exact-name-segment search. Every call
//! needs the caller-supplied RapidAPI credential; a missing or rejected
//! credential surfaces as its own error, never as an empty result.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

use crate::error::CatalogError;
use crate::models::NewExercise;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

const CATALOG_API_BASE: &str = "https://exercisedb.p.rapidapi.com";
const CATALOG_API_HOST: &str = "exercisedb.p.rapidapi.com";
const API_KEY_VAR: &str = "EXERCISEDB_API_KEY";

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CatalogConfig {
  pub api_key: String,
}

impl CatalogConfig {
  pub fn from_env() -> Result<Self, CatalogError> {
    // Pick up a developer .env if present.
    dotenvy::dotenv().ok();

    Ok(Self {
      api_key: env::var(API_KEY_VAR).map_err(|_| CatalogError::MissingConfig(API_KEY_VAR.into()))?,
    })
  }
}

/// ---------------------------------------------------------------------------
/// Catalog Records
/// ---------------------------------------------------------------------------

/// One exercise as the remote catalog describes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogExercise {
  pub id: String,
  pub name: String,
  pub body_part: String,
  #[serde(default)]
  pub target: String,
  #[serde(default)]
  pub equipment: String,
  #[serde(default)]
  pub secondary_muscles: Vec<String>,
  #[serde(default)]
  pub instructions: Vec<String>,
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

pub struct CatalogClient {
  client: Client,
  api_key: String,
  base_url: String,
}

impl CatalogClient {
  pub fn new(config: CatalogConfig) -> Self {
    Self {
      client: Client::new(),
      api_key: config.api_key,
      base_url: CATALOG_API_BASE.to_string(),
    }
  }

  /// Point the client at a different host, used by tests.
  pub fn with_base_url(config: CatalogConfig, base_url: impl Into<String>) -> Self {
    Self {
      client: Client::new(),
      api_key: config.api_key,
      base_url: base_url.into(),
    }
  }

  /// List the body-part categories the catalog knows about.
  pub async fn body_part_list(&self) -> Result<Vec<String>, CatalogError> {
    self.get_json("exercises/bodyPartList").await
  }

  /// List every exercise of one body-part category.
  pub async fn exercises_by_body_part(
    &self,
    body_part: &str,
  ) -> Result<Vec<CatalogExercise>, CatalogError> {
    self
      .get_json(&format!("exercises/bodyPart/{}", body_part))
      .await
  }

  /// Search exercises whose name contains the given segment.
  pub async fn search_by_name(&self, name: &str) -> Result<Vec<CatalogExercise>, CatalogError> {
    self.get_json(&format!("exercises/name/{}", name)).await
  }

  async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
    // Url::parse percent-encodes spaces in body-part names like "upper legs".
    let url = Url::parse(&format!("{}/{}", self.base_url, path))?;

    let response = self
      .client
      .get(url)
      .header("X-RapidAPI-Key", &self.api_key)
      .header("X-RapidAPI-Host", CATALOG_API_HOST)
      .send()
      .await?;

    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
      return Err(CatalogError::Unauthorized(status.as_u16()));
    }
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      return Err(CatalogError::Api {
        status: status.as_u16(),
        body,
      });
    }

    Ok(response.json().await?)
  }
}

/// ---------------------------------------------------------------------------
/// Mapping to the Local Schema
/// ---------------------------------------------------------------------------

/// Map a catalog record to a local exercise: remote name and body part carry
/// over, target/equipment/instructions are folded into a readable notes
/// block, and the record is marked as imported.
pub fn map_to_new_exercise(remote: &CatalogExercise) -> NewExercise {
  let mut notes = format!("Target: {}\nEquipment: {}", remote.target, remote.equipment);
  if !remote.instructions.is_empty() {
    notes.push('\n');
    notes.push_str(&remote.instructions.join("\n"));
  }

  NewExercise {
    name: remote.name.clone(),
    muscle_group: Some(remote.body_part.clone()),
    notes: Some(notes),
    is_custom: false,
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  fn test_client(server: &mockito::ServerGuard) -> CatalogClient {
    CatalogClient::with_base_url(
      CatalogConfig {
        api_key: "test-key".into(),
      },
      server.url(),
    )
  }

  #[test]
  #[serial]
  fn test_from_env_missing_key() {
    temp_env::with_var_unset(API_KEY_VAR, || {
      let result = CatalogConfig::from_env();
      assert!(matches!(result, Err(CatalogError::MissingConfig(_))));
    });
  }

  #[test]
  #[serial]
  fn test_from_env_reads_key() {
    temp_env::with_var(API_KEY_VAR, Some("abc123"), || {
      let config = CatalogConfig::from_env().expect("config");
      assert_eq!(config.api_key, "abc123");
    });
  }

  #[tokio::test]
  async fn test_body_part_list_success() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/exercises/bodyPartList")
      .match_header("X-RapidAPI-Key", "test-key")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"["back", "chest", "upper legs"]"#)
      .create_async()
      .await;

    let parts = test_client(&server).body_part_list().await.expect("list");
    assert_eq!(parts, vec!["back", "chest", "upper legs"]);

    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_exercises_by_body_part_parses_camel_case() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/exercises/bodyPart/chest")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"[{
          "id": "0025",
          "name": "barbell bench press",
          "bodyPart": "chest",
          "target": "pectorals",
          "equipment": "barbell",
          "secondaryMuscles": ["triceps", "shoulders"],
          "instructions": ["Lie on the bench.", "Press the bar up."]
        }]"#,
      )
      .create_async()
      .await;

    let exercises = test_client(&server)
      .exercises_by_body_part("chest")
      .await
      .expect("fetch");

    assert_eq!(exercises.len(), 1);
    assert_eq!(exercises[0].name, "barbell bench press");
    assert_eq!(exercises[0].body_part, "chest");
    assert_eq!(exercises[0].secondary_muscles, vec!["triceps", "shoulders"]);
  }

  #[tokio::test]
  async fn test_rejected_credential_is_distinguishable() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/exercises/bodyPartList")
      .with_status(401)
      .with_body(r#"{"message": "Invalid API key"}"#)
      .create_async()
      .await;

    let result = test_client(&server).body_part_list().await;
    assert!(matches!(result, Err(CatalogError::Unauthorized(401))));
  }

  #[tokio::test]
  async fn test_server_error_surfaces_status() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/exercises/name/row")
      .with_status(503)
      .with_body("try later")
      .create_async()
      .await;

    let result = test_client(&server).search_by_name("row").await;
    match result {
      Err(CatalogError::Api { status, body }) => {
        assert_eq!(status, 503);
        assert_eq!(body, "try later");
      }
      other => panic!("expected Api error, got {:?}", other.err()),
    }
  }

  #[test]
  fn test_mapping_contract() {
    let remote = CatalogExercise {
      id: "0025".into(),
      name: "barbell bench press".into(),
      body_part: "chest".into(),
      target: "pectorals".into(),
      equipment: "barbell".into(),
      secondary_muscles: vec![],
      instructions: vec!["Lie on the bench.".into(), "Press the bar up.".into()],
    };

    let local = map_to_new_exercise(&remote);
    assert_eq!(local.name, "barbell bench press");
    assert_eq!(local.muscle_group.as_deref(), Some("chest"));
    assert!(!local.is_custom);

    let notes = local.notes.expect("notes");
    assert_eq!(
      notes,
      "Target: pectorals\nEquipment: barbell\nLie on the bench.\nPress the bar up."
    );
  }
}
