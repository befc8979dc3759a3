//! HTTP server wiring for the study content service.
//!
//! Mounts the public API under `/api` and the admin API under `/admin/api`
//! behind Basic authentication, with request tracing on both.

pub mod auth;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware};
use serde::Deserialize;
use study_content::ContentService;
use study_core::store::ContentStore;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_admin};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and `STUDY_*`
/// environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  #[serde(default = "default_database_path")]
  pub database_path:       PathBuf,
  /// Directory holding the legacy JSON files.
  #[serde(default = "default_data_dir")]
  pub data_dir:            PathBuf,
  #[serde(default = "default_admin_username")]
  pub admin_username:      String,
  #[serde(default)]
  pub admin_password_hash: String,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 5000 }

fn default_database_path() -> PathBuf { PathBuf::from("study.sqlite") }

fn default_data_dir() -> PathBuf { PathBuf::from("static/data") }

fn default_admin_username() -> String { "admin".into() }

// ─── Application state ───────────────────────────────────────────────────────

pub struct AppState<S> {
  pub service: ContentService<S>,
  pub auth:    Arc<AuthConfig>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { service: self.service.clone(), auth: self.auth.clone() }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

pub fn router<S>(state: AppState<S>) -> Router
where
  S: ContentStore + 'static,
{
  let admin = study_api::admin_router(state.service.clone())
    .layer(middleware::from_fn_with_state(state.auth.clone(), require_admin));

  Router::new()
    .nest("/api", study_api::api_router(state.service))
    .nest("/admin/api", admin)
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
  use rand_core::OsRng;
  use study_legacy::FlatFileStore;
  use study_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn make_state(password: &str) -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let dir = std::env::temp_dir().join(format!("study-server-{}", uuid::Uuid::new_v4()));
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AppState {
      service: ContentService::new(Arc::new(store), Arc::new(FlatFileStore::new(dir))),
      auth:    Arc::new(AuthConfig { username: "admin".into(), password_hash: hash }),
    }
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  async fn request(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    auth: Option<&str>,
  ) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    router(state.clone())
      .oneshot(builder.body(Body::empty()).unwrap())
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn public_routes_need_no_credentials() {
    let state = make_state("secret").await;
    let resp = request(&state, "GET", "/api/quizzes", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(header::ETAG));
  }

  #[tokio::test]
  async fn admin_routes_require_credentials() {
    let state = make_state("secret").await;

    let resp = request(&state, "GET", "/admin/api/stats", None).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));

    let wrong = basic("admin", "guess");
    let resp = request(&state, "GET", "/admin/api/stats", Some(&wrong)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let right = basic("admin", "secret");
    let resp = request(&state, "GET", "/admin/api/stats", Some(&right)).await;
    assert_eq!(resp.status(), StatusCode::OK);
  }

  #[tokio::test]
  async fn writes_are_not_exposed_publicly() {
    let state = make_state("secret").await;
    let resp = request(&state, "POST", "/api/migrate/quizzes", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let resp = request(&state, "DELETE", "/api/quizzes/q1", None).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  }

  #[test]
  fn config_defaults_and_overrides() {
    let cfg: ServerConfig = config::Config::builder()
      .set_override("port", 8080)
      .unwrap()
      .set_override("admin_password_hash", "$argon2id$stub")
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.data_dir, PathBuf::from("static/data"));
    assert_eq!(cfg.admin_username, "admin");
  }
}
