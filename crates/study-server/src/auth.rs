//! HTTP Basic authentication for the admin routes.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  Json,
  extract::{Request, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde_json::json;
use thiserror::Error;

/// The single admin account.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
  #[error("missing or malformed Authorization header")]
  Malformed,
  #[error("invalid credentials")]
  Rejected,
}

impl IntoResponse for AuthError {
  fn into_response(self) -> Response {
    tracing::warn!("admin request refused: {self}");
    let mut res = (
      StatusCode::UNAUTHORIZED,
      Json(json!({ "success": false, "error": "Unauthorized" })),
    )
      .into_response();
    res.headers_mut().insert(
      header::WWW_AUTHENTICATE,
      HeaderValue::from_static("Basic realm=\"study-admin\""),
    );
    res
  }
}

/// Check `Authorization: Basic …` against `config`.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), AuthError> {
  let encoded = headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Basic "))
    .ok_or(AuthError::Malformed)?;

  let decoded = B64.decode(encoded).map_err(|_| AuthError::Malformed)?;
  let creds = std::str::from_utf8(&decoded).map_err(|_| AuthError::Malformed)?;
  let (username, password) = creds.split_once(':').ok_or(AuthError::Malformed)?;

  if username != config.username {
    return Err(AuthError::Rejected);
  }

  let parsed_hash =
    PasswordHash::new(&config.password_hash).map_err(|_| AuthError::Rejected)?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| AuthError::Rejected)
}

/// Middleware guarding a router with [`verify_auth`].
pub async fn require_admin(
  State(auth): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Result<Response, AuthError> {
  verify_auth(req.headers(), &auth)?;
  Ok(next.run(req).await)
}
