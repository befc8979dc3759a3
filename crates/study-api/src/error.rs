//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Rendered as
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("{0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl From<study_content::Error> for ApiError {
  fn from(e: study_content::Error) -> Self {
    use study_content::Error as E;
    match e {
      E::Invalid(_) => ApiError::BadRequest(e.to_string()),
      E::NotFound { .. } => ApiError::NotFound(e.to_string()),
      E::Store(_) | E::Legacy(_) => ApiError::Store(Box::new(e)),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(_) | ApiError::Serialization(_) => {
        tracing::error!("request failed: {self}");
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "success": false, "error": self.to_string() })))
      .into_response()
  }
}
