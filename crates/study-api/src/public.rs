//! Read-only handlers for the study site.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/flashcards` | `?category`, `?chapter`, `?difficulty` |
//! | `GET`  | `/quizzes` | `?category`, `?difficulty` |
//! | `GET`  | `/quizzes/{id}` | 404 `{"error":"Quiz not found"}` |
//! | `GET`  | `/demos` | `?category` |
//!
//! Every 200 carries an `ETag`; a matching `If-None-Match` gets a 304.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use study_content::ContentService;
use study_core::{
  store::ContentStore,
  tree::{FlashcardFilter, QuizFilter},
};

use crate::{error::ApiError, etag::json_with_etag};

/// `GET /flashcards`
pub async fn flashcards<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Query(filter): Query<FlashcardFilter>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let listing = service.resolve_flashcards(&filter).await;
  json_with_etag(&headers, &listing)
}

/// `GET /quizzes`
pub async fn quizzes<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Query(filter): Query<QuizFilter>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let listing = service.resolve_quizzes(&filter).await;
  json_with_etag(&headers, &listing)
}

/// `GET /quizzes/{id}`
pub async fn quiz<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Path(id): Path<String>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  match service.get_quiz(&id).await? {
    Some(quiz) => json_with_etag(&headers, &quiz),
    None => Ok(
      (StatusCode::NOT_FOUND, Json(json!({ "error": "Quiz not found" })))
        .into_response(),
    ),
  }
}

#[derive(Debug, Default, Deserialize)]
pub struct DemoParams {
  pub category: Option<String>,
}

/// `GET /demos`
pub async fn demos<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Query(params): Query<DemoParams>,
  headers: HeaderMap,
) -> Result<Response, ApiError> {
  let category = params.category.as_deref().filter(|c| !c.is_empty());
  json_with_etag(&headers, &service.list_demos(category))
}
