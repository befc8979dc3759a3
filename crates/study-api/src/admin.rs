//! Content-editing handlers. Mounted behind authentication by the server.
//!
//! | Method | Path | Body / result |
//! |--------|------|---------------|
//! | `GET`    | `/categories`, `/chapters`, `/decks` | flat lists |
//! | `GET`    | `/stats` | row counts per table |
//! | `POST`   | `/flashcards` | [`NewFlashcard`] → `card_id` |
//! | `PUT`    | `/flashcards/{id}` | [`FlashcardEdit`] |
//! | `DELETE` | `/flashcards/{id}`, `/categories/{id}`, `/chapters/{id}`, `/decks/{id}` | cascades |
//! | `POST`   | `/quizzes` | [`NewQuiz`] → `quiz_id` |
//! | `PUT`    | `/quizzes/{id}` | [`QuizPatch`] |
//! | `DELETE` | `/quizzes/{id}` | |
//! | `POST`   | `/demos` | [`NewDemo`] → `demo_id` |
//! | `POST`   | `/migrate/{kind}` | `flashcards` or `quizzes` |

use std::str::FromStr;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::{Value, json};
use study_content::{
  ContentService, FlashcardEdit, MigrationReport, NewDemo, NewFlashcard,
  NewQuiz, QuizPatch,
};
use study_core::{
  content::{Category, Chapter, ContentKind, Deck, Entity},
  store::{ContentStore, StoreStats},
};

use crate::error::ApiError;

fn created(key: &str, id: String) -> impl IntoResponse {
  (StatusCode::CREATED, Json(json!({ "success": true, key: id })))
}

fn done() -> Json<Value> { Json(json!({ "success": true })) }

// ─── Catalog ─────────────────────────────────────────────────────────────────

pub async fn categories<S: ContentStore>(
  State(service): State<ContentService<S>>,
) -> Result<Json<Vec<Category>>, ApiError> {
  Ok(Json(service.categories().await?))
}

pub async fn chapters<S: ContentStore>(
  State(service): State<ContentService<S>>,
) -> Result<Json<Vec<Chapter>>, ApiError> {
  Ok(Json(service.chapters().await?))
}

pub async fn decks<S: ContentStore>(
  State(service): State<ContentService<S>>,
) -> Result<Json<Vec<Deck>>, ApiError> {
  Ok(Json(service.decks().await?))
}

pub async fn stats<S: ContentStore>(
  State(service): State<ContentService<S>>,
) -> Result<Json<StoreStats>, ApiError> {
  Ok(Json(service.stats().await?))
}

// ─── Flashcards ──────────────────────────────────────────────────────────────

/// `POST /flashcards`
pub async fn add_flashcard<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Json(body): Json<NewFlashcard>,
) -> Result<impl IntoResponse, ApiError> {
  let id = service.add_flashcard(body).await?;
  Ok(created("card_id", id))
}

/// `PUT /flashcards/{id}`
pub async fn update_flashcard<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Path(id): Path<String>,
  Json(body): Json<FlashcardEdit>,
) -> Result<Json<Value>, ApiError> {
  service.update_flashcard(&id, body).await?;
  Ok(Json(json!({ "success": true, "card_id": id })))
}

async fn delete_entity<S: ContentStore>(
  service: &ContentService<S>,
  entity: Entity,
  id: &str,
) -> Result<Json<Value>, ApiError> {
  service.delete(entity, id).await?;
  Ok(done())
}

pub async fn delete_flashcard<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
  delete_entity(&service, Entity::Flashcard, &id).await
}

pub async fn delete_category<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
  delete_entity(&service, Entity::Category, &id).await
}

pub async fn delete_chapter<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
  delete_entity(&service, Entity::Chapter, &id).await
}

pub async fn delete_deck<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
  delete_entity(&service, Entity::Deck, &id).await
}

// ─── Quizzes ─────────────────────────────────────────────────────────────────

/// `POST /quizzes`
pub async fn add_quiz<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Json(body): Json<NewQuiz>,
) -> Result<impl IntoResponse, ApiError> {
  let id = service.add_quiz(body).await?;
  Ok(created("quiz_id", id))
}

/// `PUT /quizzes/{id}`
pub async fn update_quiz<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Path(id): Path<String>,
  Json(body): Json<QuizPatch>,
) -> Result<Json<Value>, ApiError> {
  service.update_quiz(&id, body).await?;
  Ok(Json(json!({ "success": true, "quiz_id": id })))
}

pub async fn delete_quiz<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
  delete_entity(&service, Entity::Quiz, &id).await
}

// ─── Demos ───────────────────────────────────────────────────────────────────

/// `POST /demos`
pub async fn add_demo<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Json(body): Json<NewDemo>,
) -> Result<impl IntoResponse, ApiError> {
  let id = service.add_demo(body).await?;
  Ok(created("demo_id", id))
}

// ─── Migration ───────────────────────────────────────────────────────────────

/// `POST /migrate/{kind}`
pub async fn migrate<S: ContentStore>(
  State(service): State<ContentService<S>>,
  Path(kind): Path<String>,
) -> Result<Json<MigrationReport>, ApiError> {
  let kind = ContentKind::from_str(&kind)
    .map_err(|_| ApiError::BadRequest(format!("unknown content kind: {kind}")))?;
  Ok(Json(service.migrate(kind).await))
}
