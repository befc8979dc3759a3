//! JSON HTTP API for the study content service.
//!
//! Two axum routers backed by a [`ContentService`]: a read-only one for the
//! public site and an admin one for editing. Authentication, tracing and
//! transport are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! Router::new()
//!   .nest("/api", study_api::api_router(service.clone()))
//!   .nest("/admin/api", study_api::admin_router(service).layer(auth))
//! ```

pub mod admin;
pub mod error;
pub mod etag;
pub mod public;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use study_content::ContentService;
use study_core::store::ContentStore;

pub use error::ApiError;

/// The public read-only router.
pub fn api_router<S>(service: ContentService<S>) -> Router<()>
where
  S: ContentStore + 'static,
{
  Router::new()
    .route("/flashcards", get(public::flashcards::<S>))
    .route("/quizzes", get(public::quizzes::<S>))
    .route("/quizzes/{id}", get(public::quiz::<S>))
    .route("/demos", get(public::demos::<S>))
    .with_state(service)
}

/// The admin router. Every write lives here.
pub fn admin_router<S>(service: ContentService<S>) -> Router<()>
where
  S: ContentStore + 'static,
{
  Router::new()
    // Catalog
    .route("/categories", get(admin::categories::<S>))
    .route("/categories/{id}", delete(admin::delete_category::<S>))
    .route("/chapters", get(admin::chapters::<S>))
    .route("/chapters/{id}", delete(admin::delete_chapter::<S>))
    .route("/decks", get(admin::decks::<S>))
    .route("/decks/{id}", delete(admin::delete_deck::<S>))
    .route("/stats", get(admin::stats::<S>))
    // Flashcards
    .route("/flashcards", post(admin::add_flashcard::<S>))
    .route(
      "/flashcards/{id}",
      put(admin::update_flashcard::<S>).delete(admin::delete_flashcard::<S>),
    )
    // Quizzes
    .route("/quizzes", post(admin::add_quiz::<S>))
    .route(
      "/quizzes/{id}",
      put(admin::update_quiz::<S>).delete(admin::delete_quiz::<S>),
    )
    // Demos and migration
    .route("/demos", post(admin::add_demo::<S>))
    .route("/migrate/{kind}", post(admin::migrate::<S>))
    .with_state(service)
}
