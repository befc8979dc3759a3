//! Strong ETags for JSON read responses.
//!
//! The tag is the SHA-256 of the exact response body, so equal bodies always
//! carry equal tags and any content change yields a new one.

use axum::{
  body::Body,
  http::{HeaderMap, Response, StatusCode, header},
};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::ApiError;

/// Quoted hex SHA-256 of `body`.
pub fn compute_etag(body: &[u8]) -> String {
  let hash = Sha256::digest(body);
  format!("\"{}\"", hex::encode(hash))
}

/// Whether an `If-None-Match` header value names `etag`.
///
/// Handles `*`, comma-separated lists, and weak (`W/`) validators.
pub fn if_none_match_hits(header_value: &str, etag: &str) -> bool {
  header_value.split(',').map(str::trim).any(|candidate| {
    candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
  })
}

/// Serialise `value` as JSON with an `ETag`, or answer 304 when the client's
/// `If-None-Match` already names that tag.
pub fn json_with_etag<T: Serialize>(
  headers: &HeaderMap,
  value: &T,
) -> Result<Response<Body>, ApiError> {
  let body = serde_json::to_vec(value)?;
  let etag = compute_etag(&body);

  let not_modified = headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| if_none_match_hits(v, &etag));

  let response = if not_modified {
    Response::builder()
      .status(StatusCode::NOT_MODIFIED)
      .header(header::ETAG, &etag)
      .body(Body::empty())
  } else {
    Response::builder()
      .status(StatusCode::OK)
      .header(header::CONTENT_TYPE, "application/json")
      .header(header::ETAG, &etag)
      .body(Body::from(body))
  };
  response.map_err(|e| ApiError::Store(Box::new(e)))
}
