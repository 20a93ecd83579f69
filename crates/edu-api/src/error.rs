//! API error type and [`axum::response::IntoResponse`] implementation.

use std::error::Error as StdError;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn StdError + Send + Sync>),
}

impl ApiError {
  /// Classify a store failure.
  ///
  /// Backends wrap domain failures in their own error types, so the
  /// `source()` chain is searched for an [`edu_core::Error`]. Anything else
  /// is an internal failure.
  pub fn store<E>(err: E) -> Self
  where
    E: StdError + Send + Sync + 'static,
  {
    let mut cause: Option<&(dyn StdError + 'static)> = Some(&err);
    while let Some(e) = cause {
      if let Some(domain) = e.downcast_ref::<edu_core::Error>() {
        return Self::from_domain(domain);
      }
      cause = e.source();
    }
    Self::Store(Box::new(err))
  }

  fn from_domain(err: &edu_core::Error) -> Self {
    use edu_core::Error as D;
    let message = err.to_string();
    match err {
      D::Invalid(_) | D::ParentNotFound(_) => Self::BadRequest(message),
      D::NotFound(_) => Self::NotFound(message),
      D::AlreadyLinked(_) => Self::Conflict(message),
    }
  }
}

impl From<edu_core::Error> for ApiError {
  fn from(err: edu_core::Error) -> Self { Self::store(err) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
