//! Handlers for `/mcq/questions` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/mcq/questions` | Filters `gradeId`, `subjectId`, `lessonId`, `topicId`, `subtopicId`, `tutorId`, `tuteId`; window `page`, `pageSize` |
//! | `POST`   | `/mcq/questions` | Body: [`NewQuestion`] |
//! | `GET`    | `/mcq/questions/{id}` | 404 if not found |
//! | `PUT`    | `/mcq/questions/{id}` | Replaces every field; 404 if not found |
//! | `DELETE` | `/mcq/questions/{id}` | 204, or 404 if not found |
//!
//! Filter and window parameters on the listing are permissive: malformed
//! values are ignored rather than rejected, and a repeated key keeps its
//! first value.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use edu_core::{
  filter::QuestionFilter,
  page::{Page, PageParams},
  question::{NewQuestion, Question},
  store::QuestionStore,
};

use crate::error::ApiError;

fn not_found(id: i64) -> ApiError { ApiError::NotFound(format!("question {id} not found")) }

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /mcq/questions[?gradeId=..&page=..]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(query): Query<Vec<(String, String)>>,
) -> Result<Json<Page<Question>>, ApiError>
where
  S: QuestionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let pairs = || query.iter().map(|(k, v)| (k.as_str(), v.as_str()));
  let filter = QuestionFilter::from_pairs(pairs());
  let paging = PageParams::from_pairs(pairs());
  let page = store
    .list_questions(filter, paging.lenient())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /mcq/questions/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Question>, ApiError>
where
  S: QuestionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let question = store
    .get_question(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(question))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /mcq/questions`
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewQuestion>,
) -> Result<impl IntoResponse, ApiError>
where
  S: QuestionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let question = store.create_question(body).await.map_err(ApiError::store)?;
  tracing::info!(id = question.id, "question created");
  Ok((StatusCode::CREATED, Json(question)))
}

/// `PUT /mcq/questions/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<NewQuestion>,
) -> Result<Json<Question>, ApiError>
where
  S: QuestionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let question = store
    .update_question(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(question))
}

/// `DELETE /mcq/questions/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: QuestionStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  if !store.delete_question(id).await.map_err(ApiError::store)? {
    return Err(not_found(id));
  }
  Ok(StatusCode::NO_CONTENT)
}
