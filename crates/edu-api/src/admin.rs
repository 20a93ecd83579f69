//! Menu-configuration admin handlers.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/admin/menu-config/{collection}` | `search`, scope ids, `page`, `pageSize` |
//! | `POST`   | `/admin/menu-config/{collection}` | 201; 400 on invalid body or missing parent |
//! | `GET`    | `/admin/menu-config/{collection}/{id}` | 404 if not found |
//! | `PUT`    | `/admin/menu-config/{collection}/{id}` | 404 if not found |
//! | `DELETE` | `/admin/menu-config/{collection}/{id}` | 204, or 404 if not found |
//! | `POST`   | `/admin/menu-config/grade-subjects` | Body `{gradeId, subjectId}`; 409 if linked |
//! | `DELETE` | `/admin/menu-config/grade-subjects` | 404 if not linked |
//! | `POST`   | `/admin/menu-config/grade-subject-lessons` | Body `{gradeId, subjectId, lessonId}` |
//! | `DELETE` | `/admin/menu-config/grade-subject-lessons` | 404 if not linked |
//! | `GET`    | `/admin/menu-config/catalog` | Every hierarchy row and link |
//!
//! `{collection}` is one of `grades`, `subjects`, `lessons`, `topics`,
//! `subtopics`, `tutors`, `years`, `tutorials`. Unlike the question listing,
//! a malformed `page` or `pageSize` is rejected here.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use edu_core::{
  catalog::{Catalog, CatalogQuery, Entity},
  filter::lenient_id,
  page::{Page, PageParams},
  store::{CatalogStore, EntityStore},
  validate,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Entities ─────────────────────────────────────────────────────────────────

/// Search and scope parameters of an admin listing. Scope ids that do not
/// apply to the listed entity are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListParams {
  pub search:     Option<String>,
  #[serde(deserialize_with = "lenient_id")]
  pub grade_id:   Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub subject_id: Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub lesson_id:  Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub topic_id:   Option<i64>,
}

/// `GET /admin/menu-config/{collection}`
pub async fn list<S, E>(
  State(store): State<Arc<S>>,
  Query(params): Query<ListParams>,
  Query(paging): Query<PageParams>,
) -> Result<Json<Page<E>>, ApiError>
where
  S: EntityStore<E>,
  S::Error: std::error::Error + Send + Sync + 'static,
  E: Entity,
{
  let query = CatalogQuery {
    search:     params.search,
    grade_id:   params.grade_id,
    subject_id: params.subject_id,
    lesson_id:  params.lesson_id,
    topic_id:   params.topic_id,
    page:       paging.strict()?,
  };
  Ok(Json(store.list_entities(query).await.map_err(ApiError::store)?))
}

/// `GET /admin/menu-config/{collection}/{id}`
pub async fn get_one<S, E>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<E>, ApiError>
where
  S: EntityStore<E>,
  S::Error: std::error::Error + Send + Sync + 'static,
  E: Entity,
{
  let entity = store
    .get_entity(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("{} {id} not found", E::KIND)))?;
  Ok(Json(entity))
}

/// `POST /admin/menu-config/{collection}`
pub async fn create<S, E>(
  State(store): State<Arc<S>>,
  Json(body): Json<E::Upsert>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore<E>,
  S::Error: std::error::Error + Send + Sync + 'static,
  E: Entity,
{
  let entity = store.create_entity(body).await.map_err(ApiError::store)?;
  tracing::info!(kind = %E::KIND, "catalog entity created");
  Ok((StatusCode::CREATED, Json(entity)))
}

/// `PUT /admin/menu-config/{collection}/{id}`
pub async fn update<S, E>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
  Json(body): Json<E::Upsert>,
) -> Result<Json<E>, ApiError>
where
  S: EntityStore<E>,
  S::Error: std::error::Error + Send + Sync + 'static,
  E: Entity,
{
  let entity = store
    .update_entity(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("{} {id} not found", E::KIND)))?;
  Ok(Json(entity))
}

/// `DELETE /admin/menu-config/{collection}/{id}`
pub async fn delete<S, E>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: EntityStore<E>,
  S::Error: std::error::Error + Send + Sync + 'static,
  E: Entity,
{
  if !store.delete_entity(id).await.map_err(ApiError::store)? {
    return Err(ApiError::NotFound(format!("{} {id} not found", E::KIND)));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Links ────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradeSubjectBody {
  #[serde(deserialize_with = "lenient_id")]
  pub grade_id:   Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub subject_id: Option<i64>,
}

impl GradeSubjectBody {
  fn ids(&self) -> Result<(i64, i64), ApiError> {
    let grade_id = self.grade_id.unwrap_or(0);
    let subject_id = self.subject_id.unwrap_or(0);
    validate::required_id("gradeId", grade_id)?;
    validate::required_id("subjectId", subject_id)?;
    Ok((grade_id, subject_id))
  }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GradeSubjectLessonBody {
  #[serde(deserialize_with = "lenient_id")]
  pub grade_id:   Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub subject_id: Option<i64>,
  #[serde(deserialize_with = "lenient_id")]
  pub lesson_id:  Option<i64>,
}

impl GradeSubjectLessonBody {
  fn ids(&self) -> Result<(i64, i64, i64), ApiError> {
    let (grade_id, subject_id) =
      GradeSubjectBody { grade_id: self.grade_id, subject_id: self.subject_id }.ids()?;
    let lesson_id = self.lesson_id.unwrap_or(0);
    validate::required_id("lessonId", lesson_id)?;
    Ok((grade_id, subject_id, lesson_id))
  }
}

/// `POST /admin/menu-config/grade-subjects`
pub async fn link_grade_subject<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<GradeSubjectBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (grade_id, subject_id) = body.ids()?;
  let link = store
    .link_grade_subject(grade_id, subject_id)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(link)))
}

/// `DELETE /admin/menu-config/grade-subjects`
pub async fn unlink_grade_subject<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<GradeSubjectBody>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (grade_id, subject_id) = body.ids()?;
  if !store
    .unlink_grade_subject(grade_id, subject_id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(ApiError::NotFound("grade-subject link not found".into()));
  }
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /admin/menu-config/grade-subject-lessons`
pub async fn link_grade_subject_lesson<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<GradeSubjectLessonBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (grade_id, subject_id, lesson_id) = body.ids()?;
  let link = store
    .link_grade_subject_lesson(grade_id, subject_id, lesson_id)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(link)))
}

/// `DELETE /admin/menu-config/grade-subject-lessons`
pub async fn unlink_grade_subject_lesson<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<GradeSubjectLessonBody>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let (grade_id, subject_id, lesson_id) = body.ids()?;
  if !store
    .unlink_grade_subject_lesson(grade_id, subject_id, lesson_id)
    .await
    .map_err(ApiError::store)?
  {
    return Err(ApiError::NotFound("grade-subject-lesson link not found".into()));
  }
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /admin/menu-config/catalog`
pub async fn catalog<S>(State(store): State<Arc<S>>) -> Result<Json<Catalog>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(store.catalog().await.map_err(ApiError::store)?))
}
