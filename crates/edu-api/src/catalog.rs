//! Public catalog reads.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/grades` | All grades |
//! | `GET`  | `/subjects?gradeId=` | Subjects of a grade |
//! | `GET`  | `/lessons?subject=` | Lessons of a subject |
//! | `GET`  | `/tutor/topics?lessonId=` | Topics with subtopics, plus the default smart note (or `null`) |
//! | `GET`  | `/note/smartnote?gradeId=&subjectId=&lessonId=` | Optional `topicId`, `subtopicId`; 404 if none |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use edu_core::{
  catalog::{Grade, Lesson, LessonTopics, SmartNote, SmartNoteQuery, Subject},
  filter::parse_id,
  store::CatalogStore,
};
use serde::Deserialize;

use crate::error::ApiError;

/// A required id query parameter.
fn required(name: &str, raw: Option<&str>) -> Result<i64, ApiError> {
  match raw.map(str::trim) {
    None | Some("") => Err(ApiError::BadRequest(format!("{name} is required"))),
    Some(s) => parse_id(s).ok_or_else(|| ApiError::BadRequest(format!("invalid {name}"))),
  }
}

/// An optional id query parameter: blank means absent, anything else must be
/// a valid id.
fn optional(name: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
  match raw.map(str::trim) {
    None | Some("") => Ok(None),
    Some(_) => required(name, raw).map(Some),
  }
}

/// `GET /grades`
pub async fn grades<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Grade>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Ok(Json(store.list_grades().await.map_err(ApiError::store)?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectsParams {
  pub grade_id: Option<String>,
}

/// `GET /subjects?gradeId=<id>`
pub async fn subjects<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SubjectsParams>,
) -> Result<Json<Vec<Subject>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let grade_id = required("gradeId", params.grade_id.as_deref())?;
  Ok(Json(store.subjects_for_grade(grade_id).await.map_err(ApiError::store)?))
}

#[derive(Debug, Default, Deserialize)]
pub struct LessonsParams {
  pub subject: Option<String>,
}

/// `GET /lessons?subject=<id>`
pub async fn lessons<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<LessonsParams>,
) -> Result<Json<Vec<Lesson>>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let subject_id = required("subject", params.subject.as_deref())?;
  Ok(Json(store.lessons_for_subject(subject_id).await.map_err(ApiError::store)?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicsParams {
  pub lesson_id: Option<String>,
}

/// `GET /tutor/topics?lessonId=<id>`
pub async fn topics<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<TopicsParams>,
) -> Result<Json<LessonTopics>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let lesson_id = required("lessonId", params.lesson_id.as_deref())?;
  Ok(Json(store.topics_for_lesson(lesson_id).await.map_err(ApiError::store)?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartNoteParams {
  pub grade_id:    Option<String>,
  pub subject_id:  Option<String>,
  pub lesson_id:   Option<String>,
  pub topic_id:    Option<String>,
  pub subtopic_id: Option<String>,
}

/// `GET /note/smartnote?gradeId=&subjectId=&lessonId=[&topicId=][&subtopicId=]`
pub async fn smart_note<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<SmartNoteParams>,
) -> Result<Json<SmartNote>, ApiError>
where
  S: CatalogStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let query = SmartNoteQuery {
    grade_id:    required("gradeId", params.grade_id.as_deref())?,
    subject_id:  required("subjectId", params.subject_id.as_deref())?,
    lesson_id:   required("lessonId", params.lesson_id.as_deref())?,
    topic_id:    optional("topicId", params.topic_id.as_deref())?,
    subtopic_id: optional("subtopicId", params.subtopic_id.as_deref())?,
  };
  let note = store
    .find_smart_note(query)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("smart note not found".into()))?;
  Ok(Json(note))
}
