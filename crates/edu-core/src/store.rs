//! Storage traits.
//!
//! Implemented by storage backends (e.g. `edu-store-sqlite`). The API layer
//! is generic over these traits and never names a concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use crate::{
  catalog::{
    Catalog, Entity, Grade, GradeSubject, GradeSubjectLesson, Lesson,
    LessonTopics, NewSmartNote, SmartNote, SmartNoteQuery, Subject,
    CatalogQuery,
  },
  filter::QuestionFilter,
  page::{Page, PageRequest},
  question::{NewQuestion, Question},
};

/// The error type shared by every store trait of one backend.
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

// ─── Questions ───────────────────────────────────────────────────────────────

pub trait QuestionStore: Store {
  /// Retrieve a question by id. Returns `None` if not found.
  fn get_question(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Question>, Self::Error>> + Send + '_;

  /// One window of questions matching `filter`, newest (highest id) first,
  /// together with the total number of matches.
  ///
  /// The window and the total are computed from the same predicate. They
  /// run as two statements without an enclosing transaction, so a
  /// concurrent write may land between them.
  fn list_questions(
    &self,
    filter: QuestionFilter,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<Question>, Self::Error>> + Send + '_;

  /// Number of questions matching `filter`, ignoring any window.
  fn count_questions(
    &self,
    filter: QuestionFilter,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn create_question(
    &self,
    input: NewQuestion,
  ) -> impl Future<Output = Result<Question, Self::Error>> + Send + '_;

  /// Replace every writable column. Returns `None` if `id` does not exist.
  fn update_question(
    &self,
    id: i64,
    input: NewQuestion,
  ) -> impl Future<Output = Result<Option<Question>, Self::Error>> + Send + '_;

  /// Returns `false` if nothing was deleted.
  fn delete_question(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Admin-editable entities ─────────────────────────────────────────────────

/// Paginated CRUD over one catalog entity.
pub trait EntityStore<E: Entity>: Store {
  fn list_entities(
    &self,
    query: CatalogQuery,
  ) -> impl Future<Output = Result<Page<E>, Self::Error>> + Send + '_;

  fn get_entity(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<E>, Self::Error>> + Send + '_;

  /// Fails with [`crate::Error::ParentNotFound`] when the body references a
  /// missing parent.
  fn create_entity(
    &self,
    input: E::Upsert,
  ) -> impl Future<Output = Result<E, Self::Error>> + Send + '_;

  /// Returns `None` if `id` does not exist.
  fn update_entity(
    &self,
    id: i64,
    input: E::Upsert,
  ) -> impl Future<Output = Result<Option<E>, Self::Error>> + Send + '_;

  /// Returns `false` if nothing was deleted.
  fn delete_entity(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

// ─── Curriculum reads and links ──────────────────────────────────────────────

pub trait CatalogStore: Store {
  fn list_grades(
    &self,
  ) -> impl Future<Output = Result<Vec<Grade>, Self::Error>> + Send + '_;

  fn subjects_for_grade(
    &self,
    grade_id: i64,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  fn lessons_for_subject(
    &self,
    subject_id: i64,
  ) -> impl Future<Output = Result<Vec<Lesson>, Self::Error>> + Send + '_;

  /// Topics of a lesson in creation order, each with its subtopics, plus the
  /// lesson's default smart note.
  fn topics_for_lesson(
    &self,
    lesson_id: i64,
  ) -> impl Future<Output = Result<LessonTopics, Self::Error>> + Send + '_;

  fn find_smart_note(
    &self,
    query: SmartNoteQuery,
  ) -> impl Future<Output = Result<Option<SmartNote>, Self::Error>> + Send + '_;

  fn add_smart_note(
    &self,
    input: NewSmartNote,
  ) -> impl Future<Output = Result<SmartNote, Self::Error>> + Send + '_;

  /// Fails with [`crate::Error::NotFound`] when either side is missing and
  /// [`crate::Error::AlreadyLinked`] on a duplicate.
  fn link_grade_subject(
    &self,
    grade_id: i64,
    subject_id: i64,
  ) -> impl Future<Output = Result<GradeSubject, Self::Error>> + Send + '_;

  /// Returns `false` if no such link existed.
  fn unlink_grade_subject(
    &self,
    grade_id: i64,
    subject_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Requires the grade and subject to exist, the lesson to belong to the
  /// subject, and the grade↔subject link to be in place.
  fn link_grade_subject_lesson(
    &self,
    grade_id: i64,
    subject_id: i64,
    lesson_id: i64,
  ) -> impl Future<Output = Result<GradeSubjectLesson, Self::Error>> + Send + '_;

  fn unlink_grade_subject_lesson(
    &self,
    grade_id: i64,
    subject_id: i64,
    lesson_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Every hierarchy row and link, ascending.
  fn catalog(
    &self,
  ) -> impl Future<Output = Result<Catalog, Self::Error>> + Send + '_;
}
