//! Catalog entities: the curriculum hierarchy and its reference data.
//!
//! grades → subjects → lessons → topics → subtopics form the hierarchy;
//! tutors, years and tutorials are flat reference lists. Which lessons are
//! visible under which grade/subject pair is curated explicitly through the
//! [`GradeSubject`] and [`GradeSubjectLesson`] links.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{Result, page::PageRequest, validate};

// ─── Kinds ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
  Grade,
  Subject,
  Lesson,
  Topic,
  Subtopic,
  Tutor,
  Year,
  Tutorial,
}

impl EntityKind {
  pub fn label(self) -> &'static str {
    match self {
      EntityKind::Grade => "grade",
      EntityKind::Subject => "subject",
      EntityKind::Lesson => "lesson",
      EntityKind::Topic => "topic",
      EntityKind::Subtopic => "subtopic",
      EntityKind::Tutor => "tutor",
      EntityKind::Year => "year",
      EntityKind::Tutorial => "tutorial",
    }
  }
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

/// A reference from a child row to the parent it must not outlive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentRef {
  pub kind: EntityKind,
  pub id:   i64,
}

// ─── Entity traits ───────────────────────────────────────────────────────────

/// An admin-editable catalog entity.
pub trait Entity: Serialize + Send + Sync + Sized + 'static {
  /// The create/update body for this entity.
  type Upsert: Upsert;

  const KIND: EntityKind;
}

/// A create/update body.
pub trait Upsert: DeserializeOwned + Send + Sync + 'static {
  fn validate(&self) -> Result<()>;

  /// The parent row this write depends on, if any.
  fn parent(&self) -> Option<ParentRef> { None }
}

/// Search, scope and window for an admin listing.
///
/// Scope ids only apply to entities that carry the matching reference; the
/// rest are ignored.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
  pub search:     Option<String>,
  pub grade_id:   Option<i64>,
  pub subject_id: Option<i64>,
  pub lesson_id:  Option<i64>,
  pub topic_id:   Option<i64>,
  pub page:       PageRequest,
}

impl CatalogQuery {
  /// The trimmed search term, or `None` when blank.
  pub fn search_term(&self) -> Option<&str> {
    self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
  }
}

// ─── Hierarchy ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
  pub id:         i64,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GradeUpsert {
  pub name: String,
}

impl Entity for Grade {
  type Upsert = GradeUpsert;
  const KIND: EntityKind = EntityKind::Grade;
}

impl Upsert for GradeUpsert {
  fn validate(&self) -> Result<()> { validate::name(&self.name) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
  pub id:         i64,
  pub grade_id:   i64,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectUpsert {
  pub grade_id: i64,
  pub name:     String,
}

impl Entity for Subject {
  type Upsert = SubjectUpsert;
  const KIND: EntityKind = EntityKind::Subject;
}

impl Upsert for SubjectUpsert {
  fn validate(&self) -> Result<()> {
    validate::required_id("gradeId", self.grade_id)?;
    validate::name(&self.name)
  }

  fn parent(&self) -> Option<ParentRef> {
    Some(ParentRef { kind: EntityKind::Grade, id: self.grade_id })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
  pub id:         i64,
  pub subject_id: i64,
  pub name:       String,
  pub image_url:  Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessonUpsert {
  pub subject_id: i64,
  pub name:       String,
  pub image_url:  Option<String>,
}

impl Entity for Lesson {
  type Upsert = LessonUpsert;
  const KIND: EntityKind = EntityKind::Lesson;
}

impl Upsert for LessonUpsert {
  fn validate(&self) -> Result<()> {
    validate::required_id("subjectId", self.subject_id)?;
    validate::name(&self.name)
  }

  fn parent(&self) -> Option<ParentRef> {
    Some(ParentRef { kind: EntityKind::Subject, id: self.subject_id })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
  pub id:         i64,
  pub lesson_id:  i64,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopicUpsert {
  pub lesson_id: i64,
  pub name:      String,
}

impl Entity for Topic {
  type Upsert = TopicUpsert;
  const KIND: EntityKind = EntityKind::Topic;
}

impl Upsert for TopicUpsert {
  fn validate(&self) -> Result<()> {
    validate::required_id("lessonId", self.lesson_id)?;
    validate::name(&self.name)
  }

  fn parent(&self) -> Option<ParentRef> {
    Some(ParentRef { kind: EntityKind::Lesson, id: self.lesson_id })
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtopic {
  pub id:         i64,
  pub topic_id:   i64,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubtopicUpsert {
  pub topic_id: i64,
  pub name:     String,
}

impl Entity for Subtopic {
  type Upsert = SubtopicUpsert;
  const KIND: EntityKind = EntityKind::Subtopic;
}

impl Upsert for SubtopicUpsert {
  fn validate(&self) -> Result<()> {
    validate::required_id("topicId", self.topic_id)?;
    validate::name(&self.name)
  }

  fn parent(&self) -> Option<ParentRef> {
    Some(ParentRef { kind: EntityKind::Topic, id: self.topic_id })
  }
}

// ─── Reference lists ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutor {
  pub id:         i64,
  pub name:       String,
  pub email:      Option<String>,
  pub phone:      Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorUpsert {
  pub name:  String,
  pub email: Option<String>,
  pub phone: Option<String>,
}

impl Entity for Tutor {
  type Upsert = TutorUpsert;
  const KIND: EntityKind = EntityKind::Tutor;
}

impl Upsert for TutorUpsert {
  fn validate(&self) -> Result<()> { validate::name(&self.name) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Year {
  pub id:         i64,
  pub value:      i32,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct YearUpsert {
  pub value: i32,
}

impl Entity for Year {
  type Upsert = YearUpsert;
  const KIND: EntityKind = EntityKind::Year;
}

impl Upsert for YearUpsert {
  fn validate(&self) -> Result<()> { validate::year(self.value) }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tutorial {
  pub id:         i64,
  pub name:       String,
  pub url:        Option<String>,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorialUpsert {
  pub name: String,
  pub url:  Option<String>,
}

impl Entity for Tutorial {
  type Upsert = TutorialUpsert;
  const KIND: EntityKind = EntityKind::Tutorial;
}

impl Upsert for TutorialUpsert {
  fn validate(&self) -> Result<()> { validate::name(&self.name) }
}

// ─── Curriculum links ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubject {
  pub grade_id:   i64,
  pub subject_id: i64,
  pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubjectLesson {
  pub grade_id:   i64,
  pub subject_id: i64,
  pub lesson_id:  i64,
  pub created_at: DateTime<Utc>,
}

/// Every hierarchy row and link, for admin tooling that renders the whole
/// menu tree at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
  pub grades:                Vec<Grade>,
  pub subjects:              Vec<Subject>,
  pub grade_subjects:        Vec<GradeSubject>,
  pub grade_subject_lessons: Vec<GradeSubjectLesson>,
  pub lessons:               Vec<Lesson>,
  pub topics:                Vec<Topic>,
  pub subtopics:             Vec<Subtopic>,
}

// ─── Smart notes ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartNote {
  pub sub_topic_name:    String,
  pub image_def_url:     String,
  pub definition:        String,
  pub theory:            String,
  pub image_theory_url:  String,
  pub example:           String,
  pub image_example_url: String,
}

/// A smart note to seed into the store.
#[derive(Debug, Clone, Default)]
pub struct NewSmartNote {
  pub lesson_id:   i64,
  pub topic_id:    Option<i64>,
  pub subtopic_id: Option<i64>,
  pub is_default:  bool,
  pub note:        SmartNote,
}

/// Lookup key for a smart note: the lesson must belong to the subject and
/// the subject to the grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartNoteQuery {
  pub grade_id:    i64,
  pub subject_id:  i64,
  pub lesson_id:   i64,
  pub topic_id:    Option<i64>,
  pub subtopic_id: Option<i64>,
}

// ─── Public outline ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtopicOutline {
  pub sub_topic_id:   i64,
  pub topic_id:       i64,
  pub sub_topic_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicOutline {
  pub topic_id:       i64,
  pub topic_name:     String,
  pub sub_topic_list: Vec<SubtopicOutline>,
}

/// The topics of one lesson plus the lesson's default smart note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonTopics {
  pub topics:             Vec<TopicOutline>,
  pub default_smart_note: Option<SmartNote>,
}
