//! Public catalog reads, smart notes and curriculum links.

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, Row};

use edu_core::{
  catalog::{
    Catalog, EntityKind, Grade, GradeSubject, GradeSubjectLesson, Lesson,
    LessonTopics, NewSmartNote, SmartNote, SmartNoteQuery, Subject, Subtopic,
    SubtopicOutline, Topic, TopicOutline,
  },
  store::CatalogStore,
};

use crate::{
  Result,
  encode::{encode_dt, read_dt},
  entity::{exists, select_all},
  store::SqliteStore,
};

const NOTE_COLUMNS: &str = "sn.sub_topic_name, sn.image_def_url, sn.definition, \
   sn.theory, sn.image_theory_url, sn.example, sn.image_example_url";

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<SmartNote> {
  Ok(SmartNote {
    sub_topic_name:    row.get(0)?,
    image_def_url:     row.get(1)?,
    definition:        row.get(2)?,
    theory:            row.get(3)?,
    image_theory_url:  row.get(4)?,
    example:           row.get(5)?,
    image_example_url: row.get(6)?,
  })
}

fn grade_subject_from_row(row: &Row<'_>) -> rusqlite::Result<GradeSubject> {
  Ok(GradeSubject {
    grade_id:   row.get(0)?,
    subject_id: row.get(1)?,
    created_at: read_dt(row, 2)?,
  })
}

fn grade_subject_lesson_from_row(row: &Row<'_>) -> rusqlite::Result<GradeSubjectLesson> {
  Ok(GradeSubjectLesson {
    grade_id:   row.get(0)?,
    subject_id: row.get(1)?,
    lesson_id:  row.get(2)?,
    created_at: read_dt(row, 3)?,
  })
}

fn grade_subject_linked(
  conn: &rusqlite::Connection,
  grade_id: i64,
  subject_id: i64,
) -> rusqlite::Result<bool> {
  conn.query_row(
    "SELECT EXISTS (SELECT 1 FROM grade_subjects WHERE grade_id = ?1 AND subject_id = ?2)",
    [grade_id, subject_id],
    |r| r.get(0),
  )
}

fn not_found(what: impl Into<String>) -> edu_core::Error {
  edu_core::Error::NotFound(what.into())
}

impl CatalogStore for SqliteStore {
  async fn list_grades(&self) -> Result<Vec<Grade>> {
    Ok(self.conn.call(|conn| Ok(select_all::<Grade>(conn, None, &[])?)).await?)
  }

  async fn subjects_for_grade(&self, grade_id: i64) -> Result<Vec<Subject>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(select_all::<Subject>(conn, Some("t.grade_id = ?1"), &[grade_id])?)
        })
        .await?,
    )
  }

  async fn lessons_for_subject(&self, subject_id: i64) -> Result<Vec<Lesson>> {
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(select_all::<Lesson>(conn, Some("t.subject_id = ?1"), &[subject_id])?)
        })
        .await?,
    )
  }

  async fn topics_for_lesson(&self, lesson_id: i64) -> Result<LessonTopics> {
    let (topics, subtopics, default_smart_note) = self
      .conn
      .call(move |conn| {
        let topics = conn
          .prepare(
            "SELECT id, name FROM topics WHERE lesson_id = ?1 ORDER BY created_at, id",
          )?
          .query_map([lesson_id], |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let subtopics = conn
          .prepare(
            "SELECT s.id, s.topic_id, s.name
             FROM subtopics s
             JOIN topics t ON t.id = s.topic_id
             WHERE t.lesson_id = ?1
             ORDER BY s.id",
          )?
          .query_map([lesson_id], |r| {
            Ok(SubtopicOutline {
              sub_topic_id:   r.get(0)?,
              topic_id:       r.get(1)?,
              sub_topic_name: r.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let note = conn
          .query_row(
            &format!(
              "SELECT {NOTE_COLUMNS} FROM smart_notes sn
               WHERE sn.lesson_id = ?1 AND sn.is_default = 1
               ORDER BY sn.id LIMIT 1"
            ),
            [lesson_id],
            note_from_row,
          )
          .optional()?;

        Ok((topics, subtopics, note))
      })
      .await?;

    let mut by_topic: HashMap<i64, Vec<SubtopicOutline>> = HashMap::new();
    for sub in subtopics {
      by_topic.entry(sub.topic_id).or_default().push(sub);
    }

    let topics = topics
      .into_iter()
      .map(|(topic_id, topic_name)| TopicOutline {
        topic_id,
        topic_name,
        sub_topic_list: by_topic.remove(&topic_id).unwrap_or_default(),
      })
      .collect();

    Ok(LessonTopics { topics, default_smart_note })
  }

  async fn find_smart_note(&self, query: SmartNoteQuery) -> Result<Option<SmartNote>> {
    let mut sql = format!(
      "SELECT {NOTE_COLUMNS} FROM smart_notes sn
       JOIN lessons l  ON l.id = sn.lesson_id
       JOIN subjects s ON s.id = l.subject_id
       WHERE sn.lesson_id = ? AND l.subject_id = ? AND s.grade_id = ?"
    );
    let mut params = vec![query.lesson_id, query.subject_id, query.grade_id];
    if let Some(topic_id) = query.topic_id {
      sql.push_str(" AND sn.topic_id = ?");
      params.push(topic_id);
    }
    if let Some(subtopic_id) = query.subtopic_id {
      sql.push_str(" AND sn.subtopic_id = ?");
      params.push(subtopic_id);
    }
    sql.push_str(" ORDER BY sn.id LIMIT 1");
    tracing::debug!(sql = %sql, params = ?params, "finding smart note");

    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(&sql, rusqlite::params_from_iter(params), note_from_row)
              .optional()?,
          )
        })
        .await?,
    )
  }

  async fn add_smart_note(&self, input: NewSmartNote) -> Result<SmartNote> {
    let NewSmartNote { lesson_id, topic_id, subtopic_id, is_default, note } = input;
    let stored = note.clone();

    self
      .conn
      .call(move |conn| {
        if !exists(conn, EntityKind::Lesson, lesson_id)? {
          return Ok(Err(edu_core::Error::ParentNotFound(EntityKind::Lesson)));
        }
        conn.execute(
          "INSERT INTO smart_notes (
             lesson_id, topic_id, subtopic_id, is_default, sub_topic_name,
             image_def_url, definition, theory, image_theory_url, example,
             image_example_url
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            lesson_id,
            topic_id,
            subtopic_id,
            is_default,
            stored.sub_topic_name,
            stored.image_def_url,
            stored.definition,
            stored.theory,
            stored.image_theory_url,
            stored.example,
            stored.image_example_url,
          ],
        )?;
        Ok(Ok(()))
      })
      .await??;

    Ok(note)
  }

  // ── Links ─────────────────────────────────────────────────────────────────

  async fn link_grade_subject(
    &self,
    grade_id:   i64,
    subject_id: i64,
  ) -> Result<GradeSubject> {
    let link = GradeSubject { grade_id, subject_id, created_at: Utc::now() };
    let at_str = encode_dt(link.created_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !exists(&tx, EntityKind::Grade, grade_id)? {
          return Ok(Err(not_found("grade")));
        }
        if !exists(&tx, EntityKind::Subject, subject_id)? {
          return Ok(Err(not_found("subject")));
        }
        if grade_subject_linked(&tx, grade_id, subject_id)? {
          return Ok(Err(edu_core::Error::AlreadyLinked(format!(
            "subject {subject_id} to grade {grade_id}"
          ))));
        }
        tx.execute(
          "INSERT INTO grade_subjects (grade_id, subject_id, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![grade_id, subject_id, at_str],
        )?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await??;

    tracing::debug!(grade_id, subject_id, "linked grade and subject");
    Ok(link)
  }

  async fn unlink_grade_subject(&self, grade_id: i64, subject_id: i64) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM grade_subjects WHERE grade_id = ?1 AND subject_id = ?2",
          [grade_id, subject_id],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn link_grade_subject_lesson(
    &self,
    grade_id:   i64,
    subject_id: i64,
    lesson_id:  i64,
  ) -> Result<GradeSubjectLesson> {
    let link = GradeSubjectLesson { grade_id, subject_id, lesson_id, created_at: Utc::now() };
    let at_str = encode_dt(link.created_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if !exists(&tx, EntityKind::Grade, grade_id)? {
          return Ok(Err(not_found("grade")));
        }
        if !exists(&tx, EntityKind::Subject, subject_id)? {
          return Ok(Err(not_found("subject")));
        }
        let owner: Option<i64> = tx
          .query_row("SELECT subject_id FROM lessons WHERE id = ?1", [lesson_id], |r| {
            r.get(0)
          })
          .optional()?;
        match owner {
          None => return Ok(Err(not_found("lesson"))),
          Some(owner) if owner != subject_id => {
            return Ok(Err(not_found(format!("lesson {lesson_id} in subject {subject_id}"))));
          }
          Some(_) => {}
        }
        if !grade_subject_linked(&tx, grade_id, subject_id)? {
          return Ok(Err(not_found("grade-subject link")));
        }
        let duplicate: bool = tx.query_row(
          "SELECT EXISTS (SELECT 1 FROM grade_subject_lessons
             WHERE grade_id = ?1 AND subject_id = ?2 AND lesson_id = ?3)",
          [grade_id, subject_id, lesson_id],
          |r| r.get(0),
        )?;
        if duplicate {
          return Ok(Err(edu_core::Error::AlreadyLinked(format!(
            "lesson {lesson_id} to grade {grade_id} and subject {subject_id}"
          ))));
        }
        tx.execute(
          "INSERT INTO grade_subject_lessons (grade_id, subject_id, lesson_id, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![grade_id, subject_id, lesson_id, at_str],
        )?;
        tx.commit()?;
        Ok(Ok(()))
      })
      .await??;

    tracing::debug!(grade_id, subject_id, lesson_id, "linked lesson");
    Ok(link)
  }

  async fn unlink_grade_subject_lesson(
    &self,
    grade_id:   i64,
    subject_id: i64,
    lesson_id:  i64,
  ) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM grade_subject_lessons
           WHERE grade_id = ?1 AND subject_id = ?2 AND lesson_id = ?3",
          [grade_id, subject_id, lesson_id],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  async fn catalog(&self) -> Result<Catalog> {
    Ok(
      self
        .conn
        .call(|conn| {
          let grade_subjects = conn
            .prepare(
              "SELECT grade_id, subject_id, created_at FROM grade_subjects
               ORDER BY grade_id, subject_id",
            )?
            .query_map([], grade_subject_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          let grade_subject_lessons = conn
            .prepare(
              "SELECT grade_id, subject_id, lesson_id, created_at FROM grade_subject_lessons
               ORDER BY grade_id, subject_id, lesson_id",
            )?
            .query_map([], grade_subject_lesson_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

          Ok(Catalog {
            grades: select_all::<Grade>(conn, None, &[])?,
            subjects: select_all::<Subject>(conn, None, &[])?,
            grade_subjects,
            grade_subject_lessons,
            lessons: select_all::<Lesson>(conn, None, &[])?,
            topics: select_all::<Topic>(conn, None, &[])?,
            subtopics: select_all::<Subtopic>(conn, None, &[])?,
          })
        })
        .await?,
    )
  }
}
