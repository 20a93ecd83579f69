//! [`SqliteStore`], the SQLite implementation of the store traits.
//!
//! Question storage lives here; catalog reads and links are in
//! `catalog.rs`, generic entity CRUD in `entity.rs`.

use std::path::Path;

use chrono::Utc;
use rusqlite::{OptionalExtension as _, params_from_iter};

use edu_core::{
  filter::QuestionFilter,
  page::{Page, PageRequest},
  question::{NewQuestion, Question},
  store::{QuestionStore, Store},
};

use crate::{
  Error, Result,
  encode::{QUESTION_COLUMNS, RawQuestion, encode_answers, encode_dt},
  query::resolve,
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A catalog store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mainly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl Store for SqliteStore {
  type Error = Error;
}

// ─── Questions ───────────────────────────────────────────────────────────────

fn select_question(
  conn: &rusqlite::Connection,
  id: i64,
) -> rusqlite::Result<Option<RawQuestion>> {
  conn
    .query_row(
      &format!("SELECT {QUESTION_COLUMNS} FROM questions q WHERE q.id = ?1"),
      [id],
      RawQuestion::from_row,
    )
    .optional()
}

/// The writable columns of `questions`, in bind order.
struct QuestionRow {
  grade_id:         Option<i64>,
  lesson_id:        Option<i64>,
  topic_id:         Option<i64>,
  subtopic_id:      Option<i64>,
  tutor_id:         Option<i64>,
  tute_id:          Option<i64>,
  question:         String,
  question_img_url: Option<String>,
  correct_answer:   String,
  theory:           Option<String>,
  solution:         Option<String>,
  other_answers:    String,
}

impl QuestionRow {
  fn prepare(input: NewQuestion) -> Result<Self> {
    input.validate()?;
    let input = input.normalized();
    Ok(Self {
      other_answers:    encode_answers(&input.other_answers)?,
      grade_id:         input.grade_id,
      lesson_id:        input.lesson_id,
      topic_id:         input.topic_id,
      subtopic_id:      input.subtopic_id,
      tutor_id:         input.tutor_id,
      tute_id:          input.tute_id,
      question:         input.question,
      question_img_url: input.question_img_url,
      correct_answer:   input.correct_answer,
      theory:           input.theory,
      solution:         input.solution,
    })
  }
}

impl QuestionStore for SqliteStore {
  async fn get_question(&self, id: i64) -> Result<Option<Question>> {
    let raw = self.conn.call(move |conn| Ok(select_question(conn, id)?)).await?;
    raw.map(RawQuestion::into_question).transpose()
  }

  async fn list_questions(
    &self,
    filter: QuestionFilter,
    page:   PageRequest,
  ) -> Result<Page<Question>> {
    let parts     = resolve(filter);
    let list_sql  = parts.list_sql();
    let count_sql = parts.count_sql();
    tracing::debug!(sql = %list_sql, params = ?parts.params, "listing questions");

    let mut window = parts.params.clone();
    window.push(page.limit() as i64);
    window.push(page.offset() as i64);

    let (raws, total): (Vec<RawQuestion>, i64) = self
      .conn
      .call(move |conn| {
        let rows = conn
          .prepare(&list_sql)?
          .query_map(params_from_iter(window), RawQuestion::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        let total =
          conn.query_row(&count_sql, params_from_iter(parts.params), |r| r.get(0))?;
        Ok((rows, total))
      })
      .await?;

    let data = raws
      .into_iter()
      .map(RawQuestion::into_question)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(data, page, total.max(0) as u64))
  }

  async fn count_questions(&self, filter: QuestionFilter) -> Result<u64> {
    let parts = resolve(filter);
    let sql   = parts.count_sql();
    tracing::debug!(sql = %sql, params = ?parts.params, "counting questions");

    let total: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, params_from_iter(parts.params), |r| r.get(0))?)
      })
      .await?;
    Ok(total.max(0) as u64)
  }

  async fn create_question(&self, input: NewQuestion) -> Result<Question> {
    let row    = QuestionRow::prepare(input)?;
    let at_str = encode_dt(Utc::now());

    let raw = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO questions (
             grade_id, lesson_id, topic_id, subtopic_id, tutor_id, tute_id,
             question, question_img_url, correct_answer, theory, solution,
             other_answers, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            row.grade_id,
            row.lesson_id,
            row.topic_id,
            row.subtopic_id,
            row.tutor_id,
            row.tute_id,
            row.question,
            row.question_img_url,
            row.correct_answer,
            row.theory,
            row.solution,
            row.other_answers,
            at_str,
          ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(select_question(conn, id)?)
      })
      .await?;

    raw
      .ok_or_else(|| Error::Core(edu_core::Error::NotFound("question".into())))?
      .into_question()
  }

  async fn update_question(
    &self,
    id:    i64,
    input: NewQuestion,
  ) -> Result<Option<Question>> {
    let row = QuestionRow::prepare(input)?;

    let raw = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE questions SET
             grade_id = ?1, lesson_id = ?2, topic_id = ?3, subtopic_id = ?4,
             tutor_id = ?5, tute_id = ?6, question = ?7, question_img_url = ?8,
             correct_answer = ?9, theory = ?10, solution = ?11,
             other_answers = ?12
           WHERE id = ?13",
          rusqlite::params![
            row.grade_id,
            row.lesson_id,
            row.topic_id,
            row.subtopic_id,
            row.tutor_id,
            row.tute_id,
            row.question,
            row.question_img_url,
            row.correct_answer,
            row.theory,
            row.solution,
            row.other_answers,
            id,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(select_question(conn, id)?)
      })
      .await?;

    raw.map(RawQuestion::into_question).transpose()
  }

  async fn delete_question(&self, id: i64) -> Result<bool> {
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM questions WHERE id = ?1", [id])?))
      .await?;
    Ok(changed > 0)
  }
}
