//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. There is no migration machinery;
//! `PRAGMA user_version` records the layout for whoever adds it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS grades (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL      -- RFC 3339 UTC
);

CREATE TABLE IF NOT EXISTS subjects (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    grade_id    INTEGER NOT NULL,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS lessons (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    subject_id  INTEGER NOT NULL,
    name        TEXT NOT NULL,
    image_url   TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS topics (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    lesson_id   INTEGER NOT NULL,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subtopics (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    topic_id    INTEGER NOT NULL,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

-- Explicit curriculum membership; not implied by the parent columns above.
CREATE TABLE IF NOT EXISTS grade_subjects (
    grade_id    INTEGER NOT NULL REFERENCES grades(id)   ON DELETE CASCADE,
    subject_id  INTEGER NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    PRIMARY KEY (grade_id, subject_id)
);

CREATE TABLE IF NOT EXISTS grade_subject_lessons (
    grade_id    INTEGER NOT NULL REFERENCES grades(id)   ON DELETE CASCADE,
    subject_id  INTEGER NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
    lesson_id   INTEGER NOT NULL REFERENCES lessons(id)  ON DELETE CASCADE,
    created_at  TEXT NOT NULL,
    PRIMARY KEY (grade_id, subject_id, lesson_id)
);

CREATE TABLE IF NOT EXISTS tutors (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    email       TEXT,
    phone       TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS years (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    value       INTEGER NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tutorials (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    url         TEXT,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS smart_notes (
    id                 INTEGER PRIMARY KEY AUTOINCREMENT,
    lesson_id          INTEGER NOT NULL,
    topic_id           INTEGER,
    subtopic_id        INTEGER,
    is_default         INTEGER NOT NULL DEFAULT 0,
    sub_topic_name     TEXT NOT NULL DEFAULT '',
    image_def_url      TEXT NOT NULL DEFAULT '',
    definition         TEXT NOT NULL DEFAULT '',
    theory             TEXT NOT NULL DEFAULT '',
    image_theory_url   TEXT NOT NULL DEFAULT '',
    example            TEXT NOT NULL DEFAULT '',
    image_example_url  TEXT NOT NULL DEFAULT ''
);

-- Hierarchy references are deliberately loose: NULL and 0 both mean unset,
-- so no foreign keys here.
CREATE TABLE IF NOT EXISTS questions (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    grade_id          INTEGER,
    lesson_id         INTEGER,
    topic_id          INTEGER,
    subtopic_id       INTEGER,
    tutor_id          INTEGER,
    tute_id           INTEGER,
    question          TEXT NOT NULL,
    question_img_url  TEXT,
    correct_answer    TEXT NOT NULL,
    theory            TEXT,
    solution          TEXT,
    other_answers     TEXT NOT NULL DEFAULT '[]',   -- JSON list of strings
    created_at        TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS subjects_grade_idx     ON subjects(grade_id);
CREATE INDEX IF NOT EXISTS lessons_subject_idx    ON lessons(subject_id);
CREATE INDEX IF NOT EXISTS topics_lesson_idx      ON topics(lesson_id);
CREATE INDEX IF NOT EXISTS subtopics_topic_idx    ON subtopics(topic_id);
CREATE INDEX IF NOT EXISTS gsl_lesson_idx         ON grade_subject_lessons(lesson_id);
CREATE INDEX IF NOT EXISTS smart_notes_lesson_idx ON smart_notes(lesson_id);
CREATE INDEX IF NOT EXISTS questions_grade_idx    ON questions(grade_id);
CREATE INDEX IF NOT EXISTS questions_lesson_idx   ON questions(lesson_id);

PRAGMA user_version = 1;
";
