//! Question aggregate repository.
//!
//! # Responsibility
//! - Persist a question together with its whole answer collection.
//! - Reassemble fully materialised aggregates (writer, answers) on reads.
//!
//! # Invariants
//! - `save` writes the question row and every answer atomically, joining the
//!   caller's transaction when one is open.
//! - Stored deleted flags never go back from 1 to 0.
//! - Listing order is first-save order.

use crate::model::error::QnaError;
use crate::model::question::{Question, QuestionId};
use crate::model::soft_delete::{retain_visible, visible_one, SoftDelete};
use crate::model::user::User;
use crate::repo::answer_repo::load_answers;
use crate::repo::{
    bool_to_int, ensure_schema, parse_flag, parse_user, parse_uuid, write_scope, RepoError,
    RepoResult,
};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

const QUESTION_SELECT_SQL: &str = "SELECT
    q.id AS id,
    q.title AS title,
    q.contents AS contents,
    q.deleted AS deleted,
    u.id AS writer_id,
    u.user_id AS writer_user_id,
    u.password AS writer_password,
    u.name AS writer_name,
    u.email AS writer_email
FROM questions q
JOIN users u ON u.id = q.writer_id";

/// Repository interface for question aggregates.
pub trait QuestionRepository {
    /// Upserts the question and all of its answers, returning its ID.
    fn save(&self, question: &Question) -> RepoResult<QuestionId>;
    /// Loads a question regardless of its deleted flag.
    fn find_by_id(&self, id: QuestionId) -> RepoResult<Option<Question>>;
    /// Loads a question, treating a deleted one as absent.
    fn find_by_id_not_deleted(&self, id: QuestionId) -> RepoResult<Option<Question>>;
    /// Lists live questions in first-save order.
    fn find_all_not_deleted(&self) -> RepoResult<Vec<Question>>;
}

/// SQLite-backed question repository.
pub struct SqliteQuestionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteQuestionRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

/// Question row before its answers are attached.
struct QuestionHead {
    id: QuestionId,
    title: String,
    contents: String,
    writer: User,
    deleted: bool,
}

impl QuestionRepository for SqliteQuestionRepository<'_> {
    fn save(&self, question: &Question) -> RepoResult<QuestionId> {
        let writer = question.writer().ok_or(QnaError::InvalidArgument(
            "question writer is required before saving",
        ))?;

        write_scope(self.conn, |conn| save_question_rows(conn, question, writer))?;

        debug!(
            "event=question_save module=repo status=ok question_id={} answers={} deleted={}",
            question.id(),
            question.all_answers().len(),
            question.is_deleted()
        );
        Ok(question.id())
    }

    fn find_by_id(&self, id: QuestionId) -> RepoResult<Option<Question>> {
        let head = self
            .conn
            .query_row(
                &format!("{QUESTION_SELECT_SQL} WHERE q.id = ?1;"),
                [id.to_string()],
                |row| Ok(parse_question_head(row)),
            )
            .optional()?
            .transpose()?;

        head.map(|head| assemble(self.conn, head)).transpose()
    }

    fn find_by_id_not_deleted(&self, id: QuestionId) -> RepoResult<Option<Question>> {
        Ok(visible_one(self.find_by_id(id)?))
    }

    fn find_all_not_deleted(&self) -> RepoResult<Vec<Question>> {
        // `retain_visible` remains the shared rule over whatever is loaded.
        let mut stmt = self.conn.prepare(&format!(
            "{QUESTION_SELECT_SQL}
             WHERE q.deleted = 0
             ORDER BY q.seq ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut heads = Vec::new();
        while let Some(row) = rows.next()? {
            heads.push(parse_question_head(row)?);
        }

        let questions = heads
            .into_iter()
            .map(|head| assemble(self.conn, head))
            .collect::<RepoResult<Vec<_>>>()?;
        Ok(retain_visible(questions))
    }
}

/// Upserts the question row and every answer row on `conn`.
fn save_question_rows(conn: &Connection, question: &Question, writer: &User) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO questions (id, title, contents, writer_id, deleted)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            title = excluded.title,
            contents = excluded.contents,
            writer_id = excluded.writer_id,
            deleted = MAX(questions.deleted, excluded.deleted),
            updated_at = (strftime('%s', 'now') * 1000);",
        params![
            question.id().to_string(),
            question.title(),
            question.contents(),
            writer.id().to_string(),
            bool_to_int(question.is_deleted()),
        ],
    )?;

    for (position, answer) in question.all_answers().iter().enumerate() {
        conn.execute(
            "INSERT INTO answers (id, question_id, writer_id, contents, position, deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                contents = excluded.contents,
                position = excluded.position,
                deleted = MAX(answers.deleted, excluded.deleted),
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                answer.id().to_string(),
                question.id().to_string(),
                answer.writer().id().to_string(),
                answer.contents(),
                i64::try_from(position).unwrap_or(i64::MAX),
                bool_to_int(answer.is_deleted()),
            ],
        )?;
    }
    Ok(())
}

fn parse_question_head(row: &Row<'_>) -> RepoResult<QuestionHead> {
    Ok(QuestionHead {
        id: parse_uuid(row, "id")?,
        title: row.get("title")?,
        contents: row.get("contents")?,
        writer: parse_user(row, "writer_")?,
        deleted: parse_flag(row, "deleted")?,
    })
}

fn assemble(conn: &Connection, head: QuestionHead) -> RepoResult<Question> {
    let answers = load_answers(conn, head.id)?;
    Question::from_parts(
        head.id,
        head.title,
        head.contents,
        Some(head.writer),
        answers,
        head.deleted,
    )
    .map_err(|err| RepoError::InvalidData(err.to_string()))
}
