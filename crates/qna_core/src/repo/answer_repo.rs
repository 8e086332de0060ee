//! Answer read repository.
//!
//! Answers are written through `QuestionRepository::save` together with
//! their aggregate; this module only serves reads.

use crate::model::answer::{Answer, AnswerId};
use crate::model::question::QuestionId;
use crate::model::soft_delete::{retain_visible, visible_one};
use crate::repo::{ensure_schema, parse_flag, parse_user, parse_uuid, RepoError, RepoResult};
use rusqlite::{Connection, OptionalExtension, Row};

const ANSWER_SELECT_SQL: &str = "SELECT
    a.id AS id,
    a.question_id AS question_id,
    a.contents AS contents,
    a.deleted AS deleted,
    u.id AS writer_id,
    u.user_id AS writer_user_id,
    u.password AS writer_password,
    u.name AS writer_name,
    u.email AS writer_email
FROM answers a
JOIN users u ON u.id = a.writer_id";

/// Repository interface for answer lookups.
pub trait AnswerRepository {
    /// Finds an answer regardless of its deleted flag.
    fn find_by_id(&self, id: AnswerId) -> RepoResult<Option<Answer>>;
    /// Finds an answer, treating a deleted one as absent.
    fn find_by_id_not_deleted(&self, id: AnswerId) -> RepoResult<Option<Answer>>;
    /// Lists live answers of one question in insertion order.
    fn find_all_by_question_not_deleted(&self, question_id: QuestionId)
        -> RepoResult<Vec<Answer>>;
}

/// SQLite-backed answer repository.
pub struct SqliteAnswerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAnswerRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl AnswerRepository for SqliteAnswerRepository<'_> {
    fn find_by_id(&self, id: AnswerId) -> RepoResult<Option<Answer>> {
        self.conn
            .query_row(
                &format!("{ANSWER_SELECT_SQL} WHERE a.id = ?1;"),
                [id.to_string()],
                |row| Ok(parse_answer_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn find_by_id_not_deleted(&self, id: AnswerId) -> RepoResult<Option<Answer>> {
        Ok(visible_one(self.find_by_id(id)?))
    }

    fn find_all_by_question_not_deleted(
        &self,
        question_id: QuestionId,
    ) -> RepoResult<Vec<Answer>> {
        Ok(retain_visible(load_answers(self.conn, question_id)?))
    }
}

/// Loads every answer of a question, deleted ones included, by position.
pub(crate) fn load_answers(conn: &Connection, question_id: QuestionId) -> RepoResult<Vec<Answer>> {
    let mut stmt = conn.prepare(&format!(
        "{ANSWER_SELECT_SQL}
         WHERE a.question_id = ?1
         ORDER BY a.position ASC, a.id ASC;"
    ))?;
    let mut rows = stmt.query([question_id.to_string()])?;
    let mut answers = Vec::new();
    while let Some(row) = rows.next()? {
        answers.push(parse_answer_row(row)?);
    }
    Ok(answers)
}

fn parse_answer_row(row: &Row<'_>) -> RepoResult<Answer> {
    let writer = parse_user(row, "writer_")?;
    Answer::with_id(
        parse_uuid(row, "id")?,
        writer,
        parse_uuid(row, "question_id")?,
        row.get::<_, String>("contents")?,
        parse_flag(row, "deleted")?,
    )
    .map_err(|err| RepoError::InvalidData(err.to_string()))
}
