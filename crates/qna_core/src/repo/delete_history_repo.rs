//! Delete history repository.
//!
//! Append-only storage for the audit records returned by
//! `Question::delete`.

use crate::model::delete_history::{ContentType, DeleteHistory};
use crate::repo::{ensure_schema, parse_uuid, write_scope, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

/// Repository interface for delete history records.
pub trait DeleteHistoryRepository {
    /// Appends all records in order, atomically. Joins an open transaction.
    fn save_all(&self, histories: &[DeleteHistory]) -> RepoResult<()>;
    /// Lists every record in append order.
    fn find_all(&self) -> RepoResult<Vec<DeleteHistory>>;
    /// Lists records about one question or answer.
    fn find_by_content(
        &self,
        content_type: ContentType,
        content_id: Uuid,
    ) -> RepoResult<Vec<DeleteHistory>>;
}

/// SQLite-backed delete history repository.
pub struct SqliteDeleteHistoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDeleteHistoryRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<DeleteHistory>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut histories = Vec::new();
        while let Some(row) = rows.next()? {
            histories.push(parse_history_row(row)?);
        }
        Ok(histories)
    }
}

impl DeleteHistoryRepository for SqliteDeleteHistoryRepository<'_> {
    fn save_all(&self, histories: &[DeleteHistory]) -> RepoResult<()> {
        if histories.is_empty() {
            return Ok(());
        }

        write_scope(self.conn, |conn| {
            let mut stmt = conn.prepare(
                "INSERT INTO delete_histories (id, content_type, content_id, deleted_by, deleted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for history in histories {
                stmt.execute(params![
                    history.id().to_string(),
                    history.content_type().as_str(),
                    history.content_id().to_string(),
                    history.deleted_by().to_string(),
                    history.deleted_at(),
                ])?;
            }
            Ok(())
        })
    }

    fn find_all(&self) -> RepoResult<Vec<DeleteHistory>> {
        self.query(
            "SELECT id, content_type, content_id, deleted_by, deleted_at
             FROM delete_histories
             ORDER BY seq ASC;",
            [],
        )
    }

    fn find_by_content(
        &self,
        content_type: ContentType,
        content_id: Uuid,
    ) -> RepoResult<Vec<DeleteHistory>> {
        self.query(
            "SELECT id, content_type, content_id, deleted_by, deleted_at
             FROM delete_histories
             WHERE content_type = ?1 AND content_id = ?2
             ORDER BY seq ASC;",
            params![content_type.as_str(), content_id.to_string()],
        )
    }
}

fn parse_history_row(row: &Row<'_>) -> RepoResult<DeleteHistory> {
    let type_text: String = row.get("content_type")?;
    let content_type = ContentType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid content type `{type_text}` in delete_histories.content_type"
        ))
    })?;

    Ok(DeleteHistory::with_id(
        parse_uuid(row, "id")?,
        content_type,
        parse_uuid(row, "content_id")?,
        parse_uuid(row, "deleted_by")?,
        row.get("deleted_at")?,
    ))
}
