//! Persistence gateway contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the save / find-by-id / find-not-deleted contracts the domain is
//!   driven through.
//! - Keep SQL details out of the model and service layers.
//!
//! # Invariants
//! - Every `*_not_deleted` read applies `model::soft_delete`, the same filter
//!   used by `Question::answers()`.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Repositories only accept connections migrated to the latest schema.
//! - Writes join a transaction already open on the connection instead of
//!   starting their own.

pub mod answer_repo;
pub mod delete_history_repo;
pub mod question_repo;
pub mod unit_of_work;
pub mod user_repo;

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::error::QnaError;
use crate::model::user::User;
use rusqlite::{Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for Q&A persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Entity violates a domain rule and cannot be stored.
    Domain(QnaError),
    /// Persisted data cannot be converted back into the domain model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Domain(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted q&a data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "q&a repository requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Domain(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<QnaError> for RepoError {
    fn from(value: QnaError) -> Self {
        Self::Domain(value)
    }
}

/// Fails unless `conn` has been migrated by `db::open_db*`.
pub(crate) fn ensure_schema(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

/// Runs `work` atomically on `conn`.
///
/// Opens an immediate transaction when the connection is in autocommit mode;
/// otherwise `work` joins the caller's transaction, which decides whether it
/// commits.
pub(crate) fn write_scope<T>(
    conn: &Connection,
    work: impl FnOnce(&Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    if !conn.is_autocommit() {
        return work(conn);
    }
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let value = work(&tx)?;
    tx.commit()?;
    Ok(value)
}

pub(crate) fn parse_uuid(row: &Row<'_>, column: &str) -> RepoResult<Uuid> {
    let text: String = row.get(column)?;
    Uuid::parse_str(&text)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{text}` in {column}")))
}

pub(crate) fn parse_flag(row: &Row<'_>, column: &str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {column}"
        ))),
    }
}

/// Parses user columns, optionally aliased with `prefix` in joined queries.
pub(crate) fn parse_user(row: &Row<'_>, prefix: &str) -> RepoResult<User> {
    let column = |name: &str| format!("{prefix}{name}");
    let id = parse_uuid(row, &column("id"))?;
    User::with_id(
        id,
        row.get::<_, String>(column("user_id").as_str())?,
        row.get::<_, String>(column("password").as_str())?,
        row.get::<_, String>(column("name").as_str())?,
        row.get::<_, String>(column("email").as_str())?,
    )
    .map_err(|err| RepoError::InvalidData(err.to_string()))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
