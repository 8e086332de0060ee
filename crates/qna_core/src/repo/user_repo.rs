//! User repository contract and SQLite implementation.

use crate::model::user::{User, UserId};
use crate::repo::{ensure_schema, parse_user, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

const USER_SELECT_SQL: &str = "SELECT id, user_id, password, name, email FROM users";

/// Repository interface for users.
pub trait UserRepository {
    /// Inserts or updates a user, returning its stable ID.
    fn save(&self, user: &User) -> RepoResult<UserId>;
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Looks up a user by login name.
    fn find_by_user_id(&self, user_id: &str) -> RepoResult<Option<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn save(&self, user: &User) -> RepoResult<UserId> {
        self.conn.execute(
            "INSERT INTO users (id, user_id, password, name, email)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                password = excluded.password,
                name = excluded.name,
                email = excluded.email;",
            params![
                user.id().to_string(),
                user.user_id(),
                user.password(),
                user.name(),
                user.email(),
            ],
        )?;
        Ok(user.id())
    }

    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                |row| Ok(parse_user(row, "")),
            )
            .optional()?
            .transpose()
    }

    fn find_by_user_id(&self, user_id: &str) -> RepoResult<Option<User>> {
        self.conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE user_id = ?1;"),
                [user_id],
                |row| Ok(parse_user(row, "")),
            )
            .optional()?
            .transpose()
    }
}
