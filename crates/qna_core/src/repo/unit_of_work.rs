//! Unit of work spanning several repository writes.
//!
//! # Invariants
//! - Either every write made inside `run` is committed, or none is.
//! - Repository writes inside `run` join the surrounding transaction.

use crate::repo::{ensure_schema, RepoError, RepoResult};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Groups repository writes into one atomic step.
pub trait UnitOfWork {
    /// Runs `work`, committing its writes only when it returns `Ok`.
    fn run<T, E>(&self, work: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>;
}

/// SQLite unit of work bound to the connection the repositories share.
pub struct SqliteUnitOfWork<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUnitOfWork<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema(conn)?;
        Ok(Self { conn })
    }
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    fn run<T, E>(&self, work: impl FnOnce() -> Result<T, E>) -> Result<T, E>
    where
        E: From<RepoError>,
    {
        if !self.conn.is_autocommit() {
            return work();
        }

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        // Dropping `tx` on the error path rolls everything back.
        let value = work()?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}
