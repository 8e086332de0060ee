//! Question/answer domain model.
//!
//! # Responsibility
//! - Define the `User`, `Question` and `Answer` entities.
//! - Own the soft-delete and ownership rules that decide what may be deleted.
//!
//! # Invariants
//! - Every entity is identified by a stable, non-nil UUID.
//! - Deletion is a one-way soft-delete flag, never a hard delete.
//! - `Question` is the aggregate root: answer mutations are routed through it.

pub mod answer;
pub mod delete_history;
pub mod error;
pub mod question;
pub mod soft_delete;
pub mod user;
