//! Core domain logic for the Q&A board.
//! This crate is the single source of truth for soft-delete and ownership
//! invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::answer::{Answer, AnswerId};
pub use model::delete_history::{ContentType, DeleteHistory, DeleteHistoryId};
pub use model::error::{QnaError, QnaResult};
pub use model::question::{Question, QuestionId};
pub use model::soft_delete::SoftDelete;
pub use model::user::{User, UserId};
pub use repo::answer_repo::{AnswerRepository, SqliteAnswerRepository};
pub use repo::delete_history_repo::{DeleteHistoryRepository, SqliteDeleteHistoryRepository};
pub use repo::question_repo::{QuestionRepository, SqliteQuestionRepository};
pub use repo::unit_of_work::{SqliteUnitOfWork, UnitOfWork};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::qna_service::{QnaService, ServiceError, ServiceResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
