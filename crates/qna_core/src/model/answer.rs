//! Answer entity.
//!
//! # Responsibility
//! - Bind one reply to its writer and its question at creation time.
//! - Carry the answer's own soft-delete flag.
//!
//! # Invariants
//! - `writer` is set once and never reassigned.
//! - `question_id` always references exactly one question.
//! - `deleted` is monotonic: once true it never goes back to false.
//!
//! Answers are unaware of their siblings; cascade rules live in `Question`.

use crate::model::error::{QnaError, QnaResult};
use crate::model::question::{Question, QuestionId};
use crate::model::soft_delete::SoftDelete;
use crate::model::user::User;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable answer identifier.
pub type AnswerId = Uuid;

/// Reply to a question, owned by exactly one user.
///
/// Deserialization goes through `with_id`, so nil ids are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AnswerRecord")]
pub struct Answer {
    id: AnswerId,
    writer: User,
    /// Back-reference to the owning question. Relation only.
    question_id: QuestionId,
    contents: String,
    deleted: bool,
}

#[derive(Deserialize)]
struct AnswerRecord {
    id: AnswerId,
    writer: User,
    question_id: QuestionId,
    contents: String,
    deleted: bool,
}

impl TryFrom<AnswerRecord> for Answer {
    type Error = QnaError;

    fn try_from(record: AnswerRecord) -> Result<Self, Self::Error> {
        Answer::with_id(
            record.id,
            record.writer,
            record.question_id,
            record.contents,
            record.deleted,
        )
    }
}

impl Answer {
    /// Creates a live answer with a generated ID.
    ///
    /// # Errors
    /// - `InvalidArgument` when `writer` or `question` is absent.
    pub fn new(
        writer: Option<&User>,
        question: Option<&Question>,
        contents: impl Into<String>,
    ) -> QnaResult<Self> {
        let writer = writer.ok_or(QnaError::InvalidArgument("answer writer is required"))?;
        let question =
            question.ok_or(QnaError::InvalidArgument("answer question is required"))?;
        Self::with_id(Uuid::new_v4(), writer.clone(), question.id(), contents, false)
    }

    /// Rebuilds an answer with known identity and state (load paths).
    ///
    /// # Errors
    /// - `InvalidArgument` when any of the IDs is nil.
    pub fn with_id(
        id: AnswerId,
        writer: User,
        question_id: QuestionId,
        contents: impl Into<String>,
        deleted: bool,
    ) -> QnaResult<Self> {
        if id.is_nil() {
            return Err(QnaError::InvalidArgument("answer id must not be nil"));
        }
        if writer.id().is_nil() {
            return Err(QnaError::InvalidArgument("answer writer id must not be nil"));
        }
        if question_id.is_nil() {
            return Err(QnaError::InvalidArgument(
                "answer question id must not be nil",
            ));
        }
        Ok(Self {
            id,
            writer,
            question_id,
            contents: contents.into(),
            deleted,
        })
    }

    pub fn id(&self) -> AnswerId {
        self.id
    }

    pub fn writer(&self) -> &User {
        &self.writer
    }

    pub fn question_id(&self) -> QuestionId {
        self.question_id
    }

    pub fn contents(&self) -> &str {
        self.contents.as_str()
    }

    /// Returns whether `user` wrote this answer.
    pub fn is_owner(&self, user: &User) -> bool {
        self.writer.is_same(user)
    }

    /// Returns whether this answer replies to `question_id`.
    pub fn belongs_to(&self, question_id: QuestionId) -> bool {
        self.question_id == question_id
    }

    /// Tombstones this answer. Calling it again is a no-op.
    ///
    /// Does not touch the owning question: hiding the answer from listings
    /// is done by read-time filtering.
    pub fn mark_deleted(&mut self) {
        self.deleted = true;
    }
}

impl SoftDelete for Answer {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}
