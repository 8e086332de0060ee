//! Typed failures of aggregate operations.
//!
//! A failed operation leaves the aggregate exactly as it was.

use crate::model::answer::AnswerId;
use crate::model::question::QuestionId;
use crate::model::user::UserId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result alias for domain operations.
pub type QnaResult<T> = Result<T, QnaError>;

/// Domain error raised by `User`, `Answer` and `Question` operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QnaError {
    /// A required reference is missing (or nil) at construction/attachment.
    InvalidArgument(&'static str),
    /// The referenced answer is not part of the question's collection.
    NotFound(AnswerId),
    /// Requester is not the question writer.
    NotOwner {
        question_id: QuestionId,
        requester: UserId,
    },
    /// A live answer written by someone else blocks the cascade.
    CannotDeleteAnswerOfOther {
        question_id: QuestionId,
        answer_id: AnswerId,
    },
}

impl Display for QnaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::NotFound(id) => write!(f, "answer not found in question: {id}"),
            Self::NotOwner {
                question_id,
                requester,
            } => write!(
                f,
                "user {requester} is not the writer of question {question_id}"
            ),
            Self::CannotDeleteAnswerOfOther {
                question_id,
                answer_id,
            } => write!(
                f,
                "question {question_id} has answer {answer_id} written by another user"
            ),
        }
    }
}

impl Error for QnaError {}
