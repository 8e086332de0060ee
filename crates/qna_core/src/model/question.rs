//! Question aggregate root.
//!
//! # Responsibility
//! - Own the ordered answer collection of one question.
//! - Enforce ownership and cascade rules for soft deletes.
//! - Produce delete history records for the caller to persist.
//!
//! # Invariants
//! - `answers` only holds answers whose `question_id` is this question's id.
//! - `answers` keeps deleted answers; `answers()` never yields them.
//! - `deleted` is monotonic; a deleted question is terminal.
//! - Every operation is all-or-nothing: on error nothing was mutated.

use crate::model::answer::{Answer, AnswerId};
use crate::model::delete_history::{current_epoch_ms, ContentType, DeleteHistory};
use crate::model::error::{QnaError, QnaResult};
use crate::model::soft_delete::{visible, SoftDelete};
use crate::model::user::User;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Stable question identifier.
pub type QuestionId = Uuid;

/// Question with its answers.
///
/// Deserialization goes through the same validation as `from_parts`, so a
/// payload with foreign answers is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    id: QuestionId,
    title: String,
    contents: String,
    /// `None` only while the question is still a draft.
    writer: Option<User>,
    /// Insertion order is relevance order.
    answers: Vec<Answer>,
    deleted: bool,
}

#[derive(Deserialize)]
struct QuestionRecord {
    id: QuestionId,
    title: String,
    contents: String,
    writer: Option<User>,
    answers: Vec<Answer>,
    deleted: bool,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QnaError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::from_parts(
            record.id,
            record.title,
            record.contents,
            record.writer,
            record.answers,
            record.deleted,
        )
    }
}

impl Question {
    /// Creates a draft question with a generated ID and no writer yet.
    ///
    /// Call `write_by` before persisting.
    pub fn new(title: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            contents: contents.into(),
            writer: None,
            answers: Vec::new(),
            deleted: false,
        }
    }

    /// Reassembles a question from persisted parts.
    ///
    /// # Errors
    /// - `InvalidArgument` for a nil id, an answer of another question, or a
    ///   duplicated answer id.
    pub fn from_parts(
        id: QuestionId,
        title: impl Into<String>,
        contents: impl Into<String>,
        writer: Option<User>,
        answers: Vec<Answer>,
        deleted: bool,
    ) -> QnaResult<Self> {
        if id.is_nil() {
            return Err(QnaError::InvalidArgument("question id must not be nil"));
        }
        let mut seen = HashSet::with_capacity(answers.len());
        for answer in &answers {
            if !answer.belongs_to(id) {
                return Err(QnaError::InvalidArgument(
                    "answer belongs to another question",
                ));
            }
            if !seen.insert(answer.id()) {
                return Err(QnaError::InvalidArgument("answer is already attached"));
            }
        }
        Ok(Self {
            id,
            title: title.into(),
            contents: contents.into(),
            writer,
            answers,
            deleted,
        })
    }

    /// Attributes the question to its writer.
    ///
    /// # Errors
    /// - `InvalidArgument` when `writer` is absent or the question is deleted.
    pub fn write_by(mut self, writer: Option<&User>) -> QnaResult<Self> {
        let writer = writer.ok_or(QnaError::InvalidArgument("question writer is required"))?;
        if self.deleted {
            return Err(QnaError::InvalidArgument(
                "deleted question cannot change writer",
            ));
        }
        self.writer = Some(writer.clone());
        Ok(self)
    }

    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn contents(&self) -> &str {
        self.contents.as_str()
    }

    pub fn writer(&self) -> Option<&User> {
        self.writer.as_ref()
    }

    /// Returns whether `user` wrote this question. A draft has no owner.
    pub fn is_owner(&self, user: &User) -> bool {
        self.writer.as_ref().is_some_and(|writer| writer.is_same(user))
    }

    /// Attaches an answer at the end of the collection.
    ///
    /// # Errors
    /// - `InvalidArgument` when the answer replies to another question, is
    ///   already attached, or this question is deleted.
    pub fn add_answer(&mut self, answer: Answer) -> QnaResult<()> {
        if !answer.belongs_to(self.id) {
            return Err(QnaError::InvalidArgument(
                "answer belongs to another question",
            ));
        }
        if self.deleted {
            return Err(QnaError::InvalidArgument("cannot answer a deleted question"));
        }
        if self.find_answer(answer.id()).is_some() {
            return Err(QnaError::InvalidArgument("answer is already attached"));
        }
        self.answers.push(answer);
        Ok(())
    }

    /// Non-deleted answers in insertion order.
    ///
    /// The iterator is lazy and `Clone`; deleted answers are never yielded
    /// regardless of what the collection holds.
    pub fn answers(&self) -> impl Iterator<Item = &Answer> + Clone + '_ {
        visible(&self.answers)
    }

    /// Full collection including deleted answers, for history and storage.
    pub fn all_answers(&self) -> &[Answer] {
        self.answers.as_slice()
    }

    /// Looks up an attached answer, deleted or not.
    pub fn find_answer(&self, answer_id: AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|answer| answer.id() == answer_id)
    }

    /// Soft-deletes one attached answer.
    ///
    /// No ownership check happens here; only whole-question deletes verify
    /// who is asking.
    ///
    /// # Errors
    /// - `NotFound` when the answer is not part of this question.
    pub fn delete_answer(&mut self, answer_id: AnswerId) -> QnaResult<()> {
        let answer = self
            .answers
            .iter_mut()
            .find(|answer| answer.id() == answer_id)
            .ok_or(QnaError::NotFound(answer_id))?;
        answer.mark_deleted();
        Ok(())
    }

    /// Soft-deletes this question and its answers on behalf of `requester`.
    ///
    /// See `delete_at`.
    pub fn delete(&mut self, requester: &User) -> QnaResult<Vec<DeleteHistory>> {
        self.delete_at(requester, current_epoch_ms())
    }

    /// Soft-deletes this question and every live answer, stamping the
    /// returned history records with `deleted_at` (epoch milliseconds).
    ///
    /// Returns the question record first, then one record per answer deleted
    /// by this call in insertion order. An already deleted question yields no
    /// records.
    ///
    /// # Errors
    /// - `NotOwner` when `requester` is not the writer.
    /// - `CannotDeleteAnswerOfOther` when a live answer has another writer.
    pub fn delete_at(
        &mut self,
        requester: &User,
        deleted_at: i64,
    ) -> QnaResult<Vec<DeleteHistory>> {
        let writer_id = match &self.writer {
            Some(writer) if writer.is_same(requester) => writer.id(),
            _ => {
                return Err(QnaError::NotOwner {
                    question_id: self.id,
                    requester: requester.id(),
                })
            }
        };

        if self.deleted {
            return Ok(Vec::new());
        }

        if let Some(foreign) = self
            .answers()
            .find(|answer| answer.writer().id() != writer_id)
        {
            return Err(QnaError::CannotDeleteAnswerOfOther {
                question_id: self.id,
                answer_id: foreign.id(),
            });
        }

        let mut histories = Vec::with_capacity(self.answers.len() + 1);
        self.deleted = true;
        histories.push(DeleteHistory::new(
            ContentType::Question,
            self.id,
            requester.id(),
            deleted_at,
        ));

        for answer in self.answers.iter_mut().filter(|answer| !answer.is_deleted()) {
            answer.mark_deleted();
            histories.push(DeleteHistory::new(
                ContentType::Answer,
                answer.id(),
                requester.id(),
                deleted_at,
            ));
        }

        Ok(histories)
    }
}

impl SoftDelete for Question {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}
