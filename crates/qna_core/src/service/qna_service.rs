//! Q&A use-case service.
//!
//! # Responsibility
//! - Drive the load-mutate-save cycle around the `Question` aggregate.
//! - Persist the delete history records produced by cascade deletes.
//!
//! # Invariants
//! - Only live (not deleted) questions are loaded for mutation.
//! - Nothing is saved when the aggregate operation fails.
//! - A question delete and its history records are committed together.
//! - Service layer remains storage-agnostic.

use crate::model::answer::{Answer, AnswerId};
use crate::model::delete_history::DeleteHistory;
use crate::model::error::QnaError;
use crate::model::question::{Question, QuestionId};
use crate::model::user::User;
use crate::repo::delete_history_repo::DeleteHistoryRepository;
use crate::repo::question_repo::QuestionRepository;
use crate::repo::unit_of_work::UnitOfWork;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from Q&A service operations.
#[derive(Debug)]
pub enum ServiceError {
    /// Question does not exist or is soft-deleted.
    QuestionNotFound(QuestionId),
    /// Aggregate rule rejected the operation.
    Domain(QnaError),
    /// Repository-level failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuestionNotFound(id) => write!(f, "question not found: {id}"),
            Self::Domain(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::QuestionNotFound(_) => None,
            Self::Domain(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<QnaError> for ServiceError {
    fn from(value: QnaError) -> Self {
        Self::Domain(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Domain(err) => Self::Domain(err),
            other => Self::Repo(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Q&A service facade.
pub struct QnaService<Q, H, U>
where
    Q: QuestionRepository,
    H: DeleteHistoryRepository,
    U: UnitOfWork,
{
    questions: Q,
    histories: H,
    unit_of_work: U,
}

impl<Q, H, U> QnaService<Q, H, U>
where
    Q: QuestionRepository,
    H: DeleteHistoryRepository,
    U: UnitOfWork,
{
    /// Creates service from repository implementations.
    ///
    /// `unit_of_work` must cover the storage both repositories write to.
    pub fn new(questions: Q, histories: H, unit_of_work: U) -> Self {
        Self {
            questions,
            histories,
            unit_of_work,
        }
    }

    /// Attributes a draft question to `writer` and stores it.
    pub fn ask(
        &self,
        writer: &User,
        title: impl Into<String>,
        contents: impl Into<String>,
    ) -> ServiceResult<Question> {
        let question = Question::new(title, contents).write_by(Some(writer))?;
        self.questions.save(&question)?;
        Ok(question)
    }

    /// Gets one live question.
    pub fn find_question(&self, question_id: QuestionId) -> ServiceResult<Option<Question>> {
        Ok(self.questions.find_by_id_not_deleted(question_id)?)
    }

    /// Lists live questions.
    pub fn list_questions(&self) -> ServiceResult<Vec<Question>> {
        Ok(self.questions.find_all_not_deleted()?)
    }

    /// Answers a live question and stores the updated aggregate.
    pub fn add_answer(
        &self,
        writer: &User,
        question_id: QuestionId,
        contents: impl Into<String>,
    ) -> ServiceResult<Answer> {
        let mut question = self.load_live(question_id)?;
        let answer = Answer::new(Some(writer), Some(&question), contents)?;
        question.add_answer(answer.clone())?;
        self.questions.save(&question)?;
        Ok(answer)
    }

    /// Soft-deletes one answer of a live question.
    ///
    /// No ownership check is applied, matching `Question::delete_answer`.
    pub fn delete_answer(&self, question_id: QuestionId, answer_id: AnswerId) -> ServiceResult<()> {
        let mut question = self.load_live(question_id)?;
        question.delete_answer(answer_id)?;
        self.questions.save(&question)?;
        info!(
            "event=answer_delete module=service status=ok question_id={question_id} answer_id={answer_id}"
        );
        Ok(())
    }

    /// Soft-deletes a question and its answers on behalf of `requester`, then
    /// stores the aggregate and the produced delete histories.
    ///
    /// # Errors
    /// - `QuestionNotFound` when the question is missing or already deleted.
    /// - `Domain(NotOwner | CannotDeleteAnswerOfOther)` from the aggregate;
    ///   nothing is persisted in that case.
    /// - `Repo` when either write fails; both are rolled back.
    pub fn delete_question(
        &self,
        requester: &User,
        question_id: QuestionId,
    ) -> ServiceResult<Vec<DeleteHistory>> {
        let mut question = self.load_live(question_id)?;
        let histories = match question.delete(requester) {
            Ok(histories) => histories,
            Err(err) => {
                warn!(
                    "event=question_delete module=service status=rejected question_id={question_id} requester={} error={err}",
                    requester.id()
                );
                return Err(err.into());
            }
        };

        self.unit_of_work.run(|| -> ServiceResult<()> {
            self.questions.save(&question)?;
            self.histories.save_all(&histories)?;
            Ok(())
        })?;

        info!(
            "event=question_delete module=service status=ok question_id={question_id} requester={} records={}",
            requester.id(),
            histories.len()
        );
        Ok(histories)
    }

    fn load_live(&self, question_id: QuestionId) -> ServiceResult<Question> {
        self.questions
            .find_by_id_not_deleted(question_id)?
            .ok_or(ServiceError::QuestionNotFound(question_id))
    }
}
