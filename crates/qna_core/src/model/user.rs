//! Board user: the ownership token for questions and answers.
//!
//! # Invariants
//! - `id` is stable, non-nil and never reused.
//! - Equality and hashing consider `id` only.
//! - Users are immutable once created.

use crate::model::error::{QnaError, QnaResult};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use uuid::Uuid;

/// Stable user identifier.
pub type UserId = Uuid;

/// Registered board user.
///
/// Deserialization goes through `with_id`, so a nil id is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "UserRecord")]
pub struct User {
    id: UserId,
    /// Login name, unique per board.
    user_id: String,
    password: String,
    name: String,
    email: String,
}

#[derive(Deserialize)]
struct UserRecord {
    id: UserId,
    user_id: String,
    password: String,
    name: String,
    email: String,
}

impl TryFrom<UserRecord> for User {
    type Error = QnaError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        User::with_id(
            record.id,
            record.user_id,
            record.password,
            record.name,
            record.email,
        )
    }
}

impl User {
    /// Creates a user with a generated stable ID.
    pub fn new(
        user_id: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            password: password.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Creates a user with a caller-provided ID (load/import paths).
    ///
    /// # Errors
    /// - `InvalidArgument` when `id` is nil.
    pub fn with_id(
        id: UserId,
        user_id: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> QnaResult<Self> {
        if id.is_nil() {
            return Err(QnaError::InvalidArgument("user id must not be nil"));
        }
        Ok(Self {
            id,
            user_id: user_id.into(),
            password: password.into(),
            name: name.into(),
            email: email.into(),
        })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn user_id(&self) -> &str {
        self.user_id.as_str()
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub(crate) fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Checks a login attempt against the stored password.
    pub fn matches_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Returns whether `other` is the same identity as `self`.
    pub fn is_same(&self, other: &User) -> bool {
        self.id == other.id
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::User;
    use crate::model::error::QnaError;
    use uuid::Uuid;

    #[test]
    fn equality_is_by_id_only() {
        let id = Uuid::new_v4();
        let a = User::with_id(id, "javajigi", "password", "name", "javajigi@slipp.net").unwrap();
        let b = User::with_id(id, "renamed", "other", "other", "other@slipp.net").unwrap();
        let c = User::new("javajigi", "password", "name", "javajigi@slipp.net");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn with_id_rejects_nil() {
        let err = User::with_id(Uuid::nil(), "x", "y", "z", "w").unwrap_err();
        assert!(matches!(err, QnaError::InvalidArgument(_)));
    }

    #[test]
    fn deserialize_keeps_password_and_rejects_nil_id() {
        let user = User::new("javajigi", "secret", "name", "javajigi@slipp.net");
        let json = serde_json::to_value(&user).unwrap();

        let decoded: User = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(decoded, user);
        assert!(decoded.matches_password("secret"));

        let mut nil = json;
        nil["id"] = serde_json::json!(Uuid::nil().to_string());
        let err = serde_json::from_value::<User>(nil).unwrap_err();
        assert!(err.to_string().contains("user id must not be nil"));
    }

    #[test]
    fn matches_password_compares_exactly() {
        let user = User::new("sanjigi", "secret", "name", "sanjigi@slipp.net");
        assert!(user.matches_password("secret"));
        assert!(!user.matches_password("Secret"));
    }
}
