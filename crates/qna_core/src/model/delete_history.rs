//! Delete history records emitted by cascade deletes.
//!
//! The domain only produces these records; persisting them is up to the
//! caller (see `DeleteHistoryRepository`).

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable delete history identifier.
pub type DeleteHistoryId = Uuid;

/// Kind of content a history record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Question,
    Answer,
}

impl ContentType {
    /// Stable string id used in storage.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Question => "question",
            Self::Answer => "answer",
        }
    }

    /// Parses the storage string id.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "question" => Some(Self::Question),
            "answer" => Some(Self::Answer),
            _ => None,
        }
    }
}

/// Audit entry: what was deleted, by whom, and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteHistory {
    id: DeleteHistoryId,
    content_type: ContentType,
    content_id: Uuid,
    deleted_by: UserId,
    /// Unix epoch milliseconds.
    deleted_at: i64,
}

impl DeleteHistory {
    pub fn new(
        content_type: ContentType,
        content_id: Uuid,
        deleted_by: UserId,
        deleted_at: i64,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), content_type, content_id, deleted_by, deleted_at)
    }

    pub fn with_id(
        id: DeleteHistoryId,
        content_type: ContentType,
        content_id: Uuid,
        deleted_by: UserId,
        deleted_at: i64,
    ) -> Self {
        Self {
            id,
            content_type,
            content_id,
            deleted_by,
            deleted_at,
        }
    }

    pub fn id(&self) -> DeleteHistoryId {
        self.id
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn content_id(&self) -> Uuid {
        self.content_id
    }

    pub fn deleted_by(&self) -> UserId {
        self.deleted_by
    }

    pub fn deleted_at(&self) -> i64 {
        self.deleted_at
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Falls back to `0` if the clock reports a time before the epoch.
pub fn current_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
