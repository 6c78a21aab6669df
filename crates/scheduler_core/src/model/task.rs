//! Task domain model.
//!
//! # Responsibility
//! - Define the record persisted by storage and exchanged on the wire.
//! - Validate caller-provided fields before they reach storage.
//!
//! # Invariants
//! - `title` must be non-blank for any persisted task.
//! - `id` is assigned by storage; callers only set it for updates.
//! - `date` holds canonical `YYYYMMDD` text once a task has been normalized.

use crate::model::date::is_canonical_date;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned task identifier.
pub type TaskId = i64;

/// Scheduled task record.
///
/// Serialized field names match the JSON wire format; `id` travels as a
/// string and empty optional fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, skip_serializing_if = "Option::is_none", with = "id_text")]
    pub id: Option<TaskId>,
    /// Due day, canonical `YYYYMMDD`. Blank input defaults to today.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// Raw repeat rule text; blank means the task does not recur.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub repeat: String,
}

/// Validation failures for caller-provided task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    EmptyTitle,
    MissingId,
    NonCanonicalDate(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title must not be empty"),
            Self::MissingId => write!(f, "task id is required"),
            Self::NonCanonicalDate(value) => {
                write!(f, "task date `{value}` is not canonical YYYYMMDD")
            }
        }
    }
}

impl Error for TaskValidationError {}

impl Task {
    /// Creates an unsaved task with the given due date and title.
    pub fn new(date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: None,
            date: date.into(),
            title: title.into(),
            comment: String::new(),
            repeat: String::new(),
        }
    }

    /// Sets the repeat rule text.
    pub fn with_repeat(mut self, repeat: impl Into<String>) -> Self {
        self.repeat = repeat.into();
        self
    }

    /// Sets the free-form comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Checks fields required for every write.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Checks everything storage requires, including a normalized date.
    pub fn validate_for_storage(&self) -> Result<(), TaskValidationError> {
        self.validate()?;
        if !is_canonical_date(&self.date) {
            return Err(TaskValidationError::NonCanonicalDate(self.date.clone()));
        }
        Ok(())
    }

    /// Returns the id required by update paths.
    pub fn require_id(&self) -> Result<TaskId, TaskValidationError> {
        self.id.ok_or(TaskValidationError::MissingId)
    }

    /// Returns the trimmed repeat rule, or `None` for one-shot tasks.
    pub fn repeat_rule(&self) -> Option<&str> {
        let rule = self.repeat.trim();
        (!rule.is_empty()).then_some(rule)
    }
}

/// Wire codec for ids: written as a decimal string, read from a string or
/// a JSON number. Empty strings read as "no id".
mod id_text {
    use super::TaskId;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(TaskId),
    }

    pub fn serialize<S: Serializer>(id: &Option<TaskId>, serializer: S) -> Result<S::Ok, S::Error> {
        match id {
            Some(id) => serializer.serialize_str(&id.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<TaskId>, D::Error> {
        match Option::<RawId>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawId::Number(id)) => Ok(Some(id)),
            Some(RawId::Text(text)) if text.trim().is_empty() => Ok(None),
            Some(RawId::Text(text)) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid task id `{text}`"))),
        }
    }
}
