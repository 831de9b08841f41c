use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::user::PublicUser;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    /// Task is still open.
    Pending,
    /// Task is completed.
    Done,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

/// Exact-match parsing, used for the lenient `status` query parameter: the
/// handler drops values that do not parse instead of rejecting the request.
impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(TaskStatus::Pending),
            "Done" => Ok(TaskStatus::Done),
            _ => Err(()),
        }
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Input structure for creating a task.
///
/// Title and description are required and must contain something other than
/// whitespace; the remaining fields fall back to their defaults when omitted.
#[derive(Debug, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(custom = "not_blank")]
    pub title: String,

    #[validate(custom = "not_blank")]
    pub description: String,

    pub status: Option<TaskStatus>,

    #[serde(rename = "isImportant")]
    pub is_important: Option<bool>,

    pub category: Option<String>,
}

/// Partial update payload for PATCH. Only the fields named here can be
/// overlaid onto a stored task; anything else in the request body — notably
/// `creator` — is dropped during deserialization, so ownership cannot be
/// reassigned through an edit.
///
/// Unlike creation, an update may set `description` (or `title`) to an empty
/// string; the original system behaves the same way.
#[derive(Debug, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    #[serde(rename = "isImportant")]
    pub is_important: Option<bool>,
    pub category: Option<String>,
}

impl TaskUpdate {
    /// Overlays the set fields onto `task`, leaving omitted fields untouched.
    /// `creator` and `created_at` are not reachable from here by construction.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(is_important) = self.is_important {
            task.is_important = is_important;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
    }
}

/// Represents a task entity as stored by the backend. The raw `creator` UUID
/// is internal; API responses go through [`PopulatedTask`].
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    /// Id of the user who created the task. Set once, never reassigned.
    pub creator: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub is_important: bool,
    /// Free-form label; defaults to "General".
    pub category: String,
    /// Timestamp of when the task was created. Immutable.
    pub created_at: DateTime<Utc>,
}

/// A task as returned by the API: the creator reference is resolved to
/// `{id, username}`, or `null` when the referenced user no longer exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedTask {
    pub id: Uuid,
    pub creator: Option<PublicUser>,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub is_important: bool,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `Task` from a validated `TaskInput` and the creator's id.
    ///
    /// Title and description are stored trimmed. Omitted status, importance,
    /// and category take their defaults; an explicitly empty category also
    /// falls back to "General".
    pub fn new(input: TaskInput, creator: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            creator,
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            status: input.status.unwrap_or_default(),
            is_important: input.is_important.unwrap_or(false),
            category: match input.category {
                Some(category) if !category.is_empty() => category,
                _ => "General".to_string(),
            },
            created_at: Utc::now(),
        }
    }

    /// Pairs the task with its resolved creator for serialization.
    pub fn populate(self, creator: Option<PublicUser>) -> PopulatedTask {
        PopulatedTask {
            id: self.id,
            creator,
            title: self.title,
            description: self.description,
            status: self.status,
            is_important: self.is_important,
            category: self.category,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(title: &str, description: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: description.to_string(),
            status: None,
            is_important: None,
            category: None,
        }
    }

    #[test]
    fn test_task_creation_defaults() {
        let creator = Uuid::new_v4();
        let task = Task::new(input("  Write report  ", "Q3 summary"), creator);

        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, "Q3 summary");
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(!task.is_important);
        assert_eq!(task.category, "General");
        assert_eq!(task.creator, creator);
    }

    #[test]
    fn test_empty_category_falls_back_to_general() {
        let mut raw = input("t", "d");
        raw.category = Some(String::new());
        let task = Task::new(raw, Uuid::new_v4());
        assert_eq!(task.category, "General");
    }

    #[test]
    fn test_task_input_validation() {
        assert!(input("Valid Title", "Valid description").validate().is_ok());
        assert!(input("", "desc").validate().is_err());
        assert!(input("   ", "desc").validate().is_err());
        assert!(input("title", "   ").validate().is_err());
    }

    #[test]
    fn test_update_strips_creator_field() {
        // The payload carries a creator; deserialization into the allow-list
        // struct discards it.
        let update: TaskUpdate = serde_json::from_value(json!({
            "title": "Renamed",
            "creator": Uuid::new_v4().to_string(),
        }))
        .unwrap();

        let owner = Uuid::new_v4();
        let mut task = Task::new(input("Original", "desc"), owner);
        update.apply(&mut task);

        assert_eq!(task.title, "Renamed");
        assert_eq!(task.creator, owner);
    }

    #[test]
    fn test_update_leaves_omitted_fields_untouched() {
        let update: TaskUpdate = serde_json::from_value(json!({
            "status": "Done",
        }))
        .unwrap();

        let mut task = Task::new(input("Keep me", "and me"), Uuid::new_v4());
        update.apply(&mut task);

        assert_eq!(task.status, TaskStatus::Done);
        assert_eq!(task.title, "Keep me");
        assert_eq!(task.description, "and me");
    }

    #[test]
    fn test_update_may_blank_description() {
        let update: TaskUpdate = serde_json::from_value(json!({
            "description": "",
        }))
        .unwrap();

        let mut task = Task::new(input("t", "non-empty"), Uuid::new_v4());
        update.apply(&mut task);
        assert_eq!(task.description, "");
    }

    #[test]
    fn test_status_query_parsing_is_exact() {
        assert_eq!("Pending".parse::<TaskStatus>(), Ok(TaskStatus::Pending));
        assert_eq!("Done".parse::<TaskStatus>(), Ok(TaskStatus::Done));
        assert!("done".parse::<TaskStatus>().is_err());
        assert!("InProgress".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_populated_task_uses_camel_case_keys() {
        let task = Task::new(input("t", "d"), Uuid::new_v4());
        let populated = task.populate(None);
        let json = serde_json::to_value(&populated).unwrap();

        assert!(json.get("isImportant").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json["creator"].is_null());
        assert_eq!(json["status"], "Pending");
    }
}
