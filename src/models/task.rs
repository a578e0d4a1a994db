use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Represents the priority of a task.
/// Stored as lowercase text in the `priority_level` column.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Default priority.
    #[default]
    Normal,
    /// High priority.
    High,
    /// Urgent priority.
    Urgent,
}

pub const DEFAULT_CATEGORY: &str = "General";

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Payload for creating a task.
///
/// The owner is never part of the payload; it comes from the authenticated account.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskCreate {
    /// Must contain at least one non-whitespace character.
    #[validate(length(min = 1), custom = "not_blank")]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_completed: bool,

    pub due_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub priority_level: TaskPriority,

    #[validate(length(min = 1, max = 50))]
    #[serde(default = "default_category")]
    pub category: String,
}

impl TaskCreate {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            description: None,
            is_completed: false,
            due_date: None,
            priority_level: TaskPriority::default(),
            category: default_category(),
        }
    }
}

/// Partial update of a task. Absent fields are left untouched.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1), custom = "not_blank")]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub is_completed: Option<bool>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority_level: Option<TaskPriority>,
    #[validate(length(min = 1, max = 50))]
    pub category: Option<String>,
}

/// Represents a task as stored in the `tasks` table and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    /// Identifier of the owning account.
    pub user_id: i64,
    pub due_date: Option<DateTime<Utc>>,
    pub priority_level: TaskPriority,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pagination for task listings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaskPage {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "TaskPage::default_limit")]
    pub limit: u32,
}

impl TaskPage {
    fn default_limit() -> u32 {
        100
    }
}

impl Default for TaskPage {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::default_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_create_defaults() {
        let input: TaskCreate = serde_json::from_str(r#"{"title": "Buy milk"}"#).unwrap();
        assert_eq!(input.title, "Buy milk");
        assert!(!input.is_completed);
        assert_eq!(input.priority_level, TaskPriority::Normal);
        assert_eq!(input.category, "General");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_task_validation() {
        assert!(TaskCreate::titled("Valid Task").validate().is_ok());
        assert!(TaskCreate::titled("").validate().is_err());
        assert!(TaskCreate::titled("   ").validate().is_err());
        assert!(TaskCreate::titled(&"a".repeat(500)).validate().is_ok());

        let mut long_description = TaskCreate::titled("ok");
        long_description.description = Some("b".repeat(1001));
        assert!(long_description.validate().is_err());
    }

    #[test]
    fn test_task_update_validation() {
        assert!(TaskUpdate::default().validate().is_ok());

        let blank_title = TaskUpdate {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(blank_title.validate().is_err());
    }

    #[test]
    fn test_priority_rejects_unknown_levels() {
        let parsed: Result<TaskCreate, _> =
            serde_json::from_str(r#"{"title": "x", "priority_level": "whenever"}"#);
        assert!(parsed.is_err());

        let parsed: TaskCreate =
            serde_json::from_str(r#"{"title": "x", "priority_level": "urgent"}"#).unwrap();
        assert_eq!(parsed.priority_level, TaskPriority::Urgent);
    }

    #[test]
    fn test_page_defaults() {
        let page: TaskPage = serde_json::from_str("{}").unwrap();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 100);
    }
}
