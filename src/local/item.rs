use serde::{Deserialize, Serialize};

pub const MAX_TITLE_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TodoError {
    #[error("Todo title cannot be empty or whitespace only")]
    BlankTitle,
    #[error("Todo title cannot exceed 500 characters")]
    TitleTooLong,
    #[error("Todo ID must be a positive integer")]
    InvalidId,
    #[error("No todo ids left to assign")]
    IdsExhausted,
}

/// A single in-memory todo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: u32,
    pub title: String,
    pub completed: bool,
}

impl TodoItem {
    /// Builds an incomplete item with a trimmed, validated title.
    ///
    /// An `id` of 0 is allowed and means "not assigned yet"; the store replaces it.
    pub fn new(id: u32, title: &str) -> Result<Self, TodoError> {
        Ok(Self {
            id,
            title: validate_title(title)?,
            completed: false,
        })
    }

    pub fn update_title(&mut self, title: &str) -> Result<(), TodoError> {
        self.title = validate_title(title)?;
        Ok(())
    }

    pub fn mark_complete(&mut self) {
        self.completed = true;
    }

    pub fn mark_incomplete(&mut self) {
        self.completed = false;
    }
}

/// Returns the trimmed title, or why it is unacceptable.
///
/// The length limit applies to the untrimmed input.
pub fn validate_title(title: &str) -> Result<String, TodoError> {
    if title.trim().is_empty() {
        return Err(TodoError::BlankTitle);
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(TodoError::TitleTooLong);
    }
    Ok(title.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_and_starts_incomplete() {
        let item = TodoItem::new(1, "  Buy milk ").unwrap();
        assert_eq!(item.title, "Buy milk");
        assert!(!item.completed);
    }

    #[test]
    fn test_title_rules() {
        assert_eq!(TodoItem::new(1, "   "), Err(TodoError::BlankTitle));
        assert_eq!(TodoItem::new(1, ""), Err(TodoError::BlankTitle));
        assert_eq!(
            TodoItem::new(1, &"x".repeat(MAX_TITLE_CHARS + 1)),
            Err(TodoError::TitleTooLong)
        );
        assert!(TodoItem::new(1, &"x".repeat(MAX_TITLE_CHARS)).is_ok());
    }

    #[test]
    fn test_completion_toggles() {
        let mut item = TodoItem::new(1, "task").unwrap();
        item.mark_complete();
        assert!(item.completed);
        item.mark_incomplete();
        assert!(!item.completed);
    }

    #[test]
    fn test_failed_rename_keeps_title() {
        let mut item = TodoItem::new(1, "keep me").unwrap();
        assert!(item.update_title(" ").is_err());
        assert_eq!(item.title, "keep me");
    }
}
