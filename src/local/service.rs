use crate::local::item::{validate_title, TodoError, TodoItem};
use crate::local::store::InMemoryStore;

/// Business rules on top of an [`InMemoryStore`].
#[derive(Debug, Default)]
pub struct TodoService {
    store: InMemoryStore,
}

impl TodoService {
    pub fn new(store: InMemoryStore) -> Self {
        Self { store }
    }

    /// Adds an incomplete todo and returns its id.
    pub fn add_todo(&mut self, title: &str) -> Result<u32, TodoError> {
        let todo = TodoItem::new(0, title).map_err(|e| {
            log::error!("rejected todo title: {}", e);
            e
        })?;
        let id = self.store.create(todo)?;
        log::info!("added todo {}", id);
        Ok(id)
    }

    pub fn get_todo(&self, id: u32) -> Option<&TodoItem> {
        self.store.read(id)
    }

    pub fn get_all_todos(&self) -> Vec<TodoItem> {
        self.store.list_all()
    }

    /// Renames a todo. `Ok(false)` when the id is unknown.
    pub fn update_todo(&mut self, id: u32, title: &str) -> Result<bool, TodoError> {
        if id == 0 {
            return Err(TodoError::InvalidId);
        }
        let title = validate_title(title)?;
        let Some(existing) = self.store.read(id) else {
            return Ok(false);
        };

        let mut todo = existing.clone();
        todo.update_title(&title)?;
        Ok(self.store.update(id, todo))
    }

    /// Sets the completion flag. Returns false when the id is unknown.
    pub fn mark_complete(&mut self, id: u32, completed: bool) -> bool {
        let Some(existing) = self.store.read(id) else {
            return false;
        };

        let mut todo = existing.clone();
        if completed {
            todo.mark_complete();
        } else {
            todo.mark_incomplete();
        }
        self.store.update(id, todo)
    }

    pub fn delete_todo(&mut self, id: u32) -> bool {
        let removed = self.store.delete(id);
        if removed {
            log::info!("deleted todo {}", id);
        }
        removed
    }
}
