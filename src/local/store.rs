use std::collections::BTreeMap;

use crate::local::item::{TodoError, TodoItem};

/// Map-backed storage for [`TodoItem`]s, ordered by id.
#[derive(Debug)]
pub struct InMemoryStore {
    todos: BTreeMap<u32, TodoItem>,
    /// `None` once `u32::MAX` has been handed out.
    next_id: Option<u32>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            todos: BTreeMap::new(),
            next_id: Some(1),
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `todo`, assigning a fresh id when its id is 0. Returns the id used.
    ///
    /// A todo with an explicit id replaces any existing entry with that id.
    /// Fails with [`TodoError::IdsExhausted`] when an id is needed and none is left.
    pub fn create(&mut self, mut todo: TodoItem) -> Result<u32, TodoError> {
        if todo.id == 0 {
            todo.id = self.next_id().ok_or(TodoError::IdsExhausted)?;
        }
        let id = todo.id;
        self.next_id = self
            .next_id
            .zip(id.checked_add(1))
            .map(|(counter, after)| counter.max(after));
        self.todos.insert(id, todo);
        Ok(id)
    }

    pub fn read(&self, id: u32) -> Option<&TodoItem> {
        self.todos.get(&id)
    }

    /// Replaces an existing entry. Returns false when `id` is unknown.
    pub fn update(&mut self, id: u32, todo: TodoItem) -> bool {
        match self.todos.get_mut(&id) {
            Some(slot) => {
                *slot = TodoItem { id, ..todo };
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: u32) -> bool {
        self.todos.remove(&id).is_some()
    }

    pub fn list_all(&self) -> Vec<TodoItem> {
        self.todos.values().cloned().collect()
    }

    /// The id the next auto-assigned todo will get.
    ///
    /// Never an id currently in the store. Ids below the counter are not
    /// handed out again even after deletion. `None` when the id space is used up.
    pub fn next_id(&self) -> Option<u32> {
        let mut candidate = self.next_id?;
        while self.todos.contains_key(&candidate) {
            candidate = candidate.checked_add(1)?;
        }
        Some(candidate)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u32, title: &str) -> TodoItem {
        TodoItem::new(id, title).unwrap()
    }

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.create(item(0, "a")), Ok(1));
        assert_eq!(store.create(item(0, "b")), Ok(2));
        assert_eq!(store.read(2).unwrap().title, "b");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_next_id_skips_occupied_ids() {
        let mut store = InMemoryStore::new();
        store.create(item(0, "a")).unwrap();
        store.create(item(5, "explicit")).unwrap();
        store.create(item(6, "explicit")).unwrap();

        let next = store.next_id().unwrap();
        assert!(store.read(next).is_none());
        assert_eq!(next, 7);
    }

    #[test]
    fn test_ids_are_not_reused_after_deletions() {
        let mut store = InMemoryStore::new();
        let ids: Vec<u32> = (0..5).map(|_| store.create(item(0, "t")).unwrap()).collect();
        assert!(store.delete(ids[1]));
        assert!(store.delete(ids[4]));

        let fresh = store.create(item(0, "new")).unwrap();
        assert!(!ids.contains(&fresh));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_update_and_delete_unknown_ids() {
        let mut store = InMemoryStore::new();
        assert!(!store.update(3, item(3, "ghost")));
        assert!(!store.delete(3));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_keeps_the_slot_id() {
        let mut store = InMemoryStore::new();
        let id = store.create(item(0, "old")).unwrap();
        assert!(store.update(id, item(99, "new")));
        assert_eq!(store.read(id).unwrap().title, "new");
        assert_eq!(store.read(id).unwrap().id, id);
        assert!(store.read(99).is_none());
    }

    #[test]
    fn test_exhausted_id_space_is_an_error() {
        let mut store = InMemoryStore::new();
        assert_eq!(store.create(item(u32::MAX, "last")), Ok(u32::MAX));

        assert_eq!(store.next_id(), None);
        assert_eq!(store.create(item(0, "one more")), Err(TodoError::IdsExhausted));
        assert_eq!(store.len(), 1);

        // Freeing the top id does not make it reusable.
        assert!(store.delete(u32::MAX));
        assert_eq!(store.create(item(0, "again")), Err(TodoError::IdsExhausted));
    }

    #[test]
    fn test_list_all_is_id_ordered() {
        let mut store = InMemoryStore::new();
        store.create(item(3, "c")).unwrap();
        store.create(item(1, "a")).unwrap();
        store.create(item(2, "b")).unwrap();
        let titles: Vec<String> = store.list_all().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }
}
