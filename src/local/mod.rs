//! The standalone in-memory todo manager.
//!
//! Nothing here touches the database or the web layer: a [`TodoService`] wraps an
//! [`InMemoryStore`] keyed by positive integer ids.

pub mod item;
pub mod service;
pub mod store;

pub use item::{TodoError, TodoItem, MAX_TITLE_CHARS};
pub use service::TodoService;
pub use store::InMemoryStore;
