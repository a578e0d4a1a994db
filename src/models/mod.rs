pub mod account;
pub mod task;

pub use account::{Account, AccountRole};
pub use task::{Task, TaskCreate, TaskPage, TaskPriority, TaskUpdate};
