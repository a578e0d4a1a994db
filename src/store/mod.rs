//! Data access over the storage provider.
//!
//! `accounts` is the account directory, `tasks` the owner-scoped task repository.
//! Both take the pool per call; connections are checked out per statement (or per
//! transaction) and returned to the pool on every exit path.

pub mod accounts;
pub mod tasks;
