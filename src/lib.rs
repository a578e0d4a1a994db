#![doc = "The `todoforge` library crate."]
#![doc = ""]
#![doc = "Accounts, bearer-token authentication and owner-scoped task CRUD over SQLite,"]
#![doc = "served with Actix Web, plus a standalone in-memory todo manager (`local`)."]
#![doc = "The binary (`main.rs`) only loads configuration and starts the server."]

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod local;
pub mod models;
pub mod routes;
pub mod store;

pub use app::AppState;
pub use error::AppError;
