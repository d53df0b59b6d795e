//! Todo items: model, persistence and HTTP handlers.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → handlers.rs (validate id and body)
//!     → store.rs (SQLite via sqlx)
//!     → handlers.rs (log, count, JSON envelope)
//! ```

pub mod handlers;
pub mod model;
pub mod store;

pub use model::{NewTodo, Todo};
pub use store::{StoreError, TodoStore};
