//! Database crate for the task manager
//!
//! This crate provides the SQLite implementation of the TaskRepository trait,
//! with connection pooling, embedded migrations and error mapping into
//! `TaskError`.
//!
//! # Features
//!
//! - SQLite database support with WAL mode for file databases
//! - Single-connection pool for `sqlite::memory:` so every query sees the same data
//! - Database migrations with proper schema management
//! - Parameter binding for every user-supplied value, including search text
//!
//! # Usage
//!
//! ```rust
//! use database::SqliteTaskRepository;
//! use taskhub_core::repository::TaskRepository;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create repository (in-memory for testing)
//!     let repo = SqliteTaskRepository::in_memory().await?;
//!
//!     // Run migrations
//!     repo.migrate().await?;
//!
//!     // Repository is ready to use
//!     repo.health_check().await?;
//!     Ok(())
//! }
//! ```

mod common;
mod sqlite;

pub use sqlite::{ConnectionSettings, SqliteTaskRepository};

// Re-export commonly used types from taskhub-core for convenience
pub use taskhub_core::{
    error::{Result, TaskError},
    models::{Domain, Priority, Task, TaskDraft, TaskFilter, TaskId},
    repository::TaskRepository,
};
