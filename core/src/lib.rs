//! Task Core Library
//!
//! This crate provides the domain models, validation rules, error kinds and
//! repository interface for the task manager, plus the service that ties
//! them together. Storage and transport crates depend on the types defined
//! here.
//!
//! # Architecture
//!
//! - [`models`] - Task, TaskDraft, UpdateTask, TaskFilter, Priority, Domain
//! - [`error`] - Error kinds and result alias
//! - [`validation`] - Field and backlog/deadline rules, pure functions
//! - [`repository`] - Repository trait for data persistence
//! - [`service`] - Validation before writes, typed not-found/missing-id errors
//!
//! # Example
//!
//! ```rust
//! use taskhub_core::{Domain, Priority, TaskDraft, TaskValidator};
//! use chrono::NaiveDate;
//!
//! let draft = TaskDraft::new("Write report", Priority::High, Domain::Work)
//!     .due(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
//!
//! // Validate the task before creation
//! TaskValidator::validate_task(&draft).unwrap();
//! ```

pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types at the crate root for convenience
pub use error::{Result, TaskError};
pub use models::{fold_case, Domain, Priority, Task, TaskDraft, TaskFilter, TaskId, UpdateTask};
pub use repository::TaskRepository;
pub use service::TaskService;
pub use validation::TaskValidator;

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
