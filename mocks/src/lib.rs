//! Mock implementations and test utilities for the task manager
//!
//! This crate provides the testing infrastructure shared by every other crate:
//! - An in-memory `TaskRepository` with error injection and call tracking
//! - Builders and fixtures for drafts, tasks and filters
//! - Random data generators and proptest strategies
//! - Assertion helpers
//! - A repository contract suite any `TaskRepository` implementation must pass

pub mod assertions;
pub mod builders;
pub mod contracts;
pub mod fixtures;
pub mod generators;
pub mod repository;

pub use assertions::*;
pub use builders::*;
pub use contracts::*;
pub use fixtures::*;
pub use generators::*;
pub use repository::MockTaskRepository;
