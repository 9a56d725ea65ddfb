//! HTTP API for the task manager
//!
//! This crate exposes `TaskService` over JSON/HTTP with axum. It provides:
//!
//! - Routes under `/api/tasks` plus `/health`
//! - Request/response bodies with `task_id` ids and `YYYY-MM-DD` deadlines
//! - Error mapping from core errors to HTTP status codes
//! - CORS, request timeout and request logging layers
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use http_api::{create_router, serve, RouterOptions};
//! use taskhub_core::{TaskRepository, TaskService};
//!
//! async fn start(repository: Arc<dyn TaskRepository>) -> std::io::Result<()> {
//!     let router = create_router(TaskService::new(repository), &RouterOptions::default());
//!     serve(router, "127.0.0.1:8080".parse().unwrap(), std::future::pending()).await
//! }
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod request_logger;
pub mod router;

// Re-export key types for easier usage
pub use dto::*;
pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_router, serve, RouterOptions};
