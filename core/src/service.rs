use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    error::{Result, TaskError},
    models::{Task, TaskDraft, TaskFilter, TaskId},
    repository::TaskRepository,
    validation::TaskValidator,
};

/// Task service orchestrating validation and persistence.
///
/// The service is stateless apart from the shared repository handle, so one
/// instance can serve any number of concurrent requests. Every repository
/// call can be bounded by an operation timeout; when it expires the store
/// future is dropped and [`TaskError::Timeout`] is returned.
pub struct TaskService<R: ?Sized> {
    repository: Arc<R>,
    operation_timeout: Option<Duration>,
}

impl<R: ?Sized> Clone for TaskService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            operation_timeout: self.operation_timeout,
        }
    }
}

impl<R: TaskRepository + ?Sized> TaskService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            operation_timeout: None,
        }
    }

    /// Bound every store round-trip by `timeout`
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Get a clone of the repository Arc
    pub fn repository(&self) -> Arc<R> {
        self.repository.clone()
    }

    /// Validate and store a new task
    ///
    /// # Returns
    /// * `Ok(Task)` - The stored task with id and timestamps populated
    /// * `Err(validation kind)` - If the draft breaks a field rule, nothing is written
    /// * `Err(TaskError::Database)` - If the store fails
    pub async fn create_task(&self, task: TaskDraft) -> Result<Task> {
        TaskValidator::validate_task(&task)?;

        let created = self
            .run("failed to create task", self.repository.create(&task))
            .await?;
        debug!(task_id = %created.id, "task created");
        Ok(created)
    }

    /// Validate the merged record and overwrite the stored task
    ///
    /// The caller merges partial changes onto a fetched task first
    /// (see [`crate::models::UpdateTask::apply_to`]). Concurrent updates are
    /// last-write-wins.
    pub async fn update_task(&self, id: TaskId, task: TaskDraft) -> Result<Task> {
        require_id(id)?;
        TaskValidator::validate_task(&task)?;

        let updated = self
            .run("failed to update task", self.repository.update(id, &task))
            .await?
            .ok_or_else(|| TaskError::not_found_id(id))?;
        debug!(task_id = %id, "task updated");
        Ok(updated)
    }

    pub async fn get_task_by_id(&self, id: TaskId) -> Result<Task> {
        require_id(id)?;

        self.run("failed to get task by id", self.repository.get_by_id(id))
            .await?
            .ok_or_else(|| TaskError::not_found_id(id))
    }

    /// Every task, in insertion order
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>> {
        self.run("failed to get all tasks", self.repository.list_all())
            .await
    }

    /// Tasks matching all present predicates; an empty filter returns every task
    pub async fn get_task_by_filter(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        if filter.is_empty() {
            return self.get_all_tasks().await;
        }

        self.run(
            "failed to get tasks by filter",
            self.repository.list_filtered(filter),
        )
        .await
    }

    /// Case-insensitive substring search on titles
    pub async fn search_tasks(&self, query: &str) -> Result<Vec<Task>> {
        self.run("failed to search tasks", self.repository.search(query))
            .await
    }

    /// Delete a task. Deleting an unknown id succeeds.
    pub async fn delete_task(&self, id: TaskId) -> Result<()> {
        require_id(id)?;

        let removed = self
            .run("failed to delete task", self.repository.delete(id))
            .await?;
        if removed == 0 {
            debug!(task_id = %id, "delete matched no task");
        }
        Ok(())
    }

    /// Delete all listed tasks atomically and return how many were removed
    ///
    /// An empty list is a no-op and never reaches the store. Unknown ids are
    /// ignored; a nil id rejects the whole request.
    pub async fn bulk_delete_tasks(&self, ids: &[TaskId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        if ids.iter().any(Uuid::is_nil) {
            return Err(TaskError::MissingId);
        }

        let removed = self
            .run("failed to bulk delete tasks", self.repository.bulk_delete(ids))
            .await?;
        debug!(requested = ids.len(), removed, "bulk delete finished");
        Ok(removed)
    }

    /// Flip `completed` without re-running validation
    pub async fn toggle_status(&self, id: TaskId) -> Result<Task> {
        require_id(id)?;

        self.run(
            "failed to toggle task status",
            self.repository.toggle_status(id),
        )
        .await?
        .ok_or_else(|| TaskError::not_found_id(id))
    }

    pub async fn health_check(&self) -> Result<()> {
        self.run("health check failed", self.repository.health_check())
            .await
    }

    /// Run one store round-trip under the operation timeout and attach context to failures
    async fn run<T, F>(&self, operation: &'static str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let outcome = match self.operation_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(operation, timeout_ms = limit.as_millis() as u64, "store call timed out");
                    return Err(TaskError::Timeout(operation.to_string()));
                }
            },
            None => call.await,
        };

        outcome.map_err(|error| {
            if error.is_database() {
                warn!(operation, error = %error, "store call failed");
            }
            error.with_context(operation)
        })
    }
}

fn require_id(id: TaskId) -> Result<()> {
    if id.is_nil() {
        return Err(TaskError::MissingId);
    }
    Ok(())
}
