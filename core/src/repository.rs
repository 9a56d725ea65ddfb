use async_trait::async_trait;

use crate::{
    error::Result,
    models::{Task, TaskDraft, TaskFilter, TaskId},
};

/// Repository trait for task persistence and retrieval operations
///
/// Implementations hold no per-request state, must be safe to share across
/// concurrent callers, and must pass every user-supplied value to the store
/// as a bound parameter. Missing rows are reported as `None` or a zero count;
/// turning those into errors is the service's job.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Insert a new task
    ///
    /// # Returns
    /// * `Ok(Task)` - The stored task with assigned ID and timestamps
    /// * `Err(TaskError::Database)` - If the store operation fails
    async fn create(&self, task: &TaskDraft) -> Result<Task>;

    /// Overwrite every writable field of an existing task and refresh `updated_at`
    ///
    /// # Returns
    /// * `Ok(Some(Task))` - The updated task
    /// * `Ok(None)` - If no task exists with that ID
    /// * `Err(TaskError::Database)` - If the store operation fails
    async fn update(&self, id: TaskId, task: &TaskDraft) -> Result<Option<Task>>;

    /// Get a task by its ID
    ///
    /// # Returns
    /// * `Ok(Some(Task))` - The task if found
    /// * `Ok(None)` - If no task exists with that ID
    /// * `Err(TaskError::Database)` - If the store operation fails
    async fn get_by_id(&self, id: TaskId) -> Result<Option<Task>>;

    /// List every task in insertion order
    async fn list_all(&self) -> Result<Vec<Task>>;

    /// List tasks matching the AND of all present filter predicates, in insertion order
    async fn list_filtered(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Case-insensitive substring search on `title`, in insertion order
    ///
    /// The query is matched literally; an empty query matches every task.
    async fn search(&self, query: &str) -> Result<Vec<Task>>;

    /// Delete a single task
    ///
    /// # Returns
    /// * `Ok(n)` - Number of rows removed (0 or 1)
    async fn delete(&self, id: TaskId) -> Result<u64>;

    /// Delete every task whose ID is in `ids` in one atomic statement
    ///
    /// # Returns
    /// * `Ok(n)` - Number of rows removed
    async fn bulk_delete(&self, ids: &[TaskId]) -> Result<u64>;

    /// Flip `completed` and refresh `updated_at`
    ///
    /// # Returns
    /// * `Ok(Some(Task))` - The task after the flip
    /// * `Ok(None)` - If no task exists with that ID
    async fn toggle_status(&self, id: TaskId) -> Result<Option<Task>>;

    /// Verify the store is reachable
    async fn health_check(&self) -> Result<()>;
}
