//! Mock implementation of TaskRepository trait
//!
//! Provides a thread-safe in-memory repository with:
//! - Insertion-ordered storage, same ordering contract as the SQLite store
//! - Error injection capabilities
//! - Artificial latency for timeout testing
//! - Call tracking for verification

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use taskhub_core::{
    fold_case, Domain, Priority, Result, Task, TaskDraft, TaskError, TaskFilter, TaskId,
    TaskRepository,
};
use uuid::Uuid;

/// Mock implementation of TaskRepository for testing
///
/// Drafts are stored as given; callers that want validation go through
/// `TaskService`. Unknown priority or domain spellings are rejected the way a
/// store constraint would reject them.
#[derive(Clone)]
pub struct MockTaskRepository {
    tasks: Arc<Mutex<Vec<Task>>>,
    error_injection: Arc<Mutex<Option<TaskError>>>,
    latency: Arc<Mutex<Option<Duration>>>,
    call_history: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTaskRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(Vec::new())),
            error_injection: Arc::new(Mutex::new(None)),
            latency: Arc::new(Mutex::new(None)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create mock repository with pre-populated tasks, kept in the given order
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let repo = Self::new();
        *repo.tasks.lock() = tasks;
        repo
    }

    /// Inject error for next operation
    pub fn inject_error(&self, error: TaskError) {
        *self.error_injection.lock() = Some(error);
    }

    /// Clear error injection
    pub fn clear_error(&self) {
        *self.error_injection.lock() = None;
    }

    /// Delay every subsequent operation by `latency`
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    /// Number of stored tasks
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }

    /// Get history of called methods
    pub fn call_history(&self) -> Vec<String> {
        self.call_history.lock().clone()
    }

    /// Clear call history
    pub fn clear_history(&self) {
        self.call_history.lock().clear();
    }

    /// Assert method was called
    pub fn assert_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            history.iter().any(|call| call.starts_with(method)),
            "Method '{}' was not called. Call history: {:?}",
            method,
            *history
        );
    }

    /// Assert method was never called
    pub fn assert_not_called(&self, method: &str) {
        let history = self.call_history.lock();
        assert!(
            !history.iter().any(|call| call.starts_with(method)),
            "Method '{}' was called. Call history: {:?}",
            method,
            *history
        );
    }

    /// Record the call, apply latency, then consume any injected error
    async fn enter(&self, method: &str, params: &str) -> Result<()> {
        self.call_history.lock().push(format!("{method}({params})"));

        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match self.error_injection.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn parse_enums(task: &TaskDraft) -> Result<(Priority, Domain)> {
    let priority = task.priority.parse().map_err(|_| {
        TaskError::Database(format!("CHECK constraint failed: priority '{}'", task.priority))
    })?;
    let domain = task.domain.parse().map_err(|_| {
        TaskError::Database(format!("CHECK constraint failed: domain '{}'", task.domain))
    })?;
    Ok((priority, domain))
}

/// Next write timestamp, strictly after `previous`
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + chrono::Duration::microseconds(1)
    }
}

#[async_trait]
impl TaskRepository for MockTaskRepository {
    async fn create(&self, task: &TaskDraft) -> Result<Task> {
        self.enter("create", &format!("title={}", task.title)).await?;
        let (priority, domain) = parse_enums(task)?;

        let now = Utc::now();
        let created = Task {
            id: Uuid::new_v4(),
            title: task.title.clone(),
            description: task.description.clone(),
            priority,
            domain,
            project_id: task.project_id,
            uni_module_id: task.uni_module_id,
            deadline: task.deadline,
            is_backlog: task.is_backlog,
            completed: task.completed,
            created_at: now,
            updated_at: now,
        };

        self.tasks.lock().push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: TaskId, task: &TaskDraft) -> Result<Option<Task>> {
        self.enter("update", &format!("id={id}")).await?;
        let (priority, domain) = parse_enums(task)?;

        let mut tasks = self.tasks.lock();
        let Some(stored) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        stored.title = task.title.clone();
        stored.description = task.description.clone();
        stored.priority = priority;
        stored.domain = domain;
        stored.project_id = task.project_id;
        stored.uni_module_id = task.uni_module_id;
        stored.deadline = task.deadline;
        stored.is_backlog = task.is_backlog;
        stored.completed = task.completed;
        stored.updated_at = next_timestamp(stored.updated_at);

        Ok(Some(stored.clone()))
    }

    async fn get_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        self.enter("get_by_id", &format!("id={id}")).await?;

        let tasks = self.tasks.lock();
        Ok(tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Task>> {
        self.enter("list_all", "").await?;

        Ok(self.tasks.lock().clone())
    }

    async fn list_filtered(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.enter("list_filtered", &format!("{filter:?}")).await?;

        let tasks = self.tasks.lock();
        Ok(tasks.iter().filter(|t| filter.matches(t)).cloned().collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Task>> {
        self.enter("search", &format!("query={query}")).await?;

        let needle = fold_case(query);
        let tasks = self.tasks.lock();
        Ok(tasks
            .iter()
            .filter(|t| fold_case(&t.title).contains(&needle))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: TaskId) -> Result<u64> {
        self.enter("delete", &format!("id={id}")).await?;

        let mut tasks = self.tasks.lock();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok((before - tasks.len()) as u64)
    }

    async fn bulk_delete(&self, ids: &[TaskId]) -> Result<u64> {
        self.enter("bulk_delete", &format!("count={}", ids.len())).await?;

        // Single lock scope: all-or-nothing like the SQL statement
        let mut tasks = self.tasks.lock();
        let before = tasks.len();
        tasks.retain(|t| !ids.contains(&t.id));
        Ok((before - tasks.len()) as u64)
    }

    async fn toggle_status(&self, id: TaskId) -> Result<Option<Task>> {
        self.enter("toggle_status", &format!("id={id}")).await?;

        let mut tasks = self.tasks.lock();
        Ok(tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.completed = !task.completed;
            task.updated_at = next_timestamp(task.updated_at);
            task.clone()
        }))
    }

    async fn health_check(&self) -> Result<()> {
        self.enter("health_check", "").await?;

        // Mock always reports healthy
        Ok(())
    }
}
