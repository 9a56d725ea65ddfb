use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    Sqlite, SqlitePool,
};
use taskhub_core::{
    error::{Result, TaskError},
    models::{fold_case, Task, TaskDraft, TaskFilter, TaskId},
    repository::TaskRepository,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::common::{
    build_bulk_delete_query, build_filter_query, row_to_task, sqlx_error_to_task_error,
    WriteClock, TASK_COLUMNS,
};

/// Connection pool settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// SQLite implementation of the TaskRepository trait
///
/// Every user-supplied value is passed as a bound parameter. Results come
/// back in insertion order (`ORDER BY rowid`).
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
    clock: Arc<WriteClock>,
}

impl SqliteTaskRepository {
    /// Create a new SQLite repository with the given database URL
    ///
    /// # Arguments
    /// * `database_url` - SQLite database URL (`sqlite://path`, a bare path,
    ///   or `sqlite::memory:`)
    ///
    /// # Returns
    /// * `Ok(SqliteTaskRepository)` - Successfully connected repository
    /// * `Err(TaskError::Database)` - If connection fails
    ///
    /// # Examples
    /// ```rust,no_run
    /// use database::{ConnectionSettings, SqliteTaskRepository};
    ///
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let settings = ConnectionSettings::default();
    /// let repo = SqliteTaskRepository::new("sqlite:///tmp/tasks.db", settings).await?;
    /// repo.migrate().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(database_url: &str, settings: ConnectionSettings) -> Result<Self> {
        if is_memory_url(database_url) {
            return Self::in_memory().await;
        }

        let db_url = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{database_url}")
        };

        // Create database if it doesn't exist
        if !Sqlite::database_exists(&db_url).await.unwrap_or(false) {
            match Sqlite::create_database(&db_url).await {
                Ok(_) => info!(url = %db_url, "Database created successfully"),
                Err(error) => {
                    tracing::error!("Error creating database: {}", error);
                    return Err(TaskError::Database(format!(
                        "Failed to create database: {error}"
                    )));
                }
            }
        }

        let connect_options = SqliteConnectOptions::from_str(&db_url)
            .map_err(sqlx_error_to_task_error)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections.max(1))
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(connect_options)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(Self::from_pool(pool))
    }

    /// Private in-memory database, used by tests and the `sqlite::memory:` URL
    ///
    /// Each SQLite connection to `:memory:` opens its own database, so the
    /// pool holds exactly one connection and never recycles it.
    pub async fn in_memory() -> Result<Self> {
        let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(sqlx_error_to_task_error)?
            .journal_mode(SqliteJournalMode::Memory)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(connect_options)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(Self::from_pool(pool))
    }

    fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            clock: Arc::default(),
        }
    }

    /// Run database migrations
    ///
    /// This method applies all pending migrations to bring the database schema
    /// up to date. It should be called after creating a new repository instance.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| TaskError::Database(format!("Migration failed: {e}")))?;

        let latest: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT max(updated_at) FROM tasks")
                .fetch_one(&self.pool)
                .await
                .map_err(sqlx_error_to_task_error)?;
        if let Some(latest) = latest {
            self.clock.observe(latest);
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get access to the underlying database pool for custom operations
    ///
    /// This method is primarily intended for testing scenarios where
    /// direct SQL execution is needed.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn fetch_tasks(&self, sql: &str, bind: Option<String>) -> Result<Vec<Task>> {
        let mut query = sqlx::query(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        rows.iter().map(row_to_task).collect()
    }
}

fn is_memory_url(url: &str) -> bool {
    matches!(url, ":memory:" | "sqlite::memory:" | "sqlite://:memory:")
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: &TaskDraft) -> Result<Task> {
        let id = Uuid::new_v4();
        let now = self.clock.next();

        let row = sqlx::query(&format!(
            "INSERT INTO tasks (id, title, title_folded, description, priority, domain, \
             project_id, uni_module_id, deadline, is_backlog, completed, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id.to_string())
        .bind(&task.title)
        .bind(fold_case(&task.title))
        .bind(&task.description)
        .bind(&task.priority)
        .bind(&task.domain)
        .bind(task.project_id.map(|p| p.to_string()))
        .bind(task.uni_module_id.map(|m| m.to_string()))
        .bind(task.deadline)
        .bind(task.is_backlog)
        .bind(task.completed)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(sqlx_error_to_task_error)?;

        debug!(task_id = %id, "inserted task");
        row_to_task(&row)
    }

    async fn update(&self, id: TaskId, task: &TaskDraft) -> Result<Option<Task>> {
        let row = sqlx::query(&format!(
            "UPDATE tasks SET title = ?, title_folded = ?, description = ?, priority = ?, \
             domain = ?, project_id = ?, uni_module_id = ?, deadline = ?, is_backlog = ?, \
             completed = ?, updated_at = ? \
             WHERE id = ? \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(&task.title)
        .bind(fold_case(&task.title))
        .bind(&task.description)
        .bind(&task.priority)
        .bind(&task.domain)
        .bind(task.project_id.map(|p| p.to_string()))
        .bind(task.uni_module_id.map(|m| m.to_string()))
        .bind(task.deadline)
        .bind(task.is_backlog)
        .bind(task.completed)
        .bind(self.clock.next())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_error_to_task_error)?;

        row.as_ref().map(row_to_task).transpose()
    }

    async fn get_by_id(&self, id: TaskId) -> Result<Option<Task>> {
        let row = sqlx::query(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        row.as_ref().map(row_to_task).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Task>> {
        self.fetch_tasks(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY rowid"), None)
            .await
    }

    async fn list_filtered(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut query_builder = build_filter_query(filter);
        let rows = query_builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        rows.iter().map(row_to_task).collect()
    }

    /// Literal substring match on the folded title; SQLite's LIKE folds ASCII only
    async fn search(&self, query: &str) -> Result<Vec<Task>> {
        if query.is_empty() {
            return self.list_all().await;
        }

        self.fetch_tasks(
            &format!(
                "SELECT {TASK_COLUMNS} FROM tasks \
                 WHERE instr(title_folded, ?) > 0 ORDER BY rowid"
            ),
            Some(fold_case(query)),
        )
        .await
    }

    async fn delete(&self, id: TaskId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(result.rows_affected())
    }

    async fn bulk_delete(&self, ids: &[TaskId]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        // One statement, so the delete is all-or-nothing
        let mut query_builder = build_bulk_delete_query(ids);
        let removed = query_builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?
            .rows_affected();

        debug!(requested = ids.len(), removed, "bulk delete committed");
        Ok(removed)
    }

    async fn toggle_status(&self, id: TaskId) -> Result<Option<Task>> {
        let row = sqlx::query(&format!(
            "UPDATE tasks SET completed = NOT completed, updated_at = ? \
             WHERE id = ? \
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(self.clock.next())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(sqlx_error_to_task_error)?;

        row.as_ref().map(row_to_task).transpose()
    }

    async fn health_check(&self) -> Result<()> {
        // Simple query to verify database connectivity
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(sqlx_error_to_task_error)?;

        Ok(())
    }
}
