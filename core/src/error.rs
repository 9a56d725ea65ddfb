use thiserror::Error;
use uuid::Uuid;

/// Result type alias for task operations
pub type Result<T> = std::result::Result<T, TaskError>;

/// Error kinds surfaced by the task core.
///
/// Validation kinds are raised before any store call and are always
/// recoverable by the caller fixing the record. Store failures are wrapped
/// into [`TaskError::Database`] or [`TaskError::Timeout`] with the operation
/// that failed.
///
/// # Examples
///
/// ```rust
/// use taskhub_core::error::TaskError;
/// use uuid::Uuid;
///
/// let not_found = TaskError::not_found_id(Uuid::new_v4());
/// assert!(not_found.is_not_found());
///
/// let wrapped = TaskError::Database("disk I/O error".to_string())
///     .with_context("failed to create task");
/// assert_eq!(
///     wrapped.to_string(),
///     "Database error: failed to create task: disk I/O error"
/// );
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("title is required")]
    TitleRequired,

    #[error("invalid priority value: '{0}'")]
    InvalidPriority(String),

    #[error("invalid domain value: '{0}'")]
    InvalidDomain(String),

    #[error("deadline must be set for non-backlog tasks")]
    NoDeadlineForNonBacklog,

    #[error("backlog tasks should not have a deadline")]
    BacklogDeadlineConflict,

    /// An operation that needs an id received the nil id
    #[error("id is required")]
    MissingId,

    /// No row matches the given identifier
    #[error("Task not found: {0}")]
    NotFound(String),

    /// Store operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Store operation exceeded its deadline
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl TaskError {
    /// Create a not found error for a task ID
    pub fn not_found_id(id: Uuid) -> Self {
        Self::NotFound(format!("Task with ID {id} not found"))
    }

    /// Prefix store errors with the failing operation; other kinds pass through
    pub fn with_context(self, operation: &str) -> Self {
        match self {
            TaskError::Database(msg) => TaskError::Database(format!("{operation}: {msg}")),
            other => other,
        }
    }

    /// Check if this error is a client-input validation failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TaskError::TitleRequired
                | TaskError::InvalidPriority(_)
                | TaskError::InvalidDomain(_)
                | TaskError::NoDeadlineForNonBacklog
                | TaskError::BacklogDeadlineConflict
        )
    }

    /// Check if this error indicates a not found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskError::NotFound(_))
    }

    /// Check if this error came from the store
    pub fn is_database(&self) -> bool {
        matches!(self, TaskError::Database(_) | TaskError::Timeout(_))
    }
}
