use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};
use taskhub_core::{
    error::{Result, TaskError},
    models::{Domain, Priority, Task, TaskFilter, TaskId},
};
use uuid::Uuid;

/// Column list shared by every query that returns tasks
pub const TASK_COLUMNS: &str = "id, title, description, priority, domain, project_id, \
     uni_module_id, deadline, is_backlog, completed, created_at, updated_at";

/// Hands out strictly increasing write timestamps at microsecond resolution
///
/// Every write of a row takes its `updated_at` from here, so a row's
/// timestamp moves forward on each write even when two writes land in the
/// same microsecond or the wall clock steps back.
#[derive(Debug, Default)]
pub struct WriteClock {
    last_micros: AtomicI64,
}

impl WriteClock {
    pub fn next(&self) -> DateTime<Utc> {
        let now = Utc::now().timestamp_micros();
        let previous = self
            .last_micros
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_else(|last| last);

        DateTime::from_timestamp_micros(now.max(previous + 1)).unwrap_or_else(Utc::now)
    }

    /// Raise the floor to a timestamp already in the store
    pub fn observe(&self, seen: DateTime<Utc>) {
        self.last_micros
            .fetch_max(seen.timestamp_micros(), Ordering::SeqCst);
    }
}

/// Convert string from database to Priority enum
pub fn string_to_priority(s: &str) -> Result<Priority> {
    s.parse()
        .map_err(|_| TaskError::Database(format!("Invalid task priority in database: {s}")))
}

/// Convert string from database to Domain enum
pub fn string_to_domain(s: &str) -> Result<Domain> {
    s.parse()
        .map_err(|_| TaskError::Database(format!("Invalid task domain in database: {s}")))
}

fn string_to_uuid(column: &str, s: &str) -> Result<Uuid> {
    Uuid::parse_str(s)
        .map_err(|e| TaskError::Database(format!("Invalid UUID in column {column}: {e}")))
}

fn optional_uuid(row: &SqliteRow, column: &str) -> Result<Option<Uuid>> {
    let value: Option<String> = row.try_get(column).map_err(sqlx_error_to_task_error)?;
    value.map(|s| string_to_uuid(column, &s)).transpose()
}

/// Convert SQLite row to Task model
pub fn row_to_task(row: &SqliteRow) -> Result<Task> {
    let id: String = row.try_get("id").map_err(sqlx_error_to_task_error)?;
    let priority: String = row.try_get("priority").map_err(sqlx_error_to_task_error)?;
    let domain: String = row.try_get("domain").map_err(sqlx_error_to_task_error)?;
    let deadline: Option<NaiveDate> = row.try_get("deadline").map_err(sqlx_error_to_task_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(sqlx_error_to_task_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(sqlx_error_to_task_error)?;

    Ok(Task {
        id: string_to_uuid("id", &id)?,
        title: row.try_get("title").map_err(sqlx_error_to_task_error)?,
        description: row.try_get("description").map_err(sqlx_error_to_task_error)?,
        priority: string_to_priority(&priority)?,
        domain: string_to_domain(&domain)?,
        project_id: optional_uuid(row, "project_id")?,
        uni_module_id: optional_uuid(row, "uni_module_id")?,
        deadline,
        is_backlog: row.try_get("is_backlog").map_err(sqlx_error_to_task_error)?,
        completed: row.try_get("completed").map_err(sqlx_error_to_task_error)?,
        created_at,
        updated_at,
    })
}

/// Convert SQLx error to TaskError
pub fn sqlx_error_to_task_error(err: sqlx::Error) -> TaskError {
    match &err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            if message.contains("CHECK constraint failed") {
                TaskError::Database(format!("Database constraint error: {message}"))
            } else {
                TaskError::Database(format!("Database error: {message}"))
            }
        }
        sqlx::Error::RowNotFound => {
            // Missing rows are handled with fetch_optional, so this is unexpected
            TaskError::Database("Unexpected RowNotFound error".to_string())
        }
        sqlx::Error::PoolTimedOut => TaskError::Database("Connection pool timeout".to_string()),
        sqlx::Error::PoolClosed => TaskError::Database("Connection pool closed".to_string()),
        sqlx::Error::Io(io_err) => TaskError::Database(format!("Database I/O error: {io_err}")),
        sqlx::Error::ColumnDecode { index, source } => {
            TaskError::Database(format!("Failed to decode column {index}: {source}"))
        }
        _ => TaskError::Database(format!("Database operation failed: {err}")),
    }
}

/// Build dynamic WHERE clause for task filtering using QueryBuilder with proper type binding
pub fn build_filter_query(filter: &TaskFilter) -> QueryBuilder<'static, Sqlite> {
    let mut query_builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {TASK_COLUMNS} FROM tasks"));

    let mut has_conditions = false;
    let mut next_condition = |qb: &mut QueryBuilder<Sqlite>| {
        qb.push(if has_conditions { " AND " } else { " WHERE " });
        has_conditions = true;
    };

    if let Some(priority) = filter.priority {
        next_condition(&mut query_builder);
        query_builder.push("priority = ");
        query_builder.push_bind(priority.as_str());
    }

    if let Some(domain) = filter.domain {
        next_condition(&mut query_builder);
        query_builder.push("domain = ");
        query_builder.push_bind(domain.as_str());
    }

    if let Some(is_backlog) = filter.is_backlog {
        next_condition(&mut query_builder);
        query_builder.push("is_backlog = ");
        query_builder.push_bind(is_backlog);
    }

    if let Some(completed) = filter.completed {
        next_condition(&mut query_builder);
        query_builder.push("completed = ");
        query_builder.push_bind(completed);
    }

    query_builder.push(" ORDER BY rowid");
    query_builder
}

/// Build `DELETE ... WHERE id IN (...)` as one statement
pub fn build_bulk_delete_query(ids: &[TaskId]) -> QueryBuilder<'static, Sqlite> {
    let mut query_builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("DELETE FROM tasks WHERE id IN (");
    let mut separated = query_builder.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
    separated.push_unseparated(")");
    query_builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Execute;

    #[test]
    fn test_empty_filter_query() {
        let mut qb = build_filter_query(&TaskFilter::default());
        let query = qb.build();
        assert_eq!(
            query.sql(),
            format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY rowid")
        );
    }

    #[test]
    fn test_filter_query_joins_with_and() {
        let filter = TaskFilter {
            priority: Some(Priority::High),
            domain: None,
            is_backlog: Some(false),
            completed: Some(true),
        };
        let mut qb = build_filter_query(&filter);
        let query = qb.build();
        assert_eq!(
            query.sql(),
            format!(
                "SELECT {TASK_COLUMNS} FROM tasks \
                 WHERE priority = ? AND is_backlog = ? AND completed = ? ORDER BY rowid"
            )
        );
    }

    #[test]
    fn test_bulk_delete_query_binds_every_id() {
        let ids = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let mut qb = build_bulk_delete_query(&ids);
        let query = qb.build();
        assert_eq!(query.sql(), "DELETE FROM tasks WHERE id IN (?, ?, ?)");
    }

    #[test]
    fn test_write_clock_is_strictly_increasing() {
        let clock = WriteClock::default();
        let mut previous = clock.next();
        for _ in 0..1000 {
            let next = clock.next();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_write_clock_respects_observed_future_timestamp() {
        let clock = WriteClock::default();
        let future = Utc::now() + chrono::Duration::hours(1);
        clock.observe(future);
        assert!(clock.next() > future);
    }

    #[test]
    fn test_string_conversions() {
        assert_eq!(string_to_priority("low").unwrap(), Priority::Low);
        assert_eq!(string_to_domain("travel").unwrap(), Domain::Travel);
        assert!(string_to_priority("Low").unwrap_err().is_database());
        assert!(string_to_domain("gaming").unwrap_err().is_database());
    }
}
