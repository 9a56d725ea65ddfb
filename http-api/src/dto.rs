//! Request and response bodies
//!
//! Handles conversion between wire JSON and the core task types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use taskhub_core::{Task, TaskDraft, TaskFilter, TaskId, TaskValidator, UpdateTask};
use uuid::Uuid;

use crate::error::ApiError;

/// Wire format for deadlines
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` deadline
pub fn parse_deadline(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, DEADLINE_FORMAT)
        .map_err(|_| ApiError::BadRequest("Invalid deadline format".to_string()))
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `POST /api/tasks`
///
/// Priority and domain stay raw strings so out-of-set values reach the
/// validator and come back as its error. New tasks always start incomplete.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub uni_module_id: Option<Uuid>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub is_backlog: bool,
}

impl CreateTaskRequest {
    pub fn into_draft(self) -> Result<TaskDraft, ApiError> {
        let deadline = self.deadline.as_deref().map(parse_deadline).transpose()?;
        Ok(TaskDraft {
            title: self.title,
            description: self.description,
            priority: self.priority,
            domain: self.domain,
            project_id: self.project_id,
            uni_module_id: self.uni_module_id,
            deadline,
            is_backlog: self.is_backlog,
            completed: false,
        })
    }
}

/// Body of `PUT /api/tasks/:id`
///
/// Absent fields keep their stored value. For nullable fields an explicit
/// `null` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub priority: Option<String>,
    pub domain: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub project_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub uni_module_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub deadline: Option<Option<String>>,
    pub is_backlog: Option<bool>,
    pub completed: Option<bool>,
}

impl UpdateTaskRequest {
    pub fn into_update(self) -> Result<UpdateTask, ApiError> {
        let deadline = match self.deadline {
            Some(Some(value)) => Some(Some(parse_deadline(&value)?)),
            Some(None) => Some(None),
            None => None,
        };
        Ok(UpdateTask {
            title: self.title,
            description: self.description,
            priority: self.priority,
            domain: self.domain,
            project_id: self.project_id,
            uni_module_id: self.uni_module_id,
            deadline,
            is_backlog: self.is_backlog,
            completed: self.completed,
        })
    }
}

/// Query string of `GET /api/tasks`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    pub priority: Option<String>,
    pub domain: Option<String>,
    pub is_backlog: Option<bool>,
    pub completed: Option<bool>,
}

impl FilterQuery {
    /// Parse enum predicates with the validator so bad values get the usual errors
    pub fn into_filter(self) -> Result<TaskFilter, ApiError> {
        Ok(TaskFilter {
            priority: self
                .priority
                .as_deref()
                .map(TaskValidator::validate_priority)
                .transpose()?,
            domain: self
                .domain
                .as_deref()
                .map(TaskValidator::validate_domain)
                .transpose()?,
            is_backlog: self.is_backlog,
            completed: self.completed,
        })
    }
}

/// Query string of `GET /api/tasks/search`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<TaskId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkDeleteResponse {
    pub deleted: u64,
}

/// Task as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskResponse {
    pub task_id: TaskId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub priority: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub project_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub uni_module_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deadline: Option<NaiveDate>,
    pub is_backlog: bool,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            task_id: task.id,
            title: task.title,
            description: task.description,
            priority: task.priority.to_string(),
            domain: task.domain.to_string(),
            project_id: task.project_id,
            uni_module_id: task.uni_module_id,
            deadline: task.deadline,
            is_backlog: task.is_backlog,
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskhub_core::{Domain, Priority, TaskError};

    #[test]
    fn test_parse_deadline() {
        assert_eq!(
            parse_deadline("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        for bad in ["2025-6-1x", "01/06/2025", "2025-02-30", "2025-06-01T10:00:00Z", ""] {
            assert!(parse_deadline(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_create_request_into_draft() {
        let request: CreateTaskRequest = serde_json::from_value(json!({
            "title": "Write report",
            "priority": "high",
            "domain": "work",
            "is_backlog": false,
            "deadline": "2025-06-01",
            "completed": true
        }))
        .unwrap();

        let draft = request.into_draft().unwrap();
        assert_eq!(draft.title, "Write report");
        assert_eq!(draft.deadline, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert!(!draft.completed);
    }

    #[test]
    fn test_create_request_keeps_unknown_enums_for_validation() {
        let request: CreateTaskRequest =
            serde_json::from_value(json!({ "title": "x", "priority": "urgent", "domain": "work" }))
                .unwrap();
        let draft = request.into_draft().unwrap();
        assert_eq!(
            TaskValidator::validate_task(&draft),
            Err(TaskError::InvalidPriority("urgent".to_string()))
        );
    }

    #[test]
    fn test_update_request_null_vs_absent() {
        let request: UpdateTaskRequest =
            serde_json::from_value(json!({ "deadline": null, "is_backlog": true })).unwrap();
        let update = request.into_update().unwrap();
        assert_eq!(update.deadline, Some(None));
        assert_eq!(update.description, None);
        assert_eq!(update.is_backlog, Some(true));

        let request: UpdateTaskRequest =
            serde_json::from_value(json!({ "description": "notes", "deadline": "2025-07-01" }))
                .unwrap();
        let update = request.into_update().unwrap();
        assert_eq!(update.description, Some(Some("notes".to_string())));
        assert_eq!(update.deadline, Some(NaiveDate::from_ymd_opt(2025, 7, 1)));
    }

    #[test]
    fn test_update_request_rejects_bad_deadline() {
        let request: UpdateTaskRequest =
            serde_json::from_value(json!({ "deadline": "next week" })).unwrap();
        assert!(matches!(request.into_update(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_filter_query() {
        let query = FilterQuery {
            priority: Some("low".into()),
            domain: None,
            is_backlog: Some(true),
            completed: None,
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.priority, Some(Priority::Low));
        assert_eq!(filter.is_backlog, Some(true));

        let query = FilterQuery {
            domain: Some("gaming".into()),
            ..Default::default()
        };
        assert!(matches!(
            query.into_filter(),
            Err(ApiError::Task(TaskError::InvalidDomain(_)))
        ));
    }

    #[test]
    fn test_task_response_shape() {
        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: "Learn Rust".into(),
            description: None,
            priority: Priority::Medium,
            domain: Domain::Study,
            project_id: None,
            uni_module_id: None,
            deadline: NaiveDate::from_ymd_opt(2025, 6, 1),
            is_backlog: false,
            completed: false,
            created_at: now,
            updated_at: now,
        };
        let id = task.id;

        let value = serde_json::to_value(TaskResponse::from(task)).unwrap();
        assert_eq!(value["task_id"], json!(id));
        assert_eq!(value["priority"], "medium");
        assert_eq!(value["domain"], "study");
        assert_eq!(value["deadline"], "2025-06-01");
        assert!(value.get("description").is_none());
        assert!(value.get("id").is_none());
    }
}
