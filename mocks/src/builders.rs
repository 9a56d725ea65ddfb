//! Builder pattern implementations for easy test data construction
//!
//! Provides fluent builders for:
//! - TaskDraft construction with sensible defaults
//! - Task construction for pre-populated repositories
//! - UpdateTask patches and TaskFilter queries

use chrono::{DateTime, NaiveDate, Utc};
use taskhub_core::{Domain, Priority, Task, TaskDraft, TaskFilter, UpdateTask};
use uuid::Uuid;

use crate::fixtures::default_deadline;

/// Builder for constructing TaskDraft instances in tests
///
/// Defaults to a valid scheduled task: medium priority, work domain,
/// deadline on [`default_deadline`].
pub struct TaskDraftBuilder {
    draft: TaskDraft,
}

impl Default for TaskDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskDraftBuilder {
    pub fn new() -> Self {
        Self {
            draft: TaskDraft::new("Test Task", Priority::Medium, Domain::Work)
                .due(default_deadline()),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.draft.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.draft.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.draft.priority = priority.to_string();
        self
    }

    /// Set a raw priority spelling, valid or not
    pub fn with_raw_priority(mut self, priority: impl Into<String>) -> Self {
        self.draft.priority = priority.into();
        self
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.draft.domain = domain.to_string();
        self
    }

    /// Set a raw domain spelling, valid or not
    pub fn with_raw_domain(mut self, domain: impl Into<String>) -> Self {
        self.draft.domain = domain.into();
        self
    }

    pub fn with_project(mut self, project_id: Uuid) -> Self {
        self.draft.project_id = Some(project_id);
        self
    }

    pub fn with_uni_module(mut self, uni_module_id: Uuid) -> Self {
        self.draft.uni_module_id = Some(uni_module_id);
        self
    }

    /// Schedule the task, leaving the backlog
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.draft.deadline = Some(deadline);
        self.draft.is_backlog = false;
        self
    }

    /// Move the task to the backlog, clearing any deadline
    pub fn in_backlog(mut self) -> Self {
        self.draft.deadline = None;
        self.draft.is_backlog = true;
        self
    }

    /// Set the backlog flag without touching the deadline
    pub fn with_backlog_flag(mut self, is_backlog: bool) -> Self {
        self.draft.is_backlog = is_backlog;
        self
    }

    pub fn without_deadline(mut self) -> Self {
        self.draft.deadline = None;
        self
    }

    pub fn completed(mut self) -> Self {
        self.draft.completed = true;
        self
    }

    pub fn build(self) -> TaskDraft {
        self.draft
    }
}

/// Builder for constructing stored Task instances in tests
pub struct TaskBuilder {
    task: Task,
}

impl Default for TaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskBuilder {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            task: Task {
                id: Uuid::new_v4(),
                title: "Test Task".to_string(),
                description: None,
                priority: Priority::Medium,
                domain: Domain::Work,
                project_id: None,
                uni_module_id: None,
                deadline: Some(default_deadline()),
                is_backlog: false,
                completed: false,
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.task.id = id;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.task.title = title.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.task.priority = priority;
        self
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.task.domain = domain;
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.task.deadline = Some(deadline);
        self.task.is_backlog = false;
        self
    }

    pub fn in_backlog(mut self) -> Self {
        self.task.deadline = None;
        self.task.is_backlog = true;
        self
    }

    pub fn completed(mut self) -> Self {
        self.task.completed = true;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.task.created_at = created_at;
        self.task.updated_at = created_at;
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

/// Builder for UpdateTask patches
pub struct UpdateTaskBuilder {
    update: UpdateTask,
}

impl Default for UpdateTaskBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateTaskBuilder {
    pub fn new() -> Self {
        Self {
            update: UpdateTask::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.update.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.update.description = Some(Some(description.into()));
        self
    }

    pub fn clear_description(mut self) -> Self {
        self.update.description = Some(None);
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.update.priority = Some(priority.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.update.domain = Some(domain.into());
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.update.deadline = Some(Some(deadline));
        self
    }

    pub fn clear_deadline(mut self) -> Self {
        self.update.deadline = Some(None);
        self
    }

    pub fn with_backlog(mut self, is_backlog: bool) -> Self {
        self.update.is_backlog = Some(is_backlog);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.update.completed = Some(completed);
        self
    }

    pub fn build(self) -> UpdateTask {
        self.update
    }
}

/// Builder for TaskFilter queries
pub struct TaskFilterBuilder {
    filter: TaskFilter,
}

impl Default for TaskFilterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskFilterBuilder {
    pub fn new() -> Self {
        Self {
            filter: TaskFilter::default(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.filter.priority = Some(priority);
        self
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.filter.domain = Some(domain);
        self
    }

    pub fn with_backlog(mut self, is_backlog: bool) -> Self {
        self.filter.is_backlog = Some(is_backlog);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.filter.completed = Some(completed);
        self
    }

    pub fn build(self) -> TaskFilter {
        self.filter
    }
}
