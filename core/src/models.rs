use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque task identifier. The nil UUID is treated as "no id".
pub type TaskId = Uuid;

/// Core task representation as persisted by the store.
///
/// A task is either scheduled (it carries a `deadline`) or parked in the
/// backlog (`is_backlog == true`, no deadline). That rule is enforced when the
/// task is written, see [`crate::validation::TaskValidator`].
///
/// # Examples
///
/// ```rust
/// use taskhub_core::models::{Domain, Priority, Task};
/// use chrono::{NaiveDate, Utc};
/// use uuid::Uuid;
///
/// let now = Utc::now();
/// let task = Task {
///     id: Uuid::new_v4(),
///     title: "Write report".to_string(),
///     description: None,
///     priority: Priority::High,
///     domain: Domain::Work,
///     project_id: None,
///     uni_module_id: None,
///     deadline: NaiveDate::from_ymd_opt(2025, 6, 1),
///     is_backlog: false,
///     completed: false,
///     created_at: now,
///     updated_at: now,
/// };
///
/// assert!(task.is_scheduled());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    /// Store-assigned identifier, immutable
    pub id: TaskId,
    /// Short task title, never empty
    pub title: String,
    /// Optional free-form details
    pub description: Option<String>,
    pub priority: Priority,
    pub domain: Domain,
    /// Reference to a project; existence is not checked
    pub project_id: Option<Uuid>,
    /// Reference to a university module; existence is not checked
    pub uni_module_id: Option<Uuid>,
    /// Due date without time of day
    pub deadline: Option<NaiveDate>,
    pub is_backlog: bool,
    pub completed: bool,
    /// Insert timestamp
    pub created_at: DateTime<Utc>,
    /// Refreshed on every write
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// True when the task carries a deadline instead of living in the backlog
    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some() && !self.is_backlog
    }

    /// Writable view of this task, used as the base for merges
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority.as_str().to_string(),
            domain: self.domain.as_str().to_string(),
            project_id: self.project_id,
            uni_module_id: self.uni_module_id,
            deadline: self.deadline,
            is_backlog: self.is_backlog,
            completed: self.completed,
        }
    }
}

/// Task priority levels
#[derive(Debug, Clone, Copy, Hash, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Wire and storage spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Life area a task belongs to
#[derive(Debug, Clone, Copy, Hash, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Work,
    University,
    Personal,
    Coding,
    Health,
    Finance,
    Social,
    Home,
    Study,
    Travel,
    Administration,
}

impl Domain {
    pub const ALL: [Domain; 11] = [
        Domain::Work,
        Domain::University,
        Domain::Personal,
        Domain::Coding,
        Domain::Health,
        Domain::Finance,
        Domain::Social,
        Domain::Home,
        Domain::Study,
        Domain::Travel,
        Domain::Administration,
    ];

    /// Wire and storage spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Work => "work",
            Domain::University => "university",
            Domain::Personal => "personal",
            Domain::Coding => "coding",
            Domain::Health => "health",
            Domain::Finance => "finance",
            Domain::Social => "social",
            Domain::Home => "home",
            Domain::Study => "study",
            Domain::Travel => "travel",
            Domain::Administration => "administration",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Returned when a string is not one of an enum's spellings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownVariant {}

/// Candidate record for create and full update.
///
/// `priority` and `domain` stay as raw text here so that values outside the
/// enumerated sets can reach the validator and be rejected with a precise
/// error instead of a decoding failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: String,
    pub domain: String,
    #[serde(default)]
    pub project_id: Option<Uuid>,
    #[serde(default)]
    pub uni_module_id: Option<Uuid>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub is_backlog: bool,
    #[serde(default)]
    pub completed: bool,
}

impl TaskDraft {
    /// Create a draft with the required fields; everything else is empty
    pub fn new(title: impl Into<String>, priority: Priority, domain: Domain) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: priority.as_str().to_string(),
            domain: domain.as_str().to_string(),
            project_id: None,
            uni_module_id: None,
            deadline: None,
            is_backlog: false,
            completed: false,
        }
    }

    /// Schedule the draft for the given date
    pub fn due(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self.is_backlog = false;
        self
    }

    /// Park the draft in the backlog
    pub fn backlog(mut self) -> Self {
        self.deadline = None;
        self.is_backlog = true;
        self
    }
}

/// Partial changes to an existing task.
///
/// `None` leaves a field untouched. For nullable fields the inner option
/// distinguishes "set to value" (`Some(Some(v))`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub priority: Option<String>,
    pub domain: Option<String>,
    pub project_id: Option<Option<Uuid>>,
    pub uni_module_id: Option<Option<Uuid>>,
    pub deadline: Option<Option<NaiveDate>>,
    pub is_backlog: Option<bool>,
    pub completed: Option<bool>,
}

impl UpdateTask {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge this patch onto a previously fetched task
    pub fn apply_to(self, task: &Task) -> TaskDraft {
        let mut draft = task.to_draft();

        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(description) = self.description {
            draft.description = description;
        }
        if let Some(priority) = self.priority {
            draft.priority = priority;
        }
        if let Some(domain) = self.domain {
            draft.domain = domain;
        }
        if let Some(project_id) = self.project_id {
            draft.project_id = project_id;
        }
        if let Some(uni_module_id) = self.uni_module_id {
            draft.uni_module_id = uni_module_id;
        }
        if let Some(deadline) = self.deadline {
            draft.deadline = deadline;
        }
        if let Some(is_backlog) = self.is_backlog {
            draft.is_backlog = is_backlog;
        }
        if let Some(completed) = self.completed {
            draft.completed = completed;
        }

        draft
    }
}

/// Filter criteria for querying tasks.
///
/// All fields are optional. Present fields are combined with AND logic, an
/// empty filter matches every task.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskFilter {
    pub priority: Option<Priority>,
    pub domain: Option<Domain>,
    pub is_backlog: Option<bool>,
    pub completed: Option<bool>,
}

impl TaskFilter {
    /// True when no predicate is set
    pub fn is_empty(&self) -> bool {
        self.priority.is_none()
            && self.domain.is_none()
            && self.is_backlog.is_none()
            && self.completed.is_none()
    }

    /// Evaluate the filter against an in-memory task
    pub fn matches(&self, task: &Task) -> bool {
        self.priority.map_or(true, |p| task.priority == p)
            && self.domain.map_or(true, |d| task.domain == d)
            && self.is_backlog.map_or(true, |b| task.is_backlog == b)
            && self.completed.map_or(true, |c| task.completed == c)
    }
}

/// Case-folded form of a title or search query
///
/// Search compares folded query against folded title, so every store must
/// fold with this function.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}
