//! Custom assertion helpers for testing
//!
//! Provides specialized assertions for:
//! - Stored tasks against the draft they came from
//! - Insertion-ordered result sets
//! - Error kinds with clear failure messages

use taskhub_core::{Task, TaskDraft, TaskError};

/// Assert a stored task carries every writable field of `draft`
pub fn assert_task_matches_draft(task: &Task, draft: &TaskDraft) {
    assert_eq!(task.title, draft.title, "Task titles don't match");
    assert_eq!(task.description, draft.description, "Task descriptions don't match");
    assert_eq!(task.priority.as_str(), draft.priority, "Task priorities don't match");
    assert_eq!(task.domain.as_str(), draft.domain, "Task domains don't match");
    assert_eq!(task.project_id, draft.project_id, "Task projects don't match");
    assert_eq!(task.uni_module_id, draft.uni_module_id, "Task modules don't match");
    assert_eq!(task.deadline, draft.deadline, "Task deadlines don't match");
    assert_eq!(task.is_backlog, draft.is_backlog, "Task backlog flags don't match");
    assert_eq!(task.completed, draft.completed, "Task completion flags don't match");
}

/// Assert tasks are equal ignoring `updated_at`
pub fn assert_task_equals(actual: &Task, expected: &Task) {
    assert_eq!(actual.id, expected.id, "Task IDs don't match");
    assert_eq!(actual.created_at, expected.created_at, "Task creation times don't match");
    assert_task_matches_draft(actual, &expected.to_draft());
}

/// Assert the titles of `tasks`, in order
pub fn assert_titles(tasks: &[Task], expected: &[&str]) {
    let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, expected, "Task titles or their order don't match");
}

/// Assert every task in the collection satisfies `predicate`
pub fn assert_all_tasks<F>(tasks: &[Task], predicate: F, message: &str)
where
    F: Fn(&Task) -> bool,
{
    for task in tasks {
        assert!(predicate(task), "{message}: {task:?}");
    }
}

/// Assert result is a validation error of any kind
pub fn assert_validation_error<T: std::fmt::Debug>(result: &Result<T, TaskError>) {
    match result {
        Err(error) if error.is_validation() => {}
        other => panic!("Expected validation error, got: {other:?}"),
    }
}

/// Assert result is NotFound
pub fn assert_not_found<T: std::fmt::Debug>(result: &Result<T, TaskError>) {
    match result {
        Err(TaskError::NotFound(_)) => {}
        other => panic!("Expected NotFound error, got: {other:?}"),
    }
}
