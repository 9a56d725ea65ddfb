//! Standard test fixtures for consistent testing
//!
//! Provides pre-built test data including:
//! - Valid scheduled and backlog drafts
//! - The end-to-end walkthrough tasks
//! - Bulk draft sets covering every priority and domain

use chrono::NaiveDate;
use taskhub_core::{Domain, Priority, TaskDraft};

/// Deadline used by fixtures unless a test needs a specific date
pub fn default_deadline() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap_or_default()
}

/// A valid scheduled draft with the given title
pub fn scheduled_draft(title: &str) -> TaskDraft {
    TaskDraft::new(title, Priority::Medium, Domain::Work).due(default_deadline())
}

/// A valid backlog draft with the given title
pub fn backlog_draft(title: &str) -> TaskDraft {
    TaskDraft::new(title, Priority::Low, Domain::Personal).backlog()
}

/// "Write report": high, work, due 2025-06-01
pub fn write_report_draft() -> TaskDraft {
    TaskDraft::new("Write report", Priority::High, Domain::Work).due(default_deadline())
}

/// "Learn Rust": medium, study, backlog
pub fn learn_rust_draft() -> TaskDraft {
    TaskDraft::new("Learn Rust", Priority::Medium, Domain::Study).backlog()
}

/// `count` valid drafts cycling through priorities and domains, alternating
/// scheduled and backlog
pub fn create_test_drafts(count: usize) -> Vec<TaskDraft> {
    (0..count)
        .map(|i| {
            let priority = Priority::ALL[i % Priority::ALL.len()];
            let domain = Domain::ALL[i % Domain::ALL.len()];
            let draft = TaskDraft::new(format!("Test Task {i}"), priority, domain);
            if i % 2 == 0 {
                draft.due(default_deadline())
            } else {
                draft.backlog()
            }
        })
        .collect()
}

/// Titles that exercise search edge cases
pub fn search_titles() -> Vec<&'static str> {
    vec![
        "Write REPORT draft",
        "report review",
        "50% done",
        "snake_case rename",
        "Unrelated",
    ]
}
