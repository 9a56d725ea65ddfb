//! Random test data generators using the fake crate
//!
//! Provides realistic random data including:
//! - Task titles and descriptions
//! - Random valid drafts
//! - Property-based testing strategies

use chrono::NaiveDate;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use proptest::prelude::*;
use rand::Rng;
use taskhub_core::{Domain, Priority, TaskDraft, TaskFilter};

/// Generate a realistic task title
pub fn generate_task_title() -> String {
    Sentence(2..6).fake()
}

/// Generate a realistic task description
pub fn generate_task_description() -> String {
    Paragraph(1..3).fake()
}

pub fn generate_priority() -> Priority {
    Priority::ALL[rand::thread_rng().gen_range(0..Priority::ALL.len())]
}

pub fn generate_domain() -> Domain {
    Domain::ALL[rand::thread_rng().gen_range(0..Domain::ALL.len())]
}

/// Generate a deadline within 2025
pub fn generate_deadline() -> NaiveDate {
    let ordinal: u32 = (1..366).fake();
    NaiveDate::from_yo_opt(2025, ordinal).unwrap_or_default()
}

/// Generate a random draft that passes validation
pub fn generate_valid_draft() -> TaskDraft {
    let mut rng = rand::thread_rng();
    let mut draft = TaskDraft::new(generate_task_title(), generate_priority(), generate_domain());
    if rng.gen_bool(0.5) {
        draft.description = Some(generate_task_description());
    }
    draft = if rng.gen_bool(0.5) {
        draft.due(generate_deadline())
    } else {
        draft.backlog()
    };
    draft.completed = rng.gen_bool(0.3);
    draft
}

/// Generate `count` random valid drafts
pub fn generate_valid_drafts(count: usize) -> Vec<TaskDraft> {
    (0..count).map(|_| generate_valid_draft()).collect()
}

/// Proptest strategy for priorities
pub fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop::sample::select(Priority::ALL.to_vec())
}

/// Proptest strategy for domains
pub fn domain_strategy() -> impl Strategy<Value = Domain> {
    prop::sample::select(Domain::ALL.to_vec())
}

/// Proptest strategy for titles with at least one visible character
pub fn title_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ]{0,40}"
}

/// Proptest strategy for deadlines
pub fn deadline_strategy() -> impl Strategy<Value = NaiveDate> {
    (2024i32..2027, 1u32..=365)
        .prop_map(|(year, ordinal)| NaiveDate::from_yo_opt(year, ordinal).unwrap_or_default())
}

/// Proptest strategy for drafts that pass validation
pub fn valid_draft_strategy() -> impl Strategy<Value = TaskDraft> {
    (
        title_strategy(),
        priority_strategy(),
        domain_strategy(),
        prop::option::of(deadline_strategy()),
        any::<bool>(),
    )
        .prop_map(|(title, priority, domain, deadline, completed)| {
            let draft = TaskDraft::new(title, priority, domain);
            let mut draft = match deadline {
                Some(deadline) => draft.due(deadline),
                None => draft.backlog(),
            };
            draft.completed = completed;
            draft
        })
}

/// Proptest strategy for arbitrary filters, including the empty one
pub fn filter_strategy() -> impl Strategy<Value = TaskFilter> {
    (
        prop::option::of(priority_strategy()),
        prop::option::of(domain_strategy()),
        prop::option::of(any::<bool>()),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(priority, domain, is_backlog, completed)| TaskFilter {
            priority,
            domain,
            is_backlog,
            completed,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskhub_core::TaskValidator;

    #[test]
    fn test_generated_drafts_are_valid() {
        for draft in generate_valid_drafts(50) {
            assert!(TaskValidator::validate_task(&draft).is_ok(), "{draft:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_strategy_drafts_are_valid(draft in valid_draft_strategy()) {
            prop_assert!(TaskValidator::validate_task(&draft).is_ok());
        }
    }
}
