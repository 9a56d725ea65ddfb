use chrono::NaiveDate;

use crate::{
    error::{Result, TaskError},
    models::{Domain, Priority, TaskDraft},
};

/// Validation utilities for task writes. No I/O.
pub struct TaskValidator;

impl TaskValidator {
    /// Validate a task title
    ///
    /// Only the empty string is rejected; whitespace is kept as written.
    pub fn validate_title(title: &str) -> Result<()> {
        if title.is_empty() {
            return Err(TaskError::TitleRequired);
        }
        Ok(())
    }

    /// Parse a priority, rejecting anything outside {high, medium, low}
    pub fn validate_priority(priority: &str) -> Result<Priority> {
        priority
            .parse()
            .map_err(|_| TaskError::InvalidPriority(priority.to_string()))
    }

    /// Parse a domain, rejecting anything outside the enumerated set
    pub fn validate_domain(domain: &str) -> Result<Domain> {
        domain
            .parse()
            .map_err(|_| TaskError::InvalidDomain(domain.to_string()))
    }

    /// Check the backlog/deadline rule
    ///
    /// A task is either scheduled (has a deadline) or in the backlog (has
    /// none), never both and never neither.
    pub fn validate_schedule(deadline: Option<NaiveDate>, is_backlog: bool) -> Result<()> {
        match (deadline, is_backlog) {
            (None, false) => Err(TaskError::NoDeadlineForNonBacklog),
            (Some(_), true) => Err(TaskError::BacklogDeadlineConflict),
            _ => Ok(()),
        }
    }

    /// Validate a complete candidate record.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// title, priority, domain, then the backlog/deadline rule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use taskhub_core::{TaskDraft, TaskError, TaskValidator, Priority, Domain};
    /// use chrono::NaiveDate;
    ///
    /// let draft = TaskDraft::new("Read book", Priority::Low, Domain::Personal)
    ///     .due(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    /// assert!(TaskValidator::validate_task(&draft).is_ok());
    ///
    /// let mut conflicting = draft.clone();
    /// conflicting.is_backlog = true;
    /// assert_eq!(
    ///     TaskValidator::validate_task(&conflicting),
    ///     Err(TaskError::BacklogDeadlineConflict)
    /// );
    /// ```
    pub fn validate_task(task: &TaskDraft) -> Result<()> {
        Self::validate_title(&task.title)?;
        Self::validate_priority(&task.priority)?;
        Self::validate_domain(&task.domain)?;
        Self::validate_schedule(task.deadline, task.is_backlog)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn june_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn valid_draft() -> TaskDraft {
        TaskDraft::new("Write report", Priority::High, Domain::Work).due(june_first())
    }

    #[test]
    fn test_valid_titles() {
        assert!(TaskValidator::validate_title("Write report").is_ok());
        assert!(TaskValidator::validate_title("A").is_ok());
        assert!(TaskValidator::validate_title("  padded  ").is_ok());
    }

    #[test]
    fn test_invalid_titles() {
        assert_eq!(TaskValidator::validate_title(""), Err(TaskError::TitleRequired));
    }

    #[test]
    fn test_whitespace_titles_are_not_empty() {
        assert!(TaskValidator::validate_title("   ").is_ok());
        assert!(TaskValidator::validate_title("\t\n").is_ok());

        let draft = TaskDraft::new("   ", Priority::Low, Domain::Home).due(june_first());
        assert!(TaskValidator::validate_task(&draft).is_ok());
    }

    #[test]
    fn test_priorities() {
        assert_eq!(TaskValidator::validate_priority("high"), Ok(Priority::High));
        assert_eq!(TaskValidator::validate_priority("medium"), Ok(Priority::Medium));
        assert_eq!(TaskValidator::validate_priority("low"), Ok(Priority::Low));
        assert_eq!(
            TaskValidator::validate_priority("urgent"),
            Err(TaskError::InvalidPriority("urgent".to_string()))
        );
        assert!(TaskValidator::validate_priority("").is_err());
        assert!(TaskValidator::validate_priority("High").is_err());
    }

    #[test]
    fn test_domains() {
        for domain in Domain::ALL {
            assert_eq!(TaskValidator::validate_domain(domain.as_str()), Ok(domain));
        }
        assert_eq!(
            TaskValidator::validate_domain("gaming"),
            Err(TaskError::InvalidDomain("gaming".to_string()))
        );
    }

    #[test]
    fn test_schedule_rule() {
        assert!(TaskValidator::validate_schedule(Some(june_first()), false).is_ok());
        assert!(TaskValidator::validate_schedule(None, true).is_ok());
        assert_eq!(
            TaskValidator::validate_schedule(None, false),
            Err(TaskError::NoDeadlineForNonBacklog)
        );
        assert_eq!(
            TaskValidator::validate_schedule(Some(june_first()), true),
            Err(TaskError::BacklogDeadlineConflict)
        );
    }

    #[test]
    fn test_validate_task() {
        assert!(TaskValidator::validate_task(&valid_draft()).is_ok());

        let backlog = TaskDraft::new("Someday", Priority::Low, Domain::Home).backlog();
        assert!(TaskValidator::validate_task(&backlog).is_ok());
    }

    #[test]
    fn test_first_failure_wins() {
        // Every rule broken at once: title is reported
        let mut draft = valid_draft();
        draft.title = String::new();
        draft.priority = "urgent".to_string();
        draft.domain = "gaming".to_string();
        draft.is_backlog = true;
        assert_eq!(TaskValidator::validate_task(&draft), Err(TaskError::TitleRequired));

        draft.title = "Fixed".to_string();
        assert_eq!(
            TaskValidator::validate_task(&draft),
            Err(TaskError::InvalidPriority("urgent".to_string()))
        );

        draft.priority = "low".to_string();
        assert_eq!(
            TaskValidator::validate_task(&draft),
            Err(TaskError::InvalidDomain("gaming".to_string()))
        );

        draft.domain = "home".to_string();
        assert_eq!(
            TaskValidator::validate_task(&draft),
            Err(TaskError::BacklogDeadlineConflict)
        );

        draft.deadline = None;
        draft.is_backlog = false;
        assert_eq!(
            TaskValidator::validate_task(&draft),
            Err(TaskError::NoDeadlineForNonBacklog)
        );
    }

    proptest! {
        #[test]
        fn prop_unknown_priorities_rejected(priority in "[a-zA-Z]{0,12}") {
            prop_assume!(!["high", "medium", "low"].contains(&priority.as_str()));
            let mut draft = valid_draft();
            draft.priority = priority.clone();
            prop_assert_eq!(
                TaskValidator::validate_task(&draft),
                Err(TaskError::InvalidPriority(priority))
            );
        }

        #[test]
        fn prop_unknown_domains_rejected(domain in "[a-z]{0,16}") {
            prop_assume!(Domain::ALL.iter().all(|d| d.as_str() != domain));
            let mut draft = valid_draft();
            draft.domain = domain.clone();
            prop_assert_eq!(
                TaskValidator::validate_task(&draft),
                Err(TaskError::InvalidDomain(domain))
            );
        }

        #[test]
        fn prop_schedule_rule_is_exclusive(has_deadline: bool, is_backlog: bool) {
            let mut draft = valid_draft();
            draft.deadline = has_deadline.then(june_first);
            draft.is_backlog = is_backlog;
            let result = TaskValidator::validate_task(&draft);
            prop_assert_eq!(result.is_ok(), has_deadline != is_backlog);
        }
    }
}
