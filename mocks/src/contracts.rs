//! Contract test helpers for validating trait implementations
//!
//! Provides standardized tests that any implementation of `TaskRepository`
//! should pass, so the in-memory mock and the SQLite store behave the same.
//! Each contract expects an empty repository.

use taskhub_core::{Domain, Priority, TaskFilter, TaskRepository};
use uuid::Uuid;

use crate::{
    assert_task_matches_draft, assert_titles, backlog_draft, scheduled_draft, TaskDraftBuilder,
    TaskFilterBuilder,
};

/// Test any TaskRepository implementation with comprehensive contract tests
///
/// Every contract cleans up after itself, so one repository can run the whole suite.
pub async fn test_repository_contract<R: TaskRepository>(repo: &R) {
    test_create_contract(repo).await;
    test_update_contract(repo).await;
    test_list_order_contract(repo).await;
    test_filter_contract(repo).await;
    test_search_contract(repo).await;
    test_delete_contract(repo).await;
    test_bulk_delete_contract(repo).await;
    test_toggle_contract(repo).await;
    test_health_check_contract(repo).await;
}

async fn clear<R: TaskRepository>(repo: &R) {
    let ids: Vec<Uuid> = repo
        .list_all()
        .await
        .expect("List should succeed")
        .into_iter()
        .map(|t| t.id)
        .collect();
    repo.bulk_delete(&ids).await.expect("Cleanup should succeed");
}

/// Created tasks get a fresh id and equal timestamps, and read back unchanged
pub async fn test_create_contract<R: TaskRepository>(repo: &R) {
    let draft = TaskDraftBuilder::new()
        .with_title("Create contract")
        .with_description("details")
        .with_priority(Priority::High)
        .with_domain(Domain::University)
        .with_uni_module(Uuid::new_v4())
        .build();

    let task = repo.create(&draft).await.expect("Create should succeed");
    assert!(!task.id.is_nil(), "Created task should have a non-nil ID");
    assert_eq!(task.created_at, task.updated_at, "Fresh task timestamps should match");
    assert_task_matches_draft(&task, &draft);

    let other = repo.create(&draft).await.expect("Create should succeed");
    assert_ne!(task.id, other.id, "IDs should be unique");

    let fetched = repo
        .get_by_id(task.id)
        .await
        .expect("Get should succeed")
        .expect("Created task should be found");
    assert_eq!(fetched, task, "Read back should equal the created task");

    let missing = repo.get_by_id(Uuid::new_v4()).await.expect("Get should succeed");
    assert!(missing.is_none(), "Unknown ID should not be found");

    clear(repo).await;
}

/// Update overwrites every field, keeps created_at and reports unknown IDs as None
pub async fn test_update_contract<R: TaskRepository>(repo: &R) {
    let task = repo
        .create(&scheduled_draft("Update contract"))
        .await
        .expect("Create should succeed");

    let draft = TaskDraftBuilder::new()
        .with_title("Updated title")
        .with_priority(Priority::Low)
        .with_domain(Domain::Home)
        .in_backlog()
        .completed()
        .build();
    let updated = repo
        .update(task.id, &draft)
        .await
        .expect("Update should succeed")
        .expect("Existing task should be updated");

    assert_eq!(updated.id, task.id, "ID should remain unchanged");
    assert_eq!(updated.created_at, task.created_at, "created_at should remain unchanged");
    assert!(updated.updated_at > task.updated_at, "updated_at should move forward");
    assert_task_matches_draft(&updated, &draft);
    assert!(updated.description.is_none());

    let missing = repo
        .update(Uuid::new_v4(), &draft)
        .await
        .expect("Update of unknown ID should not error");
    assert!(missing.is_none(), "Unknown ID should report None");

    clear(repo).await;
}

/// list_all returns insertion order
pub async fn test_list_order_contract<R: TaskRepository>(repo: &R) {
    assert!(repo.list_all().await.expect("List should succeed").is_empty());

    for title in ["first", "second", "third"] {
        repo.create(&scheduled_draft(title))
            .await
            .expect("Create should succeed");
    }
    let tasks = repo.list_all().await.expect("List should succeed");
    assert_titles(&tasks, &["first", "second", "third"]);

    clear(repo).await;
}

/// list_filtered applies the AND of all present predicates
pub async fn test_filter_contract<R: TaskRepository>(repo: &R) {
    let drafts = [
        TaskDraftBuilder::new()
            .with_title("work high")
            .with_priority(Priority::High)
            .with_domain(Domain::Work)
            .build(),
        TaskDraftBuilder::new()
            .with_title("work low backlog")
            .with_priority(Priority::Low)
            .with_domain(Domain::Work)
            .in_backlog()
            .build(),
        TaskDraftBuilder::new()
            .with_title("health high done")
            .with_priority(Priority::High)
            .with_domain(Domain::Health)
            .completed()
            .build(),
    ];
    for draft in &drafts {
        repo.create(draft).await.expect("Create should succeed");
    }

    let by_priority = repo
        .list_filtered(&TaskFilterBuilder::new().with_priority(Priority::High).build())
        .await
        .expect("Filter should succeed");
    assert_titles(&by_priority, &["work high", "health high done"]);

    let work_and_high = repo
        .list_filtered(
            &TaskFilterBuilder::new()
                .with_priority(Priority::High)
                .with_domain(Domain::Work)
                .build(),
        )
        .await
        .expect("Filter should succeed");
    assert_titles(&work_and_high, &["work high"]);

    let backlog = repo
        .list_filtered(&TaskFilterBuilder::new().with_backlog(true).build())
        .await
        .expect("Filter should succeed");
    assert_titles(&backlog, &["work low backlog"]);

    let open = repo
        .list_filtered(&TaskFilterBuilder::new().with_completed(false).build())
        .await
        .expect("Filter should succeed");
    assert_titles(&open, &["work high", "work low backlog"]);

    let nothing = repo
        .list_filtered(
            &TaskFilterBuilder::new()
                .with_domain(Domain::Finance)
                .build(),
        )
        .await
        .expect("Filter should succeed");
    assert!(nothing.is_empty(), "Unmatched filter should return no tasks");

    let everything = repo
        .list_filtered(&TaskFilter::default())
        .await
        .expect("Empty filter should succeed");
    assert_eq!(everything.len(), drafts.len(), "Empty filter should match all tasks");

    clear(repo).await;
}

/// search is a case-insensitive literal substring match on titles
pub async fn test_search_contract<R: TaskRepository>(repo: &R) {
    for title in crate::search_titles() {
        repo.create(&backlog_draft(title))
            .await
            .expect("Create should succeed");
    }

    let reports = repo.search("report").await.expect("Search should succeed");
    assert_titles(&reports, &["Write REPORT draft", "report review"]);

    let upper = repo.search("REVIEW").await.expect("Search should succeed");
    assert_titles(&upper, &["report review"]);

    let percent = repo.search("%").await.expect("Search should succeed");
    assert_titles(&percent, &["50% done"]);

    let underscore = repo.search("_").await.expect("Search should succeed");
    assert_titles(&underscore, &["snake_case rename"]);

    let quote = repo.search("' OR 1=1 --").await.expect("Search should succeed");
    assert!(quote.is_empty(), "Query text should be matched literally");

    let all = repo.search("").await.expect("Search should succeed");
    assert_eq!(
        all.len(),
        crate::search_titles().len(),
        "Empty query should match all tasks"
    );

    clear(repo).await;

    for title in ["Übung Mathe", "ÉTÉ planning", "Unrelated"] {
        repo.create(&backlog_draft(title))
            .await
            .expect("Create should succeed");
    }

    let lower = repo.search("übung").await.expect("Search should succeed");
    assert_titles(&lower, &["Übung Mathe"]);

    let mixed = repo.search("Été").await.expect("Search should succeed");
    assert_titles(&mixed, &["ÉTÉ planning"]);

    clear(repo).await;
}

/// delete reports the removed count and is idempotent
pub async fn test_delete_contract<R: TaskRepository>(repo: &R) {
    let keep = repo
        .create(&scheduled_draft("keep"))
        .await
        .expect("Create should succeed");
    let task = repo
        .create(&scheduled_draft("delete me"))
        .await
        .expect("Create should succeed");

    assert_eq!(repo.delete(task.id).await.expect("Delete should succeed"), 1);
    assert!(repo.get_by_id(task.id).await.expect("Get should succeed").is_none());
    assert_eq!(
        repo.delete(task.id).await.expect("Repeat delete should succeed"),
        0,
        "Deleting a missing task removes nothing"
    );

    let remaining = repo.list_all().await.expect("List should succeed");
    assert_titles(&remaining, &["keep"]);
    assert_eq!(remaining[0].id, keep.id);

    clear(repo).await;
}

/// bulk_delete removes exactly the listed tasks that exist
pub async fn test_bulk_delete_contract<R: TaskRepository>(repo: &R) {
    let mut ids = Vec::new();
    for title in ["a", "b", "c", "d"] {
        let task = repo
            .create(&scheduled_draft(title))
            .await
            .expect("Create should succeed");
        ids.push(task.id);
    }

    let removed = repo
        .bulk_delete(&[ids[0], ids[2], Uuid::new_v4()])
        .await
        .expect("Bulk delete should succeed");
    assert_eq!(removed, 2, "Only existing tasks are counted");

    let remaining = repo.list_all().await.expect("List should succeed");
    assert_titles(&remaining, &["b", "d"]);

    let removed = repo
        .bulk_delete(&[ids[1], ids[1]])
        .await
        .expect("Bulk delete should succeed");
    assert_eq!(removed, 1, "Duplicate IDs count once");

    assert_eq!(repo.bulk_delete(&[]).await.expect("Empty bulk delete should succeed"), 0);

    clear(repo).await;
}

/// toggle flips completed, refreshes updated_at and reports unknown IDs as None
pub async fn test_toggle_contract<R: TaskRepository>(repo: &R) {
    let task = repo
        .create(&backlog_draft("toggle me"))
        .await
        .expect("Create should succeed");
    assert!(!task.completed);

    let once = repo
        .toggle_status(task.id)
        .await
        .expect("Toggle should succeed")
        .expect("Existing task should toggle");
    assert!(once.completed);
    assert!(once.updated_at > task.updated_at);
    assert_eq!(once.created_at, task.created_at);

    let twice = repo
        .toggle_status(task.id)
        .await
        .expect("Toggle should succeed")
        .expect("Existing task should toggle");
    assert!(!twice.completed, "Toggling twice restores the starting value");
    assert!(twice.updated_at > once.updated_at);
    assert_eq!(twice.title, task.title);
    assert_eq!(twice.is_backlog, task.is_backlog);

    let missing = repo
        .toggle_status(Uuid::new_v4())
        .await
        .expect("Toggle of unknown ID should not error");
    assert!(missing.is_none());

    clear(repo).await;
}

pub async fn test_health_check_contract<R: TaskRepository>(repo: &R) {
    repo.health_check().await.expect("Health check should pass");
}
