//! Integration tests for the mocks crate
//!
//! Tests the mock implementations and utilities to ensure they work correctly
//! and provide the expected testing capabilities.

use std::time::Duration;

use mocks::*;
use taskhub_core::{TaskError, TaskRepository};
use uuid::Uuid;

#[tokio::test]
async fn test_mock_repository_basic_operations() {
    let repo = MockTaskRepository::new();

    let draft = write_report_draft();
    let task = repo.create(&draft).await.unwrap();
    assert_task_matches_draft(&task, &draft);
    repo.assert_called("create");

    let retrieved = repo.get_by_id(task.id).await.unwrap().unwrap();
    assert_eq!(retrieved, task);
    repo.assert_called("get_by_id");
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_mock_repository_error_injection() {
    let repo = MockTaskRepository::new();

    repo.inject_error(TaskError::Database("connection reset".to_string()));

    let result = repo.list_all().await;
    assert_eq!(result, Err(TaskError::Database("connection reset".to_string())));

    // Injection is consumed by the failing call
    assert!(repo.list_all().await.is_ok());

    repo.inject_error(TaskError::Database("again".to_string()));
    repo.clear_error();
    assert!(repo.get_by_id(Uuid::new_v4()).await.is_ok());
}

#[tokio::test]
async fn test_mock_repository_failed_write_leaves_store_untouched() {
    let repo = MockTaskRepository::new();
    repo.inject_error(TaskError::Database("disk full".to_string()));

    assert!(repo.create(&learn_rust_draft()).await.is_err());
    assert!(repo.is_empty());
}

#[tokio::test]
async fn test_mock_repository_with_tasks_keeps_order() {
    let first = TaskBuilder::new().with_title("first").build();
    let second = TaskBuilder::new().with_title("second").in_backlog().build();
    let repo = MockTaskRepository::with_tasks(vec![first.clone(), second.clone()]);

    let tasks = repo.list_all().await.unwrap();
    assert_titles(&tasks, &["first", "second"]);
    assert_task_equals(&tasks[1], &second);
}

#[tokio::test]
async fn test_mock_repository_toggle_timestamps_strictly_increase() {
    let repo = MockTaskRepository::new();
    let task = repo.create(&backlog_draft("flip")).await.unwrap();

    let once = repo.toggle_status(task.id).await.unwrap().unwrap();
    let twice = repo.toggle_status(task.id).await.unwrap().unwrap();

    assert!(once.updated_at > task.updated_at);
    assert!(twice.updated_at > once.updated_at);
    assert!(!twice.completed);
}

#[tokio::test(start_paused = true)]
async fn test_mock_repository_latency() {
    let repo = MockTaskRepository::new();
    repo.set_latency(Duration::from_secs(5));

    let started = tokio::time::Instant::now();
    repo.health_check().await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(5));
}

#[tokio::test]
async fn test_mock_repository_bulk_delete_with_generated_data() {
    let repo = MockTaskRepository::new();
    let mut ids = Vec::new();
    for draft in generate_valid_drafts(10) {
        ids.push(repo.create(&draft).await.unwrap().id);
    }

    let removed = repo.bulk_delete(&ids[..4]).await.unwrap();
    assert_eq!(removed, 4);
    assert_eq!(repo.len(), 6);
    repo.assert_called("bulk_delete(count=4)");
}

#[tokio::test]
async fn test_mock_repository_contract() {
    let repo = MockTaskRepository::new();
    test_repository_contract(&repo).await;
}
